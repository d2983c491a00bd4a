//! gantry - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gantry::config::{RegistryTag, ReleaseConfig};
use gantry::pipeline::ReleasePipeline;
use gantry::runner::ensure_tool_installed;
use gantry::version::BumpClass;

/// Release a package in one shot: bump, commit, tag, push, publish.
#[derive(Parser, Debug)]
#[command(name = "gantry")]
#[command(about = "Bump, commit, tag, push, and publish a package release in one shot")]
#[command(version)]
struct Cli {
    /// Release type (major, minor, patch, premajor, preminor, prepatch,
    /// prerelease) or an explicit version [default: patch]
    bump: Option<String>,

    /// Simulate the release without performing any side effects
    #[arg(long = "no-write", alias = "dry-run")]
    no_write: bool,

    /// Dist-tag for the registry publish; without a value, the new version
    /// itself becomes the tag
    #[arg(long = "registry-tag", value_name = "TAG")]
    registry_tag: Option<Option<String>>,

    /// Path of the version manifest
    #[arg(long, value_name = "PATH")]
    manifest: Option<PathBuf>,

    /// Path of the config file [default: gantry.toml or .gantry.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    // Step 1: Load configuration
    let mut config = match cli.config {
        Some(ref path) => ReleaseConfig::load(path).context("Failed to load configuration")?,
        None => ReleaseConfig::load_or_default(Path::new("."))
            .context("Failed to load configuration")?,
    };

    // Step 2: Apply CLI overrides
    config.dry_run = cli.no_write;
    if let Some(manifest) = cli.manifest {
        config.manifest = manifest;
    }
    if let Some(tag) = cli.registry_tag {
        config.registry_tag = Some(match tag {
            Some(name) => RegistryTag::Named(name),
            None => RegistryTag::Enabled(true),
        });
    }
    config.bump_class = cli
        .bump
        .as_deref()
        .map(|raw| raw.parse::<BumpClass>())
        .transpose()?;

    // Step 3: Check required tools (skipped for dry runs, which invoke nothing)
    if !config.dry_run {
        if config.stage || config.commit || config.tag || config.push || config.push_tags {
            ensure_tool_installed("git")?;
        }
        if config.publish {
            ensure_tool_installed("npm")?;
        }
    }

    // Step 4: Run the pipeline
    if config.dry_run {
        println!("Dry run: simulating the release without side effects");
    }

    let pipeline = ReleasePipeline::new(config);
    let report = pipeline.run().await?;

    // Step 5: Summarize
    println!();
    if report.dry_run {
        println!("Dry run complete. No changes made.");
    } else {
        println!("Release {} complete!", report.new_version);
    }

    Ok(())
}

/// Console logging controlled by RUST_LOG (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
