//! Release configuration.
//!
//! Loaded from `gantry.toml` / `.gantry.toml` when present, then overridden
//! by CLI flags. Every step flag defaults to on; configuration only turns
//! steps off or reshapes their inputs.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::version::BumpClass;

/// Configuration for one release run.
///
/// The step flags are independent; any subset may be enabled. Execution
/// order is fixed by the pipeline regardless of which flags are set.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseConfig {
    /// Bump the manifest version and rewrite the manifest.
    #[serde(default = "default_true")]
    pub bump: bool,

    /// Stage the manifest in version control.
    #[serde(default = "default_true")]
    pub stage: bool,

    /// Commit the staged manifest.
    #[serde(default = "default_true")]
    pub commit: bool,

    /// Create an annotated tag for the release.
    #[serde(default = "default_true")]
    pub tag: bool,

    /// Push the current branch to the remote.
    #[serde(default = "default_true")]
    pub push: bool,

    /// Push tags to the remote.
    #[serde(default = "default_true")]
    pub push_tags: bool,

    /// Publish the package to the registry.
    #[serde(default = "default_true")]
    pub publish: bool,

    /// Distribution tag for the registry publish.
    #[serde(default)]
    pub registry_tag: Option<RegistryTag>,

    /// Subfolder to publish instead of the project root.
    #[serde(default)]
    pub publish_folder: Option<String>,

    /// Path of the version manifest.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Template for the tag name.
    #[serde(default = "default_tag_name")]
    pub tag_name: String,

    /// Template for the commit message.
    #[serde(default = "default_commit_message")]
    pub commit_message: String,

    /// Template for the tag (and hosted release) message.
    #[serde(default = "default_tag_message")]
    pub tag_message: String,

    /// Create a release record on the hosting service after publishing.
    #[serde(default)]
    pub hosted_release: Option<HostedReleaseConfig>,

    /// Simulate every step without side effects. CLI-only.
    #[serde(skip)]
    pub dry_run: bool,

    /// Requested bump granularity. CLI-only; `None` means patch.
    #[serde(skip)]
    pub bump_class: Option<BumpClass>,
}

/// Distribution tag for the registry publish.
///
/// `true` tags the publish with the new version number itself, a string
/// tags it with that name, and `false` behaves like no tag at all.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RegistryTag {
    Named(String),
    Enabled(bool),
}

impl RegistryTag {
    /// The dist-tag to publish under, if any.
    pub fn resolve(&self, new_version: &str) -> Option<String> {
        match self {
            RegistryTag::Named(name) => Some(name.clone()),
            RegistryTag::Enabled(true) => Some(new_version.to_string()),
            RegistryTag::Enabled(false) => None,
        }
    }
}

/// Settings for creating a release record on the hosting service.
///
/// Credentials are never stored here; the config names the environment
/// variables that hold them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HostedReleaseConfig {
    /// Repository identifier, e.g. `owner/name`.
    pub repo: String,

    /// Environment variable holding the API username.
    pub username_var: String,

    /// Environment variable holding the API password or token.
    pub password_var: String,

    /// Base URL of the hosting API.
    #[serde(default = "default_api_root")]
    pub api_root: String,
}

fn default_true() -> bool {
    true
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

fn default_tag_name() -> String {
    "<version>".to_string()
}

fn default_commit_message() -> String {
    "release <version>".to_string()
}

fn default_tag_message() -> String {
    "version <version>".to_string()
}

fn default_api_root() -> String {
    "https://api.github.com".to_string()
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            bump: true,
            stage: true,
            commit: true,
            tag: true,
            push: true,
            push_tags: true,
            publish: true,
            registry_tag: None,
            publish_folder: None,
            manifest: default_manifest(),
            tag_name: default_tag_name(),
            commit_message: default_commit_message(),
            tag_message: default_tag_message(),
            hosted_release: None,
            dry_run: false,
            bump_class: None,
        }
    }
}

impl ReleaseConfig {
    /// Find a config file in `dir`. Search order: `gantry.toml`,
    /// `.gantry.toml`.
    pub fn find_config_path(dir: &Path) -> Option<PathBuf> {
        let candidates = [dir.join("gantry.toml"), dir.join(".gantry.toml")];
        candidates.into_iter().find(|p| p.exists())
    }

    /// Load configuration from `path`.
    pub fn load(path: &Path) -> Result<ReleaseConfig, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            source: e,
        })?;
        toml_edit::de::from_str(&content).map_err(|e| ConfigError::ParseFailed {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// Load the config file found in `dir`, or defaults when there is none.
    pub fn load_or_default(dir: &Path) -> Result<ReleaseConfig, ConfigError> {
        match Self::find_config_path(dir) {
            Some(path) => Self::load(&path),
            None => Ok(ReleaseConfig::default()),
        }
    }
}
