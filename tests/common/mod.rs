//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gantry::config::ReleaseConfig;
use gantry::error::CommandError;
use gantry::runner::{ActionExecutor, ActionOutcome, ExternalAction};

/// Write a `package.json` with the given version into `dir`.
pub fn write_package_json(dir: &Path, version: &str) -> PathBuf {
    let path = dir.join("package.json");
    let contents = format!(
        "{{\n  \"name\": \"widget\",\n  \"version\": \"{}\"\n}}\n",
        version
    );
    std::fs::write(&path, contents).expect("Failed to write package.json");
    path
}

/// Write a `Cargo.toml` with the given version into `dir`.
pub fn write_cargo_toml(dir: &Path, version: &str) -> PathBuf {
    let path = dir.join("Cargo.toml");
    let contents = format!(
        "[package]\nname = \"widget\"\nversion = \"{}\"\nedition = \"2021\"\n",
        version
    );
    std::fs::write(&path, contents).expect("Failed to write Cargo.toml");
    path
}

/// Read the version field back out of a JSON manifest on disk.
pub fn read_json_version(path: &Path) -> String {
    let contents = std::fs::read_to_string(path).expect("Failed to read manifest");
    let value: serde_json::Value =
        serde_json::from_str(&contents).expect("Failed to parse manifest");
    value["version"]
        .as_str()
        .expect("manifest has no version")
        .to_string()
}

/// Default config pointed at `manifest`, with every step enabled.
pub fn release_config(manifest: PathBuf) -> ReleaseConfig {
    ReleaseConfig {
        manifest,
        ..ReleaseConfig::default()
    }
}

/// Config pointed at `manifest` with every step disabled, for tests that
/// enable exactly the steps they exercise.
pub fn disabled_config(manifest: PathBuf) -> ReleaseConfig {
    ReleaseConfig {
        bump: false,
        stage: false,
        commit: false,
        tag: false,
        push: false,
        push_tags: false,
        publish: false,
        manifest,
        ..ReleaseConfig::default()
    }
}

/// Executor that records action descriptions instead of performing them.
///
/// Unlike the unit tests in `src/runner.rs` which use mockall, the
/// integration tests share this hand-rolled executor so they can assert on
/// the exact sequence of actions a whole pipeline run produces. Cloning
/// shares the recording, so tests keep a handle after handing the executor
/// to the pipeline.
#[derive(Clone)]
pub struct RecordingExecutor {
    recorded: Arc<Mutex<Vec<String>>>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    /// Executor where every action succeeds.
    pub fn new() -> Self {
        RecordingExecutor {
            recorded: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
        }
    }

    /// Executor where the first action whose description contains `needle`
    /// reports failure, as if the underlying command exited nonzero.
    pub fn failing_on(needle: &str) -> Self {
        RecordingExecutor {
            recorded: Arc::new(Mutex::new(Vec::new())),
            fail_on: Some(needle.to_string()),
        }
    }

    /// Descriptions of every action executed so far, in order.
    pub fn descriptions(&self) -> Vec<String> {
        self.recorded.lock().expect("recording lock poisoned").clone()
    }
}

#[async_trait]
impl ActionExecutor for RecordingExecutor {
    async fn execute(&self, action: &ExternalAction) -> Result<ActionOutcome, CommandError> {
        let description = action.describe();
        self.recorded
            .lock()
            .expect("recording lock poisoned")
            .push(description.clone());

        if let Some(needle) = &self.fail_on {
            if description.contains(needle) {
                return Ok(ActionOutcome {
                    succeeded: false,
                    detail: "simulated failure".to_string(),
                });
            }
        }

        Ok(ActionOutcome {
            succeeded: true,
            detail: String::new(),
        })
    }
}
