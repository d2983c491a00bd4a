//! Error types for gantry modules using thiserror.

use thiserror::Error;

/// Errors from version parsing and incrementing.
#[derive(Error, Debug)]
pub enum VersionError {
    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] semver::Error),

    #[error(
        "Unrecognized release type '{0}'. Expected major, minor, patch, premajor, preminor, prepatch, prerelease, or an explicit version"
    )]
    InvalidBumpClass(String),

    #[error("Version component overflow while incrementing '{0}'")]
    Overflow(semver::Version),
}

/// Errors from reading and writing the version manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("No version field found in {0}")]
    MissingVersion(String),
}

/// Errors from executing external actions (subprocesses and HTTP calls).
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Failed to spawn '{program}': {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to send request to {url}: {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Required executable '{0}' not found in PATH. Install it or simulate the release with --no-write")]
    ToolNotFound(String),
}

/// Errors from loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ParseFailed {
        path: String,
        #[source]
        source: toml_edit::de::Error,
    },
}

/// Errors from running the release pipeline.
#[derive(Error, Debug)]
pub enum ReleaseError {
    /// A step ran and reported failure. Carries the step's own message;
    /// everything the step already did stays in place.
    #[error("{message}")]
    StepFailed { step: &'static str, message: String },

    #[error("Version bump failed: {0}")]
    Version(#[from] VersionError),

    #[error("Manifest update failed: {0}")]
    Manifest(#[from] ManifestError),

    #[error("Command execution failed: {0}")]
    Command(#[from] CommandError),

    #[error("Environment variable '{0}' is not set (required for hosted release credentials)")]
    MissingCredential(String),
}
