//! gantry - A CLI tool that releases a package in one shot.
//!
//! # Overview
//!
//! gantry bumps the version in the manifest, stages and commits the change,
//! tags it, pushes branch and tags, publishes to the npm registry, and can
//! create a release record on the hosting service. Steps run in a fixed
//! order, each individually switchable, and the run halts on the first
//! failure without rolling anything back. A `--no-write` dry run simulates
//! every step without side effects.
//!
//! A release run owns its manifest and state exclusively; callers must not
//! start a second run in the same working directory while one is in flight.

pub mod config;
pub mod error;
pub mod hosted;
pub mod manifest;
pub mod pipeline;
pub mod registry;
pub mod runner;
pub mod template;
pub mod vcs;
pub mod version;

// Re-export commonly used types
pub use config::{HostedReleaseConfig, RegistryTag, ReleaseConfig};
pub use error::{CommandError, ConfigError, ManifestError, ReleaseError, VersionError};
pub use manifest::Manifest;
pub use pipeline::{ReleasePipeline, ReleaseReport, ReleaseState, STEP_ORDER, Step};
pub use runner::{ActionExecutor, CommandRunner, ExternalAction, StepResult, SystemExecutor};
pub use template::RenderedMessages;
pub use version::BumpClass;
