//! Release pipeline: run the enabled steps in order, halting on failure.
//!
//! Orchestrates the version bump, manifest rewrite, git stage/commit/tag,
//! pushes, registry publish, and hosted release record. A failed step aborts
//! the remainder; nothing is rolled back, so partial completion is a
//! visible, accepted outcome.

pub mod steps;

use semver::Version;
use tracing::debug;

use crate::config::ReleaseConfig;
use crate::error::ReleaseError;
use crate::hosted::{self, Credentials};
use crate::manifest::Manifest;
use crate::registry;
use crate::runner::{ActionExecutor, CommandRunner, StepResult, SystemExecutor};
use crate::template::RenderedMessages;
use crate::vcs;
use crate::version::{increment, parse_version};

pub use steps::{STEP_ORDER, Step, plan};

/// Mutable state threaded through one release run.
///
/// `new_version` is computed once, before any step executes, and never
/// recomputed. When bumping is disabled it equals `current_version` so the
/// later steps still have a version to name.
#[derive(Debug)]
pub struct ReleaseState {
    pub manifest: Manifest,
    pub current_version: Version,
    pub new_version: Version,
}

impl ReleaseState {
    /// Load the manifest and compute both versions for the run.
    pub fn prepare(config: &ReleaseConfig) -> Result<ReleaseState, ReleaseError> {
        let manifest = Manifest::load(&config.manifest)?;
        let current_version = parse_version(manifest.version()?)?;

        let new_version = if config.bump {
            let class = config.bump_class.clone().unwrap_or_default();
            increment(&current_version, &class)?
        } else {
            current_version.clone()
        };

        Ok(ReleaseState {
            manifest,
            current_version,
            new_version,
        })
    }
}

/// Account of a finished run, for callers that want to report on it.
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub previous_version: Version,
    pub new_version: Version,
    pub dry_run: bool,
    /// Message of each completed step, in execution order.
    pub outcomes: Vec<(Step, String)>,
}

/// The release pipeline.
///
/// One pipeline value performs one run. Steps execute strictly
/// sequentially; callers must not start a second run while one is in
/// flight in the same working directory.
pub struct ReleasePipeline<E = SystemExecutor> {
    config: ReleaseConfig,
    runner: CommandRunner<E>,
}

impl ReleasePipeline<SystemExecutor> {
    /// Build a pipeline that performs real side effects, or simulates them
    /// when the config asks for a dry run.
    pub fn new(config: ReleaseConfig) -> ReleasePipeline<SystemExecutor> {
        let dry_run = config.dry_run;
        ReleasePipeline {
            config,
            runner: CommandRunner::new(dry_run),
        }
    }
}

impl<E: ActionExecutor> ReleasePipeline<E> {
    /// Build a pipeline around a custom executor (used by tests).
    pub fn with_executor(config: ReleaseConfig, executor: E) -> ReleasePipeline<E> {
        let dry_run = config.dry_run;
        ReleasePipeline {
            config,
            runner: CommandRunner::with_executor(executor, dry_run),
        }
    }

    /// Run every enabled step in order, halting on the first failure.
    ///
    /// The returned future resolves only after the final step has settled,
    /// including the network-bound hosted release; in dry-run mode it
    /// resolves through the same path without performing anything.
    pub async fn run(&self) -> Result<ReleaseReport, ReleaseError> {
        let mut state = ReleaseState::prepare(&self.config)?;
        let messages = RenderedMessages::from_templates(
            &self.config.tag_name,
            &self.config.commit_message,
            &self.config.tag_message,
            &state.new_version.to_string(),
        );

        let steps = plan(&self.config);
        debug!(
            "release plan: {} -> {}, steps {:?}",
            state.current_version,
            state.new_version,
            steps.iter().map(|s| s.label()).collect::<Vec<_>>()
        );

        println!("Version: {} -> {}", state.current_version, state.new_version);

        let mut outcomes = Vec::with_capacity(steps.len());
        for step in steps {
            let result = self.run_step(step, &mut state, &messages).await?;

            if result.succeeded {
                println!("  [DONE] {}", result.message);
                outcomes.push((step, result.message));
            } else {
                eprintln!("  [FAIL] {}", result.message);
                return Err(ReleaseError::StepFailed {
                    step: step.label(),
                    message: result.message,
                });
            }
        }

        Ok(ReleaseReport {
            previous_version: state.current_version.clone(),
            new_version: state.new_version.clone(),
            dry_run: self.runner.is_dry_run(),
            outcomes,
        })
    }

    /// Execute one step. Every external effect, real or simulated, resolves
    /// through the runner's single exit point.
    async fn run_step(
        &self,
        step: Step,
        state: &mut ReleaseState,
        messages: &RenderedMessages,
    ) -> Result<StepResult, ReleaseError> {
        let manifest_path = self.config.manifest.to_string_lossy();

        match step {
            Step::Bump => {
                state.manifest.set_version(&state.new_version);
                if !self.runner.is_dry_run() {
                    state.manifest.save()?;
                }
                Ok(StepResult::ok(format!(
                    "Version bumped to {}",
                    state.new_version
                )))
            }
            Step::Stage => {
                let action = vcs::stage(&manifest_path);
                Ok(self.runner.run(&action, None).await?)
            }
            Step::Commit => {
                let action = vcs::commit(&manifest_path, &messages.commit_message);
                let success = format!("{} committed", manifest_path);
                Ok(self.runner.run(&action, Some(&success)).await?)
            }
            Step::Tag => {
                let action = vcs::tag(&messages.tag_name, &messages.tag_message);
                let success = format!("New git tag created: {}", messages.tag_name);
                Ok(self.runner.run(&action, Some(&success)).await?)
            }
            Step::Push => Ok(self.runner.run(&vcs::push(), Some("pushed to remote")).await?),
            Step::PushTags => {
                let success = format!("pushed new tag {} to remote", state.new_version);
                Ok(self.runner.run(&vcs::push_tags(), Some(&success)).await?)
            }
            Step::Publish => {
                let (action, success) = registry::publish(
                    &state.new_version.to_string(),
                    self.config.registry_tag.as_ref(),
                    self.config.publish_folder.as_deref(),
                );
                Ok(self.runner.run(&action, Some(&success)).await?)
            }
            Step::HostedRelease => match self.config.hosted_release.as_ref() {
                Some(hosted_config) => {
                    // Credentials are only resolved when the request will
                    // actually be sent.
                    let credentials = if self.runner.is_dry_run() {
                        Credentials::unresolved()
                    } else {
                        Credentials::from_env(hosted_config)?
                    };

                    let (action, success) = hosted::create_release(
                        hosted_config,
                        &messages.tag_name,
                        &messages.tag_message,
                        &credentials,
                    );
                    Ok(self.runner.run(&action, Some(&success)).await?)
                }
                // plan() never schedules this step without the config
                None => Ok(StepResult::ok("hosted release not configured")),
            },
        }
    }
}
