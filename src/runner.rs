//! External action execution with dry-run support.
//!
//! Every side effect a pipeline step performs goes through
//! [`CommandRunner::run`], so dry-run and real execution share a single
//! resolution point and tests can swap the executor out.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::CommandError;

/// An external side effect a pipeline step may perform.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalAction {
    /// Spawn `program` with `args` and wait for it to exit.
    Subprocess { program: String, args: Vec<String> },

    /// POST a JSON `body` to `url` with basic auth.
    HttpPost {
        url: String,
        body: serde_json::Value,
        username: String,
        password: String,
    },
}

impl ExternalAction {
    /// Convenience constructor for subprocess actions.
    pub fn subprocess(program: &str, args: &[&str]) -> ExternalAction {
        ExternalAction::Subprocess {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Human-readable rendition of the action, used for dry-run reporting
    /// and trace logging. Credentials never appear here.
    pub fn describe(&self) -> String {
        match self {
            ExternalAction::Subprocess { program, args } => {
                let mut rendered = vec![program.clone()];
                rendered.extend(args.iter().map(|arg| quote_arg(arg)));
                rendered.join(" ")
            }
            ExternalAction::HttpPost { url, .. } => format!("POST {}", url),
        }
    }
}

fn quote_arg(arg: &str) -> String {
    if arg.contains(char::is_whitespace) {
        format!("\"{}\"", arg)
    } else {
        arg.to_string()
    }
}

/// Outcome of one pipeline step, used to decide whether the pipeline
/// continues and what to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub succeeded: bool,
    pub message: String,
}

impl StepResult {
    pub fn ok(message: impl Into<String>) -> StepResult {
        StepResult {
            succeeded: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> StepResult {
        StepResult {
            succeeded: false,
            message: message.into(),
        }
    }
}

/// Raw result of actually performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub succeeded: bool,
    /// Diagnostic detail on failure: stderr for subprocesses, status and
    /// response body for HTTP calls.
    pub detail: String,
}

/// Trait for performing external actions.
///
/// This abstraction allows mocking subprocess and network calls in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Perform the action for real and report how it went.
    ///
    /// An action that ran but failed (nonzero exit, unexpected HTTP status)
    /// is an `Ok` outcome with `succeeded` false; `Err` means the action
    /// could not be attempted at all.
    async fn execute(&self, action: &ExternalAction) -> Result<ActionOutcome, CommandError>;
}

/// Executor that spawns real subprocesses and sends real HTTP requests.
pub struct SystemExecutor {
    client: reqwest::Client,
}

const USER_AGENT: &str = concat!("gantry/", env!("CARGO_PKG_VERSION"));

impl SystemExecutor {
    pub fn new() -> SystemExecutor {
        SystemExecutor {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for SystemExecutor {
    fn default() -> Self {
        SystemExecutor::new()
    }
}

#[async_trait]
impl ActionExecutor for SystemExecutor {
    async fn execute(&self, action: &ExternalAction) -> Result<ActionOutcome, CommandError> {
        match action {
            ExternalAction::Subprocess { program, args } => {
                let output = Command::new(program)
                    .args(args)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()
                    .await
                    .map_err(|e| CommandError::SpawnFailed {
                        program: program.clone(),
                        source: e,
                    })?;

                Ok(ActionOutcome {
                    succeeded: output.status.success(),
                    detail: String::from_utf8_lossy(&output.stderr).to_string(),
                })
            }
            ExternalAction::HttpPost {
                url,
                body,
                username,
                password,
            } => {
                let response = self
                    .client
                    .post(url)
                    .basic_auth(username, Some(password))
                    .header(reqwest::header::USER_AGENT, USER_AGENT)
                    .header(reqwest::header::ACCEPT, "application/vnd.github+json")
                    .json(body)
                    .send()
                    .await
                    .map_err(|e| CommandError::RequestFailed {
                        url: url.clone(),
                        source: e,
                    })?;

                let status = response.status();
                let text = response.text().await.unwrap_or_default();

                // The hosting API signals creation with 201; anything else
                // is a failure carrying the body as diagnostic text.
                if status == reqwest::StatusCode::CREATED {
                    Ok(ActionOutcome {
                        succeeded: true,
                        detail: text,
                    })
                } else {
                    Ok(ActionOutcome {
                        succeeded: false,
                        detail: format!("{}: {}", status, text),
                    })
                }
            }
        }
    }
}

/// Runs external actions on behalf of pipeline steps, honoring dry-run.
pub struct CommandRunner<E = SystemExecutor> {
    executor: E,
    dry_run: bool,
}

impl CommandRunner<SystemExecutor> {
    pub fn new(dry_run: bool) -> CommandRunner<SystemExecutor> {
        CommandRunner {
            executor: SystemExecutor::new(),
            dry_run,
        }
    }
}

impl<E: ActionExecutor> CommandRunner<E> {
    /// Build a runner around a custom executor (used by tests).
    pub fn with_executor(executor: E, dry_run: bool) -> CommandRunner<E> {
        CommandRunner { executor, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run `action`, or simulate it in dry-run mode.
    ///
    /// Dry run performs nothing and always reports success, so the rest of
    /// the pipeline keeps simulating. On real success the result carries
    /// `success_message`, falling back to the action's own description; on
    /// failure it carries "<description> failed", with the response body
    /// appended for HTTP actions.
    pub async fn run(
        &self,
        action: &ExternalAction,
        success_message: Option<&str>,
    ) -> Result<StepResult, CommandError> {
        let description = action.describe();

        if self.dry_run {
            debug!("not running: {}", description);
            return Ok(StepResult::ok(format!("would have run: {}", description)));
        }

        debug!("running: {}", description);
        let outcome = self.executor.execute(action).await?;

        if outcome.succeeded {
            let message = match success_message {
                Some(message) => message.to_string(),
                None => description,
            };
            debug!("ok: {}", message);
            return Ok(StepResult::ok(message));
        }

        debug!("failed: {}", description);
        match action {
            ExternalAction::Subprocess { .. } => {
                if !outcome.detail.is_empty() {
                    debug!("stderr: {}", outcome.detail.trim_end());
                }
                Ok(StepResult::failed(format!("{} failed", description)))
            }
            ExternalAction::HttpPost { .. } => Ok(StepResult::failed(format!(
                "{} failed: {}",
                description, outcome.detail
            ))),
        }
    }
}

/// Check that `tool` resolves to an executable on PATH.
pub fn ensure_tool_installed(tool: &str) -> Result<(), CommandError> {
    which::which(tool)
        .map(|_| ())
        .map_err(|_| CommandError::ToolNotFound(tool.to_string()))
}
