//! Git actions for the release pipeline.
//!
//! Every mutation shells out to the system `git` binary, inheriting the
//! user's git config, SSH agent, and credential store. These builders only
//! describe the invocation; the command runner performs it.

use crate::runner::ExternalAction;

/// `git add <path>` - stage the manifest.
pub fn stage(path: &str) -> ExternalAction {
    ExternalAction::subprocess("git", &["add", path])
}

/// `git commit <path> -m <message>` - commit the staged manifest.
pub fn commit(path: &str, message: &str) -> ExternalAction {
    ExternalAction::subprocess("git", &["commit", path, "-m", message])
}

/// `git tag <name> -m <message>` - create an annotated tag.
pub fn tag(name: &str, message: &str) -> ExternalAction {
    ExternalAction::subprocess("git", &["tag", name, "-m", message])
}

/// `git push` - push the current branch to its remote.
pub fn push() -> ExternalAction {
    ExternalAction::subprocess("git", &["push"])
}

/// `git push --tags` - push all tags to the remote.
pub fn push_tags() -> ExternalAction {
    ExternalAction::subprocess("git", &["push", "--tags"])
}
