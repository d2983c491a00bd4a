//! The ordered step table for a release run.
//!
//! Execution order is a fixed total order; configuration flags only filter
//! steps out of it, never reorder it.

use crate::config::ReleaseConfig;

/// One discrete, optionally-enabled unit of pipeline work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Bump,
    Stage,
    Commit,
    Tag,
    Push,
    PushTags,
    Publish,
    HostedRelease,
}

impl Step {
    /// Short label used in failure reports.
    pub fn label(&self) -> &'static str {
        match self {
            Step::Bump => "bump",
            Step::Stage => "stage",
            Step::Commit => "commit",
            Step::Tag => "tag",
            Step::Push => "push",
            Step::PushTags => "push-tags",
            Step::Publish => "publish",
            Step::HostedRelease => "hosted-release",
        }
    }

    fn enabled(&self, config: &ReleaseConfig) -> bool {
        match self {
            Step::Bump => config.bump,
            Step::Stage => config.stage,
            Step::Commit => config.commit,
            Step::Tag => config.tag,
            Step::Push => config.push,
            Step::PushTags => config.push_tags,
            Step::Publish => config.publish,
            Step::HostedRelease => config.hosted_release.is_some(),
        }
    }
}

/// Every step the pipeline knows, in execution order.
pub const STEP_ORDER: [Step; 8] = [
    Step::Bump,
    Step::Stage,
    Step::Commit,
    Step::Tag,
    Step::Push,
    Step::PushTags,
    Step::Publish,
    Step::HostedRelease,
];

/// The ordered steps `config` enables.
pub fn plan(config: &ReleaseConfig) -> Vec<Step> {
    STEP_ORDER
        .iter()
        .copied()
        .filter(|step| step.enabled(config))
        .collect()
}
