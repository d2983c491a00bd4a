//! Message rendering for tag names and commit/tag messages.

/// Placeholder substituted with the release version in message templates.
pub const VERSION_TOKEN: &str = "<version>";

/// Render `template`, substituting every `<version>` token with `version`.
///
/// Any other token passes through verbatim, so templates can carry
/// arbitrary text without escaping.
pub fn render(template: &str, version: &str) -> String {
    template.replace(VERSION_TOKEN, version)
}

/// The three release messages, rendered once per run and reused by every
/// step that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessages {
    pub tag_name: String,
    pub commit_message: String,
    pub tag_message: String,
}

impl RenderedMessages {
    /// Render all three messages from their templates for `version`.
    pub fn from_templates(
        tag_name: &str,
        commit_message: &str,
        tag_message: &str,
        version: &str,
    ) -> Self {
        RenderedMessages {
            tag_name: render(tag_name, version),
            commit_message: render(commit_message, version),
            tag_message: render(tag_message, version),
        }
    }
}
