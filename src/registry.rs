//! Registry publish action for the release pipeline.

use crate::config::RegistryTag;
use crate::runner::ExternalAction;

/// Build the `npm publish` invocation and its success message.
///
/// A dist-tag of `true` resolves to the new version itself; a publish
/// folder publishes that directory instead of the project root.
pub fn publish(
    new_version: &str,
    registry_tag: Option<&RegistryTag>,
    folder: Option<&str>,
) -> (ExternalAction, String) {
    let mut args = vec!["publish".to_string()];
    let mut message = format!("published {} to npm", new_version);

    if let Some(tag) = registry_tag.and_then(|tag| tag.resolve(new_version)) {
        args.push("--tag".to_string());
        args.push(tag.clone());
        message.push_str(&format!(" with a tag of \"{}\"", tag));
    }

    if let Some(folder) = folder {
        args.push(folder.to_string());
    }

    let action = ExternalAction::Subprocess {
        program: "npm".to_string(),
        args,
    };
    (action, message)
}
