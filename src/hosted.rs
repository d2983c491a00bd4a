//! Hosted release record creation.
//!
//! The final pipeline step posts a release record to the hosting service's
//! API. Credentials come from the environment variables named in the config,
//! never from the config file itself, and are not resolved at all during a
//! dry run.

use std::env;

use crate::config::HostedReleaseConfig;
use crate::error::ReleaseError;
use crate::runner::ExternalAction;

/// Basic-auth credentials for the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Resolve credentials from the environment variables named in
    /// `config`. An unset or empty variable counts as missing.
    pub fn from_env(config: &HostedReleaseConfig) -> Result<Credentials, ReleaseError> {
        Ok(Credentials {
            username: read_env_var(&config.username_var)?,
            password: read_env_var(&config.password_var)?,
        })
    }

    /// Placeholder for dry runs, which never authenticate.
    pub fn unresolved() -> Credentials {
        Credentials {
            username: String::new(),
            password: String::new(),
        }
    }
}

fn read_env_var(name: &str) -> Result<String, ReleaseError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ReleaseError::MissingCredential(name.to_string())),
    }
}

/// Build the release-creation POST for `tag_name` and its success message.
///
/// The hosting API reports creation with status 201; the payload carries the
/// tag to attach the release to and the rendered tag message as its name.
pub fn create_release(
    config: &HostedReleaseConfig,
    tag_name: &str,
    release_name: &str,
    credentials: &Credentials,
) -> (ExternalAction, String) {
    let action = ExternalAction::HttpPost {
        url: release_url(&config.api_root, &config.repo),
        body: serde_json::json!({
            "tag_name": tag_name,
            "name": release_name,
        }),
        username: credentials.username.clone(),
        password: credentials.password.clone(),
    };
    let message = format!("created {} release on {}", tag_name, config.repo);
    (action, message)
}

/// `<api_root>/repos/<repo>/releases`, tolerating a trailing slash on the
/// API root.
fn release_url(api_root: &str, repo: &str) -> String {
    format!("{}/repos/{}/releases", api_root.trim_end_matches('/'), repo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosted_config() -> HostedReleaseConfig {
        HostedReleaseConfig {
            repo: "acme/widget".to_string(),
            username_var: "GANTRY_TEST_USER".to_string(),
            password_var: "GANTRY_TEST_TOKEN".to_string(),
            api_root: "https://api.github.com".to_string(),
        }
    }

    #[test]
    fn test_release_url() {
        assert_eq!(
            release_url("https://api.github.com", "acme/widget"),
            "https://api.github.com/repos/acme/widget/releases"
        );
        assert_eq!(
            release_url("https://git.example.test/api/", "acme/widget"),
            "https://git.example.test/api/repos/acme/widget/releases"
        );
    }

    #[test]
    fn test_create_release_payload() {
        let credentials = Credentials {
            username: "user".to_string(),
            password: "token".to_string(),
        };
        let (action, message) =
            create_release(&hosted_config(), "1.1.0", "version 1.1.0", &credentials);

        match action {
            ExternalAction::HttpPost {
                url,
                body,
                username,
                password,
            } => {
                assert_eq!(url, "https://api.github.com/repos/acme/widget/releases");
                assert_eq!(body["tag_name"], "1.1.0");
                assert_eq!(body["name"], "version 1.1.0");
                assert_eq!(username, "user");
                assert_eq!(password, "token");
            }
            _ => panic!("expected an HTTP action"),
        }

        assert_eq!(message, "created 1.1.0 release on acme/widget");
    }

    #[test]
    fn test_credentials_from_env() {
        temp_env::with_vars(
            [
                ("GANTRY_TEST_USER", Some("octocat")),
                ("GANTRY_TEST_TOKEN", Some("hunter2")),
            ],
            || {
                let credentials = Credentials::from_env(&hosted_config()).unwrap();
                assert_eq!(credentials.username, "octocat");
                assert_eq!(credentials.password, "hunter2");
            },
        );
    }

    #[test]
    fn test_credentials_missing_var_names_it() {
        temp_env::with_vars(
            [
                ("GANTRY_TEST_USER", Some("octocat")),
                ("GANTRY_TEST_TOKEN", None::<&str>),
            ],
            || {
                let err = Credentials::from_env(&hosted_config()).unwrap_err();
                match err {
                    ReleaseError::MissingCredential(var) => {
                        assert_eq!(var, "GANTRY_TEST_TOKEN")
                    }
                    other => panic!("unexpected error: {other}"),
                }
            },
        );
    }

    #[test]
    fn test_credentials_empty_value_counts_as_missing() {
        temp_env::with_vars(
            [
                ("GANTRY_TEST_USER", Some("")),
                ("GANTRY_TEST_TOKEN", Some("hunter2")),
            ],
            || {
                let err = Credentials::from_env(&hosted_config()).unwrap_err();
                assert!(matches!(err, ReleaseError::MissingCredential(_)));
            },
        );
    }
}
