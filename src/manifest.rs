//! Reading and rewriting the version manifest.
//!
//! Supports JSON manifests (package.json style) and TOML manifests with the
//! version under `[package]` or at the top level. Rewrites preserve every
//! other field and land on disk atomically.

use std::io::Write;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::error::ManifestError;

/// A version manifest held in memory between the initial read and the
/// post-bump rewrite.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    contents: Contents,
}

#[derive(Debug, Clone)]
enum Contents {
    Json(serde_json::Value),
    Toml(toml_edit::DocumentMut),
}

impl Manifest {
    /// Read and parse the manifest at `path`. A `.toml` extension selects
    /// the TOML document model; any other path is parsed as JSON.
    pub fn load(path: &Path) -> Result<Manifest, ManifestError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ManifestError::ReadFailed {
                path: display_path(path),
                source: e,
            })?;

        let contents = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => {
                let doc = content.parse::<toml_edit::DocumentMut>().map_err(|e| {
                    ManifestError::ParseFailed {
                        path: display_path(path),
                        reason: format!("Invalid TOML: {}", e),
                    }
                })?;
                Contents::Toml(doc)
            }
            _ => {
                let value: serde_json::Value = serde_json::from_str(&content)
                    .map_err(|e| ManifestError::ParseFailed {
                        path: display_path(path),
                        reason: format!("Invalid JSON: {}", e),
                    })?;
                Contents::Json(value)
            }
        };

        Ok(Manifest {
            path: path.to_path_buf(),
            contents,
        })
    }

    /// The version string currently recorded in the manifest.
    pub fn version(&self) -> Result<&str, ManifestError> {
        let version = match &self.contents {
            Contents::Json(value) => value.get("version").and_then(|v| v.as_str()),
            Contents::Toml(doc) => doc
                .get("package")
                .and_then(|p| p.get("version"))
                .and_then(|v| v.as_str())
                .or_else(|| doc.get("version").and_then(|v| v.as_str())),
        };

        version.ok_or_else(|| ManifestError::MissingVersion(display_path(&self.path)))
    }

    /// Point the manifest's version field at `new_version`, in memory only.
    ///
    /// Callers read [`Manifest::version`] first, so the field's location is
    /// already known to exist.
    pub fn set_version(&mut self, new_version: &Version) {
        match &mut self.contents {
            Contents::Json(value) => {
                value["version"] = serde_json::Value::String(new_version.to_string());
            }
            Contents::Toml(doc) => {
                if doc.get("package").and_then(|p| p.get("version")).is_some() {
                    doc["package"]["version"] = toml_edit::value(new_version.to_string());
                } else {
                    doc["version"] = toml_edit::value(new_version.to_string());
                }
            }
        }
    }

    /// Rewrite the manifest on disk from the in-memory contents.
    ///
    /// JSON keeps its field order and is serialized with 2-space indentation
    /// and a trailing newline (matching npm); TOML keeps its original
    /// formatting and comments. The write goes through a temp file in the
    /// same directory so a crash never leaves a half-written manifest.
    pub fn save(&self) -> Result<(), ManifestError> {
        let serialized = match &self.contents {
            Contents::Json(value) => {
                let pretty = serde_json::to_string_pretty(value).map_err(|e| {
                    ManifestError::ParseFailed {
                        path: display_path(&self.path),
                        reason: format!("Failed to serialize JSON: {}", e),
                    }
                })?;
                format!("{}\n", pretty)
            }
            Contents::Toml(doc) => doc.to_string(),
        };

        write_atomic(&self.path, &serialized)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), ManifestError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_failed = |source: std::io::Error| ManifestError::WriteFailed {
        path: display_path(path),
        source,
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(content.as_bytes()).map_err(write_failed)?;

    // NamedTempFile is created 0600; keep the target's existing permissions
    // across the rewrite.
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(write_failed)?;
    }

    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}
