//! Semver increment rules for release bumps.

use std::fmt;
use std::str::FromStr;

use semver::{Prerelease, Version};

use crate::error::VersionError;

/// Requested release granularity.
///
/// The seven named classes follow the npm semver tool's increment rules;
/// anything else is accepted only if it parses as an explicit target version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpClass {
    Major,
    Minor,
    Patch,
    Premajor,
    Preminor,
    Prepatch,
    Prerelease,
    /// Jump straight to this version instead of incrementing.
    Explicit(Version),
}

impl Default for BumpClass {
    fn default() -> Self {
        BumpClass::Patch
    }
}

impl FromStr for BumpClass {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "major" => Ok(BumpClass::Major),
            "minor" => Ok(BumpClass::Minor),
            "patch" => Ok(BumpClass::Patch),
            "premajor" => Ok(BumpClass::Premajor),
            "preminor" => Ok(BumpClass::Preminor),
            "prepatch" => Ok(BumpClass::Prepatch),
            "prerelease" => Ok(BumpClass::Prerelease),
            other => Version::parse(other)
                .map(BumpClass::Explicit)
                .map_err(|_| VersionError::InvalidBumpClass(other.to_string())),
        }
    }
}

impl fmt::Display for BumpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BumpClass::Major => write!(f, "major"),
            BumpClass::Minor => write!(f, "minor"),
            BumpClass::Patch => write!(f, "patch"),
            BumpClass::Premajor => write!(f, "premajor"),
            BumpClass::Preminor => write!(f, "preminor"),
            BumpClass::Prepatch => write!(f, "prepatch"),
            BumpClass::Prerelease => write!(f, "prerelease"),
            BumpClass::Explicit(version) => write!(f, "{version}"),
        }
    }
}

/// Parse a version string, reporting the offending input on failure.
pub fn parse_version(raw: &str) -> Result<Version, VersionError> {
    Version::parse(raw.trim()).map_err(|e| VersionError::ParseFailed(raw.to_string(), e))
}

/// Compute the next version for `current` under `class`.
///
/// Bumping a pre-release with `major`/`minor`/`patch` completes the
/// pre-release when the corresponding component already sits at its target
/// (`1.0.0-alpha` + major = `1.0.0`), and `prerelease` on a stable version
/// starts a fresh `-0` pre-release one patch ahead (`1.2.3` -> `1.2.4-0`).
/// Build metadata never survives an increment. Incrementing a component
/// already at `u64::MAX` is `VersionError::Overflow`.
pub fn increment(current: &Version, class: &BumpClass) -> Result<Version, VersionError> {
    let add_one = |component: u64| {
        component
            .checked_add(1)
            .ok_or_else(|| VersionError::Overflow(current.clone()))
    };

    let next = match class {
        BumpClass::Explicit(version) => version.clone(),
        BumpClass::Major => {
            if !current.pre.is_empty() && current.minor == 0 && current.patch == 0 {
                Version::new(current.major, 0, 0)
            } else {
                Version::new(add_one(current.major)?, 0, 0)
            }
        }
        BumpClass::Minor => {
            if !current.pre.is_empty() && current.patch == 0 {
                Version::new(current.major, current.minor, 0)
            } else {
                Version::new(current.major, add_one(current.minor)?, 0)
            }
        }
        BumpClass::Patch => {
            if !current.pre.is_empty() {
                Version::new(current.major, current.minor, current.patch)
            } else {
                Version::new(current.major, current.minor, add_one(current.patch)?)
            }
        }
        BumpClass::Premajor => {
            let mut version = Version::new(add_one(current.major)?, 0, 0);
            version.pre = pre("0")?;
            version
        }
        BumpClass::Preminor => {
            let mut version = Version::new(current.major, add_one(current.minor)?, 0);
            version.pre = pre("0")?;
            version
        }
        BumpClass::Prepatch => {
            let mut version = Version::new(current.major, current.minor, add_one(current.patch)?);
            version.pre = pre("0")?;
            version
        }
        BumpClass::Prerelease => {
            if current.pre.is_empty() {
                let mut version =
                    Version::new(current.major, current.minor, add_one(current.patch)?);
                version.pre = pre("0")?;
                version
            } else {
                let identifiers = next_prerelease(current.pre.as_str())
                    .ok_or_else(|| VersionError::Overflow(current.clone()))?;
                let mut version = Version::new(current.major, current.minor, current.patch);
                version.pre = pre(&identifiers)?;
                version
            }
        }
    };

    Ok(next)
}

fn pre(identifiers: &str) -> Result<Prerelease, VersionError> {
    Prerelease::new(identifiers)
        .map_err(|e| VersionError::ParseFailed(identifiers.to_string(), e))
}

/// Increment the rightmost numeric identifier of a pre-release, or append a
/// `.0` when it has none (`alpha` -> `alpha.0`, `alpha.3` -> `alpha.4`).
/// `None` when the identifier cannot grow any further.
fn next_prerelease(pre: &str) -> Option<String> {
    let mut parts: Vec<String> = pre.split('.').map(str::to_string).collect();
    for i in (0..parts.len()).rev() {
        if let Ok(n) = parts[i].parse::<u64>() {
            parts[i] = n.checked_add(1)?.to_string();
            return Some(parts.join("."));
        }
    }
    parts.push("0".to_string());
    Some(parts.join("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn version(raw: &str) -> Version {
        Version::parse(raw).unwrap()
    }

    fn bumped(raw: &str, class: &BumpClass) -> String {
        increment(&version(raw), class).unwrap().to_string()
    }

    #[test]
    fn test_patch_bump() {
        assert_eq!(bumped("1.2.3", &BumpClass::Patch), "1.2.4");
    }

    #[test]
    fn test_minor_resets_patch() {
        assert_eq!(bumped("1.2.3", &BumpClass::Minor), "1.3.0");
    }

    #[test]
    fn test_major_resets_minor_and_patch() {
        assert_eq!(bumped("1.2.3", &BumpClass::Major), "2.0.0");
    }

    #[test]
    fn test_default_class_is_patch() {
        assert_eq!(BumpClass::default(), BumpClass::Patch);
    }

    #[test]
    fn test_patch_completes_prerelease() {
        assert_eq!(bumped("1.2.3-alpha.1", &BumpClass::Patch), "1.2.3");
    }

    #[test]
    fn test_major_completes_fresh_prerelease() {
        assert_eq!(bumped("1.0.0-alpha", &BumpClass::Major), "1.0.0");
    }

    #[test]
    fn test_major_on_advanced_prerelease_increments() {
        assert_eq!(bumped("1.2.3-alpha", &BumpClass::Major), "2.0.0");
    }

    #[test]
    fn test_minor_completes_prerelease_at_zero_patch() {
        assert_eq!(bumped("1.2.0-rc.1", &BumpClass::Minor), "1.2.0");
    }

    #[test]
    fn test_premajor_starts_prerelease() {
        assert_eq!(bumped("1.2.3", &BumpClass::Premajor), "2.0.0-0");
    }

    #[test]
    fn test_preminor_starts_prerelease() {
        assert_eq!(bumped("1.2.3", &BumpClass::Preminor), "1.3.0-0");
    }

    #[test]
    fn test_prepatch_starts_prerelease() {
        assert_eq!(bumped("1.2.3", &BumpClass::Prepatch), "1.2.4-0");
    }

    #[test]
    fn test_prerelease_increments_numeric_identifier() {
        assert_eq!(bumped("1.2.3-alpha.3", &BumpClass::Prerelease), "1.2.3-alpha.4");
        assert_eq!(bumped("1.2.3-0", &BumpClass::Prerelease), "1.2.3-1");
    }

    #[test]
    fn test_prerelease_appends_zero_without_numeric_identifier() {
        assert_eq!(bumped("1.2.3-alpha", &BumpClass::Prerelease), "1.2.3-alpha.0");
    }

    #[test]
    fn test_prerelease_from_stable_starts_one_patch_ahead() {
        assert_eq!(bumped("1.2.3", &BumpClass::Prerelease), "1.2.4-0");
    }

    #[test]
    fn test_explicit_version_used_verbatim() {
        let class: BumpClass = "3.1.4".parse().unwrap();
        assert_eq!(class, BumpClass::Explicit(version("3.1.4")));
        assert_eq!(bumped("1.2.3", &class), "3.1.4");
    }

    #[test]
    fn test_unknown_class_rejected() {
        let err = "banana".parse::<BumpClass>().unwrap_err();
        assert!(matches!(err, VersionError::InvalidBumpClass(ref s) if s == "banana"));
    }

    #[test]
    fn test_build_metadata_cleared() {
        assert_eq!(bumped("1.2.3+build.5", &BumpClass::Patch), "1.2.4");
        assert_eq!(bumped("1.2.3+build.5", &BumpClass::Prerelease), "1.2.4-0");
    }

    #[test]
    fn test_component_overflow_rejected() {
        let current = version(&format!("{}.0.0", u64::MAX));
        assert!(matches!(
            increment(&current, &BumpClass::Major).unwrap_err(),
            VersionError::Overflow(_)
        ));
        assert!(matches!(
            increment(&current, &BumpClass::Premajor).unwrap_err(),
            VersionError::Overflow(_)
        ));
    }

    #[test]
    fn test_prerelease_identifier_overflow_rejected() {
        let current = version(&format!("1.2.3-rc.{}", u64::MAX));
        assert!(matches!(
            increment(&current, &BumpClass::Prerelease).unwrap_err(),
            VersionError::Overflow(_)
        ));
    }

    #[test]
    fn test_standard_bumps_strictly_increase() {
        for raw in ["0.0.1", "1.2.3", "10.0.9"] {
            let current = version(raw);
            for class in [BumpClass::Major, BumpClass::Minor, BumpClass::Patch] {
                let next = increment(&current, &class).unwrap();
                assert!(next > current, "{class} on {current} gave {next}");
            }
        }
    }

    #[test]
    fn test_parse_version_rejects_garbage() {
        assert!(parse_version("not-a-version").is_err());
        assert!(parse_version("1.2").is_err());
    }

    #[test]
    fn test_parse_version_trims_whitespace() {
        assert_eq!(parse_version(" 1.2.3\n").unwrap(), version("1.2.3"));
    }
}
