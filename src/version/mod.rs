//! Version parsing and semver bumping.

pub mod bump;

pub use bump::{BumpClass, increment, parse_version};
