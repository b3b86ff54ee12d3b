//! Version and range translation from npm/bower semver into Composer constraints.
//!
//! The pipeline is a set of pure functions:
//! - [`convert_version_metadata`] rewrites prerelease/build keywords of one atom
//! - [`convert_version`] normalizes one atom end to end
//! - [`expand_caret`] turns `^atom` into an explicit lower/upper bound pair
//! - [`convert_range`] tokenizes a full range and drives the translation state machine

mod caret;
mod metadata;
mod range;
mod version;

pub use caret::expand_caret;
pub use metadata::{convert_version_metadata, Stability};
pub use range::convert_range;
pub use version::{clean_wildcard, convert_date_version, convert_version, replace_alias, Comparator};

/// Converts versions and ranges of a foreign ecosystem into Composer syntax
pub trait VersionConverter: Send + Sync {
    /// Convert a single version. `None` stands for an absent version.
    fn convert_version(&self, version: Option<&str>) -> String;

    /// Convert a full range expression
    fn convert_range(&self, range: &str) -> String;
}

/// Converter for the npm/bower flavour of semver
#[derive(Debug, Default, Clone, Copy)]
pub struct SemverConverter;

impl VersionConverter for SemverConverter {
    fn convert_version(&self, version: Option<&str>) -> String {
        convert_version(version)
    }

    fn convert_range(&self, range: &str) -> String {
        convert_range(range)
    }
}

/// Wildcard characters of the source grammar
pub(crate) const WILDCARDS: [char; 3] = ['*', 'x', 'X'];

pub(crate) fn has_wildcard(value: &str) -> bool {
    value.contains(&WILDCARDS[..])
}

pub(crate) fn replace_wildcards(value: &str, with: &str) -> String {
    value.replace(&WILDCARDS[..], with)
}

/// Integer value of the leading digits of a component, 0 when there are none
pub(crate) fn leading_int(value: &str) -> u64 {
    let digits = value.trim_start();
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    digits[..end].parse::<u64>().unwrap_or(if end > 0 { u64::MAX } else { 0 })
}
