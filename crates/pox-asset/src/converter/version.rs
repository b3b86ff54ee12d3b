//! Single version normalization.

use lazy_static::lazy_static;
use regex::Regex;

use super::metadata::convert_version_metadata;
use super::leading_int;

/// Highest component value, used as the upper alias of a wildcard
pub(crate) const OVERFLOW_SENTINEL: &str = "9999999";

lazy_static! {
    static ref DATE_VERSION_RE: Regex = Regex::new(r"^\d{7,}\.").unwrap();
}

/// Explicit comparator carried by a range atom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    LessThan,
    GreaterThan,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::LessThan => "<",
            Comparator::GreaterThan => ">",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(Comparator::LessThan),
            ">" => Some(Comparator::GreaterThan),
            _ => None,
        }
    }
}

/// Normalize one version of the source ecosystem.
///
/// An absent or empty version means any version (`*`); `latest` becomes
/// `default || *` so the default branch is preferred over tagged releases.
pub fn convert_version(version: Option<&str>) -> String {
    let version = match version {
        None | Some("") => return "*".to_string(),
        Some("latest") => return "default || *".to_string(),
        Some(version) => version.replace('\u{2013}', "-"),
    };

    // A single lowercase marker letter is carried through untouched
    let prefix_len = match version.chars().next() {
        Some(c) if c.is_ascii_lowercase() && !version.starts_with("dev-") => 1,
        _ => 0,
    };
    let (prefix, rest) = version.split_at(prefix_len);

    let converted = convert_date_version(&convert_version_metadata(rest));
    format!("{}{}", prefix, converted)
}

/// Zero-pad the groups following a date stamp (`20160101.5.2` -> `20160101.005002`)
/// so date versions compare correctly.
pub fn convert_date_version(version: &str) -> String {
    if !DATE_VERSION_RE.is_match(version) {
        return version.to_string();
    }

    let Some((date, rest)) = version.split_once('.') else {
        return version.to_string();
    };
    let mut groups = rest.split('.');
    let minor = groups.next().map_or(0, leading_int);
    let revision = groups.next().map_or(0, leading_int);

    format!("{}.{:03}{:03}", date, minor, revision)
}

/// Replace wildcards by the lowest (`>`) or highest (`<`) component value
pub fn replace_alias(version: &str, comparator: Comparator) -> String {
    let value = match comparator {
        Comparator::GreaterThan => "0",
        Comparator::LessThan => OVERFLOW_SENTINEL,
    };
    super::replace_wildcards(version, value)
}

/// Collapse runs of `.x.x` into a single `.x`
pub fn clean_wildcard(version: &str) -> String {
    let mut version = version.to_string();
    while version.contains(".x.x") {
        version = version.replace(".x.x", ".x");
    }
    version
}
