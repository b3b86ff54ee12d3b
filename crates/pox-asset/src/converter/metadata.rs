//! Prerelease and build metadata rewriting for a single version atom.

use lazy_static::lazy_static;
use regex::Regex;

use super::version::clean_wildcard;

/// Stability levels, ordered from least to most stable
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stability {
    Dev,
    Alpha,
    Beta,
    RC,
    Stable,
}

impl Stability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stability::Dev => "dev",
            Stability::Alpha => "alpha",
            Stability::Beta => "beta",
            Stability::RC => "RC",
            Stability::Stable => "stable",
        }
    }

    /// Map a prerelease keyword of the source ecosystem onto a stability
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_lowercase().as_str() {
            "dev" | "snapshot" => Some(Stability::Dev),
            "a" | "alpha" => Some(Stability::Alpha),
            "b" | "beta" | "pre" => Some(Stability::Beta),
            "rc" => Some(Stability::RC),
            "stable" => Some(Stability::Stable),
            _ => None,
        }
    }
}

impl std::fmt::Display for Stability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Suffixes some registries append to mirrored versions
const ECOSYSTEM_MARKERS: [&str; 2] = ["-npm-packages", "-bower-packages"];

lazy_static! {
    // 1 to 3 numeric (or wildcard) components followed by letters, or -/+ and letters or digits
    static ref METADATA_RE: Regex = {
        let num = r"(?:[0-9]+|x|X|\*)";
        Regex::new(&format!(
            r"^({num}|{num}\.{num}|{num}\.{num}\.{num})(?:[a-zA-Z]+|[-+][a-zA-Z]+|[-+][0-9]+)",
            num = num
        ))
        .unwrap()
    };

    static ref KEYWORD_RE: Regex = Regex::new(r"^[a-z]+").unwrap();

    static ref PATCH_NUMBER_RE: Regex = Regex::new(r"[0-9]+\.[0-9]+|[0-9]+|\.[0-9]+$").unwrap();
}

/// Rewrite the prerelease/build metadata of a version into Composer's
/// `-<stability><number>` form.
///
/// Versions without recognizable metadata are returned unchanged apart from
/// collapsing repeated `.x` wildcards.
pub fn convert_version_metadata(version: &str) -> String {
    let mut version = version.to_string();
    for marker in ECOSYSTEM_MARKERS {
        version = version.replace(marker, "");
    }

    let head = match METADATA_RE.captures(&version).and_then(|caps| caps.get(1)) {
        Some(head) => head.as_str().to_string(),
        None => return clean_wildcard(&version),
    };

    let lower = version.to_ascii_lowercase();
    let mut tail = &lower[head.len()..];
    if let Some(stripped) = tail.strip_prefix(|c: char| c == '-' || c == '+') {
        tail = stripped;
    }

    let keyword = KEYWORD_RE.find(tail).map_or("", |m| m.as_str());
    tail = &tail[keyword.len()..];

    let (label, numbered) = match Stability::from_keyword(keyword) {
        Some(Stability::Dev) => ("dev", false),
        Some(stability @ (Stability::Alpha | Stability::Beta | Stability::RC)) => (stability.as_str(), true),
        _ => ("patch", true),
    };

    let mut converted = format!("{}-{}", head, label);
    if numbered {
        converted.push_str(PATCH_NUMBER_RE.find(tail).map_or("1", |m| m.as_str()));
    }

    clean_wildcard(&converted)
}
