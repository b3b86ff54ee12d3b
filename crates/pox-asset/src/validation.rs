//! Tag, branch and constraint validation against Composer's version grammar.

use lazy_static::lazy_static;
use regex::Regex;

use crate::asset_type::AssetType;
use crate::converter::has_wildcard;

lazy_static! {
    // Regex to match pre-release data
    static ref MODIFIER_REGEX: &'static str = r"[._-]?(?:(stable|beta|b|RC|alpha|a|patch|pl|p)((?:[.-]?\d+)*)?)?([.-]?dev)?";

    static ref STABILITIES_REGEX: &'static str = r"stable|RC|beta|alpha|dev";

    // Classical versioning
    static ref CLASSICAL_VERSION_RE: Regex = Regex::new(&format!(
        r"(?i)^v?(\d{{1,5}})(\.\d+)?(\.\d+)?(\.\d+)?{}$",
        *MODIFIER_REGEX
    )).unwrap();

    // Date-based versioning
    static ref DATE_VERSION_RE: Regex = Regex::new(&format!(
        r"(?i)^v?(\d{{4}}(?:[.:-]?\d{{2}}){{1,6}}(?:[.:-]?\d{{1,3}}){{0,2}}){}$",
        *MODIFIER_REGEX
    )).unwrap();

    // Numeric branch names, each part a number or a wildcard
    static ref BRANCH_RE: Regex = Regex::new(
        r"(?i)^v?(\d+)(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?(?:\.(\d+|[xX*]))?$"
    ).unwrap();

    static ref STABILITY_FLAG_RE: Regex = Regex::new(&format!(r"(?i)@(?:{})$", *STABILITIES_REGEX)).unwrap();

    static ref BUILD_METADATA_RE: Regex = Regex::new(r"^([^,\s+]+)\+[^\s]+$").unwrap();

    static ref DEV_BRANCH_RE: Regex = Regex::new(r"(?i)^(.*?)[.-]?dev$").unwrap();

    // Constraint atoms
    static ref OR_CONSTRAINT_RE: Regex = Regex::new(r"\s*\|\|?\s*").unwrap();
    static ref OPERATOR_RE: Regex = Regex::new(r"^(?:<>|!=|>=?|<=?|==?|~|\^)?\s*").unwrap();
    static ref CONSTRAINT_STABILITY_RE: Regex = Regex::new(&format!(r"(?i)^([^,\s]*?)@(?:{})$", *STABILITIES_REGEX)).unwrap();
    static ref CONSTRAINT_REF_RE: Regex = Regex::new(r"(?i)^(dev-[^,\s@]+?|[^,\s@]+?\.x-dev)#.+$").unwrap();
    static ref WILDCARD_RE: Regex = Regex::new(r"(?i)^v?[x*](?:\.[x*])*$").unwrap();
    static ref X_RANGE_RE: Regex = Regex::new(r"(?i)^v?\d+(?:\.\d+){0,2}(?:\.[x*])+$").unwrap();
}

/// Branch names that Composer treats as the default branch
const DEFAULT_BRANCHES: [&str; 3] = ["master", "trunk", "default"];

/// Normalizes a version string the way Composer does before comparing it.
///
/// Returns `None` when the string is not a version.
pub fn normalize_version(version: &str) -> Option<String> {
    let version = version.trim();
    if version.is_empty() {
        return None;
    }

    // Strip off stability flag
    let version = STABILITY_FLAG_RE.replace(version, "");
    let version = version.as_ref();

    if DEFAULT_BRANCHES.contains(&version) {
        return Some(format!("dev-{}", version));
    }

    // If requirement is branch-like, use full name
    if version.get(..4).map_or(false, |prefix| prefix.eq_ignore_ascii_case("dev-")) {
        return Some(format!("dev-{}", &version[4..]));
    }

    // Strip off build metadata
    let version = BUILD_METADATA_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .map_or(version, |m| m.as_str());

    if let Some(caps) = CLASSICAL_VERSION_RE.captures(version) {
        let mut result = caps[1].to_string();
        for i in 2..=4 {
            result.push_str(caps.get(i).map_or(".0", |m| m.as_str()));
        }
        return Some(add_version_modifiers(&caps, result, 5));
    }

    if let Some(caps) = DATE_VERSION_RE.captures(version) {
        let result = caps[1]
            .chars()
            .map(|c| if c.is_ascii_digit() { c } else { '.' })
            .collect();
        return Some(add_version_modifiers(&caps, result, 2));
    }

    // A branch ending with -dev is only a version if it is numeric
    if let Some(caps) = DEV_BRANCH_RE.captures(version) {
        let normalized = normalize_branch(&caps[1]);
        if !normalized.starts_with("dev-") {
            return Some(normalized);
        }
    }

    None
}

fn add_version_modifiers(caps: &regex::Captures, mut result: String, index: usize) -> String {
    if let Some(modifier) = caps.get(index) {
        if modifier.as_str() == "stable" {
            return result;
        }

        result.push('-');
        result.push_str(expand_stability(modifier.as_str()));
        if let Some(number) = caps.get(index + 1) {
            result.push_str(number.as_str().trim_start_matches(['.', '-']));
        }
    }

    if caps.get(index + 2).map_or(false, |dev| !dev.as_str().is_empty()) {
        result.push_str("-dev");
    }

    result
}

fn expand_stability(stability: &str) -> &str {
    match stability.to_lowercase().as_str() {
        "a" => "alpha",
        "b" => "beta",
        "p" | "pl" => "patch",
        "rc" => "RC",
        _ => stability,
    }
}

/// Normalizes a branch name: numeric branches become `N.N.N.N-dev` with
/// wildcards as `9999999`, everything else `dev-<name>`
pub fn normalize_branch(name: &str) -> String {
    let name = name.trim();

    if let Some(caps) = BRANCH_RE.captures(name) {
        let parts: Vec<String> = (1..=4)
            .map(|i| match caps.get(i) {
                Some(part) => part.as_str().replace(['*', 'X', 'x'], "9999999"),
                None => "9999999".to_string(),
            })
            .collect();
        return format!("{}-dev", parts.join("."));
    }

    format!("dev-{}", name)
}

/// Normalized form of a tag, or `None` when the value is not a tag of the
/// asset type
pub fn validate_tag(tag: &str, asset_type: AssetType) -> Option<String> {
    if DEFAULT_BRANCHES.contains(&tag) {
        return None;
    }

    let converted = asset_type.version_converter().convert_version(Some(tag));
    normalize_version(&converted)
}

/// Normalized form of a branch, or `None` when the value cannot be a branch
/// name or is a version pattern such as `1.x`
pub fn validate_branch(branch: &str) -> Option<String> {
    if !is_valid_ref_name(branch) || (has_wildcard(branch) && BRANCH_RE.is_match(branch)) {
        return None;
    }

    Some(normalize_branch(branch))
}

fn is_valid_ref_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(['-', '/'])
        && !name.ends_with(['/', '.'])
        && !name.ends_with(".lock")
        && !name.contains("..")
        && !name.contains("//")
        && !name.contains("@{")
        && !name
            .chars()
            .any(|c| c.is_control() || c.is_whitespace() || matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
}

/// Check that a translated constraint parses in Composer's grammar.
///
/// Returns the first atom that does not.
pub fn validate_constraint(constraint: &str) -> Result<(), String> {
    let constraint = constraint.trim();
    if constraint.is_empty() {
        return Err(String::new());
    }

    for or_group in OR_CONSTRAINT_RE.split(constraint) {
        let atoms: Vec<&str> = or_group
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|atom| !atom.is_empty())
            .collect();
        if atoms.is_empty() {
            return Err(or_group.to_string());
        }

        if let Some(invalid) = atoms.into_iter().find(|atom| !is_valid_atom(atom)) {
            return Err(invalid.to_string());
        }
    }

    Ok(())
}

fn is_valid_atom(atom: &str) -> bool {
    let atom = OPERATOR_RE.replace(atom, "");
    let atom = match CONSTRAINT_STABILITY_RE.captures(&atom) {
        Some(caps) if caps[1].is_empty() => "*".to_string(),
        Some(caps) => caps[1].to_string(),
        None => atom.to_string(),
    };
    let atom = match CONSTRAINT_REF_RE.captures(&atom) {
        Some(caps) => caps[1].to_string(),
        None => atom,
    };

    if atom.is_empty() {
        return false;
    }
    if WILDCARD_RE.is_match(&atom) || X_RANGE_RE.is_match(&atom) {
        return true;
    }
    if normalize_version(&atom).is_some() {
        return true;
    }

    // Recover from constraints like foobar-dev
    atom.strip_suffix("-dev")
        .map_or(false, |name| normalize_version(&format!("dev-{}", name)).is_some())
}
