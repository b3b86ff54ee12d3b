//! Caret range expansion.

use super::version::{convert_version, replace_alias, Comparator, OVERFLOW_SENTINEL};
use super::{leading_int, replace_wildcards};

/// Components considered when computing the upper bound (major.minor.patch.build)
const MAX_COMPONENTS: usize = 4;

/// Expand the atom of a `^` range into `>=lower,<upper`.
///
/// The upper bound bumps the left-most non-zero component, or the last
/// component when everything before it is zero: `^1.2.3` -> `<2.0.0`,
/// `^0.2.3` -> `<0.3.0`, `^0.0.3` -> `<0.0.4`.
pub fn expand_caret(atom: &str) -> String {
    let lower = replace_alias(&convert_version(Some(atom)), Comparator::GreaterThan);
    let upper = upper_bound_components(atom).join(".");

    format!(
        ">={},<{}",
        pad_components(&lower),
        convert_version(Some(&pad_components(&upper)))
    )
}

fn upper_bound_components(atom: &str) -> Vec<String> {
    let release = atom.split('-').next().unwrap_or(atom);
    let release = replace_wildcards(release, OVERFLOW_SENTINEL);
    let mut components: Vec<String> = release.splitn(MAX_COMPONENTS, '.').map(str::to_string).collect();

    let last = components.len() - 1;
    let mut carry = false;

    for i in 0..components.len() {
        if carry {
            components[i] = "0".to_string();
            continue;
        }

        let value = leading_int(&components[i]);
        if i == 0 && value > 0 {
            components[i] = value.saturating_add(1).to_string();
            carry = true;
            continue;
        }

        let next = (i + 1).min(MAX_COMPONENTS - 1).min(last);
        let next_overflows = leading_int(&components[next]) > 9_999_998;
        if next == i || value > 0 || next_overflows {
            components[i] = value.saturating_add(1).to_string();
            carry = true;
        }
    }

    components
}

/// Pad a version with `.0` components up to major.minor.patch
fn pad_components(version: &str) -> String {
    let mut padded = version.to_string();
    for _ in version.split('.').count()..3 {
        padded.push_str(".0");
    }
    padded
}
