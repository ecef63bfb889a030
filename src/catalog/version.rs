//! Version precedence.
//!
//! Versions are ordered semantically via the `semver` crate. A leading
//! `v` is ignored. Anything that parses as semver ranks above anything
//! that does not; two unparseable versions compare as plain strings. Ties
//! in precedence fall back to the raw strings so the order stays total.

use std::cmp::Ordering;

/// Parse `raw` as a semantic version, tolerating a `v` prefix.
pub fn parse_version(raw: &str) -> Option<semver::Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed);
    semver::Version::parse(trimmed).ok()
}

/// Total order over version strings.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let precedence = match (parse_version(a), parse_version(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => Ordering::Equal,
    };
    precedence.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn semantic_not_lexicographic() {
        assert_eq!(compare_versions("1.10.0", "1.2.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.2.0", "1.10.0"), Ordering::Less);
    }

    #[test]
    fn picks_highest_of_three() {
        let versions = ["1.0.0", "1.2.0", "1.1.5"];
        let highest = versions.iter().max_by(|a, b| compare_versions(a, b));
        assert_eq!(highest, Some(&"1.2.0"));
    }

    #[test]
    fn prerelease_is_below_release() {
        assert_eq!(compare_versions("2.0.0-rc.1", "2.0.0"), Ordering::Less);
    }

    #[test]
    fn v_prefix_is_ignored_for_precedence() {
        assert_eq!(compare_versions("v1.3.0", "1.2.9"), Ordering::Greater);
        assert_eq!(parse_version("v1.3.0"), parse_version("1.3.0"));
    }

    #[test]
    fn semver_outranks_unparseable() {
        assert_eq!(compare_versions("0.0.1", "nightly"), Ordering::Greater);
        assert_eq!(compare_versions("nightly", "0.0.1"), Ordering::Less);
    }

    #[test]
    fn unparseable_versions_compare_as_strings() {
        assert_eq!(compare_versions("beta", "alpha"), Ordering::Greater);
    }

    #[test]
    fn equal_precedence_breaks_ties_on_raw_string() {
        assert_eq!(compare_versions("v1.0.0", "1.0.0"), Ordering::Greater);
        assert_eq!(compare_versions("1.0.0", "1.0.0"), Ordering::Equal);
    }
}
