use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ChangelogError, Result};

// Version recovery patterns, evaluated most specific first. The entry
// parser walks them in order and takes the first match.

pub static VERSION_TAGGED_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([0-9]*\.[^ :]*):").expect("Failed to compile tagged version regex")
});

pub static VERSION_DASH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"-([0-9]*\.[^ :]*)").expect("Failed to compile dashed version regex")
});

pub static VERSION_UPDATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[uU]pdate to [ a-zA-Z-]*([0-9]*\.[^ :]*)")
        .expect("Failed to compile update-to version regex")
});

pub static VERSION_LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[vV]ersion[: ]*([0-9]*\.[^ :]*)")
        .expect("Failed to compile labeled version regex")
});

pub static VERSION_RELEASE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[rR]elease[: ]*([0-9]*\.[^ :]*)")
        .expect("Failed to compile release version regex")
});

/// Build the package-anchored version pattern once a package name is known.
pub fn package_version_pattern(package: &str) -> Result<Regex> {
    Regex::new(&format!(r"{}[- ]([0-9]*\.[^ :]*)", regex::escape(package)))
        .map_err(|e| ChangelogError::Other(e.to_string()))
}

/// Urgency keyword classes, highest priority first; the first class with a
/// keyword occurring anywhere in an entry's items wins. Matching is plain
/// substring containment with the exact case given here (`CVE` matches
/// advisory identifiers, `" critical"` keeps its leading space).
pub const URGENCY_CLASSES: &[(&str, &[&str])] = &[
    ("emergency", &["emergency"]),
    ("high", &["CVE", "exploit"]),
    ("medium", &["security", "vulnerability", "leak", "major", " critical"]),
];

/// Urgency assigned when no keyword class matches.
pub const URGENCY_DEFAULT: &str = "low";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_pattern_needs_the_colon() {
        let caps = VERSION_TAGGED_PATTERN.captures("update foo-1.2.3: stuff").unwrap();
        assert_eq!(&caps[1], "1.2.3");
        assert!(VERSION_TAGGED_PATTERN.captures("update foo-1.2.3 stuff").is_none());
    }

    #[test]
    fn update_to_pattern_skips_the_package_words() {
        let caps = VERSION_UPDATE_PATTERN.captures("Update to upstream release 3.4.1").unwrap();
        assert_eq!(&caps[1], "3.4.1");
    }

    #[test]
    fn package_pattern_is_anchored_to_the_name() {
        let re = package_version_pattern("libfoo").unwrap();
        assert_eq!(&re.captures("bump libfoo-2.1 now").unwrap()[1], "2.1");
        assert!(re.captures("bump libbar-2.1 now").is_none());
    }
}
