/// Increment the trailing `-release` component of a version by one.
/// Versions whose release component is not numeric come back unchanged.
#[must_use]
pub fn increment_release(version: &str) -> String {
    match version.rsplit_once('-') {
        Some((base, release)) => release
            .parse::<u64>()
            .map_or_else(|_| version.to_string(), |n| format!("{base}-{}", n + 1)),
        None => version
            .parse::<u64>()
            .map_or_else(|_| version.to_string(), |n| (n + 1).to_string()),
    }
}

/// Decrement the trailing `-release` component by `by`. `None` when the
/// component is missing, not numeric, or would go negative.
#[must_use]
pub fn decrement_release(version: &str, by: u64) -> Option<String> {
    let (base, release) = version.rsplit_once('-')?;
    let n = release.parse::<u64>().ok()?.checked_sub(by)?;
    Some(format!("{base}-{n}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_bumps_the_release() {
        assert_eq!(increment_release("1.2-3"), "1.2-4");
        assert_eq!(increment_release("?-0"), "?-1");
        assert_eq!(increment_release("2.0.1-10"), "2.0.1-11");
    }

    #[test]
    fn increment_leaves_non_numeric_releases_alone() {
        assert_eq!(increment_release("1.2-rc1"), "1.2-rc1");
        assert_eq!(increment_release("1.2"), "1.2");
    }

    #[test]
    fn decrement_steps_down_by_distance() {
        assert_eq!(decrement_release("1.2-3", 1).as_deref(), Some("1.2-2"));
        assert_eq!(decrement_release("1.2-3", 3).as_deref(), Some("1.2-0"));
        assert_eq!(decrement_release("1.2-3", 4), None);
        assert_eq!(decrement_release("1.2", 1), None);
        assert_eq!(decrement_release("1.2-rc1", 1), None);
    }
}
