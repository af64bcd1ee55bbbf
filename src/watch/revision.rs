/// Length of the common prefix to compare for two revision hashes.
fn min_revision_length(remote: &str, local: &str) -> usize {
    remote.len().min(local.len())
}

/// Reports whether a remote build revision refers to the same commit as the
/// local revision. Either side may be abbreviated, so only the shorter
/// length is compared.
pub fn revisions_match(remote: &str, local: &str) -> bool {
    let n = min_revision_length(remote, local);
    remote.as_bytes()[..n] == local.as_bytes()[..n]
}

/// Shortens both revisions to the length that [`revisions_match`] compares.
pub fn comparable_prefixes<'a>(remote: &'a str, local: &'a str) -> (&'a str, &'a str) {
    let n = min_revision_length(remote, local);
    (
        remote.get(..n).unwrap_or(remote),
        local.get(..n).unwrap_or(local),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = "1d79f2b877bfa6ab3de3d4b4a5ac7ee2f5c2f1f0";

    #[test]
    fn test_same_revision_matches() {
        assert!(revisions_match(FULL, FULL));
    }

    #[test]
    fn test_short_local_prefix_matches() {
        assert!(revisions_match(FULL, "1d79f2b87"));
        assert!(revisions_match(FULL, "1d79f2b"));
    }

    #[test]
    fn test_short_remote_prefix_matches() {
        assert!(revisions_match("1d79f", "1d79f2b87"));
        assert!(revisions_match("1d79f2b87", "1d79f"));
    }

    #[test]
    fn test_match_is_symmetric() {
        let pairs = [
            (FULL, "1d79f2b"),
            (FULL, "2e80a3c"),
            ("abc", "abd"),
            ("", FULL),
        ];
        for (a, b) in pairs {
            assert_eq!(revisions_match(a, b), revisions_match(b, a), "{a} vs {b}");
        }
    }

    #[test]
    fn test_different_revisions_do_not_match() {
        assert!(!revisions_match(FULL, "2e80a3c"));
    }

    #[test]
    fn test_comparable_prefixes_use_shorter_length() {
        assert_eq!(comparable_prefixes(FULL, "1d79f2b"), ("1d79f2b", "1d79f2b"));
        assert_eq!(comparable_prefixes("abc", "abcdef"), ("abc", "abc"));
    }
}
