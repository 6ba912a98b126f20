//! Property tests for glob-style host pattern matching

use fleettop_core::config::HostPattern;
use proptest::prelude::*;

/// Strategy for plain host names with no glob metacharacters
fn literal_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9.-]{0,30}"
}

proptest! {
    /// Property: a literal key (no metacharacters) matches exactly itself
    #[test]
    fn literal_pattern_matches_only_itself(name in literal_name_strategy()) {
        let pattern = HostPattern::compile(&name).unwrap();
        prop_assert!(pattern.matches(&name));
        let with_suffix = format!("{name}x");
        let with_prefix = format!("x{name}");
        prop_assert!(!pattern.matches(&with_suffix));
        prop_assert!(!pattern.matches(&with_prefix));
    }

    /// Property: `*` matches every host name
    #[test]
    fn star_matches_everything(name in literal_name_strategy()) {
        let pattern = HostPattern::compile("*").unwrap();
        prop_assert!(pattern.matches(&name));
    }

    /// Property: a `prefix-*` pattern matches exactly the names with that prefix
    #[test]
    fn prefix_star_matches_iff_prefix(
        prefix in "[a-z]{1,8}",
        suffix in "[a-z0-9]{0,10}",
        other in "[0-9][a-z0-9]{0,10}",
    ) {
        let pattern = HostPattern::compile(&format!("{prefix}-*")).unwrap();
        let matching = format!("{prefix}-{suffix}");
        prop_assert!(pattern.matches(&matching));
        // `other` starts with a digit, so it can never begin with the
        // all-letter prefix followed by a dash
        prop_assert!(!pattern.matches(&other));
    }

    /// Property: `?` matches names that are exactly one character longer
    #[test]
    fn question_mark_requires_exactly_one_char(
        prefix in "[a-z]{1,8}",
        c in proptest::char::range('a', 'z'),
    ) {
        let pattern = HostPattern::compile(&format!("{prefix}?")).unwrap();
        let one_extra = format!("{prefix}{c}");
        let two_extra = format!("{prefix}{c}{c}");
        prop_assert!(pattern.matches(&one_extra));
        prop_assert!(!pattern.matches(&prefix));
        prop_assert!(!pattern.matches(&two_extra));
    }

    /// Property: compilation never panics, whatever the input
    #[test]
    fn compile_never_panics(pattern in ".{0,40}") {
        let _ = HostPattern::compile(&pattern);
    }

    /// Property: as_str round-trips the original pattern text
    #[test]
    fn compiled_pattern_preserves_text(name in literal_name_strategy()) {
        let pattern = HostPattern::compile(&name).unwrap();
        prop_assert_eq!(pattern.as_str(), name.as_str());
    }
}
