//! Property tests for configuration resolution invariants

use fleettop_core::config::{ConfigResolver, HostDirectory, HostRecord};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = HostRecord> {
    (
        "[a-z0-9.-]{0,20}", // hostname (may be empty = unset)
        0u16..10_000,       // port (0 = unset)
        "[a-z]{0,10}",      // user
        "(/[a-z]{1,8}){0,3}", // identity_file
    )
        .prop_map(|(hostname, port, user, identity_file)| HostRecord {
            hostname,
            port,
            user,
            identity_file,
        })
}

proptest! {
    /// Property: resolution never fails and the host is never empty —
    /// the lookup name itself is the floor
    #[test]
    fn resolved_host_is_never_empty(
        name in "[a-z][a-z0-9-]{0,15}",
        default in record_strategy(),
    ) {
        let mut dir = HostDirectory::new();
        dir.insert("*", default).unwrap();
        let effective = ConfigResolver::new(dir).resolve(&name);
        prop_assert!(!effective.host.is_empty());
    }

    /// Property: an exact entry always beats a pattern entry covering
    /// the same name, regardless of insertion order
    #[test]
    fn exact_beats_pattern(
        suffix in "[0-9]{1,4}",
        exact_user in "[a-z]{1,8}",
        pattern_user in "[a-z]{1,8}",
        exact_first in any::<bool>(),
    ) {
        prop_assume!(exact_user != pattern_user);
        let name = format!("web-{suffix}");
        let exact = HostRecord { user: exact_user.clone(), ..HostRecord::default() };
        let pattern = HostRecord { user: pattern_user, ..HostRecord::default() };

        let mut dir = HostDirectory::new();
        if exact_first {
            dir.insert(&name, exact).unwrap();
            dir.insert("web-*", pattern).unwrap();
        } else {
            dir.insert("web-*", pattern).unwrap();
            dir.insert(&name, exact).unwrap();
        }
        let effective = ConfigResolver::new(dir).resolve(&name);
        prop_assert_eq!(effective.user, exact_user);
    }

    /// Property: every field the specific record sets survives the merge,
    /// and every field it leaves unset comes from the default
    #[test]
    fn merge_is_field_wise(
        specific in record_strategy(),
        default in record_strategy(),
    ) {
        let mut dir = HostDirectory::new();
        dir.insert("*", default.clone()).unwrap();
        dir.insert("host-a", specific.clone()).unwrap();
        let effective = ConfigResolver::new(dir).resolve("host-a");

        let expect_host = if !specific.hostname.is_empty() {
            specific.hostname
        } else if !default.hostname.is_empty() {
            default.hostname
        } else {
            "host-a".to_string()
        };
        prop_assert_eq!(effective.host, expect_host);
        prop_assert_eq!(
            effective.port,
            if specific.port > 0 { specific.port } else { default.port }
        );
        prop_assert_eq!(
            effective.user,
            if specific.user.is_empty() { default.user } else { specific.user }
        );
        prop_assert_eq!(
            effective.identity_file,
            if specific.identity_file.is_empty() {
                default.identity_file
            } else {
                specific.identity_file
            }
        );
    }

    /// Property: a name with no entries at all resolves to itself with
    /// zero/empty fields
    #[test]
    fn empty_directory_is_identity(name in "[a-z][a-z0-9-]{0,15}") {
        let effective = ConfigResolver::new(HostDirectory::new()).resolve(&name);
        prop_assert_eq!(effective.host, name);
        prop_assert_eq!(effective.port, 0);
        prop_assert!(effective.user.is_empty());
        prop_assert!(effective.identity_file.is_empty());
    }
}
