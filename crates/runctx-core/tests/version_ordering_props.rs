//! Version Ordering Properties
//!
//! Property tests for version ordering and range membership.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cmp::Ordering;

use proptest::prelude::*;
use runctx_core::model::namespace::VERSION_ATTRIBUTE;
use runctx_core::model::{AttrValue, Attrs};
use runctx_core::{Version, VersionRange};

fn arb_version() -> impl Strategy<Value = Version> {
    (0u64..20, 0u64..20, 0u64..20, prop::option::of("[a-zA-Z0-9_-]{1,8}")).prop_map(
        |(major, minor, micro, qualifier)| {
            let version = Version::new(major, minor, micro);
            match qualifier {
                Some(q) => version.with_qualifier(q),
                None => version,
            }
        },
    )
}

fn version_attrs(version: &Version) -> Attrs {
    let mut attrs = Attrs::new();
    attrs.insert(
        VERSION_ATTRIBUTE.to_string(),
        AttrValue::Version(version.clone()),
    );
    attrs
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_ordering_matches_segment_order(a in arb_version(), b in arb_version()) {
        let expected = (a.major, a.minor, a.micro, a.qualifier.as_str())
            .cmp(&(b.major, b.minor, b.micro, b.qualifier.as_str()));
        prop_assert_eq!(a.cmp(&b), expected);
        prop_assert_eq!(b.cmp(&a), expected.reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }

    #[test]
    fn prop_display_parses_back(v in arb_version()) {
        prop_assert_eq!(Version::parse(&v.to_string()).unwrap(), v);
    }

    #[test]
    fn prop_range_filter_agrees_with_includes(
        floor in arb_version(),
        width in 1u64..5,
        floor_inclusive in any::<bool>(),
        ceiling_inclusive in any::<bool>(),
        candidate in arb_version(),
    ) {
        let ceiling = Version::new(floor.major + width, 0, 0);
        let text = format!(
            "{}{},{}{}",
            if floor_inclusive { '[' } else { '(' },
            floor,
            ceiling,
            if ceiling_inclusive { ']' } else { ')' },
        );
        let range = VersionRange::parse(&text).unwrap();

        prop_assert_eq!(
            range.to_filter().matches(&version_attrs(&candidate)),
            range.includes(&candidate),
            "range {} candidate {}", text, candidate
        );
    }

    #[test]
    fn prop_at_least_includes_everything_above_floor(floor in arb_version(), candidate in arb_version()) {
        let range = VersionRange::at_least(floor.clone());
        prop_assert_eq!(range.includes(&candidate), candidate >= floor);
        prop_assert_eq!(range.to_filter().matches(&version_attrs(&candidate)), candidate >= floor);
    }
}
