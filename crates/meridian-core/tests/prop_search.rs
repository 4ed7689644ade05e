//! Property-based tests for the graph search area filter

use meridian_core::{AreaOfUse, CrsCode, TransformGraphSearch};
use proptest::prelude::*;

use test_support::*;

/// A box of up to 20 degrees anywhere on the globe
fn area_strategy() -> impl Strategy<Value = AreaOfUse> {
    (-180.0f64..160.0, -90.0f64..70.0, 0.5f64..20.0, 0.5f64..20.0).prop_map(
        |(west, south, width, height)| AreaOfUse::new(west, south, west + width, south + height),
    )
}

proptest! {
    #[test]
    fn missing_endpoint_area_never_removes_an_edge(
        present in area_strategy(),
        middle in proptest::option::of(area_strategy()),
        source_missing in any::<bool>(),
    ) {
        let (source, target) = if source_missing {
            (None, Some(present))
        } else {
            (Some(present), None)
        };
        let search = TransformGraphSearch::new(chain_registry(source, middle, target));
        let path = search.find_path(CrsCode(9001), CrsCode(9003)).unwrap();
        prop_assert!(path.is_some());
        prop_assert_eq!(path.map(|p| p.hops()), Some(2));
    }
}
