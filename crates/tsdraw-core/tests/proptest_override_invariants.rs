//! Property-based invariant tests for override maps.
//!
//! 1. An override equal to the default resolves exactly like no override.
//! 2. A suppressed id never yields a value.
//! 3. Ids absent from the map always resolve to the default.
//! 4. `LabelMap::ids()` labels every unmapped id with its decimal form.

use proptest::prelude::*;
use tsdraw_core::{LabelMap, NodeId, Overrides, Resolved};

fn colour() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["black", "red", "blue", "#00ff00", "none"]).prop_map(String::from)
}

// ═════════════════════════════════════════════════════════════════════════
// Overrides
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn default_override_round_trips(default in colour(), ids in prop::collection::vec(0u32..50, 0..20)) {
        let mut with_defaults = Overrides::new(default.clone());
        for &id in &ids {
            with_defaults.set(NodeId(id), default.clone());
        }
        let plain: Overrides<NodeId, String> = Overrides::new(default.clone());
        for id in 0u32..50 {
            prop_assert_eq!(with_defaults.resolve(&NodeId(id)), plain.resolve(&NodeId(id)));
            prop_assert_eq!(with_defaults.resolve(&NodeId(id)), Resolved::Default);
        }
    }

    #[test]
    fn suppressed_ids_have_no_value(default in colour(), id in 0u32..100, other in 0u32..100) {
        let map = Overrides::new(default.clone()).suppressed(NodeId(id));
        prop_assert_eq!(map.value(&NodeId(id)), None);
        if other != id {
            prop_assert_eq!(map.value(&NodeId(other)), Some(&default));
        }
    }

    #[test]
    fn custom_values_differ_from_default(default in colour(), custom in colour(), id in 0u32..10) {
        let map = Overrides::new(default.clone()).with(NodeId(id), custom.clone());
        match map.resolve(&NodeId(id)) {
            Resolved::Custom(v) => prop_assert_ne!(v, &default),
            Resolved::Default => prop_assert_eq!(&custom, &default),
            Resolved::Suppressed => prop_assert!(false, "set() never suppresses"),
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Labels
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn id_labels_are_decimal(id in any::<u32>()) {
        let labels: LabelMap<NodeId> = LabelMap::ids();
        let expected = id.to_string();
        let label = labels.label(&NodeId(id));
        prop_assert_eq!(label.as_deref(), Some(expected.as_str()));
    }
}
