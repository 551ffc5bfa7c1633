#![forbid(unsafe_code)]

//! Per-id style and label overrides.
//!
//! [`Overrides`] pairs one documented default with an id-keyed map that is
//! consulted first. Renderers only emit [`Resolved::Custom`] values as
//! attributes; a [`Resolved::Suppressed`] entry removes the element.
//!
//! ```
//! use tsdraw_core::{NodeId, Overrides, Resolved};
//!
//! let fills = Overrides::new("black".to_string())
//!     .with(NodeId(1), "blue".to_string())
//!     .suppressed(NodeId(2));
//! assert_eq!(fills.resolve(&NodeId(0)), Resolved::Default);
//! assert_eq!(fills.resolve(&NodeId(1)), Resolved::Custom(&"blue".to_string()));
//! assert_eq!(fills.resolve(&NodeId(2)), Resolved::Suppressed);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;

/// Outcome of an override lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved<'a, V> {
    /// No override, or an override equal to the default.
    Default,
    /// An override that differs from the default.
    Custom(&'a V),
    /// The element is not drawn.
    Suppressed,
}

/// Default value plus id-keyed overrides. `None` entries suppress.
#[derive(Debug, Clone)]
pub struct Overrides<K, V> {
    default: V,
    entries: HashMap<K, Option<V>>,
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for Overrides<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default && self.entries == other.entries
    }
}

impl<K: Eq + Hash, V: PartialEq> Overrides<K, V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            entries: HashMap::new(),
        }
    }

    /// Build from a caller-supplied map.
    pub fn from_map(default: V, entries: HashMap<K, Option<V>>) -> Self {
        Self { default, entries }
    }

    pub fn default_value(&self) -> &V {
        &self.default
    }

    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        self.entries.insert(key, Some(value));
        self
    }

    pub fn suppress(&mut self, key: K) -> &mut Self {
        self.entries.insert(key, None);
        self
    }

    #[must_use]
    pub fn with(mut self, key: K, value: V) -> Self {
        self.set(key, value);
        self
    }

    #[must_use]
    pub fn suppressed(mut self, key: K) -> Self {
        self.suppress(key);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn resolve(&self, key: &K) -> Resolved<'_, V> {
        match self.entries.get(key) {
            None => Resolved::Default,
            Some(None) => Resolved::Suppressed,
            Some(Some(v)) if *v == self.default => Resolved::Default,
            Some(Some(v)) => Resolved::Custom(v),
        }
    }

    /// Effective value for `key`; `None` when suppressed.
    pub fn value(&self, key: &K) -> Option<&V> {
        match self.resolve(key) {
            Resolved::Default => Some(&self.default),
            Resolved::Custom(v) => Some(v),
            Resolved::Suppressed => None,
        }
    }
}

/// What a [`LabelMap`] shows for ids it has no entry for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelFallback {
    /// The id as a decimal string.
    #[default]
    Id,
    /// Nothing.
    Blank,
}

/// Label text per id.
#[derive(Debug, Clone)]
pub struct LabelMap<K> {
    fallback: LabelFallback,
    entries: HashMap<K, Option<String>>,
}

impl<K: Eq + Hash> PartialEq for LabelMap<K> {
    fn eq(&self, other: &Self) -> bool {
        self.fallback == other.fallback && self.entries == other.entries
    }
}

impl<K> Default for LabelMap<K> {
    fn default() -> Self {
        Self {
            fallback: LabelFallback::Id,
            entries: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Display> LabelMap<K> {
    /// Every id is labelled with itself.
    pub fn ids() -> Self {
        Self::default()
    }

    /// Only ids present in `entries` are labelled.
    pub fn only<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
    {
        Self {
            fallback: LabelFallback::Blank,
            entries: entries.into_iter().collect(),
        }
    }

    pub fn fallback(&self) -> LabelFallback {
        self.fallback
    }

    #[must_use]
    pub fn with(mut self, key: K, label: impl Into<String>) -> Self {
        self.entries.insert(key, Some(label.into()));
        self
    }

    #[must_use]
    pub fn suppressed(mut self, key: K) -> Self {
        self.entries.insert(key, None);
        self
    }

    pub fn label(&self, key: &K) -> Option<Cow<'_, str>> {
        match self.entries.get(key) {
            Some(Some(text)) => Some(Cow::Borrowed(text.as_str())),
            Some(None) => None,
            None => match self.fallback {
                LabelFallback::Id => Some(Cow::Owned(key.to_string())),
                LabelFallback::Blank => None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{MutationId, NodeId};

    #[test]
    fn default_equal_override_is_default() {
        let map = Overrides::new("red".to_string()).with(MutationId(4), "red".to_string());
        assert_eq!(map.resolve(&MutationId(4)), Resolved::Default);
        assert_eq!(map.value(&MutationId(4)).map(String::as_str), Some("red"));
    }

    #[test]
    fn suppression_has_no_value() {
        let map = Overrides::new(1u8).suppressed(NodeId(3));
        assert_eq!(map.value(&NodeId(3)), None);
        assert_eq!(map.value(&NodeId(0)), Some(&1));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn from_map_keeps_entries() {
        let mut raw = HashMap::new();
        raw.insert(NodeId(1), Some("blue".to_string()));
        raw.insert(NodeId(2), None);
        let map = Overrides::from_map("black".to_string(), raw);
        assert_eq!(map.resolve(&NodeId(1)), Resolved::Custom(&"blue".to_string()));
        assert_eq!(map.resolve(&NodeId(2)), Resolved::Suppressed);
        assert_eq!(map.default_value(), "black");
    }

    #[test]
    fn overrides_compare_by_default_and_entries() {
        let a = Overrides::new("black".to_string())
            .with(NodeId(1), "blue".to_string())
            .suppressed(NodeId(2));
        let b = Overrides::new("black".to_string())
            .suppressed(NodeId(2))
            .with(NodeId(1), "blue".to_string());
        assert_eq!(a, b);
        assert_ne!(a, Overrides::new("black".to_string()));
        assert_ne!(
            Overrides::<NodeId, String>::new("black".to_string()),
            Overrides::new("white".to_string())
        );
    }

    #[test]
    fn label_maps_compare_by_fallback_and_entries() {
        assert_eq!(LabelMap::<NodeId>::ids(), LabelMap::default());
        assert_ne!(LabelMap::<NodeId>::ids(), LabelMap::only([]));
        assert_eq!(
            LabelMap::ids().with(NodeId(3), "x"),
            LabelMap::ids().with(NodeId(3), "x")
        );
    }

    #[test]
    fn id_labels_by_default() {
        let labels = LabelMap::ids().with(NodeId(2), "root").suppressed(NodeId(5));
        assert_eq!(labels.label(&NodeId(7)).as_deref(), Some("7"));
        assert_eq!(labels.label(&NodeId(2)).as_deref(), Some("root"));
        assert_eq!(labels.label(&NodeId(5)), None);
    }

    #[test]
    fn explicit_map_blanks_missing_ids() {
        let labels = LabelMap::only([(NodeId(0), Some("A".to_string()))]);
        assert_eq!(labels.label(&NodeId(0)).as_deref(), Some("A"));
        assert_eq!(labels.label(&NodeId(1)), None);
        assert_eq!(labels.fallback(), LabelFallback::Blank);
    }
}
