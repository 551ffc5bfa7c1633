#![forbid(unsafe_code)]

//! Traversal-axis assignment.
//!
//! All three passes walk each root's subtree in postorder, roots left to
//! right, so every leaf is placed before its ancestors. Leaves take the next
//! free slot; a unary node inherits its child's position; any other internal
//! node sits at the midpoint of its leftmost and rightmost child.
//!
//! - [`continuous`] - unit slots, scaled later to vector x coordinates
//! - [`label_anchored`] - text columns that leave room for every label
//! - [`row_slots`] - text rows for root-left/right drawings
//!
//! # Invariants
//!
//! If `a` is a left sibling of `b`, `a` gets a strictly smaller position.

use rustc_hash::FxHashMap;
use tsdraw_core::tree::{NodeId, Tree};
use tsdraw_core::{debug_span, trace};

use crate::midpoint;

/// Continuous slot positions for the vector back-end.
#[derive(Debug, Clone)]
pub struct SlotLayout {
    slots: FxHashMap<NodeId, f64>,
    num_leaves: usize,
}

impl SlotLayout {
    pub fn slot(&self, u: NodeId) -> Option<f64> {
        self.slots.get(&u).copied()
    }

    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Map slots onto `width` units starting at `x_start`; leaf `i` lands at
    /// `x_start + (i + 1) * width / (leaves + 1)`.
    pub fn scaled(&self, x_start: f64, width: f64) -> FxHashMap<NodeId, f64> {
        let x_scale = width / (self.num_leaves + 1) as f64;
        self.slots
            .iter()
            .map(|(&u, &slot)| (u, x_start + (slot + 1.0) * x_scale))
            .collect()
    }
}

pub fn continuous<T: Tree>(tree: &T) -> SlotLayout {
    let span = debug_span!("traversal", tree = tree.index(), mode = "continuous");
    let _guard = span.enter();

    let mut slots: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut next = 0usize;
    for &root in tree.roots() {
        for u in tree.postorder(root) {
            let slot = match tree.children(u) {
                [] => {
                    let slot = next as f64;
                    next += 1;
                    slot
                }
                [only] => slots.get(only).copied().unwrap_or(0.0),
                children => {
                    let (lo, hi) = extremes(children.iter().filter_map(|c| slots.get(c).copied()));
                    midpoint(lo, hi)
                }
            };
            slots.insert(u, slot);
        }
    }
    trace!(leaves = next, "continuous slots assigned");
    SlotLayout {
        slots,
        num_leaves: next,
    }
}

/// Column layout for root-top text drawings.
#[derive(Debug, Clone)]
pub struct AnchoredLayout {
    positions: FxHashMap<NodeId, usize>,
    anchors: FxHashMap<NodeId, usize>,
    width: usize,
}

impl AnchoredLayout {
    /// Column of the branch connector for `u`.
    pub fn position(&self, u: NodeId) -> Option<usize> {
        self.positions.get(&u).copied()
    }

    /// Column where the label of `u` starts.
    pub fn anchor(&self, u: NodeId) -> Option<usize> {
        self.anchors.get(&u).copied()
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Text columns that keep every label clear of its left neighbour.
///
/// `label_width(u)` is the display width of the label of `u`.
pub fn label_anchored<T, F>(tree: &T, label_width: F) -> AnchoredLayout
where
    T: Tree,
    F: Fn(NodeId) -> usize,
{
    let span = debug_span!("traversal", tree = tree.index(), mode = "label_anchored");
    let _guard = span.enter();

    let mut positions: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut anchors: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut x = 0usize;
    for &root in tree.roots() {
        for u in tree.postorder(root) {
            let w = label_width(u);
            if tree.is_leaf(u) {
                positions.insert(u, x + w / 2);
                anchors.insert(u, x);
                x += w + 1;
                continue;
            }
            let pos = match tree.children(u) {
                [only] => positions.get(only).copied().unwrap_or(0),
                children => {
                    let (lo, hi) = extremes(
                        children
                            .iter()
                            .filter_map(|c| positions.get(c).map(|&p| p as f64)),
                    );
                    midpoint(lo, hi).round_ties_even() as usize
                }
            };
            let mut anchor = pos.saturating_sub(w / 2);
            if let Some(left) = closest_left(tree, u) {
                // Clear both the neighbour's connector column and its label.
                if let Some(&left_pos) = positions.get(&left) {
                    anchor = anchor.max(left_pos + 1);
                }
                if let Some(&left_anchor) = anchors.get(&left) {
                    anchor = anchor.max(left_anchor + label_width(left) + 1);
                }
            }
            positions.insert(u, pos);
            anchors.insert(u, anchor);
            x = x.max(anchor + w + 1);
        }
        x += 1;
    }
    AnchoredLayout {
        positions,
        anchors,
        width: x.saturating_sub(2),
    }
}

/// Row layout for root-left/right text drawings.
#[derive(Debug, Clone)]
pub struct RowLayout {
    rows: FxHashMap<NodeId, usize>,
    height: usize,
}

impl RowLayout {
    pub fn row(&self, u: NodeId) -> Option<usize> {
        self.rows.get(&u).copied()
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// Leaves on every other row; parents between their extreme children.
pub fn row_slots<T: Tree>(tree: &T) -> RowLayout {
    let span = debug_span!("traversal", tree = tree.index(), mode = "row_slots");
    let _guard = span.enter();

    let mut rows: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut y = 0usize;
    for &root in tree.roots() {
        for u in tree.postorder(root) {
            let row = match tree.children(u) {
                [] => {
                    let row = y;
                    y += 2;
                    row
                }
                [only] => rows.get(only).copied().unwrap_or(0),
                children => {
                    let (lo, hi) = extremes(
                        children
                            .iter()
                            .filter_map(|c| rows.get(c).map(|&r| r as f64)),
                    );
                    midpoint(lo, hi).round_ties_even() as usize
                }
            };
            rows.insert(u, row);
        }
        y += 1;
    }
    RowLayout {
        rows,
        height: y.saturating_sub(2),
    }
}

/// First left sibling found walking up from `u` through its ancestors.
fn closest_left<T: Tree>(tree: &T, u: NodeId) -> Option<NodeId> {
    let mut cursor = Some(u);
    while let Some(v) = cursor {
        if let Some(sib) = tree.left_sib(v) {
            return Some(sib);
        }
        cursor = tree.parent(v);
    }
    None
}

fn extremes(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .unwrap_or((0.0, 0.0))
}
