//! Property-based invariant tests for the layout passes.
//!
//! 1. Left siblings get strictly smaller traversal positions in every pass.
//! 2. Vector heights follow times: older parents are drawn above their
//!    children, tied parents level with them and younger parents below.
//!    Text layouts always put a parent above (root-top) or right of
//!    (root-left/right) its children with a connector cell in between.
//! 3. `rank` scaling with a numeric bound is always rejected.
//! 4. Every text label fits inside the computed canvas width.
//! 5. Placed mutations lie on the branch between child and parent.

use std::cmp::Ordering;

use proptest::prelude::*;
use rustc_hash::FxHashMap;
use tsdraw_core::geometry::Point;
use tsdraw_core::table::TableTree;
use tsdraw_core::tree::{NodeId, Tree};
use tsdraw_layout::{
    HeightBound, HeightScale, LayoutError, VerticalAxis, branch_depths, continuous,
    label_anchored, node_heights, place_mutations, rank_rows, row_slots,
};

/// Where a merged parent's time falls relative to its oldest child.
#[derive(Debug, Clone, Copy)]
enum Step {
    Older,
    Tied,
    Inverted,
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => Just(Step::Older),
        1 => Just(Step::Tied),
        1 => Just(Step::Inverted),
    ]
}

type Merge = (prop::sample::Index, usize, f64, Step);

/// Leaves at time zero merged step by step. Most parents are older than
/// their children; some are tied with or younger than their oldest child.
/// Unmerged subtrees stay separate roots.
fn build_tree(leaves: usize, merges: &[Merge], mutated: &[prop::sample::Index]) -> TableTree {
    let mut times = vec![0.0; leaves];
    let mut parents: Vec<Option<u32>> = vec![None; leaves];
    let mut active: Vec<usize> = (0..leaves).collect();
    for (at, arity, gap, step) in merges {
        let start = at.index(active.len());
        let end = (start + arity).min(active.len());
        let id = times.len();
        let oldest = active[start..end]
            .iter()
            .map(|&c| times[c])
            .fold(0.0, f64::max);
        times.push(match step {
            Step::Older => oldest + 0.5 + gap,
            Step::Tied => oldest,
            Step::Inverted => oldest - 0.5 - gap,
        });
        parents.push(None);
        for &c in &active[start..end] {
            parents[c] = Some(id as u32);
        }
        active.splice(start..end, [id]);
    }
    let mutations: Vec<(f64, u32)> = mutated
        .iter()
        .enumerate()
        .map(|(i, ix)| (i as f64 * 0.01, ix.index(times.len()) as u32))
        .collect();
    TableTree::from_parents(&times, &parents)
        .and_then(|tree| tree.with_mutations(&mutations))
        .expect("generated tree is valid")
}

fn arb_tree() -> impl Strategy<Value = TableTree> {
    (
        1usize..10,
        prop::collection::vec(
            (any::<prop::sample::Index>(), 1usize..4, 0.0f64..3.0, arb_step()),
            0..12,
        ),
        prop::collection::vec(any::<prop::sample::Index>(), 0..6),
    )
        .prop_map(|(leaves, merges, mutated)| build_tree(leaves, &merges, &mutated))
}

fn arb_widths() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..6, 1..8)
}

fn sibling_pairs(tree: &TableTree) -> Vec<(NodeId, NodeId)> {
    tree.nodes()
        .into_iter()
        .filter_map(|u| tree.left_sib(u).map(|a| (a, u)))
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// Sibling ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn continuous_orders_siblings(tree in arb_tree()) {
        let layout = continuous(&tree);
        for (a, b) in sibling_pairs(&tree) {
            prop_assert!(layout.slot(a).unwrap() < layout.slot(b).unwrap());
        }
    }

    #[test]
    fn label_anchored_orders_siblings(tree in arb_tree(), widths in arb_widths()) {
        let layout = label_anchored(&tree, |u| widths[u.index() % widths.len()]);
        for (a, b) in sibling_pairs(&tree) {
            prop_assert!(layout.position(a).unwrap() < layout.position(b).unwrap());
        }
    }

    #[test]
    fn row_slots_order_siblings(tree in arb_tree()) {
        let rows = row_slots(&tree);
        for (a, b) in sibling_pairs(&tree) {
            prop_assert!(rows.row(a).unwrap() < rows.row(b).unwrap());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Time ordering
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn vector_heights_follow_times(tree in arb_tree(), rank in any::<bool>()) {
        let scale = if rank { HeightScale::Rank } else { HeightScale::Time };
        let axis = VerticalAxis::assign(&tree, 200.0, scale, HeightBound::Tree, None).unwrap();
        for u in tree.nodes() {
            if let Some(p) = tree.parent(u) {
                let (yp, yu) = (axis.y(p).unwrap(), axis.y(u).unwrap());
                match tree.time(p).total_cmp(&tree.time(u)) {
                    Ordering::Greater => prop_assert!(yp < yu),
                    Ordering::Equal => prop_assert_eq!(yp, yu),
                    Ordering::Less => prop_assert!(yp > yu),
                }
            }
        }
    }

    #[test]
    fn parents_above_children_in_text(tree in arb_tree()) {
        let rows = rank_rows(&tree, HeightBound::Tree, None).unwrap();
        let depths = branch_depths(&tree, |_| 2);
        for u in tree.nodes() {
            prop_assert!(rows.row(u).unwrap() < rows.height());
            prop_assert!(depths.depth(u).unwrap() < depths.width());
            if let Some(p) = tree.parent(u) {
                prop_assert!(rows.row(p).unwrap() + 2 <= rows.row(u).unwrap());
                prop_assert!(depths.depth(p).unwrap() >= depths.depth(u).unwrap() + 2);
            }
        }
    }

    #[test]
    fn rank_with_numeric_bound_is_rejected(tree in arb_tree(), bound in -1.0e6f64..1.0e6) {
        let err = node_heights(&tree, HeightScale::Rank, HeightBound::Value(bound), None);
        prop_assert_eq!(err.unwrap_err(), LayoutError::NumericBoundWithRank { bound });
        prop_assert!(rank_rows(&tree, HeightBound::Value(bound), None).is_err());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Extents
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn labels_fit_canvas_width(tree in arb_tree(), widths in arb_widths()) {
        let width_of = |u: NodeId| widths[u.index() % widths.len()];
        let layout = label_anchored(&tree, width_of);
        for u in tree.nodes() {
            prop_assert!(layout.anchor(u).unwrap() + width_of(u) <= layout.width());
            prop_assert!(layout.position(u).unwrap() <= layout.width());
        }
    }

    #[test]
    fn mutations_stay_on_their_branch(tree in arb_tree()) {
        let axis = VerticalAxis::assign(&tree, 300.0, HeightScale::Time, HeightBound::Tree, None)
            .unwrap();
        let xs = continuous(&tree).scaled(10.0, 280.0);
        let points: FxHashMap<NodeId, Point> = tree
            .nodes()
            .into_iter()
            .map(|u| (u, Point::new(xs[&u], axis.y(u).unwrap())))
            .collect();
        let placed = place_mutations(&tree, &points, axis.root_branch_top());
        prop_assert_eq!(placed.len(), tree.mutations().len());
        for m in placed {
            let child = points[&m.node];
            let top = tree
                .parent(m.node)
                .map_or(axis.root_branch_top(), |p| points[&p].y);
            prop_assert_eq!(m.point.x, child.x);
            if child.y == top {
                prop_assert_eq!(m.point.y, child.y);
            } else {
                let (low, high) = (child.y.min(top), child.y.max(top));
                prop_assert!(m.point.y > low && m.point.y < high);
            }
        }
    }
}
