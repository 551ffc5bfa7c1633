//! Property-based invariant tests for vector scenes.
//!
//! 1. Overrides equal to the defaults leave the scene unchanged.
//! 2. Every node gets exactly one marker and every non-root one edge.
//! 3. Left siblings are drawn left of their right siblings.
//! 4. Mutation marks sit between their node and the branch top.
//! 6. Every edge runs from its node to its parent, whether the parent is
//!    older, tied or younger.
//! 5. Sequence ticks run left to right and end at the tree box edge.

use proptest::prelude::*;
use tsdraw_core::overrides::{LabelMap, Overrides};
use tsdraw_core::table::{SequenceBuilder, TableSequence, TableTree};
use tsdraw_core::tree::{MutationId, NodeId, Tree};
use tsdraw_scene::vector_tree::{DEFAULT_EDGE_STROKE, DEFAULT_MUTATION_FILL, DEFAULT_NODE_FILL};
use tsdraw_scene::{
    PathCommand, Shape, TreeWidths, VectorSequence, VectorSequenceOptions, VectorTree, VectorTreeOptions,
    draw_vector_tree,
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

/// A sequence of `n` trees over `n` unit intervals. Each tree is a cherry of
/// two samples; the samples swap partners between intervals.
fn cherries(n: usize) -> TableSequence {
    let mut b = SequenceBuilder::new(n as f64);
    let samples: Vec<NodeId> = (0..3).map(|_| b.add_sample(0.0)).collect();
    for i in 0..n {
        let p = b.add_node(1.0 + i as f64, false);
        let (l, r) = (i as f64, i as f64 + 1.0);
        b.add_edge(l, r, p, samples[i % 3])
            .add_edge(l, r, p, samples[(i + 1) % 3]);
    }
    b.build().expect("cherries are valid")
}

// ═════════════════════════════════════════════════════════════════════════
// Override round trip
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn default_valued_overrides_change_nothing(tree in arb_tree()) {
        let plain = draw_vector_tree(&tree, &VectorTreeOptions::default(), None).unwrap();

        let mut node_colours = Overrides::new(DEFAULT_NODE_FILL.to_string());
        let mut edge_colours = Overrides::new(DEFAULT_EDGE_STROKE.to_string());
        let mut node_labels = LabelMap::ids();
        for u in tree.nodes() {
            node_colours.set(u, DEFAULT_NODE_FILL.to_string());
            edge_colours.set(u, DEFAULT_EDGE_STROKE.to_string());
            node_labels = node_labels.with(u, u.to_string());
        }
        let mut mutation_colours = Overrides::new(DEFAULT_MUTATION_FILL.to_string());
        for m in tree.mutations() {
            mutation_colours.set(m.id, DEFAULT_MUTATION_FILL.to_string());
        }
        let options = VectorTreeOptions {
            node_colours,
            edge_colours,
            node_labels,
            mutation_colours,
            ..VectorTreeOptions::default()
        };
        let overridden = draw_vector_tree(&tree, &options, None).unwrap();
        prop_assert_eq!(plain, overridden);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Structure
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn one_marker_per_node_one_edge_per_branch(tree in arb_tree()) {
        let scene = draw_vector_tree(&tree, &VectorTreeOptions::default(), None).unwrap();
        for u in tree.nodes() {
            let node_id = format!("node_0_{u}");
            prop_assert!(scene.find_element(&node_id).is_some());
            let edge = scene.find_element(&format!("edge_0_{u}"));
            prop_assert_eq!(edge.is_some(), tree.parent(u).is_some());
        }
        let circles = scene
            .root
            .descendants()
            .into_iter()
            .filter(|e| matches!(e.shape, Shape::Circle { .. }))
            .count();
        prop_assert_eq!(circles, tree.nodes().len());
    }

    #[test]
    fn edges_join_node_to_parent(tree in arb_tree()) {
        let drawn = VectorTree::build(&tree, &VectorTreeOptions::default(), None).unwrap();
        let scene = draw_vector_tree(&tree, &VectorTreeOptions::default(), None).unwrap();
        for u in tree.nodes() {
            let Some(p) = tree.parent(u) else { continue };
            let (pu, pp) = (drawn.point(u).unwrap(), drawn.point(p).unwrap());
            let edge = scene.find_element(&format!("edge_0_{u}")).unwrap();
            let expected = Shape::Path {
                commands: vec![
                    PathCommand::MoveTo(pu),
                    PathCommand::Vertical(pp.y),
                    PathCommand::Horizontal(pp.x),
                ],
            };
            prop_assert_eq!(&edge.shape, &expected);
        }
    }

    #[test]
    fn siblings_left_to_right(tree in arb_tree()) {
        let drawn = VectorTree::build(&tree, &VectorTreeOptions::default(), None).unwrap();
        for u in tree.nodes() {
            if let Some(a) = tree.left_sib(u) {
                let (pa, pu) = (drawn.point(a).unwrap(), drawn.point(u).unwrap());
                prop_assert!(pa.x < pu.x, "{a} at {} vs {u} at {}", pa.x, pu.x);
            }
        }
    }

    #[test]
    fn mutation_marks_on_their_branch(tree in arb_tree()) {
        let drawn = VectorTree::build(&tree, &VectorTreeOptions::default(), None).unwrap();
        for m in drawn.mutations() {
            let child = drawn.point(m.node).unwrap();
            prop_assert_eq!(m.point.x, child.x);
            let Some(p) = tree.parent(m.node) else {
                prop_assert!(m.point.y < child.y);
                continue;
            };
            let top = drawn.point(p).unwrap().y;
            if top == child.y {
                prop_assert_eq!(m.point.y, child.y);
            } else {
                prop_assert!(m.point.y > top.min(child.y) && m.point.y < top.max(child.y));
            }
        }
        let marks = tree.mutations().len();
        let ids: Vec<MutationId> = drawn.mutations().iter().map(|m| m.id).collect();
        prop_assert_eq!(ids.len(), marks);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// Sequences
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ticks_increase_and_span_the_box(n in 1usize..6, by_leaves in any::<bool>()) {
        let ts = cherries(n);
        let options = VectorSequenceOptions {
            tree_widths: if by_leaves { TreeWidths::ByLeafCount } else { TreeWidths::Uniform },
            ..VectorSequenceOptions::default()
        };
        let drawn = VectorSequence::build(&ts, &options).unwrap();
        let ticks = drawn.ticks();
        prop_assert_eq!(ticks.len(), n + 1);
        prop_assert!(ticks.windows(2).all(|w| w[0].x < w[1].x));
        let right = drawn.scene().size.width - 20.0;
        prop_assert!((ticks[n].x - right).abs() < 1e-6);
        prop_assert_eq!(drawn.scene().defs.len(), n);
    }
}
