#![forbid(unsafe_code)]

//! Mutation placement along branches.
//!
//! Mutations above node `u` are spread evenly over the branch from `u` to its
//! parent (or, for a root, to the root-branch top). With `n` mutations the
//! branch is cut into `n + 1` pieces and mutation `k` sits on boundary
//! `k + 1`, so the first mutation in site order is nearest the child.

use rustc_hash::FxHashMap;
use tsdraw_core::geometry::Point;
use tsdraw_core::tree::{Mutation, MutationId, NodeId, Tree};
use tsdraw_core::{debug_span, trace};

/// A mutation with its drawing position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedMutation {
    pub id: MutationId,
    pub node: NodeId,
    pub point: Point,
    /// Position in the stack above `node`, 0 nearest the child.
    pub offset: usize,
    /// Number of mutations stacked above `node`.
    pub stacked: usize,
}

/// Place every mutation of `tree` whose node has a coordinate.
///
/// Mutations above nodes missing from `points` are dropped.
pub fn place_mutations<T: Tree>(
    tree: &T,
    points: &FxHashMap<NodeId, Point>,
    root_branch_top: f64,
) -> Vec<PlacedMutation> {
    let span = debug_span!("mutations", tree = tree.index());
    let _guard = span.enter();

    let mut order: Vec<NodeId> = Vec::new();
    let mut stacks: FxHashMap<NodeId, Vec<Mutation>> = FxHashMap::default();
    for mutation in tree.mutations() {
        stacks
            .entry(mutation.node)
            .or_insert_with(|| {
                order.push(mutation.node);
                Vec::new()
            })
            .push(mutation);
    }

    let mut placed = Vec::new();
    for node in order {
        let Some(stack) = stacks.get(&node) else {
            continue;
        };
        let Some(&child) = points.get(&node) else {
            trace!(node = node.0, count = stack.len(), "node not drawn; mutations dropped");
            continue;
        };
        let top = match tree.parent(node) {
            Some(p) => points.get(&p).map_or(root_branch_top, |pt| pt.y),
            None => root_branch_top,
        };
        let chunk = (top - child.y) / (stack.len() + 1) as f64;
        for (k, mutation) in stack.iter().enumerate() {
            placed.push(PlacedMutation {
                id: mutation.id,
                node,
                point: Point::new(child.x, child.y + (k + 1) as f64 * chunk),
                offset: k,
                stacked: stack.len(),
            });
        }
    }
    placed
}
