#![forbid(unsafe_code)]

//! Tree query contract.
//!
//! Layout and rendering read trees only through [`Tree`] and
//! [`TreeSequence`]. Implementors supply the structural queries; traversal
//! orders, sibling lookup and leaf counting are provided on top of them.
//!
//! # Invariants
//!
//! 1. `children(u)` is in fixed left-to-right order.
//! 2. Roots are siblings of one another in root order.
//! 3. "No such node" is `None`, never a sentinel id.

use core::fmt;

/// Node identifier, an index into the node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mutation identifier, global across the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MutationId(pub u32);

impl From<u32> for MutationId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for MutationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A mutation sits on the branch directly above `node`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub id: MutationId,
    pub node: NodeId,
}

/// A site and the mutations at it, in mutation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub position: f64,
    pub mutations: Vec<Mutation>,
}

/// Half-open genomic interval `[left, right)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub left: f64,
    pub right: f64,
}

impl Interval {
    #[inline]
    pub const fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.right - self.left
    }

    #[inline]
    pub fn contains(&self, position: f64) -> bool {
        self.left <= position && position < self.right
    }
}

/// Read-only view of one (possibly multi-root) tree.
pub trait Tree {
    /// Roots, left to right.
    fn roots(&self) -> &[NodeId];

    /// Children of `u`, left to right. Empty for leaves and unknown nodes.
    fn children(&self, u: NodeId) -> &[NodeId];

    fn parent(&self, u: NodeId) -> Option<NodeId>;

    fn time(&self, u: NodeId) -> f64;

    /// Sites whose position lies inside [`Tree::interval`].
    fn sites(&self) -> &[Site];

    fn interval(&self) -> Interval;

    /// Position of this tree in its sequence.
    fn index(&self) -> usize;

    /// Immediate left sibling of `u`. The siblings of a root are the other
    /// roots.
    fn left_sib(&self, u: NodeId) -> Option<NodeId> {
        let siblings = match self.parent(u) {
            Some(p) => self.children(p),
            None => self.roots(),
        };
        let pos = siblings.iter().position(|&v| v == u)?;
        pos.checked_sub(1).map(|i| siblings[i])
    }

    #[inline]
    fn is_leaf(&self, u: NodeId) -> bool {
        self.children(u).is_empty()
    }

    #[inline]
    fn is_internal(&self, u: NodeId) -> bool {
        !self.is_leaf(u)
    }

    #[inline]
    fn is_root(&self, u: NodeId) -> bool {
        self.parent(u).is_none() && self.roots().contains(&u)
    }

    /// Preorder over the subtree at `root`.
    fn preorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(u) = stack.pop() {
            out.push(u);
            stack.extend(self.children(u).iter().rev().copied());
        }
        out
    }

    /// Postorder over the subtree at `root`, children left to right.
    fn postorder(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((u, expanded)) = stack.pop() {
            if expanded {
                out.push(u);
                continue;
            }
            stack.push((u, true));
            stack.extend(self.children(u).iter().rev().map(|&c| (c, false)));
        }
        out
    }

    /// Every node reachable from a root, preorder, roots left to right.
    fn nodes(&self) -> Vec<NodeId> {
        self.roots()
            .iter()
            .flat_map(|&root| self.preorder(root))
            .collect()
    }

    fn num_leaves(&self) -> usize {
        self.nodes().into_iter().filter(|&u| self.is_leaf(u)).count()
    }

    /// Mutations in site order, then mutation order within a site.
    fn mutations(&self) -> Vec<Mutation> {
        self.sites()
            .iter()
            .flat_map(|site| site.mutations.iter().copied())
            .collect()
    }
}

/// Ordered trees sharing one coordinate axis and one node table.
pub trait TreeSequence {
    type Tree: Tree;

    fn trees(&self) -> &[Self::Tree];

    fn num_nodes(&self) -> usize;

    fn node_time(&self, u: NodeId) -> f64;

    fn sequence_length(&self) -> f64;

    fn num_trees(&self) -> usize {
        self.trees().len()
    }

    /// Left coordinate of every tree followed by the sequence length.
    fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self.trees().iter().map(|t| t.interval().left).collect();
        points.push(self.sequence_length());
        points
    }

    /// Oldest root time over every tree; zero for an empty sequence.
    fn max_root_time(&self) -> f64 {
        self.trees()
            .iter()
            .flat_map(|t| t.roots().iter().map(move |&r| t.time(r)))
            .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))))
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableTree;

    fn balanced() -> TableTree {
        // 6 -> (4 -> 0 1) (5 -> 2 3)
        TableTree::from_parents(
            &[0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 2.0],
            &[Some(4), Some(4), Some(5), Some(5), Some(6), Some(6), None],
        )
        .unwrap()
    }

    #[test]
    fn preorder_and_postorder() {
        let tree = balanced();
        let ids = |v: Vec<NodeId>| v.into_iter().map(|u| u.0).collect::<Vec<_>>();
        assert_eq!(ids(tree.nodes()), vec![6, 4, 0, 1, 5, 2, 3]);
        assert_eq!(ids(tree.postorder(NodeId(6))), vec![0, 1, 4, 2, 3, 5, 6]);
    }

    #[test]
    fn left_sib_within_family() {
        let tree = balanced();
        assert_eq!(tree.left_sib(NodeId(1)), Some(NodeId(0)));
        assert_eq!(tree.left_sib(NodeId(0)), None);
        assert_eq!(tree.left_sib(NodeId(5)), Some(NodeId(4)));
        assert_eq!(tree.left_sib(NodeId(6)), None);
    }

    #[test]
    fn roots_are_siblings() {
        let tree = TableTree::from_parents(&[0.0, 0.0, 1.0], &[Some(2), None, None]).unwrap();
        assert_eq!(tree.roots(), &[NodeId(1), NodeId(2)]);
        assert_eq!(tree.left_sib(NodeId(2)), Some(NodeId(1)));
        assert!(tree.is_root(NodeId(1)));
        assert!(!tree.is_root(NodeId(0)));
    }

    #[test]
    fn leaf_counting() {
        let tree = balanced();
        assert_eq!(tree.num_leaves(), 4);
        assert!(tree.is_internal(NodeId(4)));
        assert!(tree.is_leaf(NodeId(3)));
    }

    #[test]
    fn interval_contains_is_half_open() {
        let iv = Interval::new(0.0, 5.0);
        assert!(iv.contains(0.0));
        assert!(!iv.contains(5.0));
        assert_eq!(iv.span(), 5.0);
    }
}
