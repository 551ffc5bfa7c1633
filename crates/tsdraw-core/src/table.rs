#![forbid(unsafe_code)]

//! Reference in-memory trees and tree sequences.
//!
//! [`TableTree::from_parents`] builds one tree from a parent array.
//! [`SequenceBuilder`] accepts node, edge and site records and materialises
//! one [`TableTree`] per breakpoint interval, the way a tree-sequence library
//! would. Both validate their input and never panic on bad ids.
//!
//! # Presence
//!
//! A node belongs to the tree over `[a, b)` when it is a sample or is the
//! parent or child of an edge covering `[a, b)`. Roots are ordered by id;
//! children follow edge insertion order.

use core::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::tree::{Interval, Mutation, MutationId, NodeId, Site, Tree, TreeSequence};

type ChildList = SmallVec<[NodeId; 2]>;

/// Why a table could not be turned into trees.
#[derive(Debug, Clone, PartialEq)]
pub enum TableError {
    /// A record referenced a node id outside the node table.
    UnknownNode { node: u32, num_nodes: usize },
    /// A parent array did not match the length of the time array.
    LengthMismatch { times: usize, parents: usize },
    /// The sequence length is not a positive finite number.
    BadSequenceLength { length: f64 },
    /// An edge interval is empty or escapes `[0, L]`.
    BadInterval { left: f64, right: f64 },
    /// A site position lies outside `[0, L)`.
    BadSitePosition { position: f64 },
    /// A child has two parents at `position`.
    MultipleParents { child: NodeId, position: f64 },
    /// Following parents from `node` loops back at `position`.
    Cycle { node: NodeId, position: f64 },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node, num_nodes } => {
                write!(f, "node {node} out of range (table has {num_nodes} nodes)")
            }
            Self::LengthMismatch { times, parents } => {
                write!(f, "{parents} parents given for {times} node times")
            }
            Self::BadSequenceLength { length } => {
                write!(f, "sequence length must be positive and finite, got {length}")
            }
            Self::BadInterval { left, right } => {
                write!(f, "edge interval [{left}, {right}) is empty or out of bounds")
            }
            Self::BadSitePosition { position } => {
                write!(f, "site position {position} outside the sequence")
            }
            Self::MultipleParents { child, position } => {
                write!(f, "node {child} has more than one parent at {position}")
            }
            Self::Cycle { node, position } => {
                write!(f, "parent chain from node {node} loops at {position}")
            }
        }
    }
}

impl std::error::Error for TableError {}

/// One tree of a [`TableSequence`], or a standalone tree.
#[derive(Debug, Clone)]
pub struct TableTree {
    index: usize,
    interval: Interval,
    times: Arc<[f64]>,
    parents: Vec<Option<NodeId>>,
    children: Vec<ChildList>,
    roots: Vec<NodeId>,
    sites: Vec<Site>,
}

impl TableTree {
    /// Build a single tree in which every node is present.
    ///
    /// `parents[u]` is the parent of node `u`. Children are ordered by id and
    /// the tree covers `[0, 1)`.
    pub fn from_parents(times: &[f64], parents: &[Option<u32>]) -> Result<Self, TableError> {
        if times.len() != parents.len() {
            return Err(TableError::LengthMismatch {
                times: times.len(),
                parents: parents.len(),
            });
        }
        let n = times.len();
        let mut parent_ids = vec![None; n];
        let mut children = vec![ChildList::new(); n];
        for (child, parent) in parents.iter().enumerate() {
            let Some(p) = *parent else { continue };
            if p as usize >= n {
                return Err(TableError::UnknownNode {
                    node: p,
                    num_nodes: n,
                });
            }
            let child = NodeId(child as u32);
            parent_ids[child.index()] = Some(NodeId(p));
            children[p as usize].push(child);
        }
        let present = vec![true; n];
        check_acyclic(&parent_ids, &present, 0.0)?;
        let roots = (0..n as u32)
            .map(NodeId)
            .filter(|u| parent_ids[u.index()].is_none())
            .collect();
        Ok(Self {
            index: 0,
            interval: Interval::new(0.0, 1.0),
            times: times.into(),
            parents: parent_ids,
            children,
            roots,
            sites: Vec::new(),
        })
    }

    /// Attach mutations given as `(position, node)` pairs.
    ///
    /// Pairs sharing a position form one site. Mutation ids are assigned in
    /// the resulting site order.
    pub fn with_mutations(mut self, mutations: &[(f64, u32)]) -> Result<Self, TableError> {
        let mut sorted: Vec<(f64, u32)> = mutations.to_vec();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));
        let mut sites: Vec<Site> = Vec::new();
        for (id, (position, node)) in sorted.into_iter().enumerate() {
            if node as usize >= self.times.len() {
                return Err(TableError::UnknownNode {
                    node,
                    num_nodes: self.times.len(),
                });
            }
            let mutation = Mutation {
                id: MutationId(id as u32),
                node: NodeId(node),
            };
            match sites.last_mut() {
                Some(site) if site.position == position => site.mutations.push(mutation),
                _ => sites.push(Site {
                    position,
                    mutations: vec![mutation],
                }),
            }
        }
        self.sites = sites;
        Ok(self)
    }
}

impl Tree for TableTree {
    fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    fn children(&self, u: NodeId) -> &[NodeId] {
        self.children
            .get(u.index())
            .map(|c| c.as_slice())
            .unwrap_or(&[])
    }

    fn parent(&self, u: NodeId) -> Option<NodeId> {
        self.parents.get(u.index()).copied().flatten()
    }

    fn time(&self, u: NodeId) -> f64 {
        self.times.get(u.index()).copied().unwrap_or(0.0)
    }

    fn sites(&self) -> &[Site] {
        &self.sites
    }

    fn interval(&self) -> Interval {
        self.interval
    }

    fn index(&self) -> usize {
        self.index
    }
}

/// A node row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRecord {
    pub time: f64,
    pub is_sample: bool,
}

/// An edge row: `parent` is the parent of `child` over `[left, right)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    pub left: f64,
    pub right: f64,
    pub parent: NodeId,
    pub child: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
struct SiteRecord {
    position: f64,
    nodes: Vec<NodeId>,
}

/// Accumulates table rows and builds a [`TableSequence`].
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    sequence_length: f64,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    sites: Vec<SiteRecord>,
}

impl SequenceBuilder {
    pub fn new(sequence_length: f64) -> Self {
        Self {
            sequence_length,
            nodes: Vec::new(),
            edges: Vec::new(),
            sites: Vec::new(),
        }
    }

    /// Append a node row and return its id.
    pub fn add_node(&mut self, time: f64, is_sample: bool) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord { time, is_sample });
        id
    }

    #[inline]
    pub fn add_sample(&mut self, time: f64) -> NodeId {
        self.add_node(time, true)
    }

    pub fn add_edge(&mut self, left: f64, right: f64, parent: NodeId, child: NodeId) -> &mut Self {
        self.edges.push(EdgeRecord {
            left,
            right,
            parent,
            child,
        });
        self
    }

    /// Add a site carrying one mutation above each of `nodes`, in order.
    pub fn add_site(&mut self, position: f64, nodes: &[NodeId]) -> &mut Self {
        self.sites.push(SiteRecord {
            position,
            nodes: nodes.to_vec(),
        });
        self
    }

    pub fn build(&self) -> Result<TableSequence, TableError> {
        let length = self.sequence_length;
        if !length.is_finite() || length <= 0.0 {
            return Err(TableError::BadSequenceLength { length });
        }
        let n = self.nodes.len();
        let check_node = |u: NodeId| {
            if u.index() < n {
                Ok(())
            } else {
                Err(TableError::UnknownNode {
                    node: u.0,
                    num_nodes: n,
                })
            }
        };
        for edge in &self.edges {
            check_node(edge.parent)?;
            check_node(edge.child)?;
            if !(0.0 <= edge.left && edge.left < edge.right && edge.right <= length) {
                return Err(TableError::BadInterval {
                    left: edge.left,
                    right: edge.right,
                });
            }
        }
        let mut site_records = self.sites.clone();
        for site in &site_records {
            if !(0.0 <= site.position && site.position < length) {
                return Err(TableError::BadSitePosition {
                    position: site.position,
                });
            }
            for &u in &site.nodes {
                check_node(u)?;
            }
        }
        site_records.sort_by(|a, b| a.position.total_cmp(&b.position));

        let mut next_mutation = 0u32;
        let sites: Vec<Site> = site_records
            .into_iter()
            .map(|record| Site {
                position: record.position,
                mutations: record
                    .nodes
                    .into_iter()
                    .map(|node| {
                        let id = MutationId(next_mutation);
                        next_mutation += 1;
                        Mutation { id, node }
                    })
                    .collect(),
            })
            .collect();

        let mut breakpoints = vec![0.0, length];
        for edge in &self.edges {
            breakpoints.push(edge.left);
            breakpoints.push(edge.right);
        }
        breakpoints.sort_by(f64::total_cmp);
        breakpoints.dedup();

        let times: Arc<[f64]> = self.nodes.iter().map(|r| r.time).collect();
        let mut trees = Vec::with_capacity(breakpoints.len().saturating_sub(1));
        for (index, window) in breakpoints.windows(2).enumerate() {
            let interval = Interval::new(window[0], window[1]);
            let mut parents = vec![None; n];
            let mut children = vec![ChildList::new(); n];
            let mut present: Vec<bool> = self.nodes.iter().map(|r| r.is_sample).collect();
            for edge in &self.edges {
                if edge.left > interval.left || edge.right < interval.right {
                    continue;
                }
                let slot = &mut parents[edge.child.index()];
                if slot.is_some() {
                    return Err(TableError::MultipleParents {
                        child: edge.child,
                        position: interval.left,
                    });
                }
                *slot = Some(edge.parent);
                children[edge.parent.index()].push(edge.child);
                present[edge.parent.index()] = true;
                present[edge.child.index()] = true;
            }
            check_acyclic(&parents, &present, interval.left)?;
            let roots = (0..n as u32)
                .map(NodeId)
                .filter(|u| present[u.index()] && parents[u.index()].is_none())
                .collect();
            let tree_sites = sites
                .iter()
                .filter(|s| interval.contains(s.position))
                .cloned()
                .collect();
            trees.push(TableTree {
                index,
                interval,
                times: Arc::clone(&times),
                parents,
                children,
                roots,
                sites: tree_sites,
            });
        }

        Ok(TableSequence {
            trees,
            times,
            sequence_length: length,
        })
    }
}

fn check_acyclic(
    parents: &[Option<NodeId>],
    present: &[bool],
    position: f64,
) -> Result<(), TableError> {
    let limit = parents.len();
    for start in (0..limit).filter(|&u| present[u]) {
        let mut steps = 0usize;
        let mut cursor = parents[start];
        while let Some(p) = cursor {
            steps += 1;
            if steps > limit {
                return Err(TableError::Cycle {
                    node: NodeId(start as u32),
                    position,
                });
            }
            cursor = parents.get(p.index()).copied().flatten();
        }
    }
    Ok(())
}

/// Trees over consecutive breakpoint intervals sharing one node table.
#[derive(Debug, Clone)]
pub struct TableSequence {
    trees: Vec<TableTree>,
    times: Arc<[f64]>,
    sequence_length: f64,
}

impl TreeSequence for TableSequence {
    type Tree = TableTree;

    fn trees(&self) -> &[TableTree] {
        &self.trees
    }

    fn num_nodes(&self) -> usize {
        self.times.len()
    }

    fn node_time(&self, u: NodeId) -> f64 {
        self.times.get(u.index()).copied().unwrap_or(0.0)
    }

    fn sequence_length(&self) -> f64 {
        self.sequence_length
    }
}
