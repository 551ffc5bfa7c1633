#![forbid(unsafe_code)]

//! Time-axis assignment.
//!
//! Heights come from node times, either raw (`time`) or as even ranks of the
//! distinct times (`rank`). The vector back-end turns heights into y
//! coordinates ([`VerticalAxis`]); the text back-ends use rank rows for
//! root-top drawings ([`rank_rows`]) and per-time column depths for
//! root-left/right drawings ([`branch_depths`]).
//!
//! # Invariants
//!
//! 1. A parent's height is never below its child's (equal under rank ties).
//! 2. The maximum height used for scaling is never zero.
//! 3. Equal times share a height, row, or depth, except where a text layout
//!    has to separate a parent from a child of equal or greater time.
//! 4. In text layouts a child's row is at least two below its parent's, and
//!    a parent's depth clears its child's depth plus the child's branch.

use core::fmt;

use rustc_hash::FxHashMap;
use tsdraw_core::tree::{NodeId, Tree, TreeSequence};
use tsdraw_core::{debug, debug_span, trace};

use crate::LayoutError;

/// Offset of the tree box from the top and bottom of the drawing.
pub const TREEBOX_Y_OFFSET: f64 = 10.0;
/// Room reserved above and below for labels.
pub const LABEL_PADDING: f64 = 10.0;
/// Total vertical padding on each side of the tree.
pub const Y_PADDING: f64 = TREEBOX_Y_OFFSET + 2.0 * LABEL_PADDING;
/// Fraction of the height given to root branches when mutations sit above a
/// root.
pub const ROOT_BRANCH_FRACTION: f64 = 0.1;

/// How node times map to heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeightScale {
    /// Height is the node time.
    #[default]
    Time,
    /// Height is twice the rank of the node time among distinct times.
    Rank,
}

impl HeightScale {
    pub const ALLOWED: &'static [&'static str] = &["time", "rank"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "time" => Some(Self::Time),
            "rank" => Some(Self::Rank),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Rank => "rank",
        }
    }
}

impl fmt::Display for HeightScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the tallest drawable height is.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HeightBound {
    /// The oldest root of this tree.
    #[default]
    Tree,
    /// The oldest root of the whole sequence.
    Sequence,
    /// A fixed height. Only valid with [`HeightScale::Time`].
    Value(f64),
}

impl HeightBound {
    pub const ALLOWED: &'static [&'static str] = &["tree", "ts", "<number>"];

    /// Parse `tree`, `ts` (or `sequence`), or a finite number.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "tree" => Some(Self::Tree),
            "ts" | "sequence" => Some(Self::Sequence),
            _ => trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Self::Value),
        }
    }

    #[inline]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl fmt::Display for HeightBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tree => f.write_str("tree"),
            Self::Sequence => f.write_str("ts"),
            Self::Value(v) => write!(f, "{v}"),
        }
    }
}

/// Sequence-wide facts the per-tree passes need when drawing one tree of a
/// sequence on a shared scale.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceTimes {
    times: Vec<f64>,
    max_root_time: f64,
    mutations_over_root: bool,
}

impl SequenceTimes {
    pub fn from_sequence<S: TreeSequence>(ts: &S) -> Self {
        Self {
            times: (0..ts.num_nodes())
                .map(|u| ts.node_time(NodeId(u as u32)))
                .collect(),
            max_root_time: ts.max_root_time(),
            mutations_over_root: ts.trees().iter().any(has_mutation_over_root),
        }
    }

    /// Treat a single tree as its own sequence.
    pub fn from_tree<T: Tree>(tree: &T) -> Self {
        Self {
            times: tree.nodes().into_iter().map(|u| tree.time(u)).collect(),
            max_root_time: tree_max_root_time(tree),
            mutations_over_root: has_mutation_over_root(tree),
        }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn max_root_time(&self) -> f64 {
        self.max_root_time
    }

    pub fn mutations_over_root(&self) -> bool {
        self.mutations_over_root
    }
}

fn has_mutation_over_root<T: Tree>(tree: &T) -> bool {
    tree.mutations().iter().any(|m| tree.is_root(m.node))
}

fn tree_max_root_time<T: Tree>(tree: &T) -> f64 {
    tree.roots()
        .iter()
        .map(|&r| tree.time(r))
        .fold(None, |acc: Option<f64>, t| Some(acc.map_or(t, |a| a.max(t))))
        .unwrap_or(0.0)
}

fn distinct_ascending(times: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut distinct: Vec<f64> = times.collect();
    distinct.sort_by(f64::total_cmp);
    distinct.dedup();
    distinct
}

fn ascending_rank(distinct: &[f64], t: f64) -> Option<usize> {
    let i = distinct.partition_point(|&p| p < t);
    (distinct.get(i) == Some(&t)).then_some(i)
}

/// Per-node heights and the height that maps to the top of the drawing.
#[derive(Debug, Clone)]
pub struct NodeHeights {
    heights: FxHashMap<NodeId, f64>,
    max_height: f64,
}

impl NodeHeights {
    pub fn height(&self, u: NodeId) -> Option<f64> {
        self.heights.get(&u).copied()
    }

    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        self.heights.iter().map(|(&u, &h)| (u, h))
    }
}

/// Heights for every node of `tree`.
///
/// With [`HeightBound::Sequence`] and no `context`, the tree stands in for
/// the sequence.
pub fn node_heights<T: Tree>(
    tree: &T,
    scale: HeightScale,
    bound: HeightBound,
    context: Option<&SequenceTimes>,
) -> Result<NodeHeights, LayoutError> {
    let nodes = tree.nodes();
    let (heights, mut max_height) = match scale {
        HeightScale::Time => {
            let heights: FxHashMap<NodeId, f64> =
                nodes.iter().map(|&u| (u, tree.time(u))).collect();
            let max = match bound {
                HeightBound::Tree => tree_max_root_time(tree),
                HeightBound::Sequence => {
                    context.map_or_else(|| tree_max_root_time(tree), SequenceTimes::max_root_time)
                }
                HeightBound::Value(v) => v,
            };
            (heights, max)
        }
        HeightScale::Rank => {
            let distinct = match (bound, context) {
                (HeightBound::Value(v), _) => {
                    return Err(LayoutError::NumericBoundWithRank { bound: v });
                }
                (HeightBound::Sequence, Some(ctx)) => distinct_ascending(ctx.times.iter().copied()),
                _ => distinct_ascending(nodes.iter().map(|&u| tree.time(u))),
            };
            let heights: FxHashMap<NodeId, f64> = nodes
                .iter()
                .map(|&u| {
                    let rank = ascending_rank(&distinct, tree.time(u)).unwrap_or(0);
                    (u, (2 * rank) as f64)
                })
                .collect();
            let max = (2 * distinct.len().saturating_sub(1)) as f64;
            (heights, max)
        }
    };
    // A root younger than its children can leave the top at or below zero.
    if max_height <= 0.0 {
        debug!(tree = tree.index(), max_height, "max height is not positive; using 1");
        max_height = 1.0;
    }
    Ok(NodeHeights {
        heights,
        max_height,
    })
}

/// Vector y coordinates. Roots are near the top; `y` grows downward.
#[derive(Debug, Clone)]
pub struct VerticalAxis {
    y: FxHashMap<NodeId, f64>,
    root_branch_top: f64,
    scale: f64,
}

impl VerticalAxis {
    /// Assign y coordinates for a drawing `height` units tall.
    ///
    /// When any mutation sits above a root (in this tree, or anywhere in the
    /// sequence when `context` is given) a tenth of the height is kept free
    /// above the roots so those mutations have a branch to sit on.
    pub fn assign<T: Tree>(
        tree: &T,
        height: f64,
        scale: HeightScale,
        bound: HeightBound,
        context: Option<&SequenceTimes>,
    ) -> Result<Self, LayoutError> {
        let span = debug_span!("time_axis", tree = tree.index(), height = height);
        let _guard = span.enter();

        let heights = node_heights(tree, scale, bound, context)?;
        let over_root = context.map_or_else(
            || has_mutation_over_root(tree),
            SequenceTimes::mutations_over_root,
        );
        let root_branch = if over_root {
            height * ROOT_BRANCH_FRACTION
        } else {
            0.0
        };
        let y_scale = (height - root_branch - 2.0 * Y_PADDING) / heights.max_height();
        let y = heights
            .iter()
            .map(|(u, h)| (u, height - y_scale * h - Y_PADDING))
            .collect();
        trace!(root_branch, y_scale, "vertical axis assigned");
        Ok(Self {
            y,
            root_branch_top: Y_PADDING,
            scale: y_scale,
        })
    }

    pub fn y(&self, u: NodeId) -> Option<f64> {
        self.y.get(&u).copied()
    }

    /// Where branches above roots end.
    pub fn root_branch_top(&self) -> f64 {
        self.root_branch_top
    }

    /// Units per unit of height.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}

/// Text rows for root-top drawings: distinct times, newest last, every
/// other row.
#[derive(Debug, Clone)]
pub struct RankRows {
    rows: FxHashMap<NodeId, usize>,
    descending: Vec<f64>,
    height: usize,
}

impl RankRows {
    pub fn row(&self, u: NodeId) -> Option<usize> {
        self.rows.get(&u).copied()
    }

    /// Row of any time in the ranked set, including nodes not in this tree.
    pub fn row_for_time(&self, t: f64) -> Option<usize> {
        let i = self.descending.partition_point(|&p| p > t);
        (self.descending.get(i) == Some(&t)).then_some(2 * i)
    }

    /// Number of canvas rows: the last row plus one.
    pub fn height(&self) -> usize {
        self.height
    }
}

/// Rank rows for `tree`. [`HeightBound::Sequence`] ranks every node time of
/// the sequence so trees drawn side by side share rows.
///
/// Roots sit on the row of their time. A node whose time is not older than
/// its parent's is moved down to two rows below the parent, so the connector
/// row between them stays on the canvas.
pub fn rank_rows<T: Tree>(
    tree: &T,
    bound: HeightBound,
    context: Option<&SequenceTimes>,
) -> Result<RankRows, LayoutError> {
    let nodes = tree.nodes();
    let mut descending = match (bound, context) {
        (HeightBound::Value(v), _) => return Err(LayoutError::NumericBoundWithRank { bound: v }),
        (HeightBound::Sequence, Some(ctx)) => distinct_ascending(ctx.times.iter().copied()),
        _ => distinct_ascending(nodes.iter().map(|&u| tree.time(u))),
    };
    descending.reverse();
    let height = (2 * descending.len()).saturating_sub(1);
    let mut ranked = RankRows {
        rows: FxHashMap::default(),
        descending,
        height,
    };
    for &root in tree.roots() {
        for u in tree.preorder(root) {
            let Some(mut row) = ranked.row_for_time(tree.time(u)) else {
                continue;
            };
            if let Some(&parent_row) = tree.parent(u).and_then(|p| ranked.rows.get(&p))
                && row < parent_row + 2
            {
                trace!(node = u.index(), row, parent_row, "moved below parent");
                row = parent_row + 2;
            }
            ranked.height = ranked.height.max(row + 1);
            ranked.rows.insert(u, row);
        }
    }
    Ok(ranked)
}

/// Column depths for root-left/right drawings.
#[derive(Debug, Clone)]
pub struct BranchDepths {
    depths: FxHashMap<NodeId, usize>,
    total: usize,
}

impl BranchDepths {
    pub fn depth(&self, u: NodeId) -> Option<usize> {
        self.depths.get(&u).copied()
    }

    /// Number of canvas columns. The classic layout reserves one trailing
    /// column for the line break; it is not part of the grid.
    pub fn width(&self) -> usize {
        self.total.saturating_sub(1)
    }
}

/// Depth of every node, measured from the leaf side.
///
/// Nodes are visited in groups of equal time, oldest last. A group starts
/// where its deepest child plus that child's `min_branch` ends, and the
/// cursor moves on by two columns after each group. A final postorder pass
/// pushes any parent that still sits at or before a child of equal or
/// greater time.
pub fn branch_depths<T, F>(tree: &T, min_branch: F) -> BranchDepths
where
    T: Tree,
    F: Fn(NodeId) -> usize,
{
    let mut nodes = tree.nodes();
    nodes.sort_by(|&a, &b| tree.time(a).total_cmp(&tree.time(b)));

    let mut depths: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut current = 0usize;
    for group in nodes.chunk_by(|&a, &b| tree.time(a) == tree.time(b)) {
        for &u in group {
            for &v in tree.children(u) {
                // Children at the same time as their parent are in this
                // group and have no depth yet.
                if let Some(&dv) = depths.get(&v) {
                    current = current.max(dv + min_branch(v));
                }
            }
        }
        for &u in group {
            depths.insert(u, current);
        }
        current += 2;
    }
    for &root in tree.roots() {
        for u in tree.postorder(root) {
            let needed = tree
                .children(u)
                .iter()
                .filter_map(|&v| Some(depths.get(&v)? + min_branch(v)))
                .max();
            if let (Some(needed), Some(du)) = (needed, depths.get_mut(&u))
                && *du < needed
            {
                trace!(node = u.index(), depth = *du, needed, "pushed past children");
                *du = needed;
            }
        }
    }
    for &root in tree.roots() {
        if let Some(&d) = depths.get(&root) {
            current = current.max(d + min_branch(root));
        }
    }
    BranchDepths {
        depths,
        total: current,
    }
}
