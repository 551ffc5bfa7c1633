#![forbid(unsafe_code)]

//! Layout passes for tree drawings.
//!
//! - [`time_axis`] - node heights, vector y coordinates, text rows and
//!   root-left/right column depths
//! - [`traversal`] - left-to-right slots, label-anchored columns and rows
//! - [`mutations`] - mutation points along their branches
//!
//! Every pass is a pure function of a [`tsdraw_core::Tree`] and returns a
//! fresh map. Nothing is cached between calls.

pub mod mutations;
pub mod time_axis;
pub mod traversal;

use core::fmt;

pub use mutations::{PlacedMutation, place_mutations};
pub use time_axis::{
    BranchDepths, HeightBound, HeightScale, NodeHeights, RankRows, SequenceTimes, VerticalAxis,
    branch_depths, node_heights, rank_rows,
};
pub use traversal::{AnchoredLayout, RowLayout, SlotLayout, continuous, label_anchored, row_slots};

/// Errors raised while assigning coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutError {
    /// Rank heights are small integers; a numeric bound has no meaning there.
    NumericBoundWithRank { bound: f64 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericBoundWithRank { bound } => write!(
                f,
                "cannot use a numeric max height ({bound}) with rank height scaling"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

/// Midpoint of the extreme child positions.
#[inline]
pub(crate) fn midpoint(lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) / 2.0
}
