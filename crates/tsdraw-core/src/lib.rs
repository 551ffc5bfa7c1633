#![forbid(unsafe_code)]

//! Core: the tree query contract, reference tables, override maps, and the
//! small shared primitives every tsdraw crate builds on.

pub mod geometry;
pub mod glyph_policy;
pub mod logging;
pub mod overrides;
pub mod table;
pub mod text_width;
pub mod tree;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace};

pub use geometry::{Point, Size};
pub use glyph_policy::GlyphMode;
pub use overrides::{LabelMap, Overrides, Resolved};
pub use table::{SequenceBuilder, TableError, TableSequence, TableTree};
pub use tree::{Interval, Mutation, MutationId, NodeId, Site, Tree, TreeSequence};
