#![forbid(unsafe_code)]

//! Vector drawings: a format-agnostic [`scene::Scene`], the single-tree
//! builder, and the tree-sequence composer.
//!
//! # Feature Flags
//!
//! - `export`: [`export::SvgExporter`] turns a scene into SVG markup.

pub mod scene;
pub mod vector_sequence;
pub mod vector_tree;

#[cfg(feature = "export")]
pub mod export;

pub use scene::{Attrs, Element, Group, PathCommand, Scene, SceneNode, Shape};
pub use vector_sequence::{
    Tick, TreeWidths, VectorSequence, VectorSequenceOptions, draw_vector_sequence,
};
pub use vector_tree::{VectorTree, VectorTreeOptions, draw_vector_tree};
