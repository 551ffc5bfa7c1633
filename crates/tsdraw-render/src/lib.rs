#![forbid(unsafe_code)]

//! Text rendering: a fixed-size character [`canvas::Canvas`], drawing
//! helpers, and the root-top, root-left/right and tree-sequence renderers.

pub mod canvas;
pub mod drawing;
pub mod text_sequence;
pub mod text_tree;

pub use canvas::{Canvas, Cell, ClusterId};
pub use drawing::{Arms, Draw, TreeGlyphs};
pub use text_sequence::{TextSequenceOptions, draw_text_sequence};
pub use text_tree::{Orientation, RootTopTree, SideTree, TextTreeOptions, draw_text_tree};
