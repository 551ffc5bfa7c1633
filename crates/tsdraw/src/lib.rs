#![forbid(unsafe_code)]

//! tsdraw public facade crate.
//!
//! Draw a single tree or a whole tree sequence either as a vector [`Scene`]
//! (SVG via the `export` feature) or as character art on a [`Canvas`].
//!
//! ```
//! use tsdraw::prelude::*;
//!
//! let tree = TableTree::from_parents(&[0.0, 0.0, 1.0], &[Some(2), Some(2), None]).unwrap();
//! let options = DrawOptions::new().with_format(DrawFormat::Unicode);
//! let drawing = draw_tree(&tree, None, &options).unwrap();
//! assert_eq!(drawing.as_text().unwrap().to_string(), " 2 \n┏┻┓\n0 1\n");
//! ```
//!
//! # Feature Flags
//!
//! - `export` (default): [`Drawing::render`] and SVG markup.
//! - `tracing`: spans and events from every layout and drawing pass.
//! - `tracing-json`: adds [`init_json_subscriber`].

pub mod config;
pub mod error;
pub mod options;

use tsdraw_core::tree::{Tree, TreeSequence};
use tsdraw_core::{debug, debug_span};
use tsdraw_render::{TextSequenceOptions, TextTreeOptions, draw_text_sequence, draw_text_tree};
use tsdraw_scene::{
    VectorSequenceOptions, VectorTreeOptions, draw_vector_sequence, draw_vector_tree,
};

// --- Re-exports -------------------------------------------------------------

pub use config::{ConfigError, DrawConfig, DrawConfigParse};
pub use error::DrawError;
pub use options::{DrawFormat, DrawOptions, OptionValue};

pub use tsdraw_core::geometry::{Point, Size};
pub use tsdraw_core::glyph_policy::GlyphMode;
pub use tsdraw_core::overrides::{LabelMap, Overrides, Resolved};
pub use tsdraw_core::table::{SequenceBuilder, TableError, TableSequence, TableTree};
pub use tsdraw_core::tree::{Interval, Mutation, MutationId, NodeId, Site};
pub use tsdraw_layout::{HeightBound, HeightScale, LayoutError, SequenceTimes};
pub use tsdraw_render::{Canvas, Orientation};
pub use tsdraw_scene::{Scene, TreeWidths};

#[cfg(feature = "export")]
pub use tsdraw_scene::export::SvgExporter;

#[cfg(feature = "tracing-json")]
pub use tsdraw_core::logging::init_json_subscriber;

/// Output of a drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawing {
    Scene(Scene),
    Text(Canvas),
}

impl Drawing {
    pub fn as_scene(&self) -> Option<&Scene> {
        match self {
            Self::Scene(scene) => Some(scene),
            Self::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&Canvas> {
        match self {
            Self::Text(canvas) => Some(canvas),
            Self::Scene(_) => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// SVG markup or the text drawing, one `\n` after every row.
    #[cfg(feature = "export")]
    pub fn render(&self) -> String {
        match self {
            Self::Scene(scene) => SvgExporter::default().export(scene),
            Self::Text(canvas) => canvas.to_string(),
        }
    }
}

fn vector_tree_options(options: &DrawOptions, default_bound: HeightBound) -> VectorTreeOptions {
    let defaults = VectorTreeOptions::default();
    VectorTreeOptions {
        size: options.size.unwrap_or(defaults.size),
        height_scale: options.height_scale,
        max_height: options.max_height.unwrap_or(default_bound),
        node_labels: options.node_labels_or_ids(),
        node_colours: options.node_colours.clone().unwrap_or(defaults.node_colours),
        edge_colours: options.edge_colours.clone().unwrap_or(defaults.edge_colours),
        mutation_labels: options
            .mutation_labels
            .clone()
            .unwrap_or(defaults.mutation_labels),
        mutation_colours: options
            .mutation_colours
            .clone()
            .unwrap_or(defaults.mutation_colours),
    }
}

/// Draw one tree.
///
/// `context` puts the tree on the time scale of its whole sequence; it is
/// needed for `max_height = ts` to mean more than the tree itself.
pub fn draw_tree<T: Tree>(
    tree: &T,
    context: Option<&SequenceTimes>,
    options: &DrawOptions,
) -> Result<Drawing, DrawError> {
    options.validate()?;
    let span = debug_span!("draw_tree", tree = tree.index(), format = options.format.as_str());
    let _guard = span.enter();

    match options.format.glyph_mode() {
        None => {
            let vector = vector_tree_options(options, HeightBound::Tree);
            Ok(Drawing::Scene(draw_vector_tree(tree, &vector, context)?))
        }
        Some(glyph_mode) => {
            let text = TextTreeOptions {
                glyph_mode,
                orientation: options.orientation,
                node_labels: options.node_labels_or_ids(),
                max_height: options.max_height.unwrap_or(HeightBound::Tree),
            };
            let canvas = draw_text_tree(tree, &text, context)?;
            debug!(width = canvas.width(), height = canvas.height(), "text tree drawn");
            Ok(Drawing::Text(canvas))
        }
    }
}

/// Draw every tree of a sequence side by side on one time scale.
///
/// Text sequences are always drawn root-top.
pub fn draw_sequence<S: TreeSequence>(
    ts: &S,
    options: &DrawOptions,
) -> Result<Drawing, DrawError> {
    options.validate()?;
    let span = debug_span!(
        "draw_sequence",
        trees = ts.num_trees(),
        format = options.format.as_str()
    );
    let _guard = span.enter();

    match options.format.glyph_mode() {
        None => {
            let vector = VectorSequenceOptions {
                size: options.size,
                tree_widths: options.tree_widths,
                position_precision: options.position_precision,
                tree: vector_tree_options(options, HeightBound::Sequence),
            };
            Ok(Drawing::Scene(draw_vector_sequence(ts, &vector)?))
        }
        Some(glyph_mode) => {
            if options.orientation != Orientation::Top {
                return Err(DrawError::UnsupportedOrientation {
                    orientation: options.orientation,
                });
            }
            let text = TextSequenceOptions {
                glyph_mode,
                node_labels: options.node_labels_or_ids(),
                time_precision: options.time_precision,
                position_precision: options.position_precision,
            };
            Ok(Drawing::Text(draw_text_sequence(ts, &text)?))
        }
    }
}

// --- Prelude ----------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DrawError, DrawFormat, DrawOptions, Drawing, HeightBound, HeightScale, LabelMap, NodeId,
        Orientation, Overrides, SequenceBuilder, SequenceTimes, TableSequence, TableTree,
        draw_sequence, draw_tree,
    };
    pub use tsdraw_core::tree::{Tree, TreeSequence};
}
