#![forbid(unsafe_code)]

//! Vector drawing of a tree sequence: every tree side by side above one
//! genome axis.
//!
//! Each tree is built once into the scene's defs and placed with a `use`
//! element, so the drawings can be restyled per tree by id. All trees share
//! one time scale.

use core::fmt;

use tsdraw_core::debug_span;
use tsdraw_core::geometry::{Point, Size};
use tsdraw_core::tree::{Tree, TreeSequence};
use tsdraw_layout::{HeightBound, LayoutError, SequenceTimes};

use crate::scene::{Element, Group, Scene, Shape};
use crate::vector_tree::{FONT_SIZE, VectorTree, VectorTreeOptions};

pub const AXES_X_OFFSET: f64 = 15.0;
pub const AXES_Y_OFFSET: f64 = 10.0;
pub const TREEBOX_X_OFFSET: f64 = AXES_X_OFFSET + 5.0;
pub const TREEBOX_Y_OFFSET: f64 = AXES_Y_OFFSET + 5.0;
/// Default width given to each tree when no size is set.
pub const DEFAULT_TREE_WIDTH: f64 = 200.0;
pub const DEFAULT_HEIGHT: f64 = 200.0;

const TICK_HALF_LENGTH: f64 = 5.0;
const TICK_LABEL_DY: f64 = 20.0;

/// How the tree box is shared between trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TreeWidths {
    /// Every tree gets the same width.
    #[default]
    Uniform,
    /// Widths proportional to `leaves + 1`, so leaf spacing is even across
    /// trees.
    ByLeafCount,
}

impl TreeWidths {
    pub const ALLOWED: &'static [&'static str] = &["uniform", "leaves"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "uniform" | "equal" => Some(Self::Uniform),
            "leaves" | "leaf-count" | "by-leaf-count" => Some(Self::ByLeafCount),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uniform => "uniform",
            Self::ByLeafCount => "leaves",
        }
    }
}

impl fmt::Display for TreeWidths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct VectorSequenceOptions {
    /// Whole drawing; `None` gives each tree 200 units of width.
    pub size: Option<Size>,
    pub tree_widths: TreeWidths,
    /// Decimal places on the genome axis labels.
    pub position_precision: usize,
    /// Per-tree styling. `size` is replaced by each tree's slice of the
    /// tree box.
    pub tree: VectorTreeOptions,
}

impl Default for VectorSequenceOptions {
    fn default() -> Self {
        Self {
            size: None,
            tree_widths: TreeWidths::Uniform,
            position_precision: 2,
            tree: VectorTreeOptions {
                max_height: HeightBound::Sequence,
                ..VectorTreeOptions::default()
            },
        }
    }
}

/// A genome axis tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub x: f64,
    pub position: f64,
    pub label: String,
}

fn tree_widths<S: TreeSequence>(ts: &S, mode: TreeWidths, treebox_width: f64) -> Vec<f64> {
    let n = ts.num_trees();
    match mode {
        TreeWidths::Uniform => vec![treebox_width / n as f64; n],
        TreeWidths::ByLeafCount => {
            let weights: Vec<f64> = ts
                .trees()
                .iter()
                .map(|t| (t.num_leaves() + 1) as f64)
                .collect();
            let total: f64 = weights.iter().sum();
            weights.iter().map(|w| treebox_width * w / total).collect()
        }
    }
}

#[derive(Debug, Clone)]
pub struct VectorSequence {
    scene: Scene,
    ticks: Vec<Tick>,
    widths: Vec<f64>,
}

impl VectorSequence {
    pub fn build<S: TreeSequence>(
        ts: &S,
        options: &VectorSequenceOptions,
    ) -> Result<Self, LayoutError> {
        let span = debug_span!("vector_sequence", trees = ts.num_trees());
        let _guard = span.enter();

        let size = options.size.unwrap_or_else(|| {
            Size::new(DEFAULT_TREE_WIDTH * ts.num_trees() as f64, DEFAULT_HEIGHT)
        });
        let treebox_width = size.width - 2.0 * TREEBOX_X_OFFSET;
        let treebox_height = size.height - 2.0 * TREEBOX_Y_OFFSET;
        let widths = tree_widths(ts, options.tree_widths, treebox_width);
        let context = SequenceTimes::from_sequence(ts);
        let precision = options.position_precision;
        let tick = |x: f64, position: f64| Tick {
            x,
            position,
            label: format!("{position:.precision$}"),
        };

        let mut scene = Scene::new(size);
        let mut tree_options = options.tree.clone();
        let mut ticks = Vec::with_capacity(ts.num_trees() + 1);
        let mut x = TREEBOX_X_OFFSET;
        for (tree, &width) in ts.trees().iter().zip(&widths) {
            tree_options.size = Size::new(width, treebox_height);
            let drawn = VectorTree::build(tree, &tree_options, Some(&context))?;
            scene.defs.push(drawn.into_group());
            scene.root.push(Element::new(Shape::Use {
                href: format!("tree_{}", tree.index()),
                at: Point::new(x, TREEBOX_Y_OFFSET),
            }));
            ticks.push(tick(x, tree.interval().left));
            x += width;
        }
        ticks.push(tick(x, ts.sequence_length()));

        let y = size.height - 2.0 * AXES_Y_OFFSET;
        let mut axis = Group::new()
            .with_class("axis")
            .with_attr("stroke", "black");
        axis.push(Element::new(Shape::Line {
            from: Point::new(TREEBOX_X_OFFSET, y),
            to: Point::new(size.width - TREEBOX_X_OFFSET, y),
        }));
        let mut labels = Group::new()
            .with_class("ticks")
            .with_attr("stroke", "none")
            .with_attr("font-size", FONT_SIZE.to_string())
            .with_attr("text-anchor", "middle")
            .with_attr("font-weight", "bold");
        for t in &ticks {
            axis.push(Element::new(Shape::Line {
                from: Point::new(t.x, y - TICK_HALF_LENGTH),
                to: Point::new(t.x, y + TICK_HALF_LENGTH),
            }));
            labels.push(Element::new(Shape::Text {
                at: Point::new(t.x, y + TICK_LABEL_DY),
                text: t.label.clone(),
            }));
        }
        axis.push_group(labels);
        scene.root.push_group(axis);

        Ok(Self {
            scene,
            ticks,
            widths,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Tree left edges, then the sequence end.
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    pub fn tree_widths(&self) -> &[f64] {
        &self.widths
    }

    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

pub fn draw_vector_sequence<S: TreeSequence>(
    ts: &S,
    options: &VectorSequenceOptions,
) -> Result<Scene, LayoutError> {
    VectorSequence::build(ts, options).map(VectorSequence::into_scene)
}
