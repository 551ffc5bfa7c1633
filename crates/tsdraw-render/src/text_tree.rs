#![forbid(unsafe_code)]

//! Text renderers for a single tree.
//!
//! [`RootTopTree`] draws roots at the top with children fanned out below a
//! connector bar. [`SideTree`] draws roots at the right edge, or at the left
//! edge by mirroring the finished canvas. Both print node labels verbatim;
//! a node without a label gets the connector glyph so its branch stays
//! unbroken.

use core::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tsdraw_core::debug_span;
use tsdraw_core::glyph_policy::GlyphMode;
use tsdraw_core::overrides::LabelMap;
use tsdraw_core::text_width::{display_width, reverse_graphemes};
use tsdraw_core::tree::{NodeId, Tree};
use tsdraw_layout::{
    AnchoredLayout, BranchDepths, HeightBound, LayoutError, RankRows, RowLayout, SequenceTimes,
    branch_depths, label_anchored, rank_rows, row_slots,
};

use crate::canvas::Canvas;
use crate::drawing::{Arms, Draw, TreeGlyphs};

/// Where the roots of a drawing sit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Top,
    Left,
    Right,
}

impl Orientation {
    pub const ALLOWED: &'static [&'static str] = &["top", "left", "right"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" => Some(Self::Top),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for text tree drawings.
#[derive(Debug, Clone)]
pub struct TextTreeOptions {
    pub glyph_mode: GlyphMode,
    pub orientation: Orientation,
    pub node_labels: LabelMap<NodeId>,
    /// Only `Tree` and `Sequence` are meaningful; rows are always ranks.
    pub max_height: HeightBound,
}

impl Default for TextTreeOptions {
    fn default() -> Self {
        Self {
            glyph_mode: GlyphMode::Unicode,
            orientation: Orientation::Top,
            node_labels: LabelMap::ids(),
            max_height: HeightBound::Tree,
        }
    }
}

/// Draw `tree` in the orientation named by `options`.
pub fn draw_text_tree<T: Tree>(
    tree: &T,
    options: &TextTreeOptions,
    context: Option<&SequenceTimes>,
) -> Result<Canvas, LayoutError> {
    match options.orientation {
        Orientation::Top => RootTopTree::draw(tree, options, context).map(RootTopTree::into_canvas),
        Orientation::Left | Orientation::Right => {
            if let HeightBound::Value(bound) = options.max_height {
                return Err(LayoutError::NumericBoundWithRank { bound });
            }
            Ok(SideTree::draw(tree, options).into_canvas())
        }
    }
}

fn resolve_labels<T: Tree>(
    tree: &T,
    labels: &LabelMap<NodeId>,
    missing: char,
    reversed: bool,
) -> FxHashMap<NodeId, String> {
    tree.nodes()
        .into_iter()
        .map(|u| {
            let text = match labels.label(&u) {
                Some(text) if reversed => reverse_graphemes(&text),
                Some(text) => text.into_owned(),
                None => missing.to_string(),
            };
            (u, text)
        })
        .collect()
}

type Placed = SmallVec<[(usize, usize); 4]>;

/// A root-top drawing and the layout it was drawn from.
#[derive(Debug, Clone)]
pub struct RootTopTree {
    canvas: Canvas,
    rows: RankRows,
    columns: AnchoredLayout,
}

impl RootTopTree {
    pub fn draw<T: Tree>(
        tree: &T,
        options: &TextTreeOptions,
        context: Option<&SequenceTimes>,
    ) -> Result<Self, LayoutError> {
        let span = debug_span!("text_tree", tree = tree.index(), orientation = "top");
        let _guard = span.enter();

        let glyphs = TreeGlyphs::for_mode(options.glyph_mode);
        let labels = resolve_labels(tree, &options.node_labels, glyphs.vertical, false);
        let rows = rank_rows(tree, options.max_height, context)?;
        let columns = label_anchored(tree, |u| labels.get(&u).map_or(0, |l| display_width(l)));
        let mut canvas = Canvas::new(columns.width(), rows.height());

        for u in tree.nodes() {
            let (Some(xu), Some(yu)) = (columns.position(u), rows.row(u)) else {
                continue;
            };
            if let (Some(anchor), Some(label)) = (columns.anchor(u), labels.get(&u)) {
                canvas.print_text(anchor, yu, label);
            }
            let kids: Placed = tree
                .children(u)
                .iter()
                .filter_map(|&v| Some((columns.position(v)?, rows.row(v)?)))
                .collect();
            match kids.as_slice() {
                [] => {}
                [(_, yv)] => {
                    let run = yv.saturating_sub(yu + 1);
                    canvas.draw_vertical_line(xu, yu + 1, run, glyphs.vertical);
                }
                _ => {
                    let left = kids.iter().map(|&(x, _)| x).min().unwrap_or(xu);
                    let right = kids.iter().map(|&(x, _)| x).max().unwrap_or(xu);
                    for x in left..=right {
                        let mut arms = Arms::empty();
                        arms.set(Arms::LEFT, x > left);
                        arms.set(Arms::RIGHT, x < right);
                        arms.set(Arms::UP, x == xu);
                        arms.set(Arms::DOWN, kids.iter().any(|&(xv, _)| xv == x));
                        canvas.set_char(x, yu + 1, glyphs.glyph(arms));
                    }
                    for &(xv, yv) in &kids {
                        canvas.draw_vertical_line(
                            xv,
                            yu + 2,
                            yv.saturating_sub(yu + 2),
                            glyphs.vertical,
                        );
                    }
                }
            }
        }

        Ok(Self {
            canvas,
            rows,
            columns,
        })
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn rows(&self) -> &RankRows {
        &self.rows
    }

    pub fn columns(&self) -> &AnchoredLayout {
        &self.columns
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}

/// A root-left or root-right drawing and the layout it was drawn from.
#[derive(Debug, Clone)]
pub struct SideTree {
    canvas: Canvas,
    rows: RowLayout,
    depths: BranchDepths,
}

impl SideTree {
    /// Draw with roots on the right, then mirror when `options.orientation`
    /// is [`Orientation::Left`].
    pub fn draw<T: Tree>(tree: &T, options: &TextTreeOptions) -> Self {
        let flip = options.orientation == Orientation::Left;
        let span = debug_span!(
            "text_tree",
            tree = tree.index(),
            orientation = options.orientation.as_str()
        );
        let _guard = span.enter();

        let glyphs = TreeGlyphs::for_mode(options.glyph_mode);
        let labels = resolve_labels(tree, &options.node_labels, glyphs.horizontal, flip);
        let label_width = |u: NodeId| labels.get(&u).map_or(0, |l| display_width(l));
        let depths = branch_depths(tree, |u| 1 + label_width(u));
        let rows = row_slots(tree);
        let mut canvas = Canvas::new(depths.width(), rows.height());

        for u in tree.nodes() {
            let (Some(xu), Some(yu)) = (depths.depth(u), rows.row(u)) else {
                continue;
            };
            if let Some(label) = labels.get(&u) {
                canvas.print_text(xu, yu, label);
            }
            let kids: Placed = tree
                .children(u)
                .iter()
                .filter_map(|&v| Some((depths.depth(v)?, rows.row(v)?)))
                .collect();
            match kids.as_slice() {
                [] => {}
                &[(xv, _)] => {
                    let run = xu.saturating_sub(xv);
                    canvas.draw_horizontal_line(xv, yu, run, glyphs.horizontal);
                }
                _ => {
                    let Some(x) = xu.checked_sub(1) else {
                        continue;
                    };
                    let top = kids.iter().map(|&(_, y)| y).min().unwrap_or(yu);
                    let bottom = kids.iter().map(|&(_, y)| y).max().unwrap_or(yu);
                    for y in top..=bottom {
                        let mut arms = Arms::empty();
                        arms.set(Arms::UP, y > top);
                        arms.set(Arms::DOWN, y < bottom);
                        arms.set(Arms::RIGHT, y == yu);
                        arms.set(Arms::LEFT, kids.iter().any(|&(_, yv)| yv == y));
                        canvas.set_char(x, y, glyphs.glyph(arms));
                    }
                    // Child labels are drawn later and cover the start of
                    // their run.
                    for &(xv, yv) in &kids {
                        let run = x.saturating_sub(xv);
                        canvas.draw_horizontal_line(xv, yv, run, glyphs.horizontal);
                    }
                }
            }
        }

        if flip {
            canvas.mirror_horizontal(|c| glyphs.mirror(c));
        }
        Self {
            canvas,
            rows,
            depths,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn rows(&self) -> &RowLayout {
        &self.rows
    }

    pub fn depths(&self) -> &BranchDepths {
        &self.depths
    }

    pub fn into_canvas(self) -> Canvas {
        self.canvas
    }
}
