#![forbid(unsafe_code)]

//! Text drawing of a whole tree sequence.
//!
//! Trees are drawn root-top on shared rank rows and laid side by side,
//! separated by dotted columns. Node times run down the left margin and
//! breakpoint positions sit under the separators.
//!
//! ```text
//! 2.00┊   4   ┊     ┊
//!     ┊  ┏┻━┓ ┊     ┊
//! 1.00┊  3  ┃ ┊  3  ┊
//!     ┊ ┏┻┓ ┃ ┊ ┏┻┓ ┊
//! 0.00┊ 0 1 2 ┊ 0 2 ┊
//!   0.00    5.00  10.00
//! ```

use tsdraw_core::debug_span;
use tsdraw_core::glyph_policy::GlyphMode;
use tsdraw_core::overrides::LabelMap;
use tsdraw_core::text_width::display_width;
use tsdraw_core::tree::{NodeId, TreeSequence};
use tsdraw_layout::{HeightBound, LayoutError, SequenceTimes};

use crate::canvas::Canvas;
use crate::drawing::{Draw, TreeGlyphs};
use crate::text_tree::{Orientation, RootTopTree, TextTreeOptions};

/// Options for text sequence drawings.
#[derive(Debug, Clone)]
pub struct TextSequenceOptions {
    pub glyph_mode: GlyphMode,
    pub node_labels: LabelMap<NodeId>,
    /// Decimal places for node times.
    pub time_precision: usize,
    /// Decimal places for breakpoint positions.
    pub position_precision: usize,
}

impl Default for TextSequenceOptions {
    fn default() -> Self {
        Self {
            glyph_mode: GlyphMode::Unicode,
            node_labels: LabelMap::ids(),
            time_precision: 2,
            position_precision: 2,
        }
    }
}

pub fn draw_text_sequence<S: TreeSequence>(
    ts: &S,
    options: &TextSequenceOptions,
) -> Result<Canvas, LayoutError> {
    let span = debug_span!("text_sequence", trees = ts.num_trees());
    let _guard = span.enter();

    let context = SequenceTimes::from_sequence(ts);
    let tree_options = TextTreeOptions {
        glyph_mode: options.glyph_mode,
        orientation: Orientation::Top,
        node_labels: options.node_labels.clone(),
        max_height: HeightBound::Sequence,
    };
    let trees = ts
        .trees()
        .iter()
        .map(|tree| RootTopTree::draw(tree, &tree_options, Some(&context)))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(first) = trees.first() else {
        return Ok(Canvas::new(0, 0));
    };

    let time_labels: Vec<(f64, String)> = (0..ts.num_nodes())
        .map(|u| {
            let t = ts.node_time(NodeId(u as u32));
            (t, format!("{t:.prec$}", prec = options.time_precision))
        })
        .collect();
    let position_labels: Vec<String> = ts
        .breakpoints()
        .into_iter()
        .map(|x| format!("{x:.prec$}", prec = options.position_precision))
        .collect();

    let time_width = time_labels
        .iter()
        .map(|(_, label)| display_width(label))
        .max()
        .unwrap_or(0);
    let last_position_width = position_labels.last().map_or(0, |l| display_width(l));
    let height = 1 + trees.iter().map(|t| t.canvas().height()).max().unwrap_or(0);
    let width = trees.iter().map(|t| t.canvas().width() + 3).sum::<usize>()
        + 1
        + time_width
        + last_position_width / 2;

    let glyphs = TreeGlyphs::for_mode(options.glyph_mode);
    let mut canvas = Canvas::new(width, height);
    let label_row = height - 1;

    // Rows come from the first tree; every tree is ranked on the same
    // sequence-wide times so they agree.
    for (t, label) in &time_labels {
        if let Some(y) = first.rows().row_for_time(*t) {
            canvas.print_text(0, y, label);
        }
    }
    canvas.draw_vertical_line(time_width, 0, height, glyphs.separator);

    let print_position = |canvas: &mut Canvas, x: usize, label: &str| {
        let start = x.saturating_sub(display_width(label) / 2 + 2);
        canvas.print_text(start, label_row, label);
    };

    let mut x = time_width + 2;
    for (tree, label) in trees.iter().zip(&position_labels) {
        print_position(&mut canvas, x, label);
        let drawn = tree.canvas();
        // Top-aligned: roots sit on the rows of their times even when a
        // tree grew extra rows below.
        canvas.blit(drawn, x, 0);
        x += drawn.width() + 1;
        canvas.draw_vertical_line(x, 0, height, glyphs.separator);
        x += 2;
    }
    if let Some(label) = position_labels.last() {
        print_position(&mut canvas, x, label);
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsdraw_core::table::{SequenceBuilder, TableSequence};

    /// Tree 0 over [0, 5): 4 -> (3 -> 0 1) 2. Tree 1 over [5, 10): 3 -> 0 2.
    fn two_trees() -> TableSequence {
        let mut b = SequenceBuilder::new(10.0);
        let n0 = b.add_sample(0.0);
        let n1 = b.add_node(0.0, false);
        let n2 = b.add_sample(0.0);
        let n3 = b.add_node(1.0, false);
        let n4 = b.add_node(2.0, false);
        b.add_edge(0.0, 10.0, n3, n0)
            .add_edge(0.0, 5.0, n3, n1)
            .add_edge(5.0, 10.0, n3, n2)
            .add_edge(0.0, 5.0, n4, n3)
            .add_edge(0.0, 5.0, n4, n2);
        b.build().unwrap()
    }

    #[test]
    fn two_tree_sequence() {
        let out = draw_text_sequence(&two_trees(), &TextSequenceOptions::default())
            .unwrap()
            .to_string();
        let expected = concat!(
            "2.00┊   4   ┊     ┊  \n",
            "    ┊  ┏┻━┓ ┊     ┊  \n",
            "1.00┊  3  ┃ ┊  3  ┊  \n",
            "    ┊ ┏┻┓ ┃ ┊ ┏┻┓ ┊  \n",
            "0.00┊ 0 1 2 ┊ 0 2 ┊  \n",
            "  0.00    5.00  10.00\n",
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn width_adds_separator_allowance() {
        let canvas = draw_text_sequence(&two_trees(), &TextSequenceOptions::default()).unwrap();
        // Trees are 5 and 3 columns wide; 3 per tree, then 1 + 4 + 5 / 2.
        assert_eq!(canvas.width(), (5 + 3) + (3 + 3) + 1 + 4 + 2);
        assert_eq!(canvas.height(), 6);
    }

    #[test]
    fn ascii_separators_and_precision() {
        let options = TextSequenceOptions {
            glyph_mode: GlyphMode::Ascii,
            time_precision: 0,
            position_precision: 0,
            ..TextSequenceOptions::default()
        };
        let out = draw_text_sequence(&two_trees(), &options).unwrap().to_string();
        let first = out.lines().next().unwrap();
        assert!(first.starts_with("2|"));
        assert!(!out.contains('┊'));
        assert_eq!(out.lines().last().map(str::trim_end), Some(" 0       5    10"));
    }

    #[test]
    fn single_tree_sequence() {
        let mut b = SequenceBuilder::new(1.0);
        b.add_sample(0.0);
        let ts = b.build().unwrap();
        let out = draw_text_sequence(&ts, &TextSequenceOptions::default())
            .unwrap()
            .to_string();
        assert_eq!(out, "0.00┊ 0 ┊  \n  0.001.00 \n");
    }
}
