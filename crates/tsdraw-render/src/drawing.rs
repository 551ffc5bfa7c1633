#![forbid(unsafe_code)]

//! Drawing primitives for the canvas.
//!
//! [`Draw`] provides line and text helpers on top of [`Canvas::set_char`] so
//! the renderers never loop over cells by hand. [`TreeGlyphs`] picks the
//! connector glyph for a cell from the directions its branches reach out to.

use bitflags::bitflags;
use tsdraw_core::glyph_policy::GlyphMode;
use tsdraw_core::text_width::{grapheme_width, graphemes};

use crate::canvas::Canvas;

bitflags! {
    /// Directions a connector cell reaches out to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Arms: u8 {
        const UP = 0b0001;
        const DOWN = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}

impl Arms {
    /// Swap left and right.
    #[must_use]
    pub fn mirrored(self) -> Self {
        let mut out = self & (Self::UP | Self::DOWN);
        if self.contains(Self::LEFT) {
            out |= Self::RIGHT;
        }
        if self.contains(Self::RIGHT) {
            out |= Self::LEFT;
        }
        out
    }
}

/// Connector glyphs for one glyph mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeGlyphs {
    mode: GlyphMode,
    pub horizontal: char,
    pub vertical: char,
    /// Column separator between trees of a sequence.
    pub separator: char,
}

impl TreeGlyphs {
    /// Heavy box-drawing glyphs.
    pub const HEAVY: Self = Self {
        mode: GlyphMode::Unicode,
        horizontal: '━',
        vertical: '┃',
        separator: '┊',
    };

    /// ASCII-only glyphs.
    pub const ASCII: Self = Self {
        mode: GlyphMode::Ascii,
        horizontal: '-',
        vertical: '|',
        separator: '|',
    };

    #[must_use]
    pub const fn for_mode(mode: GlyphMode) -> Self {
        match mode {
            GlyphMode::Unicode => Self::HEAVY,
            GlyphMode::Ascii => Self::ASCII,
        }
    }

    pub const fn mode(&self) -> GlyphMode {
        self.mode
    }

    /// Glyph for a cell whose branches reach out along `arms`.
    pub fn glyph(&self, arms: Arms) -> char {
        let vertical = arms.intersects(Arms::UP | Arms::DOWN);
        let horizontal = arms.intersects(Arms::LEFT | Arms::RIGHT);
        match (vertical, horizontal) {
            (false, false) => ' ',
            (true, false) => self.vertical,
            (false, true) => self.horizontal,
            (true, true) if self.mode == GlyphMode::Ascii => '+',
            (true, true) => heavy_junction(arms),
        }
    }

    /// Arms of a connector glyph; `None` for anything else.
    pub fn arms_of(&self, c: char) -> Option<Arms> {
        if c == self.vertical {
            return Some(Arms::UP | Arms::DOWN);
        }
        if c == self.horizontal {
            return Some(Arms::LEFT | Arms::RIGHT);
        }
        if self.mode == GlyphMode::Ascii {
            return None;
        }
        HEAVY_JUNCTIONS
            .iter()
            .find(|(_, glyph)| *glyph == c)
            .map(|&(arms, _)| arms)
    }

    /// Left-right mirror image of a connector glyph; other chars unchanged.
    pub fn mirror(&self, c: char) -> char {
        match self.arms_of(c) {
            Some(arms) => self.glyph(arms.mirrored()),
            None => c,
        }
    }
}

/// Every mix of at least one vertical and one horizontal arm.
const HEAVY_JUNCTIONS: [(Arms, char); 9] = [
    (Arms::DOWN.union(Arms::RIGHT), '┏'),
    (Arms::DOWN.union(Arms::LEFT), '┓'),
    (Arms::UP.union(Arms::RIGHT), '┗'),
    (Arms::UP.union(Arms::LEFT), '┛'),
    (Arms::UP.union(Arms::DOWN).union(Arms::RIGHT), '┣'),
    (Arms::UP.union(Arms::DOWN).union(Arms::LEFT), '┫'),
    (Arms::DOWN.union(Arms::LEFT).union(Arms::RIGHT), '┳'),
    (Arms::UP.union(Arms::LEFT).union(Arms::RIGHT), '┻'),
    (Arms::all(), '╋'),
];

fn heavy_junction(arms: Arms) -> char {
    HEAVY_JUNCTIONS
        .iter()
        .find(|(a, _)| *a == arms)
        .map_or('╋', |&(_, glyph)| glyph)
}

/// Line and text helpers on a [`Canvas`].
pub trait Draw {
    /// Draw `width` copies of `glyph` rightward from `(x, y)`.
    fn draw_horizontal_line(&mut self, x: usize, y: usize, width: usize, glyph: char);

    /// Draw `height` copies of `glyph` downward from `(x, y)`.
    fn draw_vertical_line(&mut self, x: usize, y: usize, height: usize, glyph: char);

    /// Print text at `(x, y)`, stopping at the canvas edge. Returns the
    /// column after the last character.
    fn print_text(&mut self, x: usize, y: usize, text: &str) -> usize;

    /// Like [`Draw::print_text`] but stops at `max_x` (exclusive).
    fn print_text_clipped(&mut self, x: usize, y: usize, text: &str, max_x: usize) -> usize;
}

impl Draw for Canvas {
    fn draw_horizontal_line(&mut self, x: usize, y: usize, width: usize, glyph: char) {
        for i in 0..width {
            self.set_char(x + i, y, glyph);
        }
    }

    fn draw_vertical_line(&mut self, x: usize, y: usize, height: usize, glyph: char) {
        for i in 0..height {
            self.set_char(x, y + i, glyph);
        }
    }

    fn print_text(&mut self, x: usize, y: usize, text: &str) -> usize {
        self.print_text_clipped(x, y, text, self.width())
    }

    fn print_text_clipped(&mut self, x: usize, y: usize, text: &str, max_x: usize) -> usize {
        let mut cx = x;
        for grapheme in graphemes(text) {
            let width = grapheme_width(grapheme);
            if width == 0 {
                continue;
            }
            // Don't start a wide grapheme if it won't fit
            if cx + width > max_x {
                break;
            }
            self.set_grapheme(cx, y, grapheme);
            cx += width;
        }
        cx
    }
}
