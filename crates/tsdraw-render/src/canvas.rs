#![forbid(unsafe_code)]

//! Character grid storage.
//!
//! A [`Canvas`] is a dense 2D grid of [`Cell`]s sized once up front. Every
//! access is bounds checked; writes outside the grid are dropped.
//!
//! # Layout
//!
//! Cells are stored in row-major order: `index = y * width + x`.
//!
//! # Invariants
//!
//! 1. `cells.len() == width * height`
//! 2. Dimensions never change after creation
//! 3. A double-width glyph is always followed by a `Continuation` cell
//! 4. Every `Cluster` id refers to an entry of the owning canvas' cluster
//!    table
//!
//! # Clusters
//!
//! Multi-codepoint graphemes (a base letter plus combining marks, emoji
//! sequences) do not fit a `char`. They are interned once per canvas and the
//! cell holds a [`ClusterId`] carrying the cluster's width.

use core::fmt;

use tsdraw_core::text_width::{char_width, grapheme_width};

/// Reference to an interned grapheme cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClusterId {
    index: u32,
    width: u8,
}

impl ClusterId {
    #[inline]
    pub const fn width(self) -> usize {
        self.width as usize
    }
}

/// One character cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Blank,
    Glyph(char),
    /// A grapheme cluster stored in the canvas' cluster table.
    Cluster(ClusterId),
    /// Right half of the double-width glyph to the left.
    Continuation,
}

impl Cell {
    #[inline]
    pub const fn as_char(self) -> Option<char> {
        match self {
            Self::Glyph(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_continuation(self) -> bool {
        matches!(self, Self::Continuation)
    }

    #[inline]
    fn is_wide_head(self) -> bool {
        match self {
            Self::Glyph(c) => char_width(c) > 1,
            Self::Cluster(id) => id.width() > 1,
            _ => false,
        }
    }
}

/// Fixed-size character grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    clusters: Vec<Box<str>>,
}

impl Canvas {
    /// A blank canvas. Zero-sized canvases are allowed and render as the
    /// empty string.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Blank; width * height],
            clusters: Vec::new(),
        }
    }

    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    #[inline]
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        self.get(x, y).and_then(Cell::as_char)
    }

    /// Write a raw cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.clear_overlap(x, y);
            self.cells[i] = cell;
        }
    }

    /// Write a glyph, taking two cells for double-width characters.
    ///
    /// A wide glyph that would not fit entirely is not written. Returns the
    /// number of columns used.
    pub fn set_char(&mut self, x: usize, y: usize, c: char) -> usize {
        let width = char_width(c).max(1);
        if width > 1 && self.index(x + width - 1, y).is_none() {
            return 0;
        }
        if self.index(x, y).is_none() {
            return 0;
        }
        self.set(x, y, Cell::Glyph(c));
        for dx in 1..width {
            self.set(x + dx, y, Cell::Continuation);
        }
        width
    }

    /// Write one grapheme cluster. Single chars go through
    /// [`Canvas::set_char`]; longer clusters are interned. Zero-width
    /// clusters are not written. Returns the number of columns used.
    pub fn set_grapheme(&mut self, x: usize, y: usize, grapheme: &str) -> usize {
        let width = grapheme_width(grapheme);
        if width == 0 {
            return 0;
        }
        let mut chars = grapheme.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return self.set_char(x, y, c);
        }
        if self.index(x + width - 1, y).is_none() {
            return 0;
        }
        let id = self.intern(grapheme, width);
        self.set(x, y, Cell::Cluster(id));
        for dx in 1..width {
            self.set(x + dx, y, Cell::Continuation);
        }
        width
    }

    /// Text of an interned cluster.
    pub fn cluster(&self, id: ClusterId) -> Option<&str> {
        self.clusters.get(id.index as usize).map(|text| &**text)
    }

    fn intern(&mut self, text: &str, width: usize) -> ClusterId {
        let width = width.min(u8::MAX as usize) as u8;
        let index = match self.clusters.iter().position(|t| &**t == text) {
            Some(i) => i,
            None => {
                self.clusters.push(text.into());
                self.clusters.len() - 1
            }
        };
        ClusterId {
            index: index as u32,
            width,
        }
    }

    /// Blank out the other half of a wide glyph that `(x, y)` is part of.
    fn clear_overlap(&mut self, x: usize, y: usize) {
        let Some(i) = self.index(x, y) else { return };
        match self.cells[i] {
            Cell::Continuation if x > 0 => {
                if let Some(head) = self.index(x - 1, y) {
                    self.cells[head] = Cell::Blank;
                }
            }
            cell if cell.is_wide_head() => {
                if let Some(tail) = self.index(x + 1, y)
                    && self.cells[tail].is_continuation()
                {
                    self.cells[tail] = Cell::Blank;
                }
            }
            _ => {}
        }
    }

    /// Copy `src` into this canvas with its top-left corner at `(x, y)`.
    /// Parts falling outside are clipped.
    pub fn blit(&mut self, src: &Canvas, x: usize, y: usize) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                let cell = match src.get(sx, sy) {
                    Some(Cell::Cluster(id)) => match src.cluster(id) {
                        Some(text) => Cell::Cluster(self.intern(text, id.width())),
                        None => Cell::Blank,
                    },
                    Some(cell) => cell,
                    None => continue,
                };
                self.set(x + sx, y + sy, cell);
            }
        }
    }

    /// Flip every row left to right, passing glyphs through `mirror`.
    ///
    /// Double-width glyphs keep their head before the continuation cell.
    pub fn mirror_horizontal<F: Fn(char) -> char>(&mut self, mirror: F) {
        let width = self.width;
        if width == 0 {
            return;
        }
        for row in self.cells.chunks_mut(width) {
            row.reverse();
            let mut x = 0;
            while x + 1 < width {
                if row[x].is_continuation() && row[x + 1].is_wide_head() {
                    row.swap(x, x + 1);
                    x += 2;
                } else {
                    x += 1;
                }
            }
            for cell in row.iter_mut() {
                if let Cell::Glyph(c) = *cell {
                    *cell = Cell::Glyph(mirror(c));
                }
            }
        }
    }

    /// Row `y` as a string; blanks become spaces.
    pub fn row_string(&self, y: usize) -> String {
        if y >= self.height {
            return String::new();
        }
        let mut out = String::with_capacity(self.width);
        for cell in &self.cells[y * self.width..(y + 1) * self.width] {
            match *cell {
                Cell::Blank => out.push(' '),
                Cell::Glyph(c) => out.push(c),
                Cell::Cluster(id) => out.push_str(self.cluster(id).unwrap_or(" ")),
                Cell::Continuation => {}
            }
        }
        out
    }
}

impl fmt::Display for Canvas {
    /// Every row followed by a single `\n`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            f.write_str(&self.row_string(y))?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}
