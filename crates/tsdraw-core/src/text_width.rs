#![forbid(unsafe_code)]

//! Display-width helpers for labels drawn on a character grid.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal display width of `text` in cells.
#[inline]
pub fn display_width(text: &str) -> usize {
    if text.bytes().all(|b| (0x20..0x7f).contains(&b)) {
        return text.len();
    }
    graphemes(text).map(grapheme_width).sum()
}

/// Extended grapheme clusters of `text`, in order.
#[inline]
pub fn graphemes(text: &str) -> impl Iterator<Item = &str> {
    text.graphemes(true)
}

/// Display width of one grapheme cluster. Combining marks add nothing to
/// their base character.
#[inline]
pub fn grapheme_width(grapheme: &str) -> usize {
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (None, _) => 0,
        (Some(c), None) => char_width(c),
        _ => UnicodeWidthStr::width(grapheme),
    }
}

/// Display width of a single char. Control characters count as zero.
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_ascii() && !c.is_ascii_control() {
        return 1;
    }
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Reverse `text` by extended grapheme cluster so combining marks stay on
/// their base character.
pub fn reverse_graphemes(text: &str) -> String {
    text.graphemes(true).rev().collect()
}
