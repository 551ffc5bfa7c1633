#![forbid(unsafe_code)]

//! Glyph mode selection for text drawings.

use core::fmt;

/// Env var that forces the glyph mode of text drawings.
pub const ENV_GLYPH_MODE: &str = "TSDRAW_GLYPH_MODE";

/// Which character set text drawings use for connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GlyphMode {
    /// Heavy box-drawing glyphs.
    #[default]
    Unicode,
    /// `+`, `|` and `-` only.
    Ascii,
}

impl GlyphMode {
    pub const ALLOWED: &'static [&'static str] = &["unicode", "ascii"];

    /// Parse a mode name (case-insensitive, surrounding whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unicode" | "utf8" | "utf-8" | "box" => Some(Self::Unicode),
            "ascii" | "plain" => Some(Self::Ascii),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }
}

impl fmt::Display for GlyphMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
