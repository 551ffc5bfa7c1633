#![forbid(unsafe_code)]

//! Drawing options shared by [`crate::draw_tree`] and
//! [`crate::draw_sequence`].
//!
//! Every field that only makes sense for one back-end is an `Option`, so the
//! facade can tell "left at the default" from "asked for" and reject options
//! the chosen back-end cannot honour.

use core::fmt;
use core::str::FromStr;

use tsdraw_core::geometry::Size;
use tsdraw_core::glyph_policy::GlyphMode;
use tsdraw_core::overrides::{LabelMap, Overrides};
use tsdraw_core::tree::{MutationId, NodeId};
use tsdraw_layout::{HeightBound, HeightScale, LayoutError};
use tsdraw_render::Orientation;
use tsdraw_scene::TreeWidths;

use crate::config::MAX_PRECISION;
use crate::error::DrawError;

/// Output back-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawFormat {
    /// Vector scene.
    #[default]
    Svg,
    /// Character canvas with `+`, `|` and `-`.
    Ascii,
    /// Character canvas with box-drawing glyphs.
    Unicode,
}

impl DrawFormat {
    pub const ALLOWED: &'static [&'static str] = &["svg", "ascii", "unicode"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "ascii" => Some(Self::Ascii),
            "unicode" => Some(Self::Unicode),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Ascii => "ascii",
            Self::Unicode => "unicode",
        }
    }

    /// Glyph mode of a text format; `None` for vector output.
    #[must_use]
    pub const fn glyph_mode(self) -> Option<GlyphMode> {
        match self {
            Self::Svg => None,
            Self::Ascii => Some(GlyphMode::Ascii),
            Self::Unicode => Some(GlyphMode::Unicode),
        }
    }

    #[must_use]
    pub const fn is_text(self) -> bool {
        self.glyph_mode().is_some()
    }
}

impl From<GlyphMode> for DrawFormat {
    fn from(mode: GlyphMode) -> Self {
        match mode {
            GlyphMode::Ascii => Self::Ascii,
            GlyphMode::Unicode => Self::Unicode,
        }
    }
}

impl fmt::Display for DrawFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DrawFormat {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_option(s)
    }
}

// ---------------------------------------------------------------------------
// String-valued options
// ---------------------------------------------------------------------------

/// A string-valued drawing option.
///
/// Implemented for every enum the options accept, including those defined in
/// the layout and renderer crates.
pub trait OptionValue: Sized {
    /// Option name used in error messages.
    const OPTION: &'static str;
    const ALLOWED: &'static [&'static str];

    fn parse_value(value: &str) -> Option<Self>;

    /// Parse case-insensitively, naming the allowed values on failure.
    fn parse_option(value: &str) -> Result<Self, DrawError> {
        Self::parse_value(value).ok_or_else(|| DrawError::UnknownValue {
            option: Self::OPTION,
            value: value.to_string(),
            allowed: Self::ALLOWED,
        })
    }
}

macro_rules! option_value {
    ($ty:ty, $name:literal) => {
        impl OptionValue for $ty {
            const OPTION: &'static str = $name;
            const ALLOWED: &'static [&'static str] = <$ty>::ALLOWED;

            fn parse_value(value: &str) -> Option<Self> {
                <$ty>::parse(value)
            }
        }
    };
}

option_value!(DrawFormat, "format");
option_value!(Orientation, "orientation");
option_value!(HeightScale, "tree_height_scale");
option_value!(HeightBound, "max_tree_height");
option_value!(TreeWidths, "tree_widths");
option_value!(GlyphMode, "glyph_mode");

// ---------------------------------------------------------------------------
// DrawOptions
// ---------------------------------------------------------------------------

/// Options for one drawing call.
///
/// ```
/// use tsdraw::{DrawFormat, DrawOptions};
///
/// let options = DrawOptions::new()
///     .with_format("unicode".parse::<DrawFormat>().unwrap())
///     .with_time_precision(1);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub format: DrawFormat,
    pub orientation: Orientation,
    /// Vector only. Default 200x200 for a tree, 200 per tree wide for a
    /// sequence.
    pub size: Option<Size>,
    pub height_scale: HeightScale,
    /// Default `Tree` for a tree and `Sequence` for a sequence.
    pub max_height: Option<HeightBound>,
    /// Default: every node labelled with its id.
    pub node_labels: Option<LabelMap<NodeId>>,
    pub node_colours: Option<Overrides<NodeId, String>>,
    pub edge_colours: Option<Overrides<NodeId, String>>,
    pub mutation_labels: Option<LabelMap<MutationId>>,
    pub mutation_colours: Option<Overrides<MutationId, String>>,
    pub tree_widths: TreeWidths,
    pub time_precision: usize,
    pub position_precision: usize,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            format: DrawFormat::Svg,
            orientation: Orientation::Top,
            size: None,
            height_scale: HeightScale::Time,
            max_height: None,
            node_labels: None,
            node_colours: None,
            edge_colours: None,
            mutation_labels: None,
            mutation_colours: None,
            tree_widths: TreeWidths::Uniform,
            time_precision: 2,
            position_precision: 2,
        }
    }
}

impl DrawOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(mut self, format: DrawFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.size = Some(Size::new(width, height));
        self
    }

    #[must_use]
    pub fn with_height_scale(mut self, scale: HeightScale) -> Self {
        self.height_scale = scale;
        self
    }

    #[must_use]
    pub fn with_max_height(mut self, bound: HeightBound) -> Self {
        self.max_height = Some(bound);
        self
    }

    #[must_use]
    pub fn with_node_labels(mut self, labels: LabelMap<NodeId>) -> Self {
        self.node_labels = Some(labels);
        self
    }

    #[must_use]
    pub fn with_node_colours(mut self, colours: Overrides<NodeId, String>) -> Self {
        self.node_colours = Some(colours);
        self
    }

    #[must_use]
    pub fn with_edge_colours(mut self, colours: Overrides<NodeId, String>) -> Self {
        self.edge_colours = Some(colours);
        self
    }

    #[must_use]
    pub fn with_mutation_labels(mut self, labels: LabelMap<MutationId>) -> Self {
        self.mutation_labels = Some(labels);
        self
    }

    #[must_use]
    pub fn with_mutation_colours(mut self, colours: Overrides<MutationId, String>) -> Self {
        self.mutation_colours = Some(colours);
        self
    }

    #[must_use]
    pub fn with_tree_widths(mut self, widths: TreeWidths) -> Self {
        self.tree_widths = widths;
        self
    }

    #[must_use]
    pub fn with_time_precision(mut self, digits: usize) -> Self {
        self.time_precision = digits;
        self
    }

    #[must_use]
    pub fn with_position_precision(mut self, digits: usize) -> Self {
        self.position_precision = digits;
        self
    }

    /// Check the options against the chosen back-end.
    ///
    /// Runs before any layout work, so a rejected call produces no output.
    pub fn validate(&self) -> Result<(), DrawError> {
        if self.format.is_text() {
            let vector_only = [
                ("size", self.size.is_some()),
                ("node_colours", self.node_colours.is_some()),
                ("edge_colours", self.edge_colours.is_some()),
                ("mutation_labels", self.mutation_labels.is_some()),
                ("mutation_colours", self.mutation_colours.is_some()),
                (
                    "max_tree_height",
                    self.max_height.is_some_and(HeightBound::is_numeric),
                ),
            ];
            if let Some((option, _)) = vector_only.into_iter().find(|(_, set)| *set) {
                return Err(DrawError::TextModeUnsupported { option });
            }
        } else if self.orientation != Orientation::Top {
            return Err(DrawError::UnsupportedOrientation {
                orientation: self.orientation,
            });
        } else if let Some(size) = self.size.filter(Size::is_degenerate) {
            return Err(DrawError::DegenerateSize {
                width: size.width,
                height: size.height,
            });
        }
        for (option, digits) in [
            ("time_precision", self.time_precision),
            ("position_precision", self.position_precision),
        ] {
            if digits > MAX_PRECISION {
                return Err(DrawError::PrecisionTooLarge {
                    option,
                    digits,
                    max: MAX_PRECISION,
                });
            }
        }
        if let (HeightScale::Rank, Some(HeightBound::Value(bound))) =
            (self.height_scale, self.max_height)
        {
            return Err(LayoutError::NumericBoundWithRank { bound }.into());
        }
        Ok(())
    }

    pub(crate) fn node_labels_or_ids(&self) -> LabelMap<NodeId> {
        self.node_labels.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_str() {
        assert_eq!(" SVG ".parse::<DrawFormat>(), Ok(DrawFormat::Svg));
        assert_eq!("Ascii".parse::<DrawFormat>(), Ok(DrawFormat::Ascii));
        let err = "png".parse::<DrawFormat>().unwrap_err();
        assert_eq!(
            err,
            DrawError::UnknownValue {
                option: "format",
                value: "png".into(),
                allowed: DrawFormat::ALLOWED,
            }
        );
    }

    #[test]
    fn foreign_enums_parse_as_options() {
        assert_eq!(Orientation::parse_option("LEFT"), Ok(Orientation::Left));
        assert_eq!(HeightScale::parse_option("rank"), Ok(HeightScale::Rank));
        assert_eq!(HeightBound::parse_option("ts"), Ok(HeightBound::Sequence));
        assert_eq!(HeightBound::parse_option("2.5"), Ok(HeightBound::Value(2.5)));
        assert!(matches!(
            Orientation::parse_option("bottom"),
            Err(DrawError::UnknownValue { option: "orientation", .. })
        ));
        assert!(matches!(
            HeightScale::parse_option("log"),
            Err(DrawError::UnknownValue { option: "tree_height_scale", .. })
        ));
    }

    #[test]
    fn text_rejects_vector_options() {
        let text = DrawOptions::new().with_format(DrawFormat::Ascii);
        assert!(text.validate().is_ok());
        assert_eq!(
            text.clone().with_size(100.0, 100.0).validate(),
            Err(DrawError::TextModeUnsupported { option: "size" })
        );
        assert_eq!(
            text.clone()
                .with_mutation_labels(LabelMap::ids())
                .validate(),
            Err(DrawError::TextModeUnsupported {
                option: "mutation_labels"
            })
        );
        assert_eq!(
            text.clone()
                .with_edge_colours(Overrides::new("black".into()))
                .validate(),
            Err(DrawError::TextModeUnsupported {
                option: "edge_colours"
            })
        );
        assert_eq!(
            text.clone().with_max_height(HeightBound::Value(3.0)).validate(),
            Err(DrawError::TextModeUnsupported {
                option: "max_tree_height"
            })
        );
        assert!(text.with_max_height(HeightBound::Sequence).validate().is_ok());
    }

    #[test]
    fn vector_rejects_sideways() {
        let err = DrawOptions::new()
            .with_orientation(Orientation::Left)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            DrawError::UnsupportedOrientation {
                orientation: Orientation::Left
            }
        );
        let sideways_text = DrawOptions::new()
            .with_format(DrawFormat::Unicode)
            .with_orientation(Orientation::Right);
        assert!(sideways_text.validate().is_ok());
    }

    #[test]
    fn vector_rejects_sizes_without_area() {
        assert!(DrawOptions::new().with_size(300.0, 150.0).validate().is_ok());
        for (width, height) in [(0.0, 200.0), (200.0, -1.0), (f64::INFINITY, 200.0)] {
            assert_eq!(
                DrawOptions::new().with_size(width, height).validate(),
                Err(DrawError::DegenerateSize { width, height })
            );
        }
        let err = DrawOptions::new()
            .with_size(200.0, f64::NAN)
            .validate()
            .unwrap_err();
        assert!(matches!(err, DrawError::DegenerateSize { .. }));
    }

    #[test]
    fn precision_is_capped_for_every_format() {
        for format in [DrawFormat::Svg, DrawFormat::Ascii, DrawFormat::Unicode] {
            let base = DrawOptions::new().with_format(format);
            assert!(base.clone().with_time_precision(MAX_PRECISION).validate().is_ok());
            assert_eq!(
                base.clone().with_time_precision(MAX_PRECISION + 1).validate(),
                Err(DrawError::PrecisionTooLarge {
                    option: "time_precision",
                    digits: MAX_PRECISION + 1,
                    max: MAX_PRECISION,
                })
            );
            assert_eq!(
                base.with_position_precision(40).validate(),
                Err(DrawError::PrecisionTooLarge {
                    option: "position_precision",
                    digits: 40,
                    max: MAX_PRECISION,
                })
            );
        }
    }

    #[test]
    fn rank_with_numeric_bound_is_a_layout_error() {
        let err = DrawOptions::new()
            .with_height_scale(HeightScale::Rank)
            .with_max_height(HeightBound::Value(10.0))
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            DrawError::Layout(LayoutError::NumericBoundWithRank { bound: 10.0 })
        );
    }

    #[test]
    fn defaults() {
        let options = DrawOptions::default();
        assert_eq!(options.format, DrawFormat::Svg);
        assert_eq!(options.time_precision, 2);
        assert_eq!(options.position_precision, 2);
        assert!(options.max_height.is_none());
        assert_eq!(options.node_labels_or_ids().label(&NodeId(7)).as_deref(), Some("7"));
    }
}
