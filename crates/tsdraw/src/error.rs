#![forbid(unsafe_code)]

//! Errors raised before any drawing starts.

use core::fmt;

use tsdraw_layout::LayoutError;
use tsdraw_render::Orientation;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// A string option named a value outside its allowed set.
    UnknownValue {
        option: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
    /// The option only applies to vector drawings.
    TextModeUnsupported { option: &'static str },
    /// Vector drawings always put the roots at the top.
    UnsupportedOrientation { orientation: Orientation },
    /// A drawing size with a zero, negative or non-finite side.
    DegenerateSize { width: f64, height: f64 },
    /// More decimal places than an `f64` can carry.
    PrecisionTooLarge {
        option: &'static str,
        digits: usize,
        max: usize,
    },
    Layout(LayoutError),
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownValue {
                option,
                value,
                allowed,
            } => write!(
                f,
                "unknown {option} {value:?} (expected one of: {})",
                allowed.join(", ")
            ),
            Self::TextModeUnsupported { option } => {
                write!(f, "text drawings do not support {option}")
            }
            Self::UnsupportedOrientation { orientation } => {
                write!(f, "vector drawings do not support orientation {orientation}")
            }
            Self::DegenerateSize { width, height } => {
                write!(f, "drawing size {width}x{height} has no area")
            }
            Self::PrecisionTooLarge {
                option,
                digits,
                max,
            } => write!(f, "{option} of {digits} digits exceeds {max}"),
            Self::Layout(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Layout(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LayoutError> for DrawError {
    fn from(err: LayoutError) -> Self {
        Self::Layout(err)
    }
}
