#![forbid(unsafe_code)]

//! Environment configuration for drawing defaults.
//!
//! Recognised variables:
//!
//! - `TSDRAW_FORMAT` = svg|ascii|unicode
//! - `TSDRAW_ORIENTATION` = top|left|right
//! - `TSDRAW_HEIGHT_SCALE` = time|rank
//! - `TSDRAW_MAX_HEIGHT` = tree|ts|<number>
//! - `TSDRAW_GLYPH_MODE` = unicode|ascii (replaces the glyphs of a text format)
//! - `TSDRAW_TIME_PRECISION` (digits)
//! - `TSDRAW_POSITION_PRECISION` (digits)
//! - `TSDRAW_TREE_WIDTHS` = uniform|leaves

use core::fmt;
use std::env;

use tsdraw_core::glyph_policy::{ENV_GLYPH_MODE, GlyphMode};
use tsdraw_layout::{HeightBound, HeightScale};
use tsdraw_render::Orientation;
use tsdraw_scene::TreeWidths;

use crate::options::{DrawFormat, DrawOptions};

pub const ENV_FORMAT: &str = "TSDRAW_FORMAT";
pub const ENV_ORIENTATION: &str = "TSDRAW_ORIENTATION";
pub const ENV_HEIGHT_SCALE: &str = "TSDRAW_HEIGHT_SCALE";
pub const ENV_MAX_HEIGHT: &str = "TSDRAW_MAX_HEIGHT";
pub const ENV_TIME_PRECISION: &str = "TSDRAW_TIME_PRECISION";
pub const ENV_POSITION_PRECISION: &str = "TSDRAW_POSITION_PRECISION";
pub const ENV_TREE_WIDTHS: &str = "TSDRAW_TREE_WIDTHS";

/// Largest accepted number of decimal places.
pub const MAX_PRECISION: usize = 17;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawConfig {
    pub format: DrawFormat,
    pub orientation: Orientation,
    pub height_scale: HeightScale,
    pub max_height: Option<HeightBound>,
    pub glyph_mode: Option<GlyphMode>,
    pub time_precision: usize,
    pub position_precision: usize,
    pub tree_widths: TreeWidths,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            format: DrawFormat::Svg,
            orientation: Orientation::Top,
            height_scale: HeightScale::Time,
            max_height: None,
            glyph_mode: None,
            time_precision: 2,
            position_precision: 2,
            tree_widths: TreeWidths::Uniform,
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct DrawConfigParse {
    pub config: DrawConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl DrawConfig {
    /// Parse config from environment variables, dropping invalid values.
    #[must_use]
    pub fn from_env() -> DrawConfig {
        Self::from_env_with_diagnostics().config
    }

    #[must_use]
    pub fn from_env_with_diagnostics() -> DrawConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse through an arbitrary lookup. Invalid values keep the default
    /// and are reported in `errors`.
    pub fn from_env_with<F>(mut get: F) -> DrawConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = DrawConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_FORMAT) {
            match DrawFormat::parse(&value) {
                Some(parsed) => config.format = parsed,
                None => errors.push(ConfigError::new(
                    "format",
                    value,
                    "expected svg|ascii|unicode",
                )),
            }
        }

        if let Some(value) = get(ENV_ORIENTATION) {
            match Orientation::parse(&value) {
                Some(parsed) => config.orientation = parsed,
                None => errors.push(ConfigError::new(
                    "orientation",
                    value,
                    "expected top|left|right",
                )),
            }
        }

        if let Some(value) = get(ENV_HEIGHT_SCALE) {
            match HeightScale::parse(&value) {
                Some(parsed) => config.height_scale = parsed,
                None => errors.push(ConfigError::new(
                    "height_scale",
                    value,
                    "expected time|rank",
                )),
            }
        }

        if let Some(value) = get(ENV_MAX_HEIGHT) {
            match HeightBound::parse(&value) {
                Some(parsed) => config.max_height = Some(parsed),
                None => errors.push(ConfigError::new(
                    "max_height",
                    value,
                    "expected tree|ts|<number>",
                )),
            }
        }

        if let Some(value) = get(ENV_GLYPH_MODE) {
            match GlyphMode::parse(&value) {
                Some(parsed) => config.glyph_mode = Some(parsed),
                None => errors.push(ConfigError::new(
                    "glyph_mode",
                    value,
                    "expected unicode|ascii",
                )),
            }
        }

        if let Some(value) = get(ENV_TIME_PRECISION) {
            match parse_usize(&value) {
                Some(parsed) => config.time_precision = parsed,
                None => errors.push(ConfigError::new(
                    "time_precision",
                    value,
                    "expected non-negative integer",
                )),
            }
        }

        if let Some(value) = get(ENV_POSITION_PRECISION) {
            match parse_usize(&value) {
                Some(parsed) => config.position_precision = parsed,
                None => errors.push(ConfigError::new(
                    "position_precision",
                    value,
                    "expected non-negative integer",
                )),
            }
        }

        if let Some(value) = get(ENV_TREE_WIDTHS) {
            match TreeWidths::parse(&value) {
                Some(parsed) => config.tree_widths = parsed,
                None => errors.push(ConfigError::new(
                    "tree_widths",
                    value,
                    "expected uniform|leaves",
                )),
            }
        }

        if let Err(mut validation) = config.validate() {
            errors.append(&mut validation);
        }

        DrawConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_precision("time_precision", self.time_precision, &mut errors);
        validate_precision("position_precision", self.position_precision, &mut errors);
        let text = self.format.is_text();
        if !text && self.orientation != Orientation::Top {
            errors.push(ConfigError::new(
                "orientation",
                self.orientation.as_str(),
                "left and right need format=ascii|unicode",
            ));
        }
        if let Some(bound @ HeightBound::Value(_)) = self.max_height {
            if text {
                errors.push(ConfigError::new(
                    "max_height",
                    bound.to_string(),
                    "numeric max height needs format=svg",
                ));
            }
            if self.height_scale == HeightScale::Rank {
                errors.push(ConfigError::new(
                    "max_height",
                    bound.to_string(),
                    "numeric max height needs height_scale=time",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Output format after applying the glyph mode override.
    #[must_use]
    pub fn effective_format(&self) -> DrawFormat {
        match (self.format.is_text(), self.glyph_mode) {
            (true, Some(mode)) => DrawFormat::from(mode),
            _ => self.format,
        }
    }

    /// Seed drawing options from this config.
    #[must_use]
    pub fn to_options(&self) -> DrawOptions {
        DrawOptions {
            format: self.effective_format(),
            orientation: self.orientation,
            height_scale: self.height_scale,
            max_height: self.max_height,
            tree_widths: self.tree_widths,
            time_precision: self.time_precision,
            position_precision: self.position_precision,
            ..DrawOptions::default()
        }
    }

    /// Short human-readable summary for logs.
    #[must_use]
    pub fn summary_short(&self) -> String {
        let bound = self
            .max_height
            .map_or_else(|| "default".to_string(), |b| b.to_string());
        format!(
            "tsdraw: {} · {} · {} · max {bound}",
            self.effective_format(),
            self.orientation,
            self.height_scale
        )
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn validate_precision(field: &'static str, value: usize, errors: &mut Vec<ConfigError>) {
    if value > MAX_PRECISION {
        errors.push(ConfigError::new(
            field,
            value.to_string(),
            format!("must be <= {MAX_PRECISION}"),
        ));
    }
}
