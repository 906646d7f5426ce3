//! Named colors and sizes used by both backends.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::lines::LineKind;

/// Stroke pattern of an overlay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Dashed stroke.
    Dashed,
}

impl LineStyle {
    /// Matplotlib-style shorthand (`"-"`, `"--"`).
    #[must_use]
    pub fn as_symbol(self) -> &'static str {
        match self {
            LineStyle::Solid => "-",
            LineStyle::Dashed => "--",
        }
    }

    /// Plotly dash name (`"solid"`, `"dash"`).
    #[must_use]
    pub fn as_dash(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dash",
        }
    }
}

/// Color and dash of one line role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSpec {
    /// CSS color name or `#rrggbb`.
    pub color: String,
    /// Stroke pattern.
    #[serde(default)]
    pub dash: LineStyle,
}

impl LineSpec {
    fn new(color: &str, dash: LineStyle) -> Self {
        Self { color: color.to_string(), dash }
    }

    /// Resolved color.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColor`] for an unrecognized name.
    pub fn rgba(&self) -> Result<Rgba> {
        resolve(&self.color)
    }
}

/// Visual defaults for density plots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    /// Identity line on static axes.
    #[serde(default = "default_identity")]
    pub identity: LineSpec,

    /// Identity line on interactive figures.
    #[serde(default = "default_figure_identity")]
    pub figure_identity: LineSpec,

    /// Best-fit line on both backends.
    #[serde(default = "default_best_fit")]
    pub best_fit: LineSpec,

    /// Zero line of residual plots.
    #[serde(default = "default_zero_line")]
    pub zero_line: LineSpec,

    /// Annotation font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f32,

    /// Scatter marker diameter in pixels.
    #[serde(default = "default_point_size")]
    pub point_size: f32,

    /// Fill of markers that are not density colored.
    #[serde(default = "default_marker_color")]
    pub marker_color: String,

    /// Error bar color.
    #[serde(default = "default_errorbar_color")]
    pub errorbar_color: String,

    /// Marginal histogram bar color.
    #[serde(default = "default_hist_color")]
    pub hist_color: String,

    /// Plot background.
    #[serde(default = "default_background")]
    pub background: String,

    /// Axis frame and tick color.
    #[serde(default = "default_axis_color")]
    pub axis_color: String,
}

fn default_identity() -> LineSpec {
    LineSpec::new("black", LineStyle::Dashed)
}
fn default_figure_identity() -> LineSpec {
    LineSpec::new("gray", LineStyle::Dashed)
}
fn default_best_fit() -> LineSpec {
    LineSpec::new("navy", LineStyle::Solid)
}
fn default_zero_line() -> LineSpec {
    LineSpec::new("black", LineStyle::Dashed)
}
fn default_font_size() -> f32 {
    12.0
}
fn default_point_size() -> f32 {
    4.0
}
fn default_marker_color() -> String {
    "steelblue".to_string()
}
fn default_errorbar_color() -> String {
    "gray".to_string()
}
fn default_hist_color() -> String {
    "steelblue".to_string()
}
fn default_background() -> String {
    "white".to_string()
}
fn default_axis_color() -> String {
    "black".to_string()
}

impl Default for Style {
    fn default() -> Self {
        Self {
            identity: default_identity(),
            figure_identity: default_figure_identity(),
            best_fit: default_best_fit(),
            zero_line: default_zero_line(),
            font_size: default_font_size(),
            point_size: default_point_size(),
            marker_color: default_marker_color(),
            errorbar_color: default_errorbar_color(),
            hist_color: default_hist_color(),
            background: default_background(),
            axis_color: default_axis_color(),
        }
    }
}

impl Style {
    /// Line spec for a static-axes overlay.
    #[must_use]
    pub fn axes_line(&self, kind: LineKind) -> &LineSpec {
        match kind {
            LineKind::Identity => &self.identity,
            LineKind::BestFit => &self.best_fit,
        }
    }

    /// Line spec for an interactive-figure shape.
    #[must_use]
    pub fn figure_line(&self, kind: LineKind) -> &LineSpec {
        match kind {
            LineKind::Identity => &self.figure_identity,
            LineKind::BestFit => &self.best_fit,
        }
    }

    /// Check that every named color resolves.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownColor`] for the first unrecognized name.
    pub fn validate(&self) -> Result<()> {
        for name in [
            &self.identity.color,
            &self.figure_identity.color,
            &self.best_fit.color,
            &self.zero_line.color,
            &self.marker_color,
            &self.errorbar_color,
            &self.hist_color,
            &self.background,
            &self.axis_color,
        ] {
            resolve(name)?;
        }
        if !(self.font_size > 0.0 && self.point_size > 0.0) {
            return Err(Error::invalid_option("style", "sizes must be positive"));
        }
        Ok(())
    }
}

/// Resolve a CSS color name or hex string.
///
/// # Errors
///
/// Returns [`Error::UnknownColor`] for an unrecognized name.
pub fn resolve(name: &str) -> Result<Rgba> {
    Rgba::from_name(name).ok_or_else(|| Error::UnknownColor(name.to_string()))
}
