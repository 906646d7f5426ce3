//! Plot options, constructible in code or loaded from YAML/JSON.
//!
//! ```yaml
//! log_density: true
//! density: empirical
//! n_bins: 100
//! stats:
//!   prefix: "test "
//!   loc: upper left
//! colorbar:
//!   title: Custom Title
//!   thickness: 30
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::density::DensityMethod;
use crate::error::{Error, Result};
use crate::scale::Palette;
use crate::stats::StatsParam;
use crate::style::Style;

/// Default bin budget before points are aggregated.
pub const DEFAULT_N_BINS: usize = 200;

/// Default colorbar title and hover label for densities.
pub const DEFAULT_BIN_COUNTS_COL: &str = "Point Density";

/// Default hexagons across the x axis.
pub const DEFAULT_GRIDSIZE: usize = 75;

/// Colorbar overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorbarOptions {
    /// Title; defaults to the counts label.
    #[serde(default)]
    pub title: Option<String>,
    /// Bar thickness in pixels.
    #[serde(default)]
    pub thickness: Option<f32>,
    /// Bar length as a fraction of the plot height.
    #[serde(default)]
    pub len: Option<f32>,
    /// Horizontal position in paper coordinates.
    #[serde(default)]
    pub x: Option<f32>,
    /// Vertical position in paper coordinates.
    #[serde(default)]
    pub y: Option<f32>,
}

/// Options shared by density scatter entry points.
#[derive(Debug, Clone, Deserialize)]
pub struct DensityScatterOptions {
    /// Color points by `ln(density)`.
    #[serde(default = "default_true")]
    pub log_density: bool,

    /// Regression statistics annotation.
    #[serde(default)]
    pub stats: StatsParam,

    /// Density estimator.
    #[serde(default)]
    pub density: DensityMethod,

    /// Bins per axis for the empirical estimator.
    #[serde(default)]
    pub empirical_bins: Option<usize>,

    /// Draw densest points last.
    #[serde(default = "default_true")]
    pub sort_by_density: bool,

    /// Aggregate into at most this many bins when there are more points.
    /// Only the interactive figure bins; static axes draw every point.
    #[serde(default = "default_n_bins")]
    pub n_bins: Option<usize>,

    /// Categorical column to split into facets.
    #[serde(default)]
    pub facet_col: Option<String>,

    /// Facet order; unlisted categories follow in first-appearance order.
    #[serde(default)]
    pub category_order: Option<Vec<String>>,

    /// Draw the y = x reference line.
    #[serde(default = "default_true")]
    pub identity_line: bool,

    /// Best-fit line: `None` draws it when R² > 0.3, `Some` forces it on or off.
    #[serde(default)]
    pub best_fit_line: Option<bool>,

    /// Colorbar overrides.
    #[serde(default, alias = "colorbar_kwargs")]
    pub colorbar: ColorbarOptions,

    /// Column holding per-point marker sizes.
    #[serde(default, alias = "size")]
    pub size_col: Option<String>,

    /// Label for the density field in colorbar and hover text.
    #[serde(default = "default_bin_counts_col")]
    pub bin_counts_col: String,

    /// Continuous color palette.
    #[serde(default, alias = "color_continuous_scale", alias = "cmap")]
    pub color_scale: Palette,

    /// Named colors and sizes.
    #[serde(default)]
    pub style: Style,
}

fn default_true() -> bool {
    true
}
fn default_n_bins() -> Option<usize> {
    Some(DEFAULT_N_BINS)
}
fn default_bin_counts_col() -> String {
    DEFAULT_BIN_COUNTS_COL.to_string()
}

impl Default for DensityScatterOptions {
    fn default() -> Self {
        Self {
            log_density: true,
            stats: StatsParam::default(),
            density: DensityMethod::default(),
            empirical_bins: None,
            sort_by_density: true,
            n_bins: default_n_bins(),
            facet_col: None,
            category_order: None,
            identity_line: true,
            best_fit_line: None,
            colorbar: ColorbarOptions::default(),
            size_col: None,
            bin_counts_col: default_bin_counts_col(),
            color_scale: Palette::default(),
            style: Style::default(),
        }
    }
}

impl DensityScatterOptions {
    /// Options with every default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from YAML and validate them.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let opts: Self = serde_yaml_ng::from_str(yaml)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from JSON and validate them.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing or validation fails.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let opts: Self = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    /// Load options from a `.json`, `.yaml` or `.yml` file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Check value ranges and color names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] or [`Error::UnknownColor`].
    pub fn validate(&self) -> Result<()> {
        if self.n_bins == Some(0) {
            return Err(Error::invalid_option("n_bins", "must be positive"));
        }
        if self.empirical_bins == Some(0) {
            return Err(Error::invalid_option("empirical_bins", "must be positive"));
        }
        if let Some(t) = self.colorbar.thickness {
            if t <= 0.0 {
                return Err(Error::invalid_option("colorbar.thickness", "must be positive"));
            }
        }
        if let Some(len) = self.colorbar.len {
            if len <= 0.0 {
                return Err(Error::invalid_option("colorbar.len", "must be positive"));
            }
        }
        self.style.validate()
    }

    /// The density method with `empirical_bins` applied.
    #[must_use]
    pub fn density_method(&self) -> DensityMethod {
        match self.empirical_bins {
            Some(bins) => self.density.with_bins(bins),
            None => self.density,
        }
    }

    /// Colorbar title: the override or the counts label.
    #[must_use]
    pub fn colorbar_title(&self) -> &str {
        self.colorbar.title.as_deref().unwrap_or(&self.bin_counts_col)
    }

    /// Toggle log coloring.
    #[must_use]
    pub fn log_density(mut self, enabled: bool) -> Self {
        self.log_density = enabled;
        self
    }

    /// Set the stats annotation.
    #[must_use]
    pub fn stats(mut self, stats: impl Into<StatsParam>) -> Self {
        self.stats = stats.into();
        self
    }

    /// Set the density estimator.
    #[must_use]
    pub fn density(mut self, method: DensityMethod) -> Self {
        self.density = method;
        self
    }

    /// Set the bin budget; `None` disables aggregation.
    #[must_use]
    pub fn n_bins(mut self, n_bins: Option<usize>) -> Self {
        self.n_bins = n_bins;
        self
    }

    /// Facet by a categorical column.
    #[must_use]
    pub fn facet_col(mut self, column: &str) -> Self {
        self.facet_col = Some(column.to_string());
        self
    }

    /// Fix the facet order.
    #[must_use]
    pub fn category_order(mut self, order: &[&str]) -> Self {
        self.category_order = Some(order.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Toggle the identity line.
    #[must_use]
    pub fn identity_line(mut self, enabled: bool) -> Self {
        self.identity_line = enabled;
        self
    }

    /// Force the best-fit line on or off.
    #[must_use]
    pub fn best_fit_line(mut self, enabled: bool) -> Self {
        self.best_fit_line = Some(enabled);
        self
    }

    /// Set colorbar overrides.
    #[must_use]
    pub fn colorbar(mut self, colorbar: ColorbarOptions) -> Self {
        self.colorbar = colorbar;
        self
    }

    /// Size markers by a column.
    #[must_use]
    pub fn size_col(mut self, column: &str) -> Self {
        self.size_col = Some(column.to_string());
        self
    }

    /// Set the counts label.
    #[must_use]
    pub fn bin_counts_col(mut self, label: &str) -> Self {
        self.bin_counts_col = label.to_string();
        self
    }

    /// Set the color palette.
    #[must_use]
    pub fn color_scale(mut self, palette: Palette) -> Self {
        self.color_scale = palette;
        self
    }

    /// Replace the style.
    #[must_use]
    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

/// Hexbin-specific options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HexbinOptions {
    /// Hexagons across the x axis.
    #[serde(default = "default_gridsize")]
    pub gridsize: usize,
    /// Colorbar label; defaults to `"Density"`.
    #[serde(default)]
    pub cbar_label: Option<String>,
    /// Colorbar rectangle `[x, y, width, height]` in axes fractions.
    #[serde(default = "default_cbar_coords")]
    pub cbar_coords: [f32; 4],
}

fn default_gridsize() -> usize {
    DEFAULT_GRIDSIZE
}
fn default_cbar_coords() -> [f32; 4] {
    [0.95, 0.03, 0.03, 0.7]
}

impl Default for HexbinOptions {
    fn default() -> Self {
        Self { gridsize: default_gridsize(), cbar_label: None, cbar_coords: default_cbar_coords() }
    }
}

impl HexbinOptions {
    /// Check the grid size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for a zero grid size.
    pub fn validate(&self) -> Result<()> {
        if self.gridsize == 0 {
            return Err(Error::invalid_option("gridsize", "must be positive"));
        }
        Ok(())
    }

    /// Colorbar label.
    #[must_use]
    pub fn cbar_label(&self) -> &str {
        self.cbar_label.as_deref().unwrap_or("Density")
    }
}
