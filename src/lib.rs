//! # Density-Viz
//!
//! Density-colored scatter plots for comparing predicted against actual values.
//!
//! Points are colored by a kernel density estimate (or a 2D histogram lookup),
//! optionally aggregated into bins first, and overlaid with a `y = x` identity
//! line, a least-squares best-fit line and an MAE / RMSE / R² annotation. Two
//! backends share one analysis step:
//!
//! - **Static axes** ([`axes::Axes`]): scatter, hexbin, marginal histograms,
//!   error bars and residual plots, rendered to PNG or SVG.
//! - **Interactive figures** ([`figure::Figure`]): plotly-style JSON with one
//!   trace per facet, a shared color axis, annotations and shapes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use density_viz::prelude::*;
//!
//! let df = DataFrame::new()
//!     .with_f32("actual", &[1.0, 2.0, 3.0, 4.0])
//!     .with_f32("predicted", &[1.1, 1.8, 3.2, 3.9]);
//!
//! let ax = density_scatter(&DataSource::frame(&df, "actual", "predicted"),
//!     &DensityScatterOptions::new())?;
//! PngEncoder::write_to_file(&ax.to_framebuffer(640, 480)?, "parity.png")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel SIMD reductions in trueno

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Pixel math converts between f32 and integer coordinates throughout
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and named-color lookup.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, lines, rectangles, bounds).
pub mod geometry;

/// Scale functions and continuous color palettes.
pub mod scale;

// ============================================================================
// Data and Analysis
// ============================================================================

/// Column tables and the x/y data source.
pub mod data;

/// Validated point sets.
pub mod points;

/// Point density estimation (KDE and empirical).
pub mod density;

/// 2D bin aggregation.
pub mod binning;

/// Regression statistics and annotation options.
pub mod stats;

/// Identity and best-fit reference lines.
pub mod lines;

/// Grouping rows by a categorical column.
pub mod facet;

/// Per-facet analysis shared by both backends.
pub mod analysis;

// ============================================================================
// Configuration
// ============================================================================

/// Named colors and sizes.
pub mod style;

/// Plot options, loadable from YAML or JSON.
pub mod config;

// ============================================================================
// Backends
// ============================================================================

/// Static axes model.
pub mod axes;

/// Static plot entry points (scatter, hexbin, marginals, error bars, residuals).
pub mod plots;

/// Interactive figure model and builder.
pub mod figure;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization and SVG emission of axes.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for density-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and functions for convenient imports.
///
/// ```rust,ignore
/// use density_viz::prelude::*;
/// ```
pub mod prelude {
    pub use crate::axes::{Axes, JointAxes};
    pub use crate::color::Rgba;
    pub use crate::config::{ColorbarOptions, DensityScatterOptions, HexbinOptions};
    pub use crate::data::{DataFrame, DataSource, Series};
    pub use crate::density::{estimate_density, DensityMethod};
    pub use crate::error::{Error, Result};
    pub use crate::figure::{density_scatter_figure, Figure};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::output::{PngEncoder, SvgEncoder};
    pub use crate::plots::{
        density_hexbin, density_hexbin_with_hist, density_scatter, density_scatter_with_hist,
        residual_vs_actual, scatter_with_err_bar, BinStrategy,
    };
    pub use crate::scale::Palette;
    pub use crate::stats::{
        compute_regression_stats, validate_stats_param, RegressionStats, StatsParam,
    };
    pub use crate::style::Style;
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
