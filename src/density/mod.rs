//! Per-point density estimation for density-colored scatter plots.
//!
//! Two estimators are available:
//!
//! - **KDE**: a bivariate Gaussian kernel density estimate evaluated at every point.
//! - **Empirical**: each point receives the count of its 2D histogram cell.
//!
//! With `log_density` enabled, points are colored by `ln(density)` while the
//! colorbar keeps readable raw values as its tick labels.

mod empirical;
mod kde;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use empirical::DEFAULT_EMPIRICAL_BINS;

use crate::error::{Error, Result};
use crate::points::PointSeries;

/// Density estimation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DensityMethod {
    /// Gaussian kernel density estimate.
    #[default]
    Kde,
    /// 2D histogram cell counts with the given number of bins per axis.
    Empirical {
        /// Bins per axis.
        bins: usize,
    },
}

impl DensityMethod {
    /// Empirical counts with the default bin count.
    #[must_use]
    pub const fn empirical() -> Self {
        DensityMethod::Empirical { bins: DEFAULT_EMPIRICAL_BINS }
    }

    /// Replace the bin count of an empirical method. KDE is unchanged.
    #[must_use]
    pub fn with_bins(self, bins: usize) -> Self {
        match self {
            DensityMethod::Kde => DensityMethod::Kde,
            DensityMethod::Empirical { .. } => DensityMethod::Empirical { bins: bins.max(1) },
        }
    }
}

impl fmt::Display for DensityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityMethod::Kde => f.write_str("kde"),
            DensityMethod::Empirical { .. } => f.write_str("empirical"),
        }
    }
}

impl FromStr for DensityMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kde" => Ok(DensityMethod::Kde),
            "empirical" => Ok(DensityMethod::empirical()),
            _ => Err(Error::UnknownDensityMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for DensityMethod {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DensityMethod> for String {
    fn from(m: DensityMethod) -> Self {
        m.to_string()
    }
}

/// Colorbar tick positions and labels.
///
/// Both are `None` when the colorbar shows raw values directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorbarTicks {
    /// Tick positions in color-value space.
    pub values: Option<Vec<f32>>,
    /// Tick labels showing the raw density.
    pub labels: Option<Vec<String>>,
}

/// One density value per point (or per bin).
#[derive(Debug, Clone, PartialEq)]
pub struct DensityEstimate {
    values: Vec<f64>,
    log_density: bool,
}

impl DensityEstimate {
    /// Wrap precomputed densities such as hexbin counts.
    pub(crate) fn from_values(values: Vec<f64>, log_density: bool) -> Self {
        Self { values, log_density }
    }

    /// Raw, non-negative densities.
    ///
    /// Kept in `f64`: KDE densities of large-magnitude data fall far below the
    /// smallest positive `f32`.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of estimates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no estimates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether colors use the log transform.
    #[must_use]
    pub fn is_log(&self) -> bool {
        self.log_density
    }

    /// Values used for point coloring: `ln(density)` in log mode, raw otherwise.
    #[must_use]
    pub fn color_values(&self) -> Vec<f64> {
        if self.log_density {
            self.values.iter().map(|&v| v.max(f64::MIN_POSITIVE).ln()).collect()
        } else {
            self.values.clone()
        }
    }

    /// `(min, max)` of the raw densities.
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.values.iter().copied().fold(f64::INFINITY, f64::min);
        let hi = self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (lo, hi)
    }

    /// Point indices ordered from sparsest to densest, so dense points draw last.
    #[must_use]
    pub fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.values.len()).collect();
        order.sort_by(|&a, &b| self.values[a].total_cmp(&self.values[b]));
        order
    }

    /// Colorbar ticks. In log mode, ticks sit at `ln(v)` and are labelled `v`.
    #[must_use]
    pub fn colorbar_ticks(&self) -> ColorbarTicks {
        if !self.log_density || self.values.is_empty() {
            return ColorbarTicks::default();
        }
        let (lo, hi) = self.extent();
        let raw = nice_ticks(lo, hi);
        ColorbarTicks {
            values: Some(raw.iter().map(|&v| v.max(f64::MIN_POSITIVE).ln() as f32).collect()),
            labels: Some(raw.iter().map(|&v| format_tick(v)).collect()),
        }
    }
}

/// Estimate the density of every usable point in `(x, y)`.
///
/// # Errors
///
/// Returns [`Error::TooFewPoints`] ("input should have multiple elements") when
/// fewer than two finite pairs exist, or a length mismatch error.
pub fn estimate_density(
    x: &[f32],
    y: &[f32],
    method: DensityMethod,
    log_density: bool,
) -> Result<DensityEstimate> {
    let points = PointSeries::new(x, y)?;
    Ok(estimate_point_density(&points, None, method, log_density))
}

/// Estimate densities for a validated point set.
///
/// `weights` (e.g. bin occupancy counts) scale each point's contribution.
#[must_use]
pub fn estimate_point_density(
    points: &PointSeries,
    weights: Option<&[f32]>,
    method: DensityMethod,
    log_density: bool,
) -> DensityEstimate {
    let (x, y) = (points.x(), points.y());
    let values = match method {
        DensityMethod::Kde => {
            let kde = kde::GaussianKde::fit(x, y, weights);
            x.iter().zip(y).map(|(&px, &py)| kde.evaluate(px, py)).collect()
        }
        DensityMethod::Empirical { bins } => empirical::cell_counts(x, y, weights, bins)
            .into_iter()
            .map(f64::from)
            .collect(),
    };
    tracing::debug!(points = points.len(), %method, log_density, "estimated point density");
    DensityEstimate { values, log_density }
}

/// 1-2-5 ticks covering `[lo, hi]`; falls back to the endpoints.
fn nice_ticks(lo: f64, hi: f64) -> Vec<f64> {
    let lo = lo.max(f64::MIN_POSITIVE);
    let hi = hi.max(lo);
    let tolerance = 1e-4;

    let first = lo.log10().floor() as i32;
    let last = hi.log10().ceil() as i32;
    let mut ticks = Vec::new();
    for decade in first..=last {
        let base = 10f64.powi(decade);
        for m in [1.0, 2.0, 5.0] {
            let v = m * base;
            if v >= lo * (1.0 - tolerance) && v <= hi * (1.0 + tolerance) {
                ticks.push(v);
            }
        }
    }

    if ticks.len() < 2 {
        ticks = if (hi - lo).abs() <= f64::EPSILON * hi.abs().max(1.0) {
            vec![lo]
        } else {
            vec![lo, hi]
        };
    }
    ticks
}

/// Format a raw density for a colorbar label.
fn format_tick(v: f64) -> String {
    if v >= 1.0 && v.fract().abs() < 1e-6 {
        group_thousands(v.round() as u64)
    } else if v >= 0.01 {
        let s = format!("{v:.3}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        format!("{v:.1e}")
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> (Vec<f32>, Vec<f32>) {
        let x: Vec<f32> = (0..50).map(|i| (i as f32 * 0.37).sin() * 3.0 + i as f32 * 0.1).collect();
        let y: Vec<f32> = x.iter().enumerate().map(|(i, v)| v + (i as f32 * 1.3).cos()).collect();
        (x, y)
    }

    #[test]
    fn test_kde_one_value_per_point() {
        let (x, y) = sample();
        let est = estimate_density(&x, &y, DensityMethod::Kde, false).unwrap();
        assert_eq!(est.len(), x.len());
        assert!(est.values().iter().all(|&v| v >= 0.0 && v.is_finite()));
    }

    #[test]
    fn test_empirical_counts_are_positive_integers() {
        let (x, y) = sample();
        let est = estimate_density(&x, &y, DensityMethod::Empirical { bins: 5 }, false).unwrap();
        assert_eq!(est.len(), x.len());
        assert!(est.values().iter().all(|&v| v >= 1.0 && v.fract() == 0.0));
    }

    #[test]
    fn test_kde_large_magnitude_keeps_contrast() {
        let x = [1e30, 2e30, 3e30, 4e30];
        let y = [1e30, 2.5e30, 2.9e30, 4.2e30];
        let est = estimate_density(&x, &y, DensityMethod::Kde, true).unwrap();
        assert!(est.values().iter().all(|&v| v > 0.0 && v.is_finite()));

        let colors = est.color_values();
        let (lo, hi) = est.extent();
        assert!(hi > lo);
        assert!(colors.iter().all(|c| c.is_finite()));
        assert!(colors.iter().any(|&c| c < f64::from(f32::MIN_POSITIVE.ln())));

        let ticks = est.colorbar_ticks();
        let values = ticks.values.unwrap();
        let labels = ticks.labels.unwrap();
        assert_eq!(values.len(), labels.len());
        for v in values {
            let v = f64::from(v);
            assert!(v >= lo.ln() - 1e-3 && v <= hi.ln() + 1e-3);
        }
        assert!(!labels.contains(&"1.2e-38".to_string()));
    }

    #[test]
    fn test_empty_input_fails() {
        let err = estimate_density(&[], &[], DensityMethod::Kde, true).unwrap_err();
        assert_eq!(err.to_string(), "input should have multiple elements");
    }

    #[test]
    fn test_log_color_values() {
        let est = DensityEstimate { values: vec![1.0, std::f64::consts::E], log_density: true };
        let colors = est.color_values();
        assert!(colors[0].abs() < 1e-6);
        assert!((colors[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_log_ticks_present() {
        let est = DensityEstimate { values: vec![1.0, 3.0, 40.0, 250.0], log_density: true };
        let ticks = est.colorbar_ticks();
        let values = ticks.values.unwrap();
        let labels = ticks.labels.unwrap();
        assert_eq!(values.len(), labels.len());
        assert!(!values.is_empty());
        assert_eq!(labels.first().map(String::as_str), Some("1"));
        assert!(labels.contains(&"200".to_string()));
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_linear_ticks_absent() {
        let est = DensityEstimate { values: vec![1.0, 3.0], log_density: false };
        assert_eq!(est.colorbar_ticks(), ColorbarTicks::default());
    }

    #[test]
    fn test_ticks_small_kde_range() {
        let ticks = nice_ticks(0.0031, 0.0042);
        assert_eq!(ticks.len(), 2);
        assert!((ticks[0] - 0.0031).abs() < 1e-7);
    }

    #[test]
    fn test_ticks_constant_density() {
        assert_eq!(nice_ticks(3.0, 3.0), vec![3.0]);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1000.0), "1,000");
        assert_eq!(format_tick(20.0), "20");
        assert_eq!(format_tick(0.25), "0.25");
        assert_eq!(format_tick(0.002), "2.0e-3");
    }

    #[test]
    fn test_draw_order_sorted() {
        let est = DensityEstimate { values: vec![3.0, 1.0, 2.0], log_density: false };
        assert_eq!(est.draw_order(), vec![1, 2, 0]);
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("KDE".parse::<DensityMethod>().unwrap(), DensityMethod::Kde);
        assert_eq!(
            "empirical".parse::<DensityMethod>().unwrap(),
            DensityMethod::Empirical { bins: DEFAULT_EMPIRICAL_BINS }
        );
        assert!(matches!(
            "histogram".parse::<DensityMethod>(),
            Err(Error::UnknownDensityMethod(_))
        ));
        assert_eq!(DensityMethod::empirical().with_bins(20), DensityMethod::Empirical { bins: 20 });
        assert_eq!(DensityMethod::Kde.with_bins(20), DensityMethod::Kde);
    }

    proptest! {
        #[test]
        fn prop_density_non_negative(
            pairs in prop::collection::vec((-1e3f32..1e3, -1e3f32..1e3), 2..60),
            shape in 0u8..3,
            empirical in any::<bool>(),
            log in any::<bool>(),
        ) {
            // 0: scattered, 1: constant x, 2: collinear
            let x: Vec<f32> = match shape {
                1 => vec![pairs[0].0; pairs.len()],
                _ => pairs.iter().map(|p| p.0).collect(),
            };
            let y: Vec<f32> = match shape {
                2 => x.iter().map(|v| 2.0 * v - 1.0).collect(),
                _ => pairs.iter().map(|p| p.1).collect(),
            };
            let method =
                if empirical { DensityMethod::Empirical { bins: 10 } } else { DensityMethod::Kde };
            let est = estimate_density(&x, &y, method, log).unwrap();
            prop_assert_eq!(est.len(), x.len());
            prop_assert!(est.values().iter().all(|&v| v.is_finite() && v >= 0.0));
            prop_assert!(est.color_values().iter().all(|v| v.is_finite()));
        }
    }
}
