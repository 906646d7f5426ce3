//! Reference lines overlaid on scatter plots.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::{Bounds, Line, Point};
use crate::stats::r2_score;

/// Best-fit lines with an R² at or below this value are not drawn.
pub const BEST_FIT_MIN_R2: f32 = 0.3;

/// Which style a line is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// The y = x reference.
    Identity,
    /// The least-squares fit.
    BestFit,
}

/// An overlay line in data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuxiliaryLine {
    /// `y = x` over the combined data range.
    Identity {
        /// Lower end.
        start: Point,
        /// Upper end.
        end: Point,
    },
    /// Ordinary least-squares fit of y on x over the x range.
    BestFit {
        /// Fitted slope.
        slope: f32,
        /// Fitted intercept.
        intercept: f32,
        /// R² of y taken as predictions of x; drives visibility.
        r2: f32,
        /// Point at the smallest x.
        start: Point,
        /// Point at the largest x.
        end: Point,
    },
}

impl AuxiliaryLine {
    /// Style tag for the renderer.
    #[must_use]
    pub fn kind(&self) -> LineKind {
        match self {
            AuxiliaryLine::Identity { .. } => LineKind::Identity,
            AuxiliaryLine::BestFit { .. } => LineKind::BestFit,
        }
    }

    /// The drawable segment.
    #[must_use]
    pub fn segment(&self) -> Line {
        match *self {
            AuxiliaryLine::Identity { start, end } | AuxiliaryLine::BestFit { start, end, .. } => {
                Line::new(start, end)
            }
        }
    }

    /// Whether a renderer should show this line.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        match self {
            AuxiliaryLine::Identity { .. } => true,
            AuxiliaryLine::BestFit { r2, .. } => *r2 > BEST_FIT_MIN_R2,
        }
    }

    /// Legend-style description, e.g. `LS fit: y = 0.98x + 0.1`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            AuxiliaryLine::Identity { .. } => "y = x".to_string(),
            AuxiliaryLine::BestFit { slope, intercept, .. } => {
                let sign = if *intercept < 0.0 { '-' } else { '+' };
                format!("LS fit: y = {slope:.2}x {sign} {:.2}", intercept.abs())
            }
        }
    }
}

/// The identity line spanning the combined min/max of `x` and `y`.
///
/// # Errors
///
/// Returns [`Error::TooFewPoints`] for empty input.
pub fn identity_line(x: &[f32], y: &[f32]) -> Result<AuxiliaryLine> {
    let bounds = Bounds::from_xy(x, y).ok_or(Error::TooFewPoints { found: 0 })?;
    let (lo, hi) = bounds.combined();
    Ok(AuxiliaryLine::Identity { start: Point::new(lo, lo), end: Point::new(hi, hi) })
}

/// Least-squares line of `y` on `x`.
///
/// The carried R² scores `y` as predictions of `x`, so a fit through
/// unrelated quantities stays hidden even when the trend itself is strong.
///
/// # Errors
///
/// Returns [`Error::DegenerateFit`] when x has zero variance, and the usual
/// input errors for mismatched or too-short data.
pub fn best_fit_line(x: &[f32], y: &[f32]) -> Result<AuxiliaryLine> {
    if x.len() != y.len() {
        return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
    }
    if x.len() < 2 {
        return Err(Error::TooFewPoints { found: x.len() });
    }

    let n = x.len() as f64;
    let mx = x.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let my = y.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = f64::from(xi) - mx;
        sxx += dx * dx;
        sxy += dx * (f64::from(yi) - my);
    }
    if sxx <= f64::EPSILON * n {
        return Err(Error::DegenerateFit);
    }

    let slope = sxy / sxx;
    let intercept = my - slope * mx;
    let r2 = r2_score(x, y);
    let x_lo = x.iter().copied().fold(f32::INFINITY, f32::min);
    let x_hi = x.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let at = |xv: f32| (slope * f64::from(xv) + intercept) as f32;

    Ok(AuxiliaryLine::BestFit {
        slope: slope as f32,
        intercept: intercept as f32,
        r2,
        start: Point::new(x_lo, at(x_lo)),
        end: Point::new(x_hi, at(x_hi)),
    })
}
