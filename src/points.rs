//! Validated point sets.

use crate::error::{Error, Result};
use crate::geometry::Bounds;

/// Paired x/y values with optional per-point sizes.
///
/// Only finite pairs are kept, and at least two must remain.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    x: Vec<f32>,
    y: Vec<f32>,
    sizes: Option<Vec<f32>>,
}

impl PointSeries {
    /// Build from paired values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] for unequal lengths and
    /// [`Error::TooFewPoints`] when fewer than two finite pairs remain.
    pub fn new(x: &[f32], y: &[f32]) -> Result<Self> {
        Self::with_sizes(x, y, None)
    }

    /// Build from paired values plus a size column aligned with them.
    ///
    /// Rows with a non-finite x or y are dropped; a non-finite size becomes 0.
    ///
    /// # Errors
    ///
    /// Same as [`PointSeries::new`], plus a mismatch on the size column length.
    pub fn with_sizes(x: &[f32], y: &[f32], sizes: Option<&[f32]>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        if let Some(s) = sizes {
            if s.len() != x.len() {
                return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: s.len() });
            }
        }

        let keep: Vec<usize> =
            (0..x.len()).filter(|&i| x[i].is_finite() && y[i].is_finite()).collect();
        if keep.len() < 2 {
            return Err(Error::TooFewPoints { found: keep.len() });
        }

        Ok(Self {
            x: keep.iter().map(|&i| x[i]).collect(),
            y: keep.iter().map(|&i| y[i]).collect(),
            sizes: sizes.map(|s| {
                keep.iter().map(|&i| if s[i].is_finite() { s[i] } else { 0.0 }).collect()
            }),
        })
    }

    /// X values.
    #[must_use]
    pub fn x(&self) -> &[f32] {
        &self.x
    }

    /// Y values.
    #[must_use]
    pub fn y(&self) -> &[f32] {
        &self.y
    }

    /// Per-point sizes, if supplied.
    #[must_use]
    pub fn sizes(&self) -> Option<&[f32]> {
        self.sizes.as_deref()
    }

    /// Number of points (always at least two).
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Always false; kept for API symmetry with slices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Extent of the points.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        // At least two finite points exist, so the fold results are finite.
        Bounds::from_xy(&self.x, &self.y).unwrap_or(Bounds {
            x_min: 0.0,
            x_max: 0.0,
            y_min: 0.0,
            y_max: 0.0,
        })
    }
}
