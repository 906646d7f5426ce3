//! 2D bin aggregation for large scatter plots.
//!
//! The bounding box is split into a uniform `g x g` grid with
//! `g = floor(sqrt(n_bins))`, so at most `n_bins` cells can be occupied. Each
//! occupied cell becomes one output point at the centroid of its members.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::points::PointSeries;

/// One occupied grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    /// Centroid x.
    pub x: f32,
    /// Centroid y.
    pub y: f32,
    /// Number of original points in the cell.
    pub count: usize,
    /// Mean of the size column within the cell, if sizes were given.
    pub mean_size: Option<f32>,
}

/// Result of [`bin_points`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedAggregate {
    bins: Vec<Bin>,
    source_len: usize,
}

impl BinnedAggregate {
    /// Occupied bins in grid order (x-major).
    #[must_use]
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Number of occupied bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True when no bins exist.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of points that were binned.
    #[must_use]
    pub fn source_len(&self) -> usize {
        self.source_len
    }

    /// Sum of all bin counts; equals [`BinnedAggregate::source_len`].
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Bin counts as floats, usable as density weights.
    #[must_use]
    pub fn counts(&self) -> Vec<f32> {
        self.bins.iter().map(|b| b.count as f32).collect()
    }

    /// The bin centroids as a point series, carrying mean sizes when present.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::TooFewPoints`] when only one bin is occupied.
    pub fn to_points(&self) -> Result<PointSeries> {
        let x: Vec<f32> = self.bins.iter().map(|b| b.x).collect();
        let y: Vec<f32> = self.bins.iter().map(|b| b.y).collect();
        let sizes: Option<Vec<f32>> =
            self.bins.iter().map(|b| b.mean_size).collect::<Option<Vec<f32>>>();
        PointSeries::with_sizes(&x, &y, sizes.as_deref())
    }
}

#[derive(Default)]
struct Accumulator {
    sum_x: f64,
    sum_y: f64,
    sum_size: f64,
    count: usize,
}

/// Grid cells per axis for a requested bin budget.
#[must_use]
pub fn grid_side(n_bins: usize) -> usize {
    ((n_bins as f64).sqrt().floor() as usize).max(1)
}

/// Aggregate points into at most `n_bins` occupied cells.
///
/// Sizes, when present on `points`, are averaged per cell.
///
/// # Errors
///
/// Returns an error if `n_bins` is zero.
pub fn bin_points(points: &PointSeries, n_bins: usize) -> Result<BinnedAggregate> {
    if n_bins == 0 {
        return Err(Error::invalid_option("n_bins", "must be positive"));
    }

    let side = grid_side(n_bins);
    let bounds = points.bounds();
    let cell = |v: f32, lo: f32, width: f32| -> usize {
        if width > 0.0 {
            (((v - lo) / width * side as f32).floor() as usize).min(side - 1)
        } else {
            0
        }
    };

    let mut cells: BTreeMap<(usize, usize), Accumulator> = BTreeMap::new();
    let sizes = points.sizes();
    for (i, (&x, &y)) in points.x().iter().zip(points.y()).enumerate() {
        let key = (cell(x, bounds.x_min, bounds.width()), cell(y, bounds.y_min, bounds.height()));
        let acc = cells.entry(key).or_default();
        acc.sum_x += f64::from(x);
        acc.sum_y += f64::from(y);
        acc.sum_size += sizes.map_or(0.0, |s| f64::from(s[i]));
        acc.count += 1;
    }

    let bins: Vec<Bin> = cells
        .into_values()
        .map(|acc| {
            let n = acc.count as f64;
            Bin {
                x: (acc.sum_x / n) as f32,
                y: (acc.sum_y / n) as f32,
                count: acc.count,
                mean_size: sizes.map(|_| (acc.sum_size / n) as f32),
            }
        })
        .collect();

    tracing::debug!(
        points = points.len(),
        n_bins,
        grid = side,
        occupied = bins.len(),
        "binned points"
    );

    Ok(BinnedAggregate { bins, source_len: points.len() })
}
