//! Per-facet density scatter computation.
//!
//! Both backends share this step: read x/y (and optional sizes) from the
//! source, split by facet, aggregate large facets into bins, estimate
//! densities, compute regression statistics and derive the overlay lines.
//! Everything is validated here, before any axes or figure is assembled.

use crate::binning::{bin_points, BinnedAggregate};
use crate::config::DensityScatterOptions;
use crate::data::DataSource;
use crate::density::{estimate_point_density, DensityEstimate};
use crate::error::{Error, Result};
use crate::facet::group_by_category;
use crate::geometry::Bounds;
use crate::lines::{best_fit_line, identity_line, AuxiliaryLine};
use crate::points::PointSeries;
use crate::stats::{compute_regression_stats, RegressionStats};

/// Everything a renderer needs for one facet.
#[derive(Debug, Clone)]
pub struct FacetAnalysis {
    /// Facet category, `None` without faceting.
    pub label: Option<String>,
    /// Points to draw: bin centroids when binned, else the input points.
    pub points: PointSeries,
    /// The aggregation, when binning happened.
    pub binned: Option<BinnedAggregate>,
    /// One density per drawn point.
    pub density: DensityEstimate,
    /// Statistics over the unbinned input.
    pub stats: RegressionStats,
    /// Identity line, when enabled.
    pub identity: Option<AuxiliaryLine>,
    /// Best-fit line, when enabled and shown by the visibility policy.
    pub best_fit: Option<AuxiliaryLine>,
    /// Number of input points in this facet.
    pub source_len: usize,
    /// Extent of the input points.
    pub bounds: Bounds,
    sorted: bool,
}

impl FacetAnalysis {
    /// Indices of `points` in drawing order.
    #[must_use]
    pub fn draw_order(&self) -> Vec<usize> {
        if self.sorted {
            self.density.draw_order()
        } else {
            (0..self.points.len()).collect()
        }
    }

    /// Overlay lines to draw, identity first.
    pub fn lines(&self) -> impl Iterator<Item = &AuxiliaryLine> {
        self.identity.iter().chain(self.best_fit.iter())
    }
}

/// Analyze one validated point set.
///
/// # Errors
///
/// Propagates binning and statistics errors; invalid options fail first.
pub fn analyze_points(
    points: PointSeries,
    label: Option<String>,
    options: &DensityScatterOptions,
) -> Result<FacetAnalysis> {
    options.validate()?;

    let source_len = points.len();
    let bounds = points.bounds();
    let stats = compute_regression_stats(points.x(), points.y())?;

    let (identity, best_fit) = reference_lines(&points, options)?;

    let binned = match options.n_bins {
        Some(n_bins) if source_len > n_bins => {
            let agg = bin_points(&points, n_bins)?;
            if agg.len() < 2 {
                tracing::debug!(n_bins, "all points share one bin, plotting unbinned");
                None
            } else {
                Some(agg)
            }
        }
        _ => None,
    };

    let (drawn, weights) = match &binned {
        Some(agg) => (agg.to_points()?, Some(agg.counts())),
        None => (points, None),
    };
    let density = estimate_point_density(
        &drawn,
        weights.as_deref(),
        options.density_method(),
        options.log_density,
    );

    Ok(FacetAnalysis {
        label,
        points: drawn,
        binned,
        density,
        stats,
        identity,
        best_fit,
        source_len,
        bounds,
        sorted: options.sort_by_density,
    })
}

/// Identity and best-fit lines for `points` as enabled by `options`.
pub(crate) fn reference_lines(
    points: &PointSeries,
    options: &DensityScatterOptions,
) -> Result<(Option<AuxiliaryLine>, Option<AuxiliaryLine>)> {
    let identity =
        if options.identity_line { Some(identity_line(points.x(), points.y())?) } else { None };
    Ok((identity, resolve_best_fit(points, options.best_fit_line)?))
}

/// Apply the best-fit policy: forced off, forced on, or shown when R² > 0.3.
fn resolve_best_fit(points: &PointSeries, mode: Option<bool>) -> Result<Option<AuxiliaryLine>> {
    if mode == Some(false) {
        return Ok(None);
    }
    match best_fit_line(points.x(), points.y()) {
        Ok(line) if mode == Some(true) || line.is_visible() => Ok(Some(line)),
        Ok(line) => {
            if let AuxiliaryLine::BestFit { r2, .. } = line {
                tracing::debug!(r2, "best-fit line hidden below R² threshold");
            }
            Ok(None)
        }
        Err(Error::DegenerateFit) => {
            tracing::warn!("skipping best-fit line: x values are constant");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Read `source`, split by the facet column and analyze every group.
///
/// Without a facet column the result holds exactly one analysis.
///
/// # Errors
///
/// Fails with "input should have multiple elements" when any analyzed set has
/// fewer than two usable points, and on unknown or non-numeric columns.
pub fn analyze(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
) -> Result<Vec<FacetAnalysis>> {
    options.validate()?;

    let (x, y) = source.xy()?;
    let sizes = options.size_col.as_deref().map(|col| source.column(col)).transpose()?;

    let Some(facet_col) = options.facet_col.as_deref() else {
        let points = PointSeries::with_sizes(&x, &y, sizes.as_deref())?;
        return Ok(vec![analyze_points(points, None, options)?]);
    };

    let df = source.frame_ref().ok_or_else(|| Error::UnknownColumn(facet_col.to_string()))?;
    let labels = df.labels(facet_col)?;
    let groups = group_by_category(&labels, options.category_order.as_deref());
    if groups.is_empty() {
        return Err(Error::TooFewPoints { found: 0 });
    }

    groups
        .into_iter()
        .map(|group| {
            let gx = group.select(&x);
            let gy = group.select(&y);
            let gs = sizes.as_ref().map(|s| group.select(s));
            let points = PointSeries::with_sizes(&gx, &gy, gs.as_deref())?;
            analyze_points(points, Some(group.label), options)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataFrame, Series};
    use crate::density::DensityMethod;

    fn tips_like() -> DataFrame {
        let n = 60;
        let bill: Vec<f32> = (0..n).map(|i| 8.0 + (i as f32 * 0.71).sin().abs() * 30.0).collect();
        let tip: Vec<f32> =
            bill.iter().enumerate().map(|(i, b)| b * 0.15 + (i as f32 * 1.7).cos()).collect();
        let size: Vec<f32> = (0..n).map(|i| (i % 4 + 1) as f32).collect();
        let smoker: Vec<&str> = (0..n).map(|i| if i % 3 == 0 { "Yes" } else { "No" }).collect();
        DataFrame::new()
            .with_f32("total_bill", &bill)
            .with_f32("tip", &tip)
            .with_f32("size", &size)
            .with_str("smoker", &smoker)
    }

    #[test]
    fn test_single_facet() {
        let x = Series::new(&[1.0, 2.0, 3.0, 4.0]);
        let y = Series::new(&[1.1, 1.9, 3.2, 3.9]);
        let result = analyze(&DataSource::series(&x, &y), &DensityScatterOptions::new()).unwrap();
        assert_eq!(result.len(), 1);
        let facet = &result[0];
        assert!(facet.label.is_none());
        assert_eq!(facet.density.len(), 4);
        assert!(facet.binned.is_none());
        assert!(facet.identity.is_some());
        assert!(facet.best_fit.is_some());
    }

    #[test]
    fn test_facets_follow_first_appearance() {
        let df = tips_like();
        let opts = DensityScatterOptions::new().facet_col("smoker");
        let result = analyze(&DataSource::frame(&df, "total_bill", "tip"), &opts).unwrap();
        let labels: Vec<_> = result.iter().map(|f| f.label.clone().unwrap()).collect();
        assert_eq!(labels, vec!["Yes", "No"]);
        assert_eq!(result[0].source_len + result[1].source_len, 60);
    }

    #[test]
    fn test_binning_reduces_facet_points() {
        let df = tips_like();
        let opts = DensityScatterOptions::new().facet_col("smoker").n_bins(Some(10));
        let result = analyze(&DataSource::frame(&df, "total_bill", "tip"), &opts).unwrap();
        for facet in &result {
            let agg = facet.binned.as_ref().unwrap();
            assert!(facet.points.len() <= 10);
            assert!(facet.points.len() < facet.source_len);
            assert_eq!(agg.total_count(), facet.source_len);
            assert_eq!(facet.density.len(), facet.points.len());
        }
    }

    #[test]
    fn test_sizes_are_averaged_into_bins() {
        let df = tips_like();
        let opts = DensityScatterOptions::new().size_col("size").n_bins(Some(16));
        let result = analyze(&DataSource::frame(&df, "total_bill", "tip"), &opts).unwrap();
        let sizes = result[0].points.sizes().unwrap();
        assert_eq!(sizes.len(), result[0].points.len());
        assert!(sizes.iter().all(|&s| (1.0..=4.0).contains(&s)));
    }

    #[test]
    fn test_best_fit_policy() {
        // y is a strong linear function of x but a poor prediction of it.
        let x: Vec<f32> = (0..20).map(|i| i as f32).collect();
        let y: Vec<f32> = x.iter().map(|v| v * 0.1 + 1.0).collect();
        let pts = PointSeries::new(&x, &y).unwrap();

        let auto = analyze_points(pts.clone(), None, &DensityScatterOptions::new()).unwrap();
        assert!(auto.best_fit.is_none());
        assert_eq!(auto.lines().count(), 1);

        let forced =
            analyze_points(pts.clone(), None, &DensityScatterOptions::new().best_fit_line(true))
                .unwrap();
        assert!(forced.best_fit.is_some());
        assert_eq!(forced.lines().count(), 2);

        let off = analyze_points(
            pts,
            None,
            &DensityScatterOptions::new().identity_line(false).best_fit_line(false),
        )
        .unwrap();
        assert_eq!(off.lines().count(), 0);
    }

    #[test]
    fn test_constant_x_skips_best_fit() {
        let pts = PointSeries::new(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).unwrap();
        let result =
            analyze_points(pts, None, &DensityScatterOptions::new().best_fit_line(true)).unwrap();
        assert!(result.best_fit.is_none());
    }

    #[test]
    fn test_empty_input() {
        let df = DataFrame::new().with_f32("a", &[]).with_f32("b", &[]);
        let err = analyze(&DataSource::frame(&df, "a", "b"), &DensityScatterOptions::new())
            .unwrap_err();
        assert_eq!(err.to_string(), "input should have multiple elements");
    }

    #[test]
    fn test_facet_requires_frame() {
        let x = Series::new(&[1.0, 2.0]);
        let opts = DensityScatterOptions::new().facet_col("smoker");
        assert!(matches!(
            analyze(&DataSource::series(&x, &x), &opts),
            Err(Error::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_unsorted_draw_order() {
        let pts = PointSeries::new(&[0.0, 1.0, 5.0], &[0.0, 1.2, 4.0]).unwrap();
        let mut opts = DensityScatterOptions::new().density(DensityMethod::empirical());
        opts.sort_by_density = false;
        let result = analyze_points(pts, None, &opts).unwrap();
        assert_eq!(result.draw_order(), vec![0, 1, 2]);
    }
}
