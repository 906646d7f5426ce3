//! Density scatter, error-bar scatter and residual plots.

use crate::analysis::{analyze, reference_lines, FacetAnalysis};
use crate::axes::{Axes, Collection, CollectionKind, Colorbar, ErrorBar, Line2D};
use crate::config::DensityScatterOptions;
use crate::data::DataSource;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::points::PointSeries;
use crate::stats::compute_regression_stats;
use crate::style::resolve;

use super::{add_reference_lines, add_stats, color_map, marker_sizes, reject_facets, styled_axes};

/// Scatter plot colored by point density.
///
/// Points are drawn sparsest first, with the identity line, the best-fit line
/// (subject to the R² policy), a stats annotation and a colorbar labelled with
/// the counts label. Every usable point is drawn: `n_bins` only applies to
/// [`density_scatter_figure`](crate::figure::density_scatter_figure).
///
/// # Errors
///
/// Fails on invalid options, unusable columns and fewer than two usable points.
#[tracing::instrument(skip_all)]
pub fn density_scatter(source: &DataSource<'_>, options: &DensityScatterOptions) -> Result<Axes> {
    reject_facets(options)?;
    let unbinned = DensityScatterOptions { n_bins: None, ..options.clone() };
    let facet = analyze(source, &unbinned)?
        .into_iter()
        .next()
        .ok_or(Error::TooFewPoints { found: 0 })?;

    let (xlabel, ylabel) = source.labels();
    let mut ax = styled_axes(&options.style, &xlabel, &ylabel)?;
    let domain = add_density_collection(&mut ax, &facet, options);
    add_reference_lines(&mut ax, facet.lines(), &options.style)?;
    add_stats(&mut ax, &facet.stats, &options.stats, &options.style)?;
    ax.set_colorbar(Colorbar {
        label: options.colorbar_title().to_string(),
        palette: options.color_scale,
        domain,
        ticks: facet.density.colorbar_ticks(),
        rect: None,
    });
    Ok(ax)
}

/// Add the density-colored markers in draw order; returns the color domain.
pub(super) fn add_density_collection(
    ax: &mut Axes,
    facet: &FacetAnalysis,
    options: &DensityScatterOptions,
) -> (f32, f32) {
    let order = facet.draw_order();
    let values = facet.density.color_values();
    let (colors, domain) = color_map(&values, options.color_scale);
    let sizes =
        marker_sizes(facet.points.sizes(), facet.points.len(), options.style.point_size);
    let (x, y) = (facet.points.x(), facet.points.y());

    ax.add_collection(Collection::new(
        CollectionKind::Scatter,
        order.iter().map(|&i| Point::new(x[i], y[i])).collect(),
        order.iter().map(|&i| values[i] as f32).collect(),
        order.iter().map(|&i| colors[i]).collect(),
        order.iter().map(|&i| sizes[i]).collect(),
    ));
    domain
}

/// Scatter plot with symmetric x and/or y error bars.
///
/// Error arrays align with the source rows; rows with a non-finite x or y are
/// dropped together with their errors. Identity and best-fit lines and the
/// stats annotation follow `options`.
///
/// # Errors
///
/// Fails when an error array length differs from the data, and on the same
/// conditions as [`density_scatter`].
#[tracing::instrument(skip_all)]
pub fn scatter_with_err_bar(
    source: &DataSource<'_>,
    xerr: Option<&[f32]>,
    yerr: Option<&[f32]>,
    options: &DensityScatterOptions,
) -> Result<Axes> {
    reject_facets(options)?;
    options.validate()?;
    let (x, y) = source.xy()?;
    for err in [xerr, yerr].into_iter().flatten() {
        if err.len() != x.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: err.len() });
        }
    }

    let rows: Vec<usize> =
        (0..x.len()).filter(|&i| x[i].is_finite() && y[i].is_finite()).collect();
    let kept_x: Vec<f32> = rows.iter().map(|&i| x[i]).collect();
    let kept_y: Vec<f32> = rows.iter().map(|&i| y[i]).collect();
    let points = PointSeries::new(&kept_x, &kept_y)?;

    let stats = compute_regression_stats(points.x(), points.y())?;
    let (identity, best_fit) = reference_lines(&points, options)?;

    let (xlabel, ylabel) = source.labels();
    let style = &options.style;
    let mut ax = styled_axes(style, &xlabel, &ylabel)?;
    let marker = resolve(&style.marker_color)?;
    let bar_color = resolve(&style.errorbar_color)?;
    let pick = |err: Option<&[f32]>, row: usize| {
        err.map(|e| e[row].abs()).filter(|v| v.is_finite() && *v > 0.0)
    };

    for (&row, (&px, &py)) in rows.iter().zip(kept_x.iter().zip(&kept_y)) {
        let (dx, dy) = (pick(xerr, row), pick(yerr, row));
        if dx.is_some() || dy.is_some() {
            let center = Point::new(px, py);
            ax.add_errorbar(ErrorBar { center, xerr: dx, yerr: dy, color: bar_color });
        }
    }
    let n = kept_x.len();
    ax.add_collection(Collection::new(
        CollectionKind::Scatter,
        kept_x.iter().zip(&kept_y).map(|(&px, &py)| Point::new(px, py)).collect(),
        vec![0.0; n],
        vec![marker; n],
        vec![style.point_size; n],
    ));
    add_reference_lines(&mut ax, identity.iter().chain(best_fit.iter()), style)?;
    add_stats(&mut ax, &stats, &options.stats, style)?;
    Ok(ax)
}

/// Residuals (`y_pred - y_true`) against actual values, with a zero line.
///
/// The source's x is `y_true` and its y is `y_pred`.
///
/// # Errors
///
/// Fails on unusable columns and fewer than two usable points.
#[tracing::instrument(skip_all)]
pub fn residual_vs_actual(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
) -> Result<Axes> {
    reject_facets(options)?;
    options.validate()?;
    let (y_true, y_pred) = source.xy()?;
    let residual: Vec<f32> = y_true.iter().zip(&y_pred).map(|(t, p)| p - t).collect();
    let points = PointSeries::new(&y_true, &residual)?;

    let style = &options.style;
    let mut ax = styled_axes(style, "Actual value", "Residual")?;
    let marker = resolve(&style.marker_color)?;
    let n = points.len();
    ax.add_collection(Collection::new(
        CollectionKind::Scatter,
        points.x().iter().zip(points.y()).map(|(&x, &r)| Point::new(x, r)).collect(),
        points.y().to_vec(),
        vec![marker; n],
        vec![style.point_size; n],
    ));

    let bounds = points.bounds();
    ax.add_line(Line2D {
        start: Point::new(bounds.x_min, 0.0),
        end: Point::new(bounds.x_max, 0.0),
        color: style.zero_line.color.clone(),
        rgba: style.zero_line.rgba()?,
        linestyle: style.zero_line.dash,
        kind: None,
        label: Some("y = 0".to_string()),
    });
    Ok(ax)
}
