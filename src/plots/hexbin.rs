//! Hexagonal binning.

use crate::analysis::reference_lines;
use crate::axes::{Axes, Collection, CollectionKind, Colorbar};
use crate::config::{DensityScatterOptions, HexbinOptions};
use crate::data::DataSource;
use crate::density::DensityEstimate;
use crate::error::{Error, Result};
use crate::geometry::Point;
use crate::points::PointSeries;
use crate::stats::compute_regression_stats;

use super::{add_reference_lines, add_stats, color_map, reject_facets, styled_axes};

/// Occupied cells of a hexagonal lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    /// Cell centers.
    pub offsets: Vec<Point>,
    /// Points per cell, aligned with `offsets`; always positive.
    pub counts: Vec<f32>,
    /// Horizontal spacing of cell centers.
    pub width: f32,
    /// Vertical spacing of rows of the same parity.
    pub height: f32,
}

/// Count points on two interleaved rectangular lattices that together tile
/// the plane with pointy-top hexagons, `gridsize` cells across.
///
/// Each point goes to the nearer of its candidate centers on the two
/// lattices, measured with the y distance scaled by √3.
///
/// # Errors
///
/// Returns [`Error::InvalidOption`] for a zero grid size.
pub fn hexbin_counts(points: &PointSeries, gridsize: usize) -> Result<HexGrid> {
    if gridsize == 0 {
        return Err(Error::invalid_option("gridsize", "must be positive"));
    }
    let nx = gridsize;
    let ny = ((nx as f32 / 3f32.sqrt()) as usize).max(1);
    let b = points.bounds().padded();
    let pad_x = (b.x_max - b.x_min) * 1e-6;
    let pad_y = (b.y_max - b.y_min) * 1e-6;
    let (x_min, y_min) = (b.x_min - pad_x, b.y_min - pad_y);
    let sx = (b.x_max + pad_x - x_min) / nx as f32;
    let sy = (b.y_max + pad_y - y_min) / ny as f32;

    let (cols1, rows1) = (nx + 1, ny + 1);
    let mut lattice1 = vec![0u32; cols1 * rows1];
    let mut lattice2 = vec![0u32; nx * ny];

    for (&x, &y) in points.x().iter().zip(points.y()) {
        let ix = (x - x_min) / sx;
        let iy = (y - y_min) / sy;
        let (ix1, iy1) = (ix.round(), iy.round());
        let (ix2, iy2) = (ix.floor(), iy.floor());
        let d1 = (ix - ix1).powi(2) + 3.0 * (iy - iy1).powi(2);
        let d2 = (ix - ix2 - 0.5).powi(2) + 3.0 * (iy - iy2 - 0.5).powi(2);
        if d1 < d2 {
            let (i, j) = ((ix1 as usize).min(nx), (iy1 as usize).min(ny));
            lattice1[j * cols1 + i] += 1;
        } else {
            let (i, j) = ((ix2 as usize).min(nx - 1), (iy2 as usize).min(ny - 1));
            lattice2[j * nx + i] += 1;
        }
    }

    let mut offsets = Vec::new();
    let mut counts = Vec::new();
    for (idx, &count) in lattice1.iter().enumerate() {
        if count > 0 {
            let (i, j) = (idx % cols1, idx / cols1);
            offsets.push(Point::new(x_min + i as f32 * sx, y_min + j as f32 * sy));
            counts.push(count as f32);
        }
    }
    for (idx, &count) in lattice2.iter().enumerate() {
        if count > 0 {
            let (i, j) = (idx % nx, idx / nx);
            offsets.push(Point::new(
                x_min + (i as f32 + 0.5) * sx,
                y_min + (j as f32 + 0.5) * sy,
            ));
            counts.push(count as f32);
        }
    }
    tracing::debug!(gridsize, cells = offsets.len(), "hexbin counts");
    Ok(HexGrid { offsets, counts, width: sx, height: sy })
}

/// Hexbin plot of point counts with identity and best-fit lines, stats and
/// an inset colorbar at `hex.cbar_coords`.
///
/// # Errors
///
/// Fails on invalid options, unusable columns and fewer than two usable points.
#[tracing::instrument(skip_all)]
pub fn density_hexbin(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
    hex: &HexbinOptions,
) -> Result<Axes> {
    reject_facets(options)?;
    options.validate()?;
    hex.validate()?;

    let (x, y) = source.xy()?;
    let points = PointSeries::new(&x, &y)?;
    let stats = compute_regression_stats(points.x(), points.y())?;
    let (identity, best_fit) = reference_lines(&points, options)?;
    let grid = hexbin_counts(&points, hex.gridsize)?;

    let (xlabel, ylabel) = source.labels();
    let mut ax = styled_axes(&options.style, &xlabel, &ylabel)?;
    let counts = DensityEstimate::from_values(
        grid.counts.iter().copied().map(f64::from).collect(),
        options.log_density,
    );
    let (colors, domain) = color_map(&counts.color_values(), options.color_scale);
    let n = grid.offsets.len();
    ax.add_collection(Collection::new(
        CollectionKind::Hexbin { width: grid.width, height: grid.height },
        grid.offsets,
        grid.counts,
        colors,
        vec![0.0; n],
    ));
    add_reference_lines(&mut ax, identity.iter().chain(best_fit.iter()), &options.style)?;
    add_stats(&mut ax, &stats, &options.stats, &options.style)?;
    ax.set_colorbar(Colorbar {
        label: hex.cbar_label().to_string(),
        palette: options.color_scale,
        domain,
        ticks: counts.colorbar_ticks(),
        rect: Some(hex.cbar_coords),
    });
    Ok(ax)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataFrame;
    use proptest::prelude::*;

    fn frame() -> DataFrame {
        let x: Vec<f32> = (0..300).map(|i| (i as f32 * 0.173).sin() * 5.0 + 5.0).collect();
        let y: Vec<f32> = x.iter().enumerate().map(|(i, v)| v + (i as f32).cos() * 0.4).collect();
        DataFrame::new().with_f32("x", &x).with_f32("y", &y)
    }

    #[test]
    fn test_single_nonempty_collection() {
        let df = frame();
        for (label, coords, gridsize) in
            [(Some("foo"), [0.95, 0.03, 0.03, 0.7], 50), (None, [1.0, 1.0, 1.0, 1.0], 100)]
        {
            let hex = HexbinOptions {
                gridsize,
                cbar_label: label.map(str::to_string),
                cbar_coords: coords,
            };
            let ax = density_hexbin(
                &DataSource::frame(&df, "x", "y"),
                &DensityScatterOptions::new(),
                &hex,
            )
            .unwrap();
            assert_eq!(ax.collections().len(), 1);
            assert!(!ax.collections()[0].is_empty());
            let cbar = ax.colorbar().unwrap();
            assert_eq!(cbar.label, label.unwrap_or("Density"));
            assert_eq!(cbar.rect, Some(coords));
        }
    }

    #[test]
    fn test_counts_conserved() {
        let df = frame();
        let (x, y) = DataSource::frame(&df, "x", "y").xy().unwrap();
        let grid = hexbin_counts(&PointSeries::new(&x, &y).unwrap(), 20).unwrap();
        let total: f32 = grid.counts.iter().sum();
        assert_eq!(total as usize, 300);
        assert!(grid.counts.iter().all(|&c| c >= 1.0));
    }

    #[test]
    fn test_identical_points_share_cell() {
        let pts = PointSeries::new(&[2.0, 2.0, 2.0], &[3.0, 3.0, 3.0]).unwrap();
        let grid = hexbin_counts(&pts, 10).unwrap();
        assert_eq!(grid.counts, vec![3.0]);
    }

    #[test]
    fn test_zero_gridsize_rejected() {
        let pts = PointSeries::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        assert!(hexbin_counts(&pts, 0).is_err());
    }

    #[test]
    fn test_hexbin_renders() {
        let df = frame();
        let ax = density_hexbin(
            &DataSource::frame(&df, "x", "y"),
            &DensityScatterOptions::new(),
            &HexbinOptions::default(),
        )
        .unwrap();
        let fb = ax.to_framebuffer(320, 240).unwrap();
        assert_eq!(fb.width(), 320);
        assert!(ax.to_svg(320, 240).unwrap().render().contains("<polygon"));
    }

    proptest! {
        #[test]
        fn prop_hexbin_conserves_points(
            pts in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 2..200),
            gridsize in 1usize..60,
        ) {
            let (x, y): (Vec<f32>, Vec<f32>) = pts.into_iter().unzip();
            let grid = hexbin_counts(&PointSeries::new(&x, &y).unwrap(), gridsize).unwrap();
            let total: f32 = grid.counts.iter().sum();
            prop_assert_eq!(total as usize, x.len());
            prop_assert_eq!(grid.offsets.len(), grid.counts.len());
        }
    }
}
