//! Static plot entry points.
//!
//! Every function validates its input and options, runs the shared density
//! analysis and returns a populated [`Axes`](crate::axes::Axes) (or
//! [`JointAxes`](crate::axes::JointAxes) for the marginal-histogram variants).

mod hexbin;
mod marginal;
mod scatter;

pub use hexbin::{density_hexbin, hexbin_counts, HexGrid};
pub use marginal::{
    density_hexbin_with_hist, density_scatter_with_hist, histogram, BinStrategy, Histogram,
};
pub use scatter::{density_scatter, residual_vs_actual, scatter_with_err_bar};

use crate::axes::{Axes, HAlign, Line2D, Text, VAlign};
use crate::color::Rgba;
use crate::config::DensityScatterOptions;
use crate::error::{Error, Result};
use crate::lines::AuxiliaryLine;
use crate::scale::{ColorScale, Palette, Scale};
use crate::stats::{Markup, RegressionStats, StatsParam};
use crate::style::{resolve, Style};

/// Static axes hold one panel; faceting is an interactive-figure feature.
fn reject_facets(options: &DensityScatterOptions) -> Result<()> {
    match &options.facet_col {
        Some(_) => Err(Error::invalid_option(
            "facet_col",
            "only supported by the interactive figure backend",
        )),
        None => Ok(()),
    }
}

fn styled_axes(style: &Style, xlabel: &str, ylabel: &str) -> Result<Axes> {
    let mut ax = Axes::new();
    ax.set_colors(resolve(&style.background)?, resolve(&style.axis_color)?);
    ax.set_xlabel(xlabel);
    ax.set_ylabel(ylabel);
    Ok(ax)
}

fn add_reference_lines<'a>(
    ax: &mut Axes,
    lines: impl Iterator<Item = &'a AuxiliaryLine>,
    style: &Style,
) -> Result<()> {
    for line in lines {
        ax.add_line(Line2D::from_auxiliary(line, style.axes_line(line.kind()))?);
    }
    Ok(())
}

fn add_stats(
    ax: &mut Axes,
    stats: &RegressionStats,
    param: &StatsParam,
    style: &Style,
) -> Result<()> {
    let Some(opts) = param.options() else { return Ok(()) };
    let loc = opts.loc.unwrap_or_default();
    let (x, y) = opts.position();
    let font = opts.font.clone().unwrap_or_default();
    let color = match font.color.as_deref() {
        Some(name) => resolve(name)?,
        None => Rgba::BLACK,
    };
    ax.add_text(Text {
        text: stats.annotation(opts.prefix(), Markup::Plain),
        x,
        y,
        h_align: if loc.x_align() == "left" { HAlign::Left } else { HAlign::Right },
        v_align: if loc.y_align() == "top" { VAlign::Top } else { VAlign::Bottom },
        font_size: font.size.unwrap_or(style.font_size),
        color,
    });
    Ok(())
}

/// Map values onto a palette, returning the colors and the value domain.
///
/// Positions are normalized in `f64` so densities below the `f32` range still
/// spread across the palette.
fn color_map(values: &[f64], palette: Palette) -> (Vec<Rgba>, (f32, f32)) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(lo.is_finite() && hi.is_finite()) {
        return (Vec::new(), (0.0, 1.0));
    }
    let unit = ColorScale::from_palette(palette, (0.0, 1.0));
    let colors = values
        .iter()
        .map(|&v| {
            let t = if hi > lo { (v - lo) / (hi - lo) } else { 0.5 };
            unit.scale(t as f32)
        })
        .collect();
    (colors, ColorScale::from_palette(palette, (lo as f32, hi as f32)).domain())
}

/// Marker diameters: the style size scaled by `sqrt(size / mean size)`.
fn marker_sizes(sizes: Option<&[f32]>, n: usize, base: f32) -> Vec<f32> {
    let Some(sizes) = sizes else { return vec![base; n] };
    let mean = sizes.iter().sum::<f32>() / sizes.len().max(1) as f32;
    if mean <= 0.0 {
        return vec![base; n];
    }
    sizes.iter().map(|&s| base * (s.max(0.0) / mean).sqrt()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_sizes_scale_with_sqrt() {
        let sizes = marker_sizes(Some(&[1.0, 4.0]), 2, 4.0);
        let mean = 2.5_f32;
        assert!((sizes[0] - 4.0 * (1.0 / mean).sqrt()).abs() < 1e-5);
        assert!(sizes[1] > sizes[0]);
        assert_eq!(marker_sizes(None, 3, 5.0), vec![5.0; 3]);
    }

    #[test]
    fn test_color_map_endpoints() {
        let (colors, domain) = color_map(&[0.0, 1.0, 2.0], Palette::Greyscale);
        assert_eq!(domain, (0.0, 2.0));
        assert_eq!(colors[0], Rgba::BLACK);
        assert_eq!(colors[2], Rgba::WHITE);
    }

    #[test]
    fn test_color_map_spreads_tiny_values() {
        let (colors, _) = color_map(&[1e-61, 2e-61, 3e-61], Palette::Greyscale);
        assert_eq!(colors[0], Rgba::BLACK);
        assert_eq!(colors[2], Rgba::WHITE);
        assert_ne!(colors[1], colors[0]);

        let (colors, domain) = color_map(&[4.0, 4.0], Palette::Greyscale);
        assert_eq!(colors[0], colors[1]);
        assert_eq!(domain, (3.5, 4.5));
    }

    #[test]
    fn test_reject_facets() {
        let opts = DensityScatterOptions::new().facet_col("smoker");
        assert!(reject_facets(&opts).is_err());
        assert!(reject_facets(&DensityScatterOptions::new()).is_ok());
    }

    #[test]
    fn test_stats_text_placement() {
        let stats = RegressionStats { mae: 0.1, rmse: 0.2, r2: 0.9 };
        let mut ax = Axes::new();
        let param = crate::stats::validate_stats_param(&serde_json::json!({
            "prefix": "test ",
            "loc": "upper left",
            "prop": {"fontsize": 10}
        }))
        .unwrap();
        add_stats(&mut ax, &stats, &param, &Style::default()).unwrap();
        let text = &ax.texts()[0];
        assert!(text.text.starts_with("test MAE = 0.100"));
        assert_eq!((text.x, text.y), (0.02, 0.98));
        assert_eq!(text.h_align, HAlign::Left);
        assert_eq!(text.v_align, VAlign::Top);
        assert_eq!(text.font_size, 10.0);

        let mut ax = Axes::new();
        add_stats(&mut ax, &stats, &StatsParam::Disabled, &Style::default()).unwrap();
        assert!(ax.texts().is_empty());
    }
}
