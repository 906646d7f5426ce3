//! Density scatter as an interactive figure.

use crate::analysis::{analyze, FacetAnalysis};
use crate::config::DensityScatterOptions;
use crate::data::DataSource;
use crate::density::DensityEstimate;
use crate::error::Result;
use crate::lines::AuxiliaryLine;
use crate::stats::Markup;
use crate::style::Style;

use super::{
    axis_ref, Annotation, Axis, ColorAxis, ColorBar, Figure, Font, Layout, Marker, Shape,
    ShapeLine, Title, Trace,
};

const FACET_SPACING: f32 = 0.03;
const LINE_WIDTH: f32 = 2.0;

/// Density scatter figure with one trace per facet.
///
/// Marker colors go through a shared color axis whose colorbar is titled with
/// the counts label (spaces become line breaks unless a title is given).
/// Hovering shows the raw density under the counts label. Each facet gets its
/// own axes pair, stats annotation, identity shape and best-fit shape.
///
/// # Errors
///
/// Fails on invalid options, unusable or missing columns and on any facet
/// with fewer than two usable points. Nothing is assembled before every facet
/// has been analyzed.
#[tracing::instrument(skip_all)]
pub fn density_scatter_figure(
    source: &DataSource<'_>,
    options: &DensityScatterOptions,
) -> Result<Figure> {
    let facets = analyze(source, options)?;
    let (xlabel, ylabel) = source.labels();
    let n = facets.len();

    let mut layout = Layout { coloraxis: color_axis(&facets, options), ..Layout::default() };
    let mut data = Vec::with_capacity(n);

    for (i, facet) in facets.iter().enumerate() {
        let (xref, yref) = (axis_ref('x', i), axis_ref('y', i));
        let x_axis = Axis {
            title: xlabel.as_str().into(),
            domain: (n > 1).then(|| facet_domain(i, n)),
            anchor: (n > 1).then(|| yref.clone()),
            matches: (i > 0).then(|| "x".to_string()),
        };
        let y_axis = Axis {
            title: if i == 0 { ylabel.as_str().into() } else { Title::default() },
            domain: None,
            anchor: (n > 1).then(|| xref.clone()),
            matches: (i > 0).then(|| "y".to_string()),
        };
        if i == 0 {
            layout.xaxis = x_axis;
            layout.yaxis = y_axis;
        } else {
            layout.facet_axes.insert(format!("xaxis{}", i + 1), x_axis);
            layout.facet_axes.insert(format!("yaxis{}", i + 1), y_axis);
        }

        data.push(trace(facet, &xlabel, &ylabel, &xref, &yref, options));

        if let (Some(facet_col), Some(label)) = (&options.facet_col, &facet.label) {
            let size = options.style.font_size;
            layout.annotations.push(facet_title(facet_col, label, &xref, size));
        }
        if let Some(ann) = stats_annotation(facet, &xref, &yref, options) {
            layout.annotations.push(ann);
        }
        for line in facet.lines() {
            layout.shapes.push(shape(line, &xref, &yref, &options.style));
        }
    }

    tracing::debug!(traces = data.len(), shapes = layout.shapes.len(), "figure assembled");
    Ok(Figure { data, layout })
}

fn facet_domain(i: usize, n: usize) -> [f32; 2] {
    let width = 1.0 / n as f32;
    let lo = i as f32 * width + if i > 0 { FACET_SPACING / 2.0 } else { 0.0 };
    let hi = (i + 1) as f32 * width - if i + 1 < n { FACET_SPACING / 2.0 } else { 0.0 };
    [lo, hi]
}

fn trace(
    facet: &FacetAnalysis,
    xlabel: &str,
    ylabel: &str,
    xref: &str,
    yref: &str,
    options: &DensityScatterOptions,
) -> Trace {
    let order = facet.draw_order();
    let color = facet.density.color_values();
    let size = facet.points.sizes().map(|s| in_order(&order, s));

    let mut hovertemplate = format!(
        "{xlabel}: %{{x:.3f}}<br>{ylabel}: %{{y:.3f}}<br>{}: %{{customdata:.3f}}",
        options.bin_counts_col
    );
    if let Some(size_col) = size.as_ref().and(options.size_col.as_deref()) {
        hovertemplate.push_str(&format!("<br>{size_col}: %{{marker.size:.3f}}"));
    }
    hovertemplate.push_str("<extra></extra>");

    Trace {
        kind: "scatter",
        mode: "markers",
        name: facet.label.clone(),
        x: in_order(&order, facet.points.x()),
        y: in_order(&order, facet.points.y()),
        marker: Marker { color: in_order(&order, &color), coloraxis: "coloraxis", size },
        customdata: in_order(&order, facet.density.values()),
        hovertemplate,
        xaxis: xref.to_string(),
        yaxis: yref.to_string(),
    }
}

fn in_order<T: Copy>(order: &[usize], values: &[T]) -> Vec<T> {
    order.iter().map(|&i| values[i]).collect()
}

fn color_axis(facets: &[FacetAnalysis], options: &DensityScatterOptions) -> ColorAxis {
    let all: Vec<f64> = facets.iter().flat_map(|f| f.density.values().iter().copied()).collect();
    let ticks = DensityEstimate::from_values(all, options.log_density).colorbar_ticks();
    let title = match &options.colorbar.title {
        Some(title) => title.clone(),
        None => options.bin_counts_col.replace(' ', "<br>"),
    };
    ColorAxis {
        colorscale: options
            .color_scale
            .stops()
            .into_iter()
            .map(|(pos, color)| (pos, color.to_hex()))
            .collect(),
        colorbar: ColorBar {
            title: Title { text: title },
            tickvals: ticks.values,
            ticktext: ticks.labels,
            thickness: options.colorbar.thickness,
            len: options.colorbar.len,
            x: options.colorbar.x,
            y: options.colorbar.y,
        },
    }
}

fn stats_annotation(
    facet: &FacetAnalysis,
    xref: &str,
    yref: &str,
    options: &DensityScatterOptions,
) -> Option<Annotation> {
    let opts = options.stats.options()?;
    let (x, y) = opts.position();
    let loc = opts.loc.unwrap_or_default();
    let font = opts.font.clone().unwrap_or_default();
    Some(Annotation {
        text: facet.stats.annotation(opts.prefix(), Markup::Html),
        x,
        y,
        xref: format!("{xref} domain"),
        yref: format!("{yref} domain"),
        xanchor: loc.x_align(),
        yanchor: loc.y_align(),
        showarrow: false,
        font: Some(Font {
            size: font.size.unwrap_or(options.style.font_size),
            color: font.color,
        }),
    })
}

fn facet_title(facet_col: &str, label: &str, xref: &str, font_size: f32) -> Annotation {
    Annotation {
        text: format!("{facet_col}={label}"),
        x: 0.5,
        y: 1.0,
        xref: format!("{xref} domain"),
        yref: "paper".to_string(),
        xanchor: "center",
        yanchor: "bottom",
        showarrow: false,
        font: Some(Font { size: font_size, color: None }),
    }
}

fn shape(line: &AuxiliaryLine, xref: &str, yref: &str, style: &Style) -> Shape {
    let spec = style.figure_line(line.kind());
    let segment = line.segment();
    Shape {
        kind: "line",
        x0: segment.start.x,
        y0: segment.start.y,
        x1: segment.end.x,
        y1: segment.end.y,
        xref: xref.to_string(),
        yref: yref.to_string(),
        line: ShapeLine {
            color: spec.color.clone(),
            dash: spec.dash.as_dash(),
            width: LINE_WIDTH,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataFrame, Series};
    use crate::error::Error;
    use crate::scale::Palette;
    use crate::stats::validate_stats_param;
    use serde_json::json;

    /// Restaurant-bill style data: bill, tip, party size, smoker and day.
    fn tips() -> DataFrame {
        let n = 244;
        let bill: Vec<f32> =
            (0..n).map(|i| 3.0 + ((i * 37 % 101) as f32 / 101.0) * 47.0).collect();
        let tip: Vec<f32> = bill
            .iter()
            .enumerate()
            .map(|(i, b)| (b * 0.15 + ((i * 13 % 17) as f32 - 8.0) * 0.08).max(1.0))
            .collect();
        let size: Vec<f32> = (0..n).map(|i| (i % 5 + 1) as f32).collect();
        let smoker: Vec<&str> = (0..n).map(|i| if i % 5 < 2 { "Yes" } else { "No" }).collect();
        let day: Vec<&str> = (0..n).map(|i| ["Thur", "Fri", "Sat", "Sun"][i % 4]).collect();
        DataFrame::new()
            .with_f32("total_bill", &bill)
            .with_f32("tip", &tip)
            .with_f32("size", &size)
            .with_str("smoker", &smoker)
            .with_str("day", &day)
    }

    fn regression() -> DataFrame {
        let y_true: Vec<f32> = (0..300).map(|i| (i as f32 * 0.031).sin() * 2.0).collect();
        let y_pred: Vec<f32> =
            y_true.iter().enumerate().map(|(i, v)| v + (i as f32 * 0.7).cos() * 0.2).collect();
        DataFrame::new().with_f32("y_true", &y_true).with_f32("y_pred", &y_pred)
    }

    fn tips_figure(options: DensityScatterOptions) -> Figure {
        let df = tips();
        density_scatter_figure(&DataSource::frame(&df, "total_bill", "tip"), &options).unwrap()
    }

    fn navy_shapes(fig: &Figure) -> usize {
        fig.layout.shapes.iter().filter(|s| s.line.color == "navy").count()
    }

    #[test]
    fn test_axis_titles_and_colorbar_title() {
        let df = regression();
        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new().bin_counts_col("Point Density"),
        )
        .unwrap();
        assert_eq!(fig.layout.xaxis.title.text, "y_true");
        assert_eq!(fig.layout.yaxis.title.text, "y_pred");
        let colorbar = &fig.layout.coloraxis.colorbar;
        assert_eq!(colorbar.title.text, "Point<br>Density");
        assert_eq!(colorbar.title.text.replace("<br>", " "), "Point Density");
        assert!(colorbar.tickvals.is_some());
        assert_eq!(
            colorbar.tickvals.as_ref().map(Vec::len),
            colorbar.ticktext.as_ref().map(Vec::len)
        );
    }

    #[test]
    fn test_series_fallback_labels() {
        let (a, b) = (Series::new(&[1.0, 2.0, 3.0]), Series::new(&[1.1, 1.9, 3.2]));
        let fig = density_scatter_figure(
            &DataSource::series(&a, &b),
            &DensityScatterOptions::new().log_density(false),
        )
        .unwrap();
        assert_eq!(fig.layout.xaxis.title.text, "Actual");
        assert_eq!(fig.layout.yaxis.title.text, "Predicted");
        assert!(fig.layout.coloraxis.colorbar.tickvals.is_none());
        assert!(fig.layout.coloraxis.colorbar.ticktext.is_none());
    }

    #[test]
    fn test_hover_template_names_density_not_color() {
        let df = regression();
        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new().log_density(true),
        )
        .unwrap();
        let hover = &fig.data[0].hovertemplate;
        assert!(hover.contains("Point Density"));
        assert!(!hover.contains("color"));
        assert_eq!(fig.data[0].customdata.len(), fig.data[0].x.len());
    }

    #[test]
    fn test_customdata_is_raw_density() {
        let df = regression();
        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new().log_density(true),
        )
        .unwrap();
        let trace = &fig.data[0];
        for (c, d) in trace.marker.color.iter().zip(&trace.customdata) {
            assert!((c - d.ln()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_stats_annotation_uses_prefix_and_position() {
        let df = regression();
        let stats = validate_stats_param(&json!({"prefix": "Test: ", "x": 0.1, "y": 0.9}))
            .unwrap();
        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new().stats(stats),
        )
        .unwrap();
        let ann: Vec<_> =
            fig.layout.annotations.iter().filter(|a| a.text.contains("MAE")).collect();
        assert_eq!(ann.len(), 1);
        assert!(ann[0].text.starts_with("Test: "));
        assert!(ann[0].text.contains("R<sup>2</sup>"));
        assert_eq!((ann[0].x, ann[0].y), (0.1, 0.9));

        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new().stats(false),
        )
        .unwrap();
        assert!(fig.layout.annotations.is_empty());
    }

    #[test]
    fn test_identity_shape_present() {
        let df = regression();
        let fig = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new(),
        )
        .unwrap();
        let identity: Vec<_> =
            fig.layout.shapes.iter().filter(|s| s.line.dash == "dash").collect();
        assert_eq!(identity.len(), 1);
        assert_eq!(identity[0].line.color, "gray");
    }

    #[test]
    fn test_empty_frame_fails() {
        let df = DataFrame::new().with_f32("y_true", &[]).with_f32("y_pred", &[]);
        let err = density_scatter_figure(
            &DataSource::frame(&df, "y_true", "y_pred"),
            &DensityScatterOptions::new(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TooFewPoints { .. }));
    }

    #[test]
    fn test_facet_traces_and_axes() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker"));
        assert_eq!(fig.data.len(), 2);
        assert!(fig.layout.axis("xaxis2").is_some());
        assert_eq!(fig.data[1].xaxis, "x2");
        let [lo, hi] = fig.layout.xaxis.domain.unwrap();
        assert!(lo == 0.0 && hi < 0.5);
    }

    #[test]
    fn test_facet_log_density_ticks() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker").log_density(true));
        assert!(fig.layout.coloraxis.colorbar.tickvals.is_some());
        assert!(fig.layout.coloraxis.colorbar.ticktext.is_some());
    }

    #[test]
    fn test_facet_stats_one_per_facet() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker").stats(true));
        assert!(fig.layout.annotations.len() >= 2);
        let stats = fig.layout.annotations.iter().filter(|a| a.text.contains("MAE")).count();
        assert_eq!(stats, 2);
    }

    #[test]
    fn test_facet_best_fit_lines() {
        let fig = tips_figure(
            DensityScatterOptions::new().facet_col("smoker").best_fit_line(true),
        );
        assert_eq!(fig.layout.shapes.len(), 4);
        assert_eq!(navy_shapes(&fig), 2);
    }

    #[test]
    fn test_facet_identity_lines_only() {
        let fig = tips_figure(
            DensityScatterOptions::new().facet_col("smoker").best_fit_line(false),
        );
        assert_eq!(fig.layout.shapes.len(), 2);
        assert_eq!(navy_shapes(&fig), 0);
    }

    #[test]
    fn test_facet_custom_bins_reduce_points() {
        let df = tips();
        let smokers = df.labels("smoker").unwrap();
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker").n_bins(Some(10)));
        assert_eq!(fig.data.len(), 2);
        for trace in &fig.data {
            let rows = smokers.iter().filter(|s| s.as_deref() == trace.name.as_deref()).count();
            assert!(trace.x.len() < rows);
            assert!(trace.x.len() <= 9);
        }
    }

    #[test]
    fn test_facet_colorscale() {
        let fig = tips_figure(
            DensityScatterOptions::new().facet_col("smoker").color_scale(Palette::Viridis),
        );
        let colors: Vec<String> =
            fig.layout.coloraxis.colorscale.iter().map(|(_, c)| c.clone()).collect();
        let expected: Vec<String> = Palette::Viridis.colors().iter().map(|c| c.to_hex()).collect();
        assert_eq!(colors, expected);
    }

    #[test]
    fn test_facet_marker_size() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker").size_col("size"));
        for trace in &fig.data {
            let sizes = trace.marker.size.as_ref().unwrap();
            assert_eq!(sizes.len(), trace.x.len());
            assert!(trace.hovertemplate.contains("size"));
        }
    }

    #[test]
    fn test_facet_multiple_categories_in_order() {
        let fig = tips_figure(
            DensityScatterOptions::new()
                .facet_col("day")
                .category_order(&["Sun", "Sat", "Fri", "Thur"]),
        );
        assert_eq!(fig.data.len(), 4);
        assert_eq!(fig.data[0].name.as_deref(), Some("Sun"));
        assert!(fig.layout.axis("yaxis4").is_some());
        assert!(fig.layout.annotations.iter().any(|a| a.text == "day=Thur"));
    }

    #[test]
    fn test_facet_hover_names_columns() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker"));
        for trace in &fig.data {
            assert!(trace.hovertemplate.contains("total_bill"));
            assert!(trace.hovertemplate.contains("tip"));
        }
    }

    #[test]
    fn test_colorbar_overrides() {
        let colorbar = crate::config::ColorbarOptions {
            title: Some("Custom Title".to_string()),
            thickness: Some(30.0),
            len: Some(0.8),
            x: Some(1.1),
            y: None,
        };
        let fig = tips_figure(DensityScatterOptions::new().colorbar(colorbar));
        let cb = &fig.layout.coloraxis.colorbar;
        assert_eq!(cb.title.text, "Custom Title");
        assert_eq!(cb.thickness, Some(30.0));
        assert_eq!(cb.len, Some(0.8));
        assert_eq!(cb.x, Some(1.1));
    }

    #[test]
    fn test_unknown_facet_column() {
        let df = tips();
        let err = density_scatter_figure(
            &DataSource::frame(&df, "total_bill", "tip"),
            &DensityScatterOptions::new().facet_col("nope"),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownColumn(_)));
    }

    #[test]
    fn test_json_export() {
        let fig = tips_figure(DensityScatterOptions::new().facet_col("smoker"));
        let value: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
        assert_eq!(value["data"].as_array().map(Vec::len), Some(2));
        assert_eq!(value["data"][0]["type"], "scatter");
        assert_eq!(value["data"][0]["marker"]["coloraxis"], "coloraxis");
        assert!(value["layout"]["xaxis2"]["title"]["text"].is_string());
        assert_eq!(value["layout"]["shapes"][0]["type"], "line");
    }
}
