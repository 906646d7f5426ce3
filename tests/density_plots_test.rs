//! End-to-end tests: options file to rendered PNG, SVG and figure JSON.

#![allow(clippy::unwrap_used)]

use density_viz::prelude::*;

fn parity_frame(n: usize) -> DataFrame {
    let actual: Vec<f32> = (0..n).map(|i| (i as f32 * 0.021).sin() * 4.0 + 5.0).collect();
    let predicted: Vec<f32> =
        actual.iter().enumerate().map(|(i, a)| a + (i as f32 * 1.3).sin() * 0.3).collect();
    let model: Vec<&str> = (0..n).map(|i| if i % 2 == 0 { "gnn" } else { "rf" }).collect();
    DataFrame::new()
        .with_f32("actual", &actual)
        .with_f32("predicted", &predicted)
        .with_str("model", &model)
}

#[test]
fn yaml_options_to_png_and_svg() {
    let options = DensityScatterOptions::from_yaml_str(
        r#"
log_density: true
n_bins: 100
best_fit_line: true
stats:
  prefix: "val "
  loc: upper left
"#,
    )
    .unwrap();
    let df = parity_frame(2_000);
    let ax = density_scatter(&DataSource::frame(&df, "actual", "predicted"), &options).unwrap();
    assert_eq!(ax.collections()[0].len(), 2_000);
    let fig = density_scatter_figure(&DataSource::frame(&df, "actual", "predicted"), &options)
        .unwrap();
    assert!(fig.data[0].x.len() <= 100);
    assert_eq!(ax.lines().len(), 2);
    assert!(ax.texts()[0].text.starts_with("val MAE"));

    let dir = tempfile::tempdir().unwrap();
    let png = dir.path().join("parity.png");
    PngEncoder::write_to_file(&ax.to_framebuffer(640, 480).unwrap(), &png).unwrap();
    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");

    let svg = dir.path().join("parity.svg");
    ax.to_svg(640, 480).unwrap().write_to_file(&svg).unwrap();
    let text = std::fs::read_to_string(&svg).unwrap();
    assert!(text.contains("<svg"));
    assert!(text.contains("Point Density"));
}

#[test]
fn faceted_figure_json() {
    let df = parity_frame(600);
    let options = DensityScatterOptions::new().facet_col("model").best_fit_line(true);
    let fig = density_scatter_figure(&DataSource::frame(&df, "actual", "predicted"), &options)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
    assert_eq!(json["data"][1]["xaxis"], "x2");
    assert_eq!(json["layout"]["shapes"].as_array().unwrap().len(), 4);
    let stats = json["layout"]["annotations"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|a| a["text"].as_str().unwrap_or("").contains("MAE"))
        .count();
    assert_eq!(stats, 2);
}

#[test]
fn static_backends_reject_facets() {
    let df = parity_frame(50);
    let options = DensityScatterOptions::new().facet_col("model");
    let source = DataSource::frame(&df, "actual", "predicted");
    assert!(density_scatter(&source, &options).is_err());
    assert!(density_hexbin(&source, &options, &HexbinOptions::default()).is_err());
}

#[test]
fn bad_stats_rejected_everywhere() {
    let err = validate_stats_param(&serde_json::json!(1)).unwrap_err();
    assert!(err.to_string().contains("stats must be bool or dict, got int instead."));
    assert!(DensityScatterOptions::from_json_str(r#"{"stats": "yes"}"#).is_err());
}

#[test]
fn residuals_and_error_bars() {
    let df = parity_frame(200);
    let source = DataSource::frame(&df, "actual", "predicted");
    let ax = residual_vs_actual(&source, &DensityScatterOptions::new()).unwrap();
    assert_eq!(ax.xlabel(), "Actual value");
    assert_eq!(ax.ylabel(), "Residual");

    let err = vec![0.1; 200];
    let options = DensityScatterOptions::new();
    let ax = scatter_with_err_bar(&source, Some(err.as_slice()), None, &options).unwrap();
    assert_eq!(ax.errorbars().len(), 200);
}
