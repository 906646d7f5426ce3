//! Regression statistics and the `stats` plot option.
//!
//! Errors are reduced with trueno's SIMD vectors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use trueno::Vector;

use crate::error::{Error, Result};

/// MAE, RMSE and R² between two sequences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionStats {
    /// Mean absolute error.
    pub mae: f32,
    /// Root-mean-square error.
    pub rmse: f32,
    /// Coefficient of determination.
    pub r2: f32,
}

/// Text flavor for stat annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Newline separated, Unicode superscript.
    Plain,
    /// `<br>` separated, `<sup>` superscript.
    Html,
}

impl RegressionStats {
    /// Annotation text, e.g. `MAE = 0.120\nRMSE = 0.200\nR² = 0.910`.
    #[must_use]
    pub fn annotation(&self, prefix: &str, markup: Markup) -> String {
        let (sep, r2) = match markup {
            Markup::Plain => ("\n", "R²"),
            Markup::Html => ("<br>", "R<sup>2</sup>"),
        };
        format!(
            "{prefix}MAE = {:.3}{sep}RMSE = {:.3}{sep}{r2} = {:.3}",
            self.mae, self.rmse, self.r2
        )
    }
}

/// Compute regression statistics of `y_pred` against `y_true`.
///
/// R² is `1 - SS_res / SS_tot`. A constant `y_true` gives R² = 1 for a perfect
/// prediction and 0 otherwise.
///
/// # Errors
///
/// Returns an error on length mismatch or when fewer than two pairs are given.
pub fn compute_regression_stats(y_true: &[f32], y_pred: &[f32]) -> Result<RegressionStats> {
    if y_true.len() != y_pred.len() {
        return Err(Error::DataLengthMismatch { x_len: y_true.len(), y_len: y_pred.len() });
    }
    if y_true.len() < 2 {
        return Err(Error::TooFewPoints { found: y_true.len() });
    }

    let residuals: Vec<f64> =
        y_pred.iter().zip(y_true).map(|(&p, &t)| f64::from(p) - f64::from(t)).collect();
    // Residuals are reduced relative to the largest one so squares stay in f32 range.
    let scale = residuals.iter().fold(0.0f64, |m, r| m.max(r.abs()));
    if scale == 0.0 || !scale.is_finite() {
        let mae = if scale == 0.0 { 0.0 } else { f32::INFINITY };
        return Ok(RegressionStats { mae, rmse: mae, r2: r2_score(y_true, y_pred) });
    }
    let unit: Vec<f32> = residuals.iter().map(|r| (r / scale) as f32).collect();
    let abs_unit: Vec<f32> = unit.iter().map(|r| r.abs()).collect();

    let unit_vec = Vector::from_vec(unit);
    let mae = Vector::from_vec(abs_unit).mean().unwrap_or(0.0);
    let mse = unit_vec.mul(&unit_vec).ok().and_then(|sq| sq.mean().ok()).unwrap_or(0.0);

    Ok(RegressionStats {
        mae: (f64::from(mae.max(0.0)) * scale) as f32,
        rmse: (f64::from(mse.max(0.0)).sqrt() * scale) as f32,
        r2: r2_score(y_true, y_pred),
    })
}

/// Coefficient of determination of `y_pred` against `y_true` (equal lengths).
pub(crate) fn r2_score(y_true: &[f32], y_pred: &[f32]) -> f32 {
    let n = y_true.len().max(1) as f64;
    let mean_true = y_true.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let ss_tot: f64 = y_true.iter().map(|&v| (f64::from(v) - mean_true).powi(2)).sum();
    let ss_res: f64 =
        y_true.iter().zip(y_pred).map(|(&t, &p)| (f64::from(p) - f64::from(t)).powi(2)).sum();

    let r2 = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else if ss_res == 0.0 {
        1.0
    } else {
        0.0
    };
    r2 as f32
}

/// Where a stats annotation is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum StatsLocation {
    /// Top left corner.
    UpperLeft,
    /// Top right corner.
    UpperRight,
    /// Bottom left corner.
    LowerLeft,
    /// Bottom right corner.
    #[default]
    LowerRight,
}

impl StatsLocation {
    /// Anchor in axes fraction coordinates `(x, y)`, `(0, 0)` at bottom left.
    #[must_use]
    pub fn anchor(self) -> (f32, f32) {
        match self {
            StatsLocation::UpperLeft => (0.02, 0.98),
            StatsLocation::UpperRight => (0.98, 0.98),
            StatsLocation::LowerLeft => (0.02, 0.02),
            StatsLocation::LowerRight => (0.98, 0.02),
        }
    }

    /// Horizontal alignment: `"left"` or `"right"`.
    #[must_use]
    pub fn x_align(self) -> &'static str {
        match self {
            StatsLocation::UpperLeft | StatsLocation::LowerLeft => "left",
            StatsLocation::UpperRight | StatsLocation::LowerRight => "right",
        }
    }

    /// Vertical alignment: `"top"` or `"bottom"`.
    #[must_use]
    pub fn y_align(self) -> &'static str {
        match self {
            StatsLocation::UpperLeft | StatsLocation::UpperRight => "top",
            StatsLocation::LowerLeft | StatsLocation::LowerRight => "bottom",
        }
    }
}

impl TryFrom<String> for StatsLocation {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "upper left" | "top left" => Ok(StatsLocation::UpperLeft),
            "upper right" | "top right" => Ok(StatsLocation::UpperRight),
            "lower left" | "bottom left" => Ok(StatsLocation::LowerLeft),
            "lower right" | "bottom right" => Ok(StatsLocation::LowerRight),
            _ => Err(Error::invalid_option("stats.loc", format!("unknown location {value:?}"))),
        }
    }
}

/// Font overrides for the stats annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FontSpec {
    /// Font size in points.
    pub size: Option<f32>,
    /// CSS color name or hex.
    pub color: Option<String>,
}

/// Recognized stats options.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsOptions {
    /// Text prepended to the annotation.
    pub prefix: Option<String>,
    /// Corner placement.
    pub loc: Option<StatsLocation>,
    /// Explicit x position (axes fraction); overrides `loc`.
    pub x: Option<f32>,
    /// Explicit y position (axes fraction); overrides `loc`.
    pub y: Option<f32>,
    /// Text styling.
    pub font: Option<FontSpec>,
}

impl StatsOptions {
    /// Resolved `(x, y)` position in axes fraction coordinates.
    #[must_use]
    pub fn position(&self) -> (f32, f32) {
        let (ax, ay) = self.loc.unwrap_or_default().anchor();
        (self.x.unwrap_or(ax), self.y.unwrap_or(ay))
    }

    /// The prefix or an empty string.
    #[must_use]
    pub fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or("")
    }

    fn from_map(map: &serde_json::Map<String, Value>) -> Result<Self> {
        let mut opts = StatsOptions::default();
        for (key, value) in map {
            match key.as_str() {
                "prefix" => {
                    let s = value
                        .as_str()
                        .ok_or_else(|| Error::invalid_option("stats.prefix", "must be a string"))?;
                    opts.prefix = Some(s.to_string());
                }
                "loc" => {
                    let s = value
                        .as_str()
                        .ok_or_else(|| Error::invalid_option("stats.loc", "must be a string"))?;
                    opts.loc = Some(StatsLocation::try_from(s.to_string())?);
                }
                "x" => opts.x = Some(as_f32(value, "stats.x")?),
                "y" => opts.y = Some(as_f32(value, "stats.y")?),
                "font" | "prop" => opts.font = Some(font_from_value(value)?),
                other => tracing::warn!(key = other, "ignoring unrecognized stats option"),
            }
        }
        Ok(opts)
    }
}

fn as_f32(value: &Value, name: &str) -> Result<f32> {
    value.as_f64().map(|v| v as f32).ok_or_else(|| Error::invalid_option(name, "must be a number"))
}

fn font_from_value(value: &Value) -> Result<FontSpec> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::invalid_option("stats.font", "must be a mapping"))?;
    let mut font = FontSpec::default();
    for (key, v) in map {
        match key.as_str() {
            "size" | "fontsize" => font.size = Some(as_f32(v, "stats.font.size")?),
            "color" => font.color = v.as_str().map(str::to_string),
            other => tracing::warn!(key = other, "ignoring unrecognized font option"),
        }
    }
    Ok(font)
}

/// The validated `stats` option.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub enum StatsParam {
    /// No annotation.
    Disabled,
    /// Annotation with default placement and styling.
    #[default]
    EnabledDefault,
    /// Annotation with caller options.
    EnabledWithOptions(StatsOptions),
}

impl StatsParam {
    /// Whether an annotation should be drawn.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, StatsParam::Disabled)
    }

    /// Options for an enabled annotation (defaults for `EnabledDefault`).
    #[must_use]
    pub fn options(&self) -> Option<StatsOptions> {
        match self {
            StatsParam::Disabled => None,
            StatsParam::EnabledDefault => Some(StatsOptions::default()),
            StatsParam::EnabledWithOptions(opts) => Some(opts.clone()),
        }
    }
}

impl From<bool> for StatsParam {
    fn from(enabled: bool) -> Self {
        if enabled {
            StatsParam::EnabledDefault
        } else {
            StatsParam::Disabled
        }
    }
}

impl From<StatsOptions> for StatsParam {
    fn from(opts: StatsOptions) -> Self {
        StatsParam::EnabledWithOptions(opts)
    }
}

impl TryFrom<Value> for StatsParam {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        validate_stats_param(&value)
    }
}

/// Validate a dynamically typed `stats` value.
///
/// Accepts a boolean or a mapping of recognized options.
///
/// # Errors
///
/// Returns [`Error::InvalidStatsType`] naming the offending type for anything
/// else, or an option error for a malformed mapping entry.
pub fn validate_stats_param(value: &Value) -> Result<StatsParam> {
    match value {
        Value::Bool(enabled) => Ok(StatsParam::from(*enabled)),
        Value::Object(map) => StatsOptions::from_map(map).map(StatsParam::EnabledWithOptions),
        other => Err(Error::InvalidStatsType { type_name: value_type_name(other).to_string() }),
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "None",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() || n.is_u64() => "int",
        Value::Number(_) => "float",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_identical_inputs() {
        let y = [1.0, 2.5, 3.0, 7.0];
        let stats = compute_regression_stats(&y, &y).unwrap();
        assert_eq!(stats.mae, 0.0);
        assert_eq!(stats.rmse, 0.0);
        assert_eq!(stats.r2, 1.0);
    }

    #[test]
    fn test_known_values() {
        let y_true = [1.0, 2.0, 3.0, 4.0];
        let y_pred = [2.0, 2.0, 3.0, 2.0];
        let stats = compute_regression_stats(&y_true, &y_pred).unwrap();
        assert_relative_eq!(stats.mae, 0.75, epsilon = 1e-6);
        assert_relative_eq!(stats.rmse, 1.25f32.sqrt(), epsilon = 1e-6);
        // SS_res = 5, SS_tot = 5
        assert_relative_eq!(stats.r2, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_constant_truth() {
        let stats = compute_regression_stats(&[2.0, 2.0], &[2.0, 3.0]).unwrap();
        assert_eq!(stats.r2, 0.0);
    }

    #[test]
    fn test_large_residuals_stay_finite() {
        let stats = compute_regression_stats(&[1e20, 2e20, 0.0], &[3e20, 0.0, 1e20]).unwrap();
        assert_relative_eq!(stats.mae, 5e20 / 3.0, max_relative = 1e-5);
        assert_relative_eq!(stats.rmse, 3f32.sqrt() * 1e20, max_relative = 1e-5);
        assert_relative_eq!(stats.r2, -3.5, epsilon = 1e-5);
    }

    #[test]
    fn test_stats_length_mismatch() {
        assert!(compute_regression_stats(&[1.0, 2.0], &[1.0]).is_err());
        assert!(compute_regression_stats(&[1.0], &[1.0]).is_err());
    }

    #[test]
    fn test_annotation_text() {
        let stats = RegressionStats { mae: 0.1234, rmse: 0.5, r2: 0.9 };
        assert_eq!(
            stats.annotation("", Markup::Plain),
            "MAE = 0.123\nRMSE = 0.500\nR² = 0.900"
        );
        let html = stats.annotation("test ", Markup::Html);
        assert!(html.starts_with("test MAE"));
        assert!(html.contains("R<sup>2</sup>"));
    }

    #[test]
    fn test_validate_bool() {
        assert_eq!(validate_stats_param(&json!(true)).unwrap(), StatsParam::EnabledDefault);
        assert_eq!(validate_stats_param(&json!(false)).unwrap(), StatsParam::Disabled);
    }

    #[test]
    fn test_validate_mapping() {
        let param = validate_stats_param(&json!({
            "prefix": "test",
            "loc": "lower right",
            "prop": {"fontsize": 10}
        }))
        .unwrap();
        let opts = param.options().unwrap();
        assert_eq!(opts.prefix(), "test");
        assert_eq!(opts.loc, Some(StatsLocation::LowerRight));
        assert_eq!(opts.font.and_then(|f| f.size), Some(10.0));
    }

    #[test]
    fn test_validate_mapping_xy() {
        let param =
            validate_stats_param(&json!({"prefix": "test", "x": 1, "y": 1, "font": {"size": 10}}))
                .unwrap();
        let opts = param.options().unwrap();
        assert_eq!(opts.position(), (1.0, 1.0));
    }

    #[test]
    fn test_validate_rejects_other_types() {
        for (value, name) in [(json!(1), "int"), (json!([1]), "list"), (json!("foo"), "str")] {
            let err = validate_stats_param(&value).unwrap_err();
            assert_eq!(err.to_string(), format!("stats must be bool or dict, got {name} instead."));
        }
    }

    #[test]
    fn test_validate_bad_loc() {
        assert!(validate_stats_param(&json!({"loc": "middle"})).is_err());
    }

    #[test]
    fn test_default_position() {
        assert_eq!(StatsOptions::default().position(), (0.98, 0.02));
        let upper = StatsOptions { loc: Some(StatsLocation::UpperLeft), ..Default::default() };
        assert_eq!(upper.position(), (0.02, 0.98));
        assert_eq!(StatsLocation::UpperLeft.x_align(), "left");
        assert_eq!(StatsLocation::UpperLeft.y_align(), "top");
    }

    #[test]
    fn test_stats_param_deserialize() {
        let param: StatsParam = serde_json::from_str(r#"{"prefix": "p"}"#).unwrap();
        assert!(param.is_enabled());
        let err = serde_json::from_str::<StatsParam>("3").unwrap_err();
        assert!(err.to_string().contains("stats must be bool or dict, got int instead."));
    }

    proptest! {
        #[test]
        fn prop_self_comparison_is_perfect(values in prop::collection::vec(-1e3f32..1e3, 2..100)) {
            let stats = compute_regression_stats(&values, &values).unwrap();
            prop_assert_eq!(stats.mae, 0.0);
            prop_assert_eq!(stats.rmse, 0.0);
            prop_assert_eq!(stats.r2, 1.0);
        }

        #[test]
        fn prop_errors_non_negative(
            pairs in prop::collection::vec((-1e3f32..1e3, -1e3f32..1e3), 2..100),
        ) {
            let t: Vec<f32> = pairs.iter().map(|p| p.0).collect();
            let p: Vec<f32> = pairs.iter().map(|p| p.1).collect();
            let stats = compute_regression_stats(&t, &p).unwrap();
            prop_assert!(stats.mae >= 0.0);
            prop_assert!(stats.rmse >= 0.0);
            prop_assert!(stats.r2 <= 1.0);
        }
    }
}
