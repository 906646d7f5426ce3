//! Interactive figure model.
//!
//! A [`Figure`] mirrors the JSON schema understood by plotly.js: data traces
//! plus a layout with axes, a shared color axis, annotations and shapes. It is
//! a plain value; [`Figure::to_json`] is the only output path.

mod scatter;

pub use scatter::density_scatter_figure;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;

/// A complete figure: traces and layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    /// One trace per facet.
    pub data: Vec<Trace>,
    /// Axes, color axis and overlays.
    pub layout: Layout,
}

impl Figure {
    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write [`Figure::to_json`] output to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// A marker scatter trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    /// Trace type, always `"scatter"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Always `"markers"`.
    pub mode: &'static str,
    /// Facet category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// X values in drawing order.
    pub x: Vec<f32>,
    /// Y values in drawing order.
    pub y: Vec<f32>,
    /// Color and size encodings.
    pub marker: Marker,
    /// Raw densities, shown on hover.
    pub customdata: Vec<f64>,
    /// Hover text template.
    pub hovertemplate: String,
    /// X axis reference (`"x"`, `"x2"`, ...).
    pub xaxis: String,
    /// Y axis reference.
    pub yaxis: String,
}

/// Marker encodings of a [`Trace`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Values mapped through the shared color axis.
    pub color: Vec<f64>,
    /// Name of the color axis, always `"coloraxis"`.
    pub coloraxis: &'static str,
    /// Marker diameters, when a size column was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<f32>>,
}

/// Text with no other settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Title {
    /// The text, may contain `<br>`.
    pub text: String,
}

impl From<&str> for Title {
    fn from(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

/// One x or y axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Axis {
    /// Axis title.
    pub title: Title,
    /// Fraction of the figure width (x) or height (y) the axis spans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<[f32; 2]>,
    /// The crossing axis this one is drawn against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor: Option<String>,
    /// Axis whose range this one shares.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<String>,
}

/// Colorbar of the shared color axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorBar {
    /// Title text.
    pub title: Title,
    /// Tick positions in color-value space; set for log coloring.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<f32>>,
    /// Tick labels matching `tickvals`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
    /// Thickness in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thickness: Option<f32>,
    /// Length as a fraction of the plot height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub len: Option<f32>,
    /// Paper x position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Paper y position.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

/// Color axis shared by all traces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColorAxis {
    /// `(position, css color)` stops from low to high.
    pub colorscale: Vec<(f32, String)>,
    /// Colorbar settings.
    pub colorbar: ColorBar,
}

/// Font of an annotation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Font {
    /// Size in points.
    pub size: f32,
    /// CSS color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Text placed relative to an axis domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    /// HTML text.
    pub text: String,
    /// Position within the x domain.
    pub x: f32,
    /// Position within the y domain.
    pub y: f32,
    /// E.g. `"x domain"`, `"x2 domain"` or `"paper"`.
    pub xref: String,
    /// E.g. `"y domain"` or `"paper"`.
    pub yref: String,
    /// `"left"`, `"center"` or `"right"`.
    pub xanchor: &'static str,
    /// `"top"`, `"middle"` or `"bottom"`.
    pub yanchor: &'static str,
    /// Always false.
    pub showarrow: bool,
    /// Text font.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

/// Stroke of a [`Shape`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeLine {
    /// CSS color.
    pub color: String,
    /// `"solid"` or `"dash"`.
    pub dash: &'static str,
    /// Width in pixels.
    pub width: f32,
}

/// A line segment in data coordinates of one subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    /// Always `"line"`.
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Start x.
    pub x0: f32,
    /// Start y.
    pub y0: f32,
    /// End x.
    pub x1: f32,
    /// End y.
    pub y1: f32,
    /// X axis reference.
    pub xref: String,
    /// Y axis reference.
    pub yref: String,
    /// Stroke.
    pub line: ShapeLine,
}

/// Figure layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    /// First x axis.
    pub xaxis: Axis,
    /// First y axis.
    pub yaxis: Axis,
    /// Facet axes keyed `xaxis2`, `yaxis2`, ...
    #[serde(flatten)]
    pub facet_axes: BTreeMap<String, Axis>,
    /// Shared color axis.
    pub coloraxis: ColorAxis,
    /// Stats and facet title annotations.
    pub annotations: Vec<Annotation>,
    /// Identity and best-fit lines.
    pub shapes: Vec<Shape>,
}

impl Layout {
    /// Look up an axis by layout key (`"xaxis"`, `"yaxis3"`, ...).
    #[must_use]
    pub fn axis(&self, key: &str) -> Option<&Axis> {
        match key {
            "xaxis" | "xaxis1" => Some(&self.xaxis),
            "yaxis" | "yaxis1" => Some(&self.yaxis),
            _ => self.facet_axes.get(key),
        }
    }
}

/// Axis reference for subplot `index`: `"x"`, `"x2"`, `"x3"`, ...
pub(crate) fn axis_ref(letter: char, index: usize) -> String {
    if index == 0 {
        letter.to_string()
    } else {
        format!("{letter}{}", index + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_ref() {
        assert_eq!(axis_ref('x', 0), "x");
        assert_eq!(axis_ref('y', 2), "y3");
    }

    #[test]
    fn test_layout_axis_lookup_and_flatten() {
        let xaxis = Axis { title: "a".into(), ..Axis::default() };
        let mut layout = Layout { xaxis, ..Layout::default() };
        layout.facet_axes.insert("xaxis2".to_string(), Axis::default());
        assert_eq!(layout.axis("xaxis").map(|a| a.title.text.as_str()), Some("a"));
        assert!(layout.axis("xaxis2").is_some());
        assert!(layout.axis("xaxis3").is_none());

        let fig = Figure { data: Vec::new(), layout };
        let value: serde_json::Value = serde_json::from_str(&fig.to_json().unwrap()).unwrap();
        assert!(value["layout"]["xaxis2"].is_object());
        assert!(value["layout"]["coloraxis"]["colorbar"].get("tickvals").is_none());
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.json");
        Figure::default().write_json(&path).unwrap();
        let text = std::fs::read_to_string(path).unwrap();
        assert!(text.contains("\"layout\""));
    }
}
