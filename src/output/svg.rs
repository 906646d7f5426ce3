//! SVG output encoder.
//!
//! Vector output for axes (text included) plus an embedded-PNG mode for
//! framebuffers.

use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match the SVG attributes they are written to.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect { x: f32, y: f32, width: f32, height: f32, fill: Option<Rgba>, stroke: Option<Rgba> },
    /// Filled circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Straight line; `dash` is an SVG `stroke-dasharray`.
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Rgba,
        stroke_width: f32,
        dash: Option<String>,
    },
    /// Filled polygon
    Polygon { points: Vec<(f32, f32)>, fill: Rgba },
    /// Text; each entry of `lines` is one row, optionally rotated around `(x, y)`.
    Text {
        x: f32,
        y: f32,
        lines: Vec<String>,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        baseline: Baseline,
        rotate: Option<f32>,
    },
    /// Rectangle filled with a linear gradient running bottom to top.
    Gradient { id: String, x: f32, y: f32, width: f32, height: f32, stops: Vec<(f32, Rgba)> },
    /// Embedded raster image (base64 PNG)
    Image { x: f32, y: f32, width: f32, height: f32, data: String },
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

/// Vertical placement of a text block relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Baseline {
    /// The first row hangs below the position.
    Top,
    /// The block is centered on the position.
    Middle,
    /// The last row sits on the position.
    #[default]
    Bottom,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create an empty document on a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Embed a framebuffer as a base64 PNG image.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_framebuffer(fb: &Framebuffer) -> Result<Self> {
        let png_bytes = super::PngEncoder::to_bytes(fb)?;
        let data = format!("data:image/png;base64,{}", STANDARD.encode(&png_bytes));
        let mut encoder = Self::new(fb.width(), fb.height()).background(None);
        encoder.elements.push(SvgElement::Image {
            x: 0.0,
            y: 0.0,
            width: fb.width() as f32,
            height: fb.height() as f32,
            data,
        });
        Ok(encoder)
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Document width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Document height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Elements in painting order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Add a filled circle.
    pub fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Rgba) {
        self.elements.push(SvgElement::Circle { cx, cy, r, fill });
    }

    /// Add a solid or dashed line.
    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: Rgba, dash: Option<&str>) {
        self.elements.push(SvgElement::Line {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            stroke,
            stroke_width: 1.5,
            dash: dash.map(str::to_string),
        });
    }

    /// Add a single-row text.
    pub fn text(&mut self, x: f32, y: f32, text: &str, font_size: f32, anchor: TextAnchor) {
        self.elements.push(SvgElement::Text {
            x,
            y,
            lines: vec![text.to_string()],
            font_size,
            fill: Rgba::BLACK,
            anchor,
            baseline: Baseline::Bottom,
            rotate: None,
        });
    }

    /// Render to an SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height,
        );

        let gradients: Vec<&SvgElement> =
            self.elements.iter().filter(|e| matches!(e, SvgElement::Gradient { .. })).collect();
        if !gradients.is_empty() {
            svg.push_str("  <defs>\n");
            for g in gradients {
                if let SvgElement::Gradient { id, stops, .. } = g {
                    let _ = writeln!(
                        svg,
                        r#"    <linearGradient id="{id}" x1="0" y1="1" x2="0" y2="0">"#
                    );
                    for (offset, color) in stops {
                        let _ = writeln!(
                            svg,
                            r#"      <stop offset="{offset}" stop-color="{}"/>"#,
                            color.to_css()
                        );
                    }
                    svg.push_str("    </linearGradient>\n");
                }
            }
            svg.push_str("  </defs>\n");
        }

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }
        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }
        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke } => {
            let fill = fill.map_or_else(|| "none".to_string(), Rgba::to_css);
            let stroke = stroke
                .map(|s| format!(r#" stroke="{}" stroke-width="1""#, s.to_css()))
                .unwrap_or_default();
            format!(
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{fill}"{stroke}/>"#
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{}"/>"#, fill.to_css())
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width, dash } => {
            let dash = dash
                .as_ref()
                .map(|d| format!(r#" stroke-dasharray="{d}""#))
                .unwrap_or_default();
            format!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{}" stroke-width="{stroke_width}"{dash}/>"#,
                stroke.to_css()
            )
        }
        SvgElement::Polygon { points, fill } => {
            let points: Vec<String> = points.iter().map(|(x, y)| format!("{x},{y}")).collect();
            format!(r#"<polygon points="{}" fill="{}"/>"#, points.join(" "), fill.to_css())
        }
        SvgElement::Text { x, y, lines, font_size, fill, anchor, baseline, rotate } => {
            let rows = lines.len().max(1) as f32;
            let line_height = font_size * 1.2;
            let first_dy = match baseline {
                Baseline::Top => *font_size,
                Baseline::Middle => font_size * 0.35 - (rows - 1.0) * line_height / 2.0,
                Baseline::Bottom => -(rows - 1.0) * line_height,
            };
            let transform = rotate
                .map(|deg| format!(r#" transform="rotate({deg} {x} {y})""#))
                .unwrap_or_default();
            let mut out = format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{}" font-family="sans-serif"{transform}>"#,
                fill.to_css(),
                anchor.as_str()
            );
            for (i, line) in lines.iter().enumerate() {
                let dy = if i == 0 { first_dy } else { line_height };
                let _ = write!(out, r#"<tspan x="{x}" dy="{dy}">{}</tspan>"#, escape(line));
            }
            out.push_str("</text>");
            out
        }
        SvgElement::Gradient { id, x, y, width, height, .. } => {
            format!(
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="url(#{id})"/>"#
            )
        }
        SvgElement::Image { x, y, width, height, data } => {
            format!(
                r#"<image x="{x}" y="{y}" width="{width}" height="{height}" xlink:href="{data}"/>"#
            )
        }
    }
}
