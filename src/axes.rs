//! Static axes: the value returned by the static plotting backend.
//!
//! An [`Axes`] records what was drawn (labels, overlay lines, point
//! collections, text, error bars, bars and a colorbar) in data or axes
//! coordinates. It can be inspected directly, rasterized with
//! [`Axes::to_framebuffer`] or exported with [`Axes::to_svg`].

use crate::color::Rgba;
use crate::density::ColorbarTicks;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Bounds, Point, Rect};
use crate::lines::{AuxiliaryLine, LineKind};
use crate::output::SvgEncoder;
use crate::render;
use crate::scale::Palette;
use crate::style::{LineSpec, LineStyle};

/// A straight overlay segment in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Line2D {
    /// First endpoint.
    pub start: Point,
    /// Second endpoint.
    pub end: Point,
    /// Color name as configured (e.g. `"black"`).
    pub color: String,
    /// Resolved color.
    pub rgba: Rgba,
    /// Stroke pattern.
    pub linestyle: LineStyle,
    /// Which reference line this is, if any.
    pub kind: Option<LineKind>,
    /// Description, e.g. the fit equation.
    pub label: Option<String>,
}

impl Line2D {
    /// Build from an auxiliary line and its style.
    ///
    /// # Errors
    ///
    /// Returns an error if the style color is unknown.
    pub fn from_auxiliary(line: &AuxiliaryLine, spec: &LineSpec) -> Result<Self> {
        let segment = line.segment();
        Ok(Self {
            start: segment.start,
            end: segment.end,
            color: spec.color.clone(),
            rgba: spec.rgba()?,
            linestyle: spec.dash,
            kind: Some(line.kind()),
            label: Some(line.label()),
        })
    }
}

/// Shape of the markers in a [`Collection`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollectionKind {
    /// Circular markers; sizes are pixel diameters.
    Scatter,
    /// Pointy-top hexagons with the given data-space extents.
    Hexbin {
        /// Horizontal distance between adjacent centers.
        width: f32,
        /// Vertical distance between adjacent rows.
        height: f32,
    },
}

/// Colored markers placed at data offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    kind: CollectionKind,
    offsets: Vec<Point>,
    values: Vec<f32>,
    colors: Vec<Rgba>,
    sizes: Vec<f32>,
}

impl Collection {
    /// Create a collection; `values`, `colors` and `sizes` align with `offsets`.
    #[must_use]
    pub fn new(
        kind: CollectionKind,
        offsets: Vec<Point>,
        values: Vec<f32>,
        colors: Vec<Rgba>,
        sizes: Vec<f32>,
    ) -> Self {
        Self { kind, offsets, values, colors, sizes }
    }

    /// Marker shape.
    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Marker positions.
    #[must_use]
    pub fn offsets(&self) -> &[Point] {
        &self.offsets
    }

    /// The mapped value (color value or count) per marker.
    #[must_use]
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Fill color per marker.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }

    /// Marker size per marker.
    #[must_use]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Number of markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// True when the collection has no markers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HAlign {
    /// Anchor at the left edge.
    #[default]
    Left,
    /// Anchor at the center.
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VAlign {
    /// Anchor at the top line.
    Top,
    /// Anchor at the middle.
    Center,
    /// Anchor at the bottom line.
    #[default]
    Bottom,
}

/// Text placed in axes fraction coordinates (`(0, 0)` bottom left).
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Content; lines are separated by `\n`.
    pub text: String,
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Horizontal alignment.
    pub h_align: HAlign,
    /// Vertical alignment.
    pub v_align: VAlign,
    /// Font size in points.
    pub font_size: f32,
    /// Fill color.
    pub color: Rgba,
}

/// Error bars around one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorBar {
    /// Point the bars are centered on.
    pub center: Point,
    /// Symmetric x error.
    pub xerr: Option<f32>,
    /// Symmetric y error.
    pub yerr: Option<f32>,
    /// Bar color.
    pub color: Rgba,
}

/// Bar direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Bars rise from the x axis.
    Vertical,
    /// Bars extend from the y axis.
    Horizontal,
}

/// One histogram bar spanning `[start, end]` along its base axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    /// Lower edge along the base axis.
    pub start: f32,
    /// Upper edge along the base axis.
    pub end: f32,
    /// Length of the bar.
    pub height: f32,
    /// Direction.
    pub orientation: Orientation,
    /// Fill color.
    pub color: Rgba,
}

/// A continuous colorbar.
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    /// Label next to the bar.
    pub label: String,
    /// Palette.
    pub palette: Palette,
    /// Value range mapped onto the palette.
    pub domain: (f32, f32),
    /// Explicit ticks (log densities); `None` values use linear ticks.
    pub ticks: ColorbarTicks,
    /// Placement `[x, y, width, height]` in axes fractions; `None` docks it
    /// to the right of the plot.
    pub rect: Option<[f32; 4]>,
}

/// Everything drawn on one set of axes.
#[derive(Debug, Clone)]
pub struct Axes {
    title: Option<String>,
    xlabel: String,
    ylabel: String,
    limits: Option<Bounds>,
    lines: Vec<Line2D>,
    collections: Vec<Collection>,
    texts: Vec<Text>,
    errorbars: Vec<ErrorBar>,
    bars: Vec<Bar>,
    colorbar: Option<Colorbar>,
    background: Rgba,
    axis_color: Rgba,
}

impl Default for Axes {
    fn default() -> Self {
        Self::new()
    }
}

impl Axes {
    /// Empty axes on a white background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: None,
            xlabel: String::new(),
            ylabel: String::new(),
            limits: None,
            lines: Vec::new(),
            collections: Vec::new(),
            texts: Vec::new(),
            errorbars: Vec::new(),
            bars: Vec::new(),
            colorbar: None,
            background: Rgba::WHITE,
            axis_color: Rgba::BLACK,
        }
    }

    /// Set the title.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Set the x axis label.
    pub fn set_xlabel(&mut self, label: &str) {
        self.xlabel = label.to_string();
    }

    /// Set the y axis label.
    pub fn set_ylabel(&mut self, label: &str) {
        self.ylabel = label.to_string();
    }

    /// Fix the data limits instead of fitting them to the content.
    pub fn set_limits(&mut self, limits: Bounds) {
        self.limits = Some(limits);
    }

    /// Set background and axis colors.
    pub fn set_colors(&mut self, background: Rgba, axis: Rgba) {
        self.background = background;
        self.axis_color = axis;
    }

    /// Add an overlay line.
    pub fn add_line(&mut self, line: Line2D) {
        self.lines.push(line);
    }

    /// Add a marker collection.
    pub fn add_collection(&mut self, collection: Collection) {
        self.collections.push(collection);
    }

    /// Add text.
    pub fn add_text(&mut self, text: Text) {
        self.texts.push(text);
    }

    /// Add error bars.
    pub fn add_errorbar(&mut self, bar: ErrorBar) {
        self.errorbars.push(bar);
    }

    /// Add a histogram bar.
    pub fn add_bar(&mut self, bar: Bar) {
        self.bars.push(bar);
    }

    /// Attach a colorbar.
    pub fn set_colorbar(&mut self, colorbar: Colorbar) {
        self.colorbar = Some(colorbar);
    }

    /// Title, if set.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// X axis label.
    #[must_use]
    pub fn xlabel(&self) -> &str {
        &self.xlabel
    }

    /// Y axis label.
    #[must_use]
    pub fn ylabel(&self) -> &str {
        &self.ylabel
    }

    /// Overlay lines.
    #[must_use]
    pub fn lines(&self) -> &[Line2D] {
        &self.lines
    }

    /// Marker collections.
    #[must_use]
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// Text annotations.
    #[must_use]
    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    /// Error bars.
    #[must_use]
    pub fn errorbars(&self) -> &[ErrorBar] {
        &self.errorbars
    }

    /// Histogram bars.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Colorbar, if any.
    #[must_use]
    pub fn colorbar(&self) -> Option<&Colorbar> {
        self.colorbar.as_ref()
    }

    /// Background color.
    #[must_use]
    pub fn background(&self) -> Rgba {
        self.background
    }

    /// Axis frame color.
    #[must_use]
    pub fn axis_color(&self) -> Rgba {
        self.axis_color
    }

    /// Data limits: the fixed ones, or the content extent padded by 5%.
    #[must_use]
    pub fn limits(&self) -> Bounds {
        if let Some(limits) = self.limits {
            return limits.padded();
        }
        let mut xs: Vec<f32> = Vec::new();
        let mut ys: Vec<f32> = Vec::new();
        for c in &self.collections {
            xs.extend(c.offsets.iter().map(|p| p.x));
            ys.extend(c.offsets.iter().map(|p| p.y));
        }
        for l in &self.lines {
            xs.extend([l.start.x, l.end.x]);
            ys.extend([l.start.y, l.end.y]);
        }
        for e in &self.errorbars {
            let dx = e.xerr.unwrap_or(0.0);
            let dy = e.yerr.unwrap_or(0.0);
            xs.extend([e.center.x - dx, e.center.x + dx]);
            ys.extend([e.center.y - dy, e.center.y + dy]);
        }
        for b in &self.bars {
            let (base, len) = match b.orientation {
                Orientation::Vertical => (&mut xs, &mut ys),
                Orientation::Horizontal => (&mut ys, &mut xs),
            };
            base.extend([b.start, b.end]);
            len.extend([0.0, b.height]);
        }
        xs.retain(|v| v.is_finite());
        ys.retain(|v| v.is_finite());

        let Some(bounds) = Bounds::from_xy(&xs, &ys) else {
            return Bounds { x_min: 0.0, x_max: 1.0, y_min: 0.0, y_max: 1.0 };
        };
        let (px, py) = (bounds.width() * 0.05, bounds.height() * 0.05);
        Bounds {
            x_min: bounds.x_min - px,
            x_max: bounds.x_max + px,
            y_min: bounds.y_min - py,
            y_max: bounds.y_max + py,
        }
        .padded()
    }

    /// Rasterize into a new framebuffer. Text is only emitted by [`Axes::to_svg`].
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions.
    pub fn to_framebuffer(&self, width: u32, height: u32) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(self.background);
        render::draw_axes(&mut fb, self, Rect::new(0.0, 0.0, width as f32, height as f32))?;
        Ok(fb)
    }

    /// Render as vector SVG, text included.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions.
    pub fn to_svg(&self, width: u32, height: u32) -> Result<SvgEncoder> {
        let mut svg = SvgEncoder::new(width, height).background(Some(self.background));
        render::svg_axes(&mut svg, self, Rect::new(0.0, 0.0, width as f32, height as f32))?;
        Ok(svg)
    }
}

/// Main axes with marginal histograms of x (top) and y (right).
#[derive(Debug, Clone)]
pub struct JointAxes {
    /// The scatter or hexbin axes.
    pub main: Axes,
    /// Histogram of x values.
    pub top: Axes,
    /// Histogram of y values.
    pub right: Axes,
}

impl JointAxes {
    /// Share of the figure given to each marginal.
    pub const MARGINAL_FRACTION: f32 = 0.2;

    fn areas(width: f32, height: f32) -> (Rect, Rect, Rect) {
        let side = Self::MARGINAL_FRACTION;
        let main_w = width * (1.0 - side);
        let top_h = height * side;
        (
            Rect::new(0.0, top_h, main_w, height - top_h),
            Rect::new(0.0, 0.0, main_w, top_h),
            Rect::new(main_w, top_h, width - main_w, height - top_h),
        )
    }

    /// Rasterize all three axes into one framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions.
    pub fn to_framebuffer(&self, width: u32, height: u32) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(width, height)?;
        fb.clear(self.main.background);
        let (main, top, right) = Self::areas(width as f32, height as f32);
        render::draw_axes(&mut fb, &self.main, main)?;
        render::draw_axes(&mut fb, &self.top, top)?;
        render::draw_axes(&mut fb, &self.right, right)?;
        Ok(fb)
    }

    /// Render all three axes as one SVG.
    ///
    /// # Errors
    ///
    /// Returns an error for zero dimensions.
    pub fn to_svg(&self, width: u32, height: u32) -> Result<SvgEncoder> {
        let mut svg = SvgEncoder::new(width, height).background(Some(self.main.background));
        let (main, top, right) = Self::areas(width as f32, height as f32);
        render::svg_axes(&mut svg, &self.main, main)?;
        render::svg_axes(&mut svg, &self.top, top)?;
        render::svg_axes(&mut svg, &self.right, right)?;
        Ok(svg)
    }
}
