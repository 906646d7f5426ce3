//! Mapping from data and axes-fraction coordinates to pixels.

use crate::error::Result;
use crate::geometry::{Bounds, Point, Rect};
use crate::scale::{LinearScale, Scale};

const MARGIN_LEFT: f32 = 0.12;
const MARGIN_RIGHT: f32 = 0.05;
const MARGIN_TOP: f32 = 0.06;
const MARGIN_BOTTOM: f32 = 0.1;
const COLORBAR_SPACE: f32 = 0.15;

/// The plotting area of one axes inside a figure, with its data scales.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    area: Rect,
    plot: Rect,
    x: LinearScale,
    y: LinearScale,
}

impl Viewport {
    /// Lay out `area`, leaving room on the right for a docked colorbar.
    ///
    /// # Errors
    ///
    /// Returns an error if the limits have zero width or height.
    pub fn new(area: Rect, limits: Bounds, docked_colorbar: bool) -> Result<Self> {
        let right = MARGIN_RIGHT + if docked_colorbar { COLORBAR_SPACE } else { 0.0 };
        let plot = Rect::new(
            area.x + area.width * MARGIN_LEFT,
            area.y + area.height * MARGIN_TOP,
            area.width * (1.0 - MARGIN_LEFT - right),
            area.height * (1.0 - MARGIN_TOP - MARGIN_BOTTOM),
        );
        let x = LinearScale::new((limits.x_min, limits.x_max), (plot.x, plot.right()))?;
        let y = LinearScale::new((limits.y_min, limits.y_max), (plot.bottom(), plot.y))?;
        Ok(Self { area, plot, x, y })
    }

    /// The whole area given to the axes.
    #[must_use]
    pub fn area(&self) -> Rect {
        self.area
    }

    /// The framed plotting rectangle.
    #[must_use]
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// Data coordinates to pixels.
    #[must_use]
    pub fn to_pixel(&self, p: Point) -> (f32, f32) {
        (self.x.scale(p.x), self.y.scale(p.y))
    }

    /// Axes fractions (`(0, 0)` bottom left) to pixels.
    #[must_use]
    pub fn fraction(&self, fx: f32, fy: f32) -> (f32, f32) {
        (self.plot.x + fx * self.plot.width, self.plot.bottom() - fy * self.plot.height)
    }

    /// Colorbar rectangle: docked right of the plot, or `[x, y, w, h]` in axes fractions.
    #[must_use]
    pub fn colorbar_rect(&self, placement: Option<[f32; 4]>) -> Rect {
        match placement {
            Some([fx, fy, fw, fh]) => {
                let (x, top) = self.fraction(fx, fy + fh);
                Rect::new(x, top, fw * self.plot.width, fh * self.plot.height)
            }
            None => Rect::new(
                self.plot.right() + self.area.width * 0.03,
                self.plot.y,
                self.area.width * 0.03,
                self.plot.height,
            ),
        }
    }
}

/// Ticks at multiples of a 1-2-5 step inside `[lo, hi]`, at most about `target` of them.
#[must_use]
pub fn linear_ticks(lo: f32, hi: f32, target: usize) -> Vec<f32> {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || target == 0 {
        return Vec::new();
    }
    let step = tick_step(span, target);
    let first = (lo / step).ceil() as i64;
    let last = (hi / step).floor() as i64;
    (first..=last).map(|i| i as f32 * step).collect()
}

fn tick_step(span: f32, target: usize) -> f32 {
    let raw = span / target as f32;
    let magnitude = 10f32.powf(raw.log10().floor());
    [1.0, 2.0, 5.0, 10.0]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|&s| s >= raw)
        .unwrap_or(10.0 * magnitude)
}

/// Format an axis tick with no more decimals than the spacing needs.
#[must_use]
pub fn format_axis_tick(value: f32, step: f32) -> String {
    let decimals = if step >= 1.0 { 0 } else { (-step.log10().floor()) as usize };
    let text = format!("{value:.decimals$}");
    if text.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return text.trim_start_matches('-').to_string();
    }
    text
}

/// Vertices of a pointy-top hexagon with the given lattice spacing.
#[must_use]
pub fn hexagon(center: Point, width: f32, height: f32) -> [Point; 6] {
    let (hw, third) = (width / 2.0, height / 3.0);
    [
        Point::new(center.x + hw, center.y - third / 2.0),
        Point::new(center.x + hw, center.y + third / 2.0),
        Point::new(center.x, center.y + third),
        Point::new(center.x - hw, center.y + third / 2.0),
        Point::new(center.x - hw, center.y - third / 2.0),
        Point::new(center.x, center.y - third),
    ]
}
