//! Geometric primitives for plot assembly.
//!
//! Points and segments live in data coordinates until a renderer maps them to
//! pixels; [`Rect`] describes pixel-space plot areas.

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A line segment between two points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    /// Start point.
    pub start: Point,
    /// End point.
    pub end: Point,
}

impl Line {
    /// Create a new line segment.
    #[must_use]
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Axis-aligned extent of a set of data points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Smallest x value.
    pub x_min: f32,
    /// Largest x value.
    pub x_max: f32,
    /// Smallest y value.
    pub y_min: f32,
    /// Largest y value.
    pub y_max: f32,
}

impl Bounds {
    /// Compute the extent of paired x/y values. Returns `None` for empty input.
    #[must_use]
    pub fn from_xy(x: &[f32], y: &[f32]) -> Option<Self> {
        if x.is_empty() || y.is_empty() {
            return None;
        }
        Some(Self {
            x_min: x.iter().copied().fold(f32::INFINITY, f32::min),
            x_max: x.iter().copied().fold(f32::NEG_INFINITY, f32::max),
            y_min: y.iter().copied().fold(f32::INFINITY, f32::min),
            y_max: y.iter().copied().fold(f32::NEG_INFINITY, f32::max),
        })
    }

    /// Width of the x extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the y extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }

    /// Combined `(min, max)` over both axes.
    #[must_use]
    pub fn combined(&self) -> (f32, f32) {
        (self.x_min.min(self.y_min), self.x_max.max(self.y_max))
    }

    /// Pad zero-width axes so the extent can back a scale.
    #[must_use]
    pub fn padded(self) -> Self {
        let pad = |lo: f32, hi: f32| {
            if (hi - lo).abs() < f32::EPSILON {
                (lo - 0.5, hi + 0.5)
            } else {
                (lo, hi)
            }
        };
        let (x_min, x_max) = pad(self.x_min, self.x_max);
        let (y_min, y_max) = pad(self.y_min, self.y_max);
        Self { x_min, x_max, y_min, y_max }
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}
