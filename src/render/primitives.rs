//! Rasterization of lines, markers and polygons.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Lines
// ============================================================================

/// Draw a one-pixel line with Bresenham's algorithm.
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        if x >= 0 && y >= 0 {
            fb.set_pixel(x as u32, y as u32, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line with Xiaolin Wu's algorithm.
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { (y1 - y0) / dx };

    let mut put = |major: i32, minor: i32, intensity: f32| {
        if steep {
            plot(fb, minor, major, color, intensity);
        } else {
            plot(fb, major, minor, color, intensity);
        }
    };

    let start = x0.round();
    let y_start = y0 + gradient * (start - x0);
    let gap = 1.0 - fpart(x0 + 0.5);
    put(start as i32, y_start.floor() as i32, (1.0 - fpart(y_start)) * gap);
    put(start as i32, y_start.floor() as i32 + 1, fpart(y_start) * gap);

    let end = x1.round();
    let y_end = y1 + gradient * (end - x1);
    let gap = fpart(x1 + 0.5);
    put(end as i32, y_end.floor() as i32, (1.0 - fpart(y_end)) * gap);
    put(end as i32, y_end.floor() as i32 + 1, fpart(y_end) * gap);

    let mut inter_y = y_start + gradient;
    for major in (start as i32 + 1)..(end as i32) {
        put(major, inter_y.floor() as i32, 1.0 - fpart(inter_y));
        put(major, inter_y.floor() as i32 + 1, fpart(inter_y));
        inter_y += gradient;
    }
}

/// Draw an anti-aliased dashed line; `dash` and `gap` are pixel lengths.
#[allow(clippy::too_many_arguments)]
pub fn draw_dashed_line(
    fb: &mut Framebuffer,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    dash: f32,
    gap: f32,
    color: Rgba,
) {
    let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
    let period = (dash + gap).max(1.0);
    if length < f32::EPSILON {
        return;
    }
    let (ux, uy) = ((x1 - x0) / length, (y1 - y0) / length);
    let mut t = 0.0;
    while t < length {
        let t_end = (t + dash).min(length);
        draw_line_aa(fb, x0 + ux * t, y0 + uy * t, x0 + ux * t_end, y0 + uy * t_end, color);
        t += period;
    }
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x < 0 || y < 0 {
        return;
    }
    let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
    fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

// ============================================================================
// Rectangles
// ============================================================================

/// Fill a rectangle given in possibly negative pixel coordinates.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    let (x0, y0) = (x.max(0), y.max(0));
    let w = (i64::from(width) - i64::from(x0 - x)).max(0) as u32;
    let h = (i64::from(height) - i64::from(y0 - y)).max(0) as u32;
    fb.fill_rect(x0 as u32, y0 as u32, w, h, color);
}

/// Draw a one-pixel rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
) {
    if width == 0 || height == 0 {
        return;
    }
    let right = x + width as i32 - 1;
    let bottom = y + height as i32 - 1;
    draw_line(fb, x, y, right, y, color);
    draw_line(fb, x, bottom, right, bottom, color);
    draw_line(fb, x, y, x, bottom, color);
    draw_line(fb, right, y, right, bottom, color);
}

// ============================================================================
// Markers and polygons
// ============================================================================

/// Draw a filled circle with the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.blend_pixel(cx as u32, cy as u32, color);
        }
        return;
    }
    let (mut x, mut y, mut err) = (radius, 0, 1 - radius);
    while x >= y {
        span(fb, cx - x, cx + x, cy + y, color);
        if y != 0 {
            span(fb, cx - x, cx + x, cy - y, color);
        }
        if x != y {
            span(fb, cx - y, cx + y, cy + x, color);
            span(fb, cx - y, cx + y, cy - x, color);
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Draw a scatter marker of diameter `size` centered at `(x, y)`.
pub fn draw_point(fb: &mut Framebuffer, x: f32, y: f32, size: f32, color: Rgba) {
    draw_circle(fb, x.round() as i32, y.round() as i32, (size / 2.0).round() as i32, color);
}

/// Fill a simple polygon with even-odd scanlines sampled at pixel centers.
pub fn fill_polygon(fb: &mut Framebuffer, vertices: &[(f32, f32)], color: Rgba) {
    if vertices.len() < 3 {
        return;
    }
    let y_min = vertices.iter().map(|v| v.1).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let y_max = vertices
        .iter()
        .map(|v| v.1)
        .fold(f32::NEG_INFINITY, f32::max)
        .ceil()
        .min(fb.height() as f32);

    let mut crossings: Vec<f32> = Vec::with_capacity(vertices.len());
    let mut row = y_min as i32;
    while (row as f32) < y_max {
        let sample_y = row as f32 + 0.5;
        crossings.clear();
        for (i, &(ax, ay)) in vertices.iter().enumerate() {
            let (bx, by) = vertices[(i + 1) % vertices.len()];
            if (ay <= sample_y && by > sample_y) || (by <= sample_y && ay > sample_y) {
                crossings.push(ax + (sample_y - ay) / (by - ay) * (bx - ax));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for pair in crossings.chunks_exact(2) {
            let x_start = (pair[0] - 0.5).ceil() as i32;
            let x_end = (pair[1] - 0.5).floor() as i32;
            span(fb, x_start, x_end, row, color);
        }
        row += 1;
    }
}

/// Blend a horizontal run of pixels, inclusive on both ends.
#[inline]
fn span(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }
    let start = x1.max(0);
    let end = x2.min(fb.width() as i32 - 1);
    for x in start..=end {
        fb.blend_pixel(x as u32, y as u32, color);
    }
}
