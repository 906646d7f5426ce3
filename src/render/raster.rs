//! Rasterizing [`Axes`] into a [`Framebuffer`].

use crate::axes::{Axes, CollectionKind, Colorbar, Line2D, Orientation};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::scale::{ColorScale, Scale};
use crate::style::LineStyle;

use super::layout::{hexagon, linear_ticks, Viewport};
use super::primitives::{
    draw_dashed_line, draw_line, draw_line_aa, draw_point, draw_rect, draw_rect_outline,
    fill_polygon,
};

const DASH: f32 = 6.0;
const GAP: f32 = 4.0;
const TICK_LEN: i32 = 4;

/// Draw `axes` into the `area` of `fb`. Text is skipped.
///
/// # Errors
///
/// Returns an error if the axes limits are degenerate.
pub fn draw_axes(fb: &mut Framebuffer, axes: &Axes, area: Rect) -> Result<()> {
    let docked = axes.colorbar().is_some_and(|c| c.rect.is_none());
    let vp = Viewport::new(area, axes.limits(), docked)?;

    for bar in axes.bars() {
        let (a, b) = match bar.orientation {
            Orientation::Vertical => {
                (Point::new(bar.start, 0.0), Point::new(bar.end, bar.height))
            }
            Orientation::Horizontal => {
                (Point::new(0.0, bar.start), Point::new(bar.height, bar.end))
            }
        };
        let (x0, y0) = vp.to_pixel(a);
        let (x1, y1) = vp.to_pixel(b);
        let (left, top) = (x0.min(x1), y0.min(y1));
        draw_rect(
            fb,
            left.round() as i32,
            top.round() as i32,
            (x0 - x1).abs().round().max(1.0) as u32,
            (y0 - y1).abs().round().max(1.0) as u32,
            bar.color,
        );
    }

    for collection in axes.collections() {
        let sizes = collection.sizes();
        for (i, (&offset, &color)) in
            collection.offsets().iter().zip(collection.colors()).enumerate()
        {
            match collection.kind() {
                CollectionKind::Scatter => {
                    let (px, py) = vp.to_pixel(offset);
                    draw_point(fb, px, py, sizes.get(i).copied().unwrap_or(4.0), color);
                }
                CollectionKind::Hexbin { width, height } => {
                    let vertices: Vec<(f32, f32)> = hexagon(offset, width, height)
                        .iter()
                        .map(|&v| vp.to_pixel(v))
                        .collect();
                    fill_polygon(fb, &vertices, color);
                }
            }
        }
    }

    for err in axes.errorbars() {
        let c = err.center;
        if let Some(dx) = err.xerr {
            segment(fb, &vp, Point::new(c.x - dx, c.y), Point::new(c.x + dx, c.y), err.color);
        }
        if let Some(dy) = err.yerr {
            segment(fb, &vp, Point::new(c.x, c.y - dy), Point::new(c.x, c.y + dy), err.color);
        }
    }

    for line in axes.lines() {
        draw_overlay(fb, &vp, line);
    }

    draw_frame(fb, &vp, axes);
    if let Some(colorbar) = axes.colorbar() {
        draw_colorbar(fb, &vp, colorbar, axes);
    }
    Ok(())
}

fn segment(fb: &mut Framebuffer, vp: &Viewport, a: Point, b: Point, color: Rgba) {
    let (x0, y0) = vp.to_pixel(a);
    let (x1, y1) = vp.to_pixel(b);
    let px = |v: f32| v.round() as i32;
    draw_line(fb, px(x0), px(y0), px(x1), px(y1), color);
}

fn draw_overlay(fb: &mut Framebuffer, vp: &Viewport, line: &Line2D) {
    let (x0, y0) = vp.to_pixel(line.start);
    let (x1, y1) = vp.to_pixel(line.end);
    match line.linestyle {
        LineStyle::Solid => draw_line_aa(fb, x0, y0, x1, y1, line.rgba),
        LineStyle::Dashed => draw_dashed_line(fb, x0, y0, x1, y1, DASH, GAP, line.rgba),
    }
}

fn draw_frame(fb: &mut Framebuffer, vp: &Viewport, axes: &Axes) {
    let plot = vp.plot();
    let color = axes.axis_color();
    let (left, top) = (plot.x.round() as i32, plot.y.round() as i32);
    let (right, bottom) = (plot.right().round() as i32, plot.bottom().round() as i32);
    draw_rect_outline(
        fb,
        left,
        top,
        (right - left + 1).max(1) as u32,
        (bottom - top + 1).max(1) as u32,
        color,
    );

    let limits = axes.limits();
    for t in linear_ticks(limits.x_min, limits.x_max, 5) {
        let (px, _) = vp.to_pixel(Point::new(t, limits.y_min));
        let px = px.round() as i32;
        draw_line(fb, px, bottom, px, bottom + TICK_LEN, color);
    }
    for t in linear_ticks(limits.y_min, limits.y_max, 5) {
        let (_, py) = vp.to_pixel(Point::new(limits.x_min, t));
        let py = py.round() as i32;
        draw_line(fb, left - TICK_LEN, py, left, py, color);
    }
}

fn draw_colorbar(fb: &mut Framebuffer, vp: &Viewport, colorbar: &Colorbar, axes: &Axes) {
    let rect = vp.colorbar_rect(colorbar.rect);
    let scale = ColorScale::from_palette(colorbar.palette, colorbar.domain);
    let (lo, hi) = scale.domain();
    let (top, rows) = (rect.y.round() as i32, rect.height.round().max(1.0) as i32);
    let (left, width) = (rect.x.round() as i32, rect.width.round().max(1.0) as u32);

    for row in 0..rows {
        let t = 1.0 - (row as f32 + 0.5) / rows as f32;
        draw_rect(fb, left, top + row, width, 1, scale.scale(lo + t * (hi - lo)));
    }
    draw_rect_outline(fb, left, top, width, rows as u32, axes.axis_color());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::axes::{Bar, Collection, ErrorBar};
    use crate::density::ColorbarTicks;
    use crate::lines::LineKind;
    use crate::scale::Palette;

    fn blank(w: u32, h: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    fn line(style: LineStyle, color: Rgba) -> Line2D {
        Line2D {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 10.0),
            color: "c".to_string(),
            rgba: color,
            linestyle: style,
            kind: Some(LineKind::Identity),
            label: None,
        }
    }

    #[test]
    fn test_hexbin_collection_fills_area() {
        let mut ax = Axes::new();
        ax.add_collection(Collection::new(
            CollectionKind::Hexbin { width: 2.0, height: 2.0 },
            vec![Point::new(2.0, 2.0), Point::new(8.0, 8.0)],
            vec![1.0, 3.0],
            vec![Rgba::RED, Rgba::RED],
            vec![0.0, 0.0],
        ));
        let mut fb = blank(200, 200);
        draw_axes(&mut fb, &ax, Rect::new(0.0, 0.0, 200.0, 200.0)).unwrap();
        assert!(fb.count_pixels(Rgba::RED) > 50);
    }

    #[test]
    fn test_dashed_line_lighter_than_solid() {
        let render = |style| {
            let mut ax = Axes::new();
            ax.add_line(line(style, Rgba::NAVY));
            let mut fb = blank(120, 120);
            draw_axes(&mut fb, &ax, Rect::new(0.0, 0.0, 120.0, 120.0)).unwrap();
            fb.luminance_stats().2
        };
        assert!(render(LineStyle::Dashed) > render(LineStyle::Solid));
    }

    #[test]
    fn test_bars_and_errorbars() {
        let mut ax = Axes::new();
        ax.add_bar(Bar {
            start: 0.0,
            end: 5.0,
            height: 4.0,
            orientation: Orientation::Horizontal,
            color: Rgba::BLUE,
        });
        ax.add_errorbar(ErrorBar {
            center: Point::new(8.0, 8.0),
            xerr: Some(1.0),
            yerr: Some(1.0),
            color: Rgba::RED,
        });
        let mut fb = blank(100, 100);
        draw_axes(&mut fb, &ax, Rect::new(0.0, 0.0, 100.0, 100.0)).unwrap();
        assert!(fb.count_pixels(Rgba::BLUE) > 100);
        assert!(fb.count_pixels(Rgba::RED) > 4);
    }

    #[test]
    fn test_colorbar_gradient() {
        let mut ax = Axes::new();
        ax.add_line(line(LineStyle::Solid, Rgba::BLACK));
        ax.set_colorbar(Colorbar {
            label: "Density".to_string(),
            palette: Palette::Viridis,
            domain: (0.0, 1.0),
            ticks: ColorbarTicks::default(),
            rect: None,
        });
        let mut fb = blank(300, 200);
        draw_axes(&mut fb, &ax, Rect::new(0.0, 0.0, 300.0, 200.0)).unwrap();
        let colors = Palette::Viridis.colors();
        let (first, last) = (colors[0], colors[colors.len() - 1]);
        let near = |a: Rgba, b: Rgba| {
            (i32::from(a.r) - i32::from(b.r)).abs() < 20
                && (i32::from(a.g) - i32::from(b.g)).abs() < 20
        };
        let vp = Viewport::new(Rect::new(0.0, 0.0, 300.0, 200.0), ax.limits(), true).unwrap();
        let cbar = vp.colorbar_rect(None);
        let cx = (cbar.x + cbar.width / 2.0) as u32;
        let top = fb.get_pixel(cx, cbar.y as u32 + 2).unwrap();
        let bottom = fb.get_pixel(cx, cbar.bottom() as u32 - 2).unwrap();
        assert!(near(top, last));
        assert!(near(bottom, first));
    }
}
