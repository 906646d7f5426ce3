//! Emitting [`Axes`] as SVG elements.

use crate::axes::{Axes, CollectionKind, HAlign, Orientation, VAlign};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::output::{Baseline, SvgElement, SvgEncoder, TextAnchor};
use crate::scale::{ColorScale, Scale};
use crate::style::LineStyle;

use super::layout::{format_axis_tick, hexagon, linear_ticks, Viewport};

const TICK_FONT: f32 = 10.0;
const LABEL_FONT: f32 = 12.0;

/// Append the elements of `axes`, laid out in `area`, to `svg`.
///
/// # Errors
///
/// Returns an error if the axes limits are degenerate.
pub fn svg_axes(svg: &mut SvgEncoder, axes: &Axes, area: Rect) -> Result<()> {
    let docked = axes.colorbar().is_some_and(|c| c.rect.is_none());
    let limits = axes.limits();
    let vp = Viewport::new(area, limits, docked)?;
    let plot = vp.plot();

    for bar in axes.bars() {
        let (a, b) = match bar.orientation {
            Orientation::Vertical => (Point::new(bar.start, 0.0), Point::new(bar.end, bar.height)),
            Orientation::Horizontal => {
                (Point::new(0.0, bar.start), Point::new(bar.height, bar.end))
            }
        };
        let (x0, y0) = vp.to_pixel(a);
        let (x1, y1) = vp.to_pixel(b);
        svg.add_element(SvgElement::Rect {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
            fill: Some(bar.color),
            stroke: None,
        });
    }

    for collection in axes.collections() {
        let sizes = collection.sizes();
        for (i, (&offset, &fill)) in
            collection.offsets().iter().zip(collection.colors()).enumerate()
        {
            match collection.kind() {
                CollectionKind::Scatter => {
                    let (cx, cy) = vp.to_pixel(offset);
                    let r = sizes.get(i).copied().unwrap_or(4.0) / 2.0;
                    svg.circle(cx, cy, r, fill);
                }
                CollectionKind::Hexbin { width, height } => {
                    let points =
                        hexagon(offset, width, height).iter().map(|&v| vp.to_pixel(v)).collect();
                    svg.add_element(SvgElement::Polygon { points, fill });
                }
            }
        }
    }

    for err in axes.errorbars() {
        let c = err.center;
        if let Some(dx) = err.xerr {
            let (from, to) = (Point::new(c.x - dx, c.y), Point::new(c.x + dx, c.y));
            svg.line(vp.to_pixel(from), vp.to_pixel(to), err.color, None);
        }
        if let Some(dy) = err.yerr {
            let (from, to) = (Point::new(c.x, c.y - dy), Point::new(c.x, c.y + dy));
            svg.line(vp.to_pixel(from), vp.to_pixel(to), err.color, None);
        }
    }

    for line in axes.lines() {
        let dash = match line.linestyle {
            LineStyle::Solid => None,
            LineStyle::Dashed => Some("6,4"),
        };
        svg.line(vp.to_pixel(line.start), vp.to_pixel(line.end), line.rgba, dash);
    }

    svg.add_element(SvgElement::Rect {
        x: plot.x,
        y: plot.y,
        width: plot.width,
        height: plot.height,
        fill: None,
        stroke: Some(axes.axis_color()),
    });

    let xstep = tick_spacing(limits.x_min, limits.x_max);
    for t in linear_ticks(limits.x_min, limits.x_max, 5) {
        let (px, _) = vp.to_pixel(Point::new(t, limits.y_min));
        let bottom = plot.bottom();
        svg.line((px, bottom), (px, bottom + 4.0), axes.axis_color(), None);
        let text = format_axis_tick(t, xstep);
        label(svg, (px, bottom + 6.0), &text, (TextAnchor::Middle, Baseline::Top));
    }
    let ystep = tick_spacing(limits.y_min, limits.y_max);
    for t in linear_ticks(limits.y_min, limits.y_max, 5) {
        let (_, py) = vp.to_pixel(Point::new(limits.x_min, t));
        svg.line((plot.x - 4.0, py), (plot.x, py), axes.axis_color(), None);
        let text = format_axis_tick(t, ystep);
        label(svg, (plot.x - 6.0, py), &text, (TextAnchor::End, Baseline::Middle));
    }

    let center_x = plot.x + plot.width / 2.0;
    if !axes.xlabel().is_empty() {
        let y = plot.bottom() + TICK_FONT * 2.2;
        let anchor = (TextAnchor::Middle, Baseline::Top);
        let element = text_block((center_x, y), axes.xlabel(), LABEL_FONT, Rgba::BLACK, anchor);
        svg.add_element(element);
    }
    if !axes.ylabel().is_empty() {
        let at = (vp.area().x + LABEL_FONT, plot.y + plot.height / 2.0);
        let anchor = (TextAnchor::Middle, Baseline::Middle);
        let element = text_block(at, axes.ylabel(), LABEL_FONT, Rgba::BLACK, anchor);
        svg.add_element(rotated(element, -90.0));
    }
    if let Some(title) = axes.title() {
        let anchor = (TextAnchor::Middle, Baseline::Bottom);
        let at = (center_x, plot.y - 4.0);
        svg.add_element(text_block(at, title, LABEL_FONT, Rgba::BLACK, anchor));
    }

    for text in axes.texts() {
        let anchor = match text.h_align {
            HAlign::Left => TextAnchor::Start,
            HAlign::Center => TextAnchor::Middle,
            HAlign::Right => TextAnchor::End,
        };
        let baseline = match text.v_align {
            VAlign::Top => Baseline::Top,
            VAlign::Center => Baseline::Middle,
            VAlign::Bottom => Baseline::Bottom,
        };
        let at = vp.fraction(text.x, text.y);
        let element = text_block(at, &text.text, text.font_size, text.color, (anchor, baseline));
        svg.add_element(element);
    }

    if let Some(colorbar) = axes.colorbar() {
        let rect = vp.colorbar_rect(colorbar.rect);
        let scale = ColorScale::from_palette(colorbar.palette, colorbar.domain);
        let (lo, hi) = scale.domain();
        let id = format!("colorbar-{}", svg.elements().len());
        svg.add_element(SvgElement::Gradient {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            stops: colorbar.palette.stops(),
        });
        svg.add_element(SvgElement::Rect {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            fill: None,
            stroke: Some(axes.axis_color()),
        });

        let ticks: Vec<(f32, String)> = match (&colorbar.ticks.values, &colorbar.ticks.labels) {
            (Some(values), Some(labels)) => values.iter().copied().zip(labels.clone()).collect(),
            _ => {
                let step = tick_spacing(lo, hi);
                let ticks = linear_ticks(lo, hi, 5);
                ticks.into_iter().map(|t| (t, format_axis_tick(t, step))).collect()
            }
        };
        for (value, text) in ticks {
            let t = (value - lo) / (hi - lo);
            if !(0.0..=1.0).contains(&t) {
                continue;
            }
            let y = rect.bottom() - t * rect.height;
            label(svg, (rect.right() + 4.0, y), &text, (TextAnchor::Start, Baseline::Middle));
        }

        let at = (rect.right() + TICK_FONT * 4.0, rect.y + rect.height / 2.0);
        let anchor = (TextAnchor::Middle, Baseline::Middle);
        let element = text_block(at, &colorbar.label, LABEL_FONT, Rgba::BLACK, anchor);
        svg.add_element(rotated(element, 90.0));
    }
    Ok(())
}

fn tick_spacing(lo: f32, hi: f32) -> f32 {
    let ticks = linear_ticks(lo, hi, 5);
    match ticks.as_slice() {
        [a, b, ..] => b - a,
        _ => 1.0,
    }
}

fn label(svg: &mut SvgEncoder, at: (f32, f32), text: &str, anchor: (TextAnchor, Baseline)) {
    svg.add_element(text_block(at, text, TICK_FONT, Rgba::BLACK, anchor));
}

fn rotated(mut element: SvgElement, degrees: f32) -> SvgElement {
    if let SvgElement::Text { rotate, .. } = &mut element {
        *rotate = Some(degrees);
    }
    element
}

fn text_block(
    (x, y): (f32, f32),
    text: &str,
    font_size: f32,
    fill: Rgba,
    (anchor, baseline): (TextAnchor, Baseline),
) -> SvgElement {
    SvgElement::Text {
        x,
        y,
        lines: text.split('\n').map(str::to_string).collect(),
        font_size,
        fill,
        anchor,
        baseline,
        rotate: None,
    }
}
