//! Rasterization and layout of static axes.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: overlay lines, dashed or solid
//! - **Bresenham's Line**: frames, ticks and error bars
//! - **Midpoint Circle**: filled scatter markers
//! - **Scanline fill**: hexbin cells
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod layout;
mod primitives;
mod raster;
mod vector;

pub use layout::{format_axis_tick, hexagon, linear_ticks, Viewport};
pub use primitives::{
    draw_circle, draw_dashed_line, draw_line, draw_line_aa, draw_point, draw_rect,
    draw_rect_outline, fill_polygon,
};
pub use raster::draw_axes;
pub use vector::svg_axes;
