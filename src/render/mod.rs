//! Rasterization of geometric primitives onto a [`Framebuffer`](crate::framebuffer::Framebuffer).
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: smooth one-pixel lines
//! - **Pixel-center coverage**: filled circles, rings, rotated ellipses and
//!   round-capped thick lines
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod primitives;

pub use primitives::{
    draw_circle, draw_dashed_line, draw_ellipse, draw_ellipse_outline, draw_line_aa, draw_polygon, draw_polyline,
    draw_rect, draw_rect_outline, draw_ring, draw_thick_line, Ellipse,
};
