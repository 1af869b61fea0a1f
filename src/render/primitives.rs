//! Primitive rendering functions.
//!
//! Every shape is alpha-blended into the framebuffer; an opaque color simply
//! overwrites. Filled shapes are rasterized by testing pixel centers against
//! the analytic shape, so sub-pixel centers and radii behave consistently.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};

/// An ellipse rotated around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center.
    pub center: Point,
    /// Half-extent along the (rotated) x axis.
    pub rx: f32,
    /// Half-extent along the (rotated) y axis.
    pub ry: f32,
    /// Rotation in degrees, clockwise on screen.
    pub rotation: f32,
}

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are plotted per step along the major axis, weighted by the
/// fractional distance from the ideal line.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut plot_pair = |major: i32, minor: f32, gap: f32| {
        let ipart = minor.floor() as i32;
        let (a, b) = (rfpart(minor) * gap, fpart(minor) * gap);
        if steep {
            plot(fb, ipart, major, color, a);
            plot(fb, ipart + 1, major, color, b);
        } else {
            plot(fb, major, ipart, color, a);
            plot(fb, major, ipart + 1, color, b);
        }
    };

    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xpxl1 = xend as i32;
    plot_pair(xpxl1, yend, rfpart(x0 + 0.5));
    let mut intery = yend + gradient;

    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xpxl2 = xend as i32;
    plot_pair(xpxl2, yend, fpart(x1 + 0.5));

    for x in (xpxl1 + 1)..xpxl2 {
        plot_pair(x, intery, 1.0);
        intery += gradient;
    }
}

/// Draw a line `width` pixels wide with round caps.
///
/// Widths of one pixel or less fall back to [`draw_line_aa`].
pub fn draw_thick_line(fb: &mut Framebuffer, from: Point, to: Point, width: f32, color: Rgba) {
    if width <= 1.0 {
        draw_line_aa(fb, from.x, from.y, to.x, to.y, color);
        return;
    }

    let half = width / 2.0;
    let (min_x, max_x) = (from.x.min(to.x) - half, from.x.max(to.x) + half);
    let (min_y, max_y) = (from.y.min(to.y) - half, from.y.max(to.y) + half);
    let seg_x = to.x - from.x;
    let seg_y = to.y - from.y;
    let len_sq = seg_x * seg_x + seg_y * seg_y;

    for_each_pixel_in(fb, min_x, min_y, max_x, max_y, |fb, px, py| {
        let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
        let t = if len_sq <= f32::EPSILON {
            0.0
        } else {
            (((cx - from.x) * seg_x + (cy - from.y) * seg_y) / len_sq).clamp(0.0, 1.0)
        };
        let dx = cx - (from.x + t * seg_x);
        let dy = cy - (from.y + t * seg_y);
        if dx * dx + dy * dy <= half * half {
            fb.blend_pixel(px, py, color);
        }
    });
}

/// Draw connected segments through `points`.
pub fn draw_polyline(fb: &mut Framebuffer, points: &[Point], width: f32, color: Rgba) {
    for pair in points.windows(2) {
        draw_thick_line(fb, pair[0], pair[1], width, color);
    }
}

/// Draw a straight line as dashes of `dash` pixels separated by `gap` pixels.
pub fn draw_dashed_line(fb: &mut Framebuffer, from: Point, to: Point, dash: f32, gap: f32, color: Rgba) {
    let length = from.distance(to);
    let period = dash.max(1.0) + gap.max(0.0);
    if length <= f32::EPSILON {
        return;
    }
    let mut start = 0.0;
    while start < length {
        let end = (start + dash.max(1.0)).min(length);
        let a = from.lerp(to, start / length);
        let b = from.lerp(to, end / length);
        draw_line_aa(fb, a.x, a.y, b.x, b.y, color);
        start += period;
    }
}

/// Fill a simple polygon (even-odd rule on pixel centers).
pub fn draw_polygon(fb: &mut Framebuffer, vertices: &[Point], color: Rgba) {
    if vertices.len() < 3 {
        return;
    }
    let (mut min_x, mut min_y) = (f32::INFINITY, f32::INFINITY);
    let (mut max_x, mut max_y) = (f32::NEG_INFINITY, f32::NEG_INFINITY);
    for v in vertices {
        min_x = min_x.min(v.x);
        min_y = min_y.min(v.y);
        max_x = max_x.max(v.x);
        max_y = max_y.max(v.y);
    }
    for_each_pixel_in(fb, min_x, min_y, max_x, max_y, |fb, px, py| {
        let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (a, b) = (vertices[i], vertices[j]);
            if (a.y > cy) != (b.y > cy) && cx < (b.x - a.x) * (cy - a.y) / (b.y - a.y) + a.x {
                inside = !inside;
            }
            j = i;
        }
        if inside {
            fb.blend_pixel(px, py, color);
        }
    });
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
    fb.blend_pixel_i(x, y, color.with_alpha(alpha));
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Visit every in-bounds pixel of a bounding box given in float coordinates.
fn for_each_pixel_in(
    fb: &mut Framebuffer,
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
    mut visit: impl FnMut(&mut Framebuffer, u32, u32),
) {
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        return;
    }
    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = max_x.ceil().min(fb.width() as f32 - 1.0);
    let y1 = max_y.ceil().min(fb.height() as f32 - 1.0);
    if x1 < 0.0 || y1 < 0.0 {
        return;
    }
    let (x1, y1) = (x1 as u32, y1 as u32);

    for py in y0..=y1 {
        for px in x0..=x1 {
            visit(fb, px, py);
        }
    }
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled, blended rectangle.
pub fn draw_rect(fb: &mut Framebuffer, rect: Rect, color: Rgba) {
    if color.a == 255 {
        let x = rect.x.max(0.0) as u32;
        let y = rect.y.max(0.0) as u32;
        let w = (rect.right() - x as f32).max(0.0) as u32;
        let h = (rect.bottom() - y as f32).max(0.0) as u32;
        fb.fill_rect(x, y, w, h, color);
        return;
    }
    for_each_pixel_in(fb, rect.x, rect.y, rect.right() - 1.0, rect.bottom() - 1.0, |fb, px, py| {
        fb.blend_pixel(px, py, color);
    });
}

/// Draw a rectangle outline `thickness` pixels wide, inside the rectangle.
pub fn draw_rect_outline(fb: &mut Framebuffer, rect: Rect, color: Rgba, thickness: f32) {
    let t = thickness.max(1.0);
    draw_rect(fb, Rect::new(rect.x, rect.y, rect.width, t), color);
    draw_rect(fb, Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
    draw_rect(fb, Rect::new(rect.x, rect.y + t, t, (rect.height - 2.0 * t).max(0.0)), color);
    draw_rect(fb, Rect::new(rect.right() - t, rect.y + t, t, (rect.height - 2.0 * t).max(0.0)), color);
}

// ============================================================================
// Circle / Ellipse Drawing
// ============================================================================

/// Draw a filled circle. A radius below one pixel still marks the center.
pub fn draw_circle(fb: &mut Framebuffer, center: Point, radius: f32, color: Rgba) {
    if radius < 1.0 {
        let (x, y) = center.to_pixel();
        fb.blend_pixel_i(x, y, color);
        return;
    }
    let r_sq = radius * radius;
    for_each_pixel_in(
        fb,
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
        |fb, px, py| {
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            if dx * dx + dy * dy <= r_sq {
                fb.blend_pixel(px, py, color);
            }
        },
    );
}

/// Draw a ring: the band between `radius - width` and `radius`.
pub fn draw_ring(fb: &mut Framebuffer, center: Point, radius: f32, width: f32, color: Rgba) {
    if radius <= 0.0 {
        return;
    }
    let inner = (radius - width.max(1.0)).max(0.0);
    let (outer_sq, inner_sq) = (radius * radius, inner * inner);
    for_each_pixel_in(
        fb,
        center.x - radius,
        center.y - radius,
        center.x + radius,
        center.y + radius,
        |fb, px, py| {
            let dx = px as f32 + 0.5 - center.x;
            let dy = py as f32 + 0.5 - center.y;
            let d_sq = dx * dx + dy * dy;
            if d_sq <= outer_sq && d_sq >= inner_sq {
                fb.blend_pixel(px, py, color);
            }
        },
    );
}

/// Normalized squared distance of a pixel center from an ellipse's center,
/// in the ellipse's own frame. Values `<= 1.0` are inside.
#[inline]
fn ellipse_metric(e: &Ellipse, cos: f32, sin: f32, px: u32, py: u32) -> f32 {
    let dx = px as f32 + 0.5 - e.center.x;
    let dy = py as f32 + 0.5 - e.center.y;
    let u = dx * cos + dy * sin;
    let v = -dx * sin + dy * cos;
    (u * u) / (e.rx * e.rx) + (v * v) / (e.ry * e.ry)
}

/// Draw a filled, rotated ellipse.
pub fn draw_ellipse(fb: &mut Framebuffer, ellipse: Ellipse, color: Rgba) {
    if ellipse.rx < 0.5 || ellipse.ry < 0.5 {
        return;
    }
    let (sin, cos) = ellipse.rotation.to_radians().sin_cos();
    let reach = ellipse.rx.max(ellipse.ry);
    let c = ellipse.center;
    for_each_pixel_in(fb, c.x - reach, c.y - reach, c.x + reach, c.y + reach, |fb, px, py| {
        if ellipse_metric(&ellipse, cos, sin, px, py) <= 1.0 {
            fb.blend_pixel(px, py, color);
        }
    });
}

/// Draw the outline of a rotated ellipse, roughly `width` pixels thick.
pub fn draw_ellipse_outline(fb: &mut Framebuffer, ellipse: Ellipse, width: f32, color: Rgba) {
    if ellipse.rx < 0.5 || ellipse.ry < 0.5 {
        return;
    }
    let inner = Ellipse {
        rx: (ellipse.rx - width).max(0.0),
        ry: (ellipse.ry - width).max(0.0),
        ..ellipse
    };
    let (sin, cos) = ellipse.rotation.to_radians().sin_cos();
    let reach = ellipse.rx.max(ellipse.ry);
    let c = ellipse.center;
    for_each_pixel_in(fb, c.x - reach, c.y - reach, c.x + reach, c.y + reach, |fb, px, py| {
        let outside_inner =
            inner.rx < 0.5 || inner.ry < 0.5 || ellipse_metric(&inner, cos, sin, px, py) > 1.0;
        if outside_inner && ellipse_metric(&ellipse, cos, sin, px, py) <= 1.0 {
            fb.blend_pixel(px, py, color);
        }
    });
}

// ============================================================================
// Tests
// ============================================================================
