//! Points and rectangles in canvas pixel space.
//!
//! The y axis points down, as on screen. Angles are in degrees unless a
//! function name says otherwise.

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The point at `radius` from `center` along `angle_rad` (radians).
    #[must_use]
    pub fn polar(center: Self, radius: f32, angle_rad: f32) -> Self {
        Self::new(center.x + radius * angle_rad.cos(), center.y + radius * angle_rad.sin())
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Nearest integer pixel.
    #[must_use]
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// An axis-aligned rectangle: top-left corner plus size.
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

    /// Shrink by `margin` on every side. Never produces a negative size.
    #[must_use]
    pub fn inset(&self, margin: f32) -> Self {
        Self::new(
            self.x + margin,
            self.y + margin,
            (self.width - 2.0 * margin).max(0.0),
            (self.height - 2.0 * margin).max(0.0),
        )
    }

    /// Split vertically at `fraction` of the width into (left, right).
    #[must_use]
    pub fn split_horizontal(&self, fraction: f32) -> (Self, Self) {
        let left_w = self.width * fraction.clamp(0.0, 1.0);
        (
            Self::new(self.x, self.y, left_w, self.height),
            Self::new(self.x + left_w, self.y, self.width - left_w, self.height),
        )
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

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_abs_diff_eq!(p1.distance(p2), 5.0, epsilon = 1e-3);
    }

    #[test]
    fn test_polar_quarter_turn() {
        let p = Point::polar(Point::new(10.0, 10.0), 5.0, std::f32::consts::FRAC_PI_2);
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(p.y, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn test_point_lerp_and_pixel() {
        let mid = Point::ORIGIN.lerp(Point::new(10.0, 7.0), 0.5);
        assert_eq!(mid.to_pixel(), (5, 4));
    }

    #[test]
    fn test_rect_inset_and_split() {
        let rect = Rect::new(0.0, 0.0, 100.0, 40.0);
        let inner = rect.inset(10.0);
        assert_eq!(inner, Rect::new(10.0, 10.0, 80.0, 20.0));
        assert_eq!(rect.inset(50.0).height, 0.0);

        let (left, right) = rect.split_horizontal(0.6);
        assert_abs_diff_eq!(left.width, 60.0);
        assert_abs_diff_eq!(right.x, 60.0);
        assert_abs_diff_eq!(right.right(), 100.0);
    }
}
