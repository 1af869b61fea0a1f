//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to pixel positions and colors. The two map
//! sketches project longitude/latitude through a pair of linear scales
//! ([`MapProjection`]).

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain bounds are equal or not finite.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { domain_min: domain.0, domain_max: domain.1, range_min: range.0, range_max: range.1 })
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Color scale: piecewise-linear interpolation through a list of stops.
#[derive(Debug, Clone)]
pub struct ColorScale {
    colors: Vec<Rgba>,
    domain_min: f32,
    domain_max: f32,
}

impl ColorScale {
    /// Create a new color scale.
    ///
    /// # Errors
    ///
    /// Returns an error if colors is empty or domain is invalid.
    pub fn new(colors: Vec<Rgba>, domain: (f32, f32)) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::ScaleDomain("Color scale requires at least one color".to_string()));
        }

        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self { colors, domain_min: domain.0, domain_max: domain.1 })
    }

    /// Yellow-green-blue sequential scale, used for rainfall density.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty.
    pub fn yl_gn_bu(domain: (f32, f32)) -> Result<Self> {
        Self::new(
            vec![
                Rgba::rgb(255, 255, 217),
                Rgba::rgb(237, 248, 177),
                Rgba::rgb(199, 233, 180),
                Rgba::rgb(127, 205, 187),
                Rgba::rgb(65, 182, 196),
                Rgba::rgb(29, 145, 192),
                Rgba::rgb(34, 94, 168),
                Rgba::rgb(37, 52, 148),
                Rgba::rgb(8, 29, 88),
            ],
            domain,
        )
    }
}

impl Scale<f32, Rgba> for ColorScale {
    fn scale(&self, value: f32) -> Rgba {
        let t = ((value - self.domain_min) / (self.domain_max - self.domain_min)).clamp(0.0, 1.0);

        if self.colors.len() == 1 {
            return self.colors[0];
        }

        let segment_count = self.colors.len() - 1;
        let segment = ((t * segment_count as f32).floor() as usize).min(segment_count - 1);
        let local_t = t * segment_count as f32 - segment as f32;

        self.colors[segment].lerp(self.colors[segment + 1], local_t)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (*self.colors.first().unwrap_or(&Rgba::BLACK), *self.colors.last().unwrap_or(&Rgba::WHITE))
    }
}

/// Equirectangular lon/lat projection into a pixel rectangle.
///
/// North is up: the maximum latitude maps to the top edge of `area`.
#[derive(Debug, Clone, Copy)]
pub struct MapProjection {
    lon: LinearScale,
    lat: LinearScale,
    area: Rect,
}

impl MapProjection {
    /// Project `lon_range` × `lat_range` (degrees) onto `area`.
    ///
    /// # Errors
    ///
    /// Returns an error if either range is empty.
    pub fn new(lon_range: (f32, f32), lat_range: (f32, f32), area: Rect) -> Result<Self> {
        let lon = LinearScale::new(lon_range, (area.x, area.right()))?;
        let lat = LinearScale::new(lat_range, (area.bottom(), area.y))?;
        Ok(Self { lon, lat, area })
    }

    /// The whole globe, latitudes -90..90.
    ///
    /// # Errors
    ///
    /// Never fails for the fixed ranges; the `Result` mirrors [`new`](Self::new).
    pub fn world(area: Rect) -> Result<Self> {
        Self::new((-180.0, 180.0), (-90.0, 90.0), area)
    }

    /// Pixel position of a coordinate.
    #[must_use]
    pub fn project(&self, lon: f32, lat: f32) -> Point {
        Point::new(self.lon.scale(lon), self.lat.scale(lat))
    }

    /// Target pixel rectangle.
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0)).unwrap();
        assert_abs_diff_eq!(scale.scale(0.0), 0.0);
        assert_abs_diff_eq!(scale.scale(50.0), 0.5);
        assert_abs_diff_eq!(scale.scale(100.0), 1.0);
    }

    #[test]
    fn test_linear_scale_rejects_degenerate_domain() {
        assert!(LinearScale::new((5.0, 5.0), (0.0, 1.0)).is_err());
        assert!(LinearScale::new((f32::NAN, 5.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_color_scale_endpoints_and_clamping() {
        let scale = ColorScale::new(vec![Rgba::BLACK, Rgba::WHITE], (0.0, 1.0)).unwrap();
        assert_eq!(scale.scale(-1.0), Rgba::BLACK);
        assert_eq!(scale.scale(2.0), Rgba::WHITE);
        let mid = scale.scale(0.5);
        assert!(mid.r > 100 && mid.r < 150);
    }

    #[test]
    fn test_color_scale_invalid() {
        assert!(ColorScale::new(vec![], (0.0, 1.0)).is_err());
        assert!(ColorScale::yl_gn_bu((5.0, 5.0)).is_err());
    }

    #[test]
    fn test_yl_gn_bu_runs_light_to_dark() {
        let scale = ColorScale::yl_gn_bu((0.0, 10.0)).unwrap();
        let (light, dark) = scale.range();
        assert_eq!(scale.scale(0.0), light);
        assert_eq!(scale.scale(10.0), dark);
        assert!(u16::from(light.r) + u16::from(light.g) > u16::from(dark.r) + u16::from(dark.g));
    }

    #[test]
    fn test_projection_corners() {
        let proj = MapProjection::world(Rect::new(0.0, 0.0, 360.0, 180.0)).unwrap();
        assert_eq!(proj.project(-180.0, 90.0), Point::new(0.0, 0.0));
        assert_eq!(proj.project(180.0, -90.0), Point::new(360.0, 180.0));
        assert_eq!(proj.project(0.0, 0.0), Point::new(180.0, 90.0));
    }

    #[test]
    fn test_projection_cropped_latitudes() {
        let proj =
            MapProjection::new((-180.0, 180.0), (-60.0, 80.0), Rect::new(10.0, 20.0, 600.0, 400.0)).unwrap();
        assert_eq!(proj.project(-180.0, 80.0), Point::new(10.0, 20.0));
        assert_eq!(proj.project(180.0, -60.0), Point::new(610.0, 420.0));
        let equator = proj.project(0.0, 0.0);
        assert_abs_diff_eq!(equator.y, 20.0 + 400.0 * 80.0 / 140.0, epsilon = 1e-3);
    }
}
