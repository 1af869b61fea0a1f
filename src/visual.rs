//! Record → visual attribute mapping.
//!
//! Every mapping here is a pure function of one record and the constants in
//! [`MappingScales`]. Time-varying modulation (rotation, pulsing, jitter) is
//! applied later by the sketches on top of these base values.

use crate::color::Rgba;
use crate::dataset::{CityRainfall, SpeciesStats};
use crate::geometry::Point;
use crate::scale::MapProjection;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Bubble colors for the rainfall cities, in dataset order.
pub const CITY_PALETTE: [Rgba; 4] = [
    Rgba::rgb(0x1f, 0x77, 0xb4),
    Rgba::rgb(0x2c, 0xa0, 0x2c),
    Rgba::rgb(0xd6, 0x27, 0x28),
    Rgba::rgb(0x94, 0x67, 0xbd),
];

/// Derived, read-only rendering parameters of one record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualAttributes {
    /// Base fill color.
    pub color: Rgba,
    /// Primary size in pixels (petal length, bubble radius, spiral radius).
    pub base_size: f32,
    /// Secondary size in pixels (petal width, core radius); 0 when unused.
    pub secondary_size: f32,
    /// Number of repeated shapes (petals); 1 when unused.
    pub shape_count: u32,
    /// Base position in canvas pixels.
    pub position: Point,
}

/// Fixed multiplicative factors used by the mappings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingScales {
    /// Pixels per centimeter of petal length.
    pub petal_length: f32,
    /// Pixels per centimeter of petal width.
    pub petal_width: f32,
    /// Extra petals per centimeter of sepal factor.
    pub sepal_petals: f32,
    /// Core radius at a sepal factor of zero.
    pub core_base: f32,
    /// Core radius pixels per centimeter of sepal factor.
    pub core_sepal: f32,
    /// Bubble area (px²) per millimeter of rainfall.
    pub bubble_area: f32,
    /// Spiral radius added to every tide reading.
    pub tide_base_radius: f32,
    /// Smallest size a positive measurement maps to.
    pub min_size: f32,
}

impl Default for MappingScales {
    fn default() -> Self {
        Self {
            petal_length: 13.5,
            petal_width: 8.5,
            sepal_petals: 1.2,
            core_base: 7.0,
            core_sepal: 3.3,
            bubble_area: 0.5,
            tide_base_radius: 120.0,
            min_size: 1.0,
        }
    }
}

impl MappingScales {
    /// Scale a measurement into pixels.
    ///
    /// NaN and non-positive inputs map to 0. A positive input never maps
    /// below `min_size`.
    #[must_use]
    pub fn size(&self, value: f32, factor: f32) -> f32 {
        if !value.is_finite() || value <= 0.0 {
            return 0.0;
        }
        (value * factor).max(self.min_size)
    }

    /// Flower attributes of one species' mean measurements.
    ///
    /// `base_size` is the petal length, `secondary_size` the petal width and
    /// `shape_count` the petal count before the time-varying term.
    #[must_use]
    pub fn flower(&self, stats: &SpeciesStats, petals_base: u32) -> VisualAttributes {
        let sepal = stats.sepal_factor();
        let sepal = if sepal.is_finite() { sepal.max(0.0) } else { 0.0 };
        VisualAttributes {
            color: stats.species.color(),
            base_size: self.size(stats.petal_length, self.petal_length),
            secondary_size: self.size(stats.petal_width, self.petal_width),
            shape_count: petals_base + (sepal * self.sepal_petals) as u32,
            position: Point::ORIGIN,
        }
    }

    /// Core radius for a species at `scale`.
    #[must_use]
    pub fn core_radius(&self, stats: &SpeciesStats, scale: f32) -> f32 {
        let sepal = stats.sepal_factor();
        if !sepal.is_finite() {
            return self.core_base;
        }
        self.core_base + sepal.max(0.0) * self.core_sepal * scale
    }

    /// Bubble radius for a rainfall amount: area proportional to rainfall.
    #[must_use]
    pub fn bubble_radius(&self, rainfall_mm: f32) -> f32 {
        let area = self.size(rainfall_mm, self.bubble_area);
        if area <= 0.0 {
            0.0
        } else {
            area.sqrt().max(self.min_size)
        }
    }

    /// Bubble for city `index` showing `rainfall_mm`.
    #[must_use]
    pub fn city(
        &self,
        index: usize,
        city: &CityRainfall,
        rainfall_mm: f32,
        projection: &MapProjection,
    ) -> VisualAttributes {
        VisualAttributes {
            color: CITY_PALETTE[index % CITY_PALETTE.len()],
            base_size: self.bubble_radius(rainfall_mm),
            secondary_size: 0.0,
            shape_count: 1,
            position: projection.project(city.lon, city.lat),
        }
    }

    /// Spiral point `i` of `total` for a tide reading.
    #[must_use]
    pub fn tide(&self, i: usize, total: usize, tide: f32) -> VisualAttributes {
        let tide = if tide.is_finite() { tide } else { 0.0 };
        VisualAttributes {
            color: tide_color(i, total),
            base_size: (self.tide_base_radius + tide).max(0.0),
            secondary_size: 0.0,
            shape_count: 1,
            position: Point::ORIGIN,
        }
    }
}

/// Gradient along the spiral: pink-ish to green-ish over a blue base.
#[must_use]
pub fn tide_color(i: usize, total: usize) -> Rgba {
    let t = if total == 0 { 0.0 } else { i as f32 / total as f32 };
    let channel = |v: f32| v.clamp(0.0, 255.0) as u8;
    Rgba::rgb(channel(100.0 + 155.0 * t), channel(100.0 + 155.0 * (1.0 - t)), channel(200.0 + 55.0 * (t * PI).sin()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Species;
    use crate::geometry::Rect;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn setosa() -> SpeciesStats {
        SpeciesStats {
            species: Species::Setosa,
            sepal_length: 5.006,
            sepal_width: 3.418,
            petal_length: 1.464,
            petal_width: 0.244,
            count: 50,
        }
    }

    #[test]
    fn test_petal_length_times_twelve() {
        let scales = MappingScales { petal_length: 12.0, ..MappingScales::default() };
        assert_abs_diff_eq!(scales.size(1.4, scales.petal_length), 16.8, epsilon = 1e-4);
    }

    #[test]
    fn test_flower_defaults() {
        let attrs = MappingScales::default().flower(&setosa(), 10);
        assert_abs_diff_eq!(attrs.base_size, 1.464 * 13.5, epsilon = 1e-3);
        assert_abs_diff_eq!(attrs.secondary_size, 0.244 * 8.5, epsilon = 1e-3);
        // sepal factor 4.212 * 1.2 = 5.05
        assert_eq!(attrs.shape_count, 15);
        assert_eq!(attrs.color, Species::Setosa.color());
    }

    #[test]
    fn test_core_radius() {
        let r = MappingScales::default().core_radius(&setosa(), 1.0);
        assert_abs_diff_eq!(r, 7.0 + 4.212 * 3.3, epsilon = 1e-3);
    }

    #[test]
    fn test_nan_and_negative_default_to_zero() {
        let scales = MappingScales::default();
        assert_eq!(scales.size(f32::NAN, 13.5), 0.0);
        assert_eq!(scales.size(-2.0, 13.5), 0.0);
        assert_eq!(scales.bubble_radius(f32::NAN), 0.0);
    }

    #[test]
    fn test_small_positive_input_is_raised_to_min() {
        let scales = MappingScales::default();
        assert_abs_diff_eq!(scales.size(0.001, 13.5), 1.0);
        assert_abs_diff_eq!(scales.bubble_radius(0.01), 1.0);
    }

    #[test]
    fn test_bubble_area_tracks_rainfall() {
        let scales = MappingScales::default();
        let r1 = scales.bubble_radius(100.0);
        let r4 = scales.bubble_radius(400.0);
        assert_abs_diff_eq!(r4 / r1, 2.0, epsilon = 1e-4);
    }

    #[test]
    fn test_city_mapping() {
        let proj = MapProjection::world(Rect::new(0.0, 0.0, 360.0, 180.0)).unwrap();
        let city = CityRainfall {
            name: "Null Island".into(),
            lat: 0.0,
            lon: 0.0,
            annual_mm: 1000.0,
            monthly: [50.0; 12],
        };
        let attrs = MappingScales::default().city(5, &city, 50.0, &proj);
        assert_eq!(attrs.position, Point::new(180.0, 90.0));
        assert_eq!(attrs.color, CITY_PALETTE[1]);
        assert_abs_diff_eq!(attrs.base_size, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_tide_mapping_and_gradient() {
        let attrs = MappingScales::default().tide(0, 400, 200.0);
        assert_abs_diff_eq!(attrs.base_size, 320.0);
        assert_eq!(tide_color(0, 400), Rgba::rgb(100, 255, 200));
        let end = tide_color(400, 400);
        assert_eq!((end.r, end.g), (255, 100));
        assert_eq!(tide_color(0, 0), Rgba::rgb(100, 255, 200));
    }

    proptest! {
        #[test]
        fn prop_positive_measurements_give_visible_sizes(
            value in 1e-6f32..1e6,
            factor in 1e-3f32..100.0,
            petal_length in 1e-6f32..50.0,
            petal_width in 1e-6f32..50.0,
        ) {
            let scales = MappingScales::default();
            prop_assert!(scales.size(value, factor) > 0.0);
            prop_assert!(scales.bubble_radius(value) > 0.0);

            let stats = SpeciesStats { petal_length, petal_width, ..setosa() };
            let attrs = scales.flower(&stats, 10);
            prop_assert!(attrs.base_size > 0.0);
            prop_assert!(attrs.secondary_size > 0.0);
        }
    }
}
