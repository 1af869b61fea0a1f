//! City rainfall: one year of monthly totals for the bubble map, and a century
//! of monthly values for the animated chart.
//!
//! Both tables default to seeded synthetic data. With the `fetch` feature the
//! monthly table can instead come from a JSON endpoint (see
//! [`fetch`](super::fetch)).

use crate::error::{Error, Result};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Short month labels.
pub const MONTH_NAMES: [&str; 12] =
    ["Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec"];

/// First year of the synthetic history.
pub const HISTORY_FIRST_YEAR: u32 = 1925;
/// Last year of the synthetic history (inclusive).
pub const HISTORY_LAST_YEAR: u32 = 2024;

/// A city with coordinates and a nominal annual rainfall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CitySite {
    /// Display name.
    pub name: &'static str,
    /// Latitude in degrees.
    pub lat: f32,
    /// Longitude in degrees.
    pub lon: f32,
    /// Nominal annual rainfall in millimeters.
    pub annual_mm: f32,
}

/// The four cities shown by both rainfall sketches.
pub const DEFAULT_SITES: [CitySite; 4] = [
    CitySite { name: "Hong Kong", lat: 22.3193, lon: 114.1694, annual_mm: 2400.0 },
    CitySite { name: "London", lat: 51.5074, lon: -0.1278, annual_mm: 600.0 },
    CitySite { name: "Sydney", lat: -33.8688, lon: 151.2093, annual_mm: 1200.0 },
    CitySite { name: "New York", lat: 40.7128, lon: -74.0060, annual_mm: 1200.0 },
];

/// One city's twelve monthly rainfall values.
#[derive(Debug, Clone, PartialEq)]
pub struct CityRainfall {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f32,
    /// Longitude in degrees.
    pub lon: f32,
    /// Annual rainfall in millimeters.
    pub annual_mm: f32,
    /// Monthly rainfall in millimeters, January first.
    pub monthly: [f32; 12],
}

impl CityRainfall {
    /// The four built-in cities with an all-zero monthly series.
    #[must_use]
    pub fn default_cities() -> Vec<Self> {
        DEFAULT_SITES
            .iter()
            .map(|site| Self {
                name: site.name.to_string(),
                lat: site.lat,
                lon: site.lon,
                annual_mm: site.annual_mm,
                monthly: [0.0; 12],
            })
            .collect()
    }

    /// Rainfall for month `index`, wrapping past December.
    #[must_use]
    pub fn month(&self, index: usize) -> f32 {
        self.monthly[index % 12]
    }
}

/// Monthly rainfall for a handful of cities.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallTable {
    cities: Vec<CityRainfall>,
}

impl RainfallTable {
    /// Seeded synthetic year: `|sin(2π·m/11)| · annual · U(0.8, 1.2)`.
    #[must_use]
    pub fn synthetic(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut cities = CityRainfall::default_cities();
        for city in &mut cities {
            for (m, value) in city.monthly.iter_mut().enumerate() {
                let phase = (TAU * m as f32 / 11.0).sin().abs();
                *value = phase * city.annual_mm * rng.random_range(0.8f32..1.2);
            }
        }
        Self { cities }
    }

    /// Wrap an explicit city list.
    ///
    /// # Errors
    ///
    /// Fails on an empty list.
    pub fn from_cities(cities: Vec<CityRainfall>) -> Result<Self> {
        if cities.is_empty() {
            return Err(Error::EmptyData("rainfall table"));
        }
        Ok(Self { cities })
    }

    /// Load from `url` when one is configured, otherwise generate.
    ///
    /// # Errors
    ///
    /// Fails if the fetch fails, or if a URL is given but the crate was built
    /// without the `fetch` feature.
    pub fn load(url: Option<&str>, token: Option<&str>, timeout_secs: u64, seed: u64) -> Result<Self> {
        match url {
            None => {
                info!("using synthetic rainfall (seed {seed})");
                Ok(Self::synthetic(seed))
            }
            #[cfg(feature = "fetch")]
            Some(url) => super::fetch::fetch_rainfall(url, token, timeout_secs),
            #[cfg(not(feature = "fetch"))]
            Some(url) => {
                let _ = (token, timeout_secs);
                Err(Error::FetchUnavailable(url.to_string()))
            }
        }
    }

    /// All cities.
    #[must_use]
    pub fn cities(&self) -> &[CityRainfall] {
        &self.cities
    }
}

/// One city's monthly values per year.
#[derive(Debug, Clone, PartialEq)]
pub struct CityHistory {
    /// Display name.
    pub name: String,
    /// Latitude in degrees.
    pub lat: f32,
    /// Longitude in degrees.
    pub lon: f32,
    /// `years[y][m]` in millimeters.
    pub years: Vec<[f32; 12]>,
}

/// A multi-year monthly rainfall history, one animation frame per month.
#[derive(Debug, Clone, PartialEq)]
pub struct RainfallHistory {
    first_year: u32,
    year_count: usize,
    cities: Vec<CityHistory>,
}

impl RainfallHistory {
    /// Seeded synthetic history for 1925..=2024, each month `U(50, 300)` mm.
    #[must_use]
    pub fn synthetic(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let year_count = (HISTORY_LAST_YEAR - HISTORY_FIRST_YEAR + 1) as usize;
        let cities = DEFAULT_SITES
            .iter()
            .map(|site| CityHistory {
                name: site.name.to_string(),
                lat: site.lat,
                lon: site.lon,
                years: (0..year_count)
                    .map(|_| std::array::from_fn(|_| rng.random_range(50.0f32..300.0)))
                    .collect(),
            })
            .collect();
        Self { first_year: HISTORY_FIRST_YEAR, year_count, cities }
    }

    /// Wrap explicit histories. All cities must cover the same years.
    ///
    /// # Errors
    ///
    /// Fails on an empty list or mismatched year counts.
    pub fn from_cities(first_year: u32, cities: Vec<CityHistory>) -> Result<Self> {
        let year_count = cities.first().map_or(0, |c| c.years.len());
        if year_count == 0 {
            return Err(Error::EmptyData("rainfall history"));
        }
        if let Some(bad) = cities.iter().find(|c| c.years.len() != year_count) {
            return Err(Error::dataset(
                bad.name.clone(),
                format!("{} years of history, expected {year_count}", bad.years.len()),
            ));
        }
        Ok(Self { first_year, year_count, cities })
    }

    /// All cities.
    #[must_use]
    pub fn cities(&self) -> &[CityHistory] {
        &self.cities
    }

    /// Number of monthly frames in the history.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.year_count * 12
    }

    /// `(calendar year, month index)` shown at `frame`, wrapping at the end.
    #[must_use]
    pub fn year_month(&self, frame: usize) -> (u32, usize) {
        let frame = frame % self.frame_count();
        (self.first_year + (frame / 12) as u32, frame % 12)
    }

    /// The twelve values of the year containing `frame`.
    #[must_use]
    pub fn year_values(&self, city: usize, frame: usize) -> &[f32; 12] {
        let frame = frame % self.frame_count();
        &self.cities[city].years[frame / 12]
    }

    /// Value shown for `city` at `frame`.
    #[must_use]
    pub fn value(&self, city: usize, frame: usize) -> f32 {
        let (_, month) = self.year_month(frame);
        self.year_values(city, frame)[month]
    }
}
