//! One-shot HTTP fetch of the monthly rainfall table.
//!
//! The endpoint returns a JSON array of
//! `{ "name", "lat", "lon", "annual_mm"?, "monthly": [12 numbers] }`.

use super::rainfall::{CityRainfall, RainfallTable};
use crate::error::{Error, Result};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct RawCity {
    name: String,
    lat: f32,
    lon: f32,
    #[serde(default)]
    annual_mm: Option<f32>,
    monthly: Vec<f32>,
}

/// GET `url` (with an optional bearer token) and decode the rainfall table.
///
/// # Errors
///
/// Returns [`Error::Fetch`] on transport errors, non-success status, or a
/// body that is not a usable rainfall table.
pub fn fetch_rainfall(url: &str, token: Option<&str>, timeout_secs: u64) -> Result<RainfallTable> {
    let fetch_err = |message: String| Error::Fetch { url: url.to_string(), message };

    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| fetch_err(e.to_string()))?;

    let mut request = client.get(url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    info!("fetching rainfall from {url}");
    let body = request
        .send()
        .and_then(reqwest::blocking::Response::error_for_status)
        .and_then(reqwest::blocking::Response::text)
        .map_err(|e| fetch_err(e.to_string()))?;

    parse_rainfall_json(url, &body)
}

/// Decode a rainfall JSON body. Entries without exactly twelve finite monthly
/// values are skipped.
///
/// # Errors
///
/// Fails if the body is not a JSON array of cities or no entry is usable.
pub fn parse_rainfall_json(source: &str, body: &str) -> Result<RainfallTable> {
    let raw: Vec<RawCity> = serde_json::from_str(body)
        .map_err(|e| Error::Fetch { url: source.to_string(), message: e.to_string() })?;

    let cities: Vec<CityRainfall> = raw
        .into_iter()
        .filter_map(|city| {
            let Ok(monthly) = <[f32; 12]>::try_from(city.monthly.as_slice()) else {
                warn!("{source}: skipping {} ({} monthly values)", city.name, city.monthly.len());
                return None;
            };
            if !monthly.iter().all(|v| v.is_finite()) || !city.lat.is_finite() || !city.lon.is_finite() {
                warn!("{source}: skipping {} (non-finite values)", city.name);
                return None;
            }
            let annual_mm = city.annual_mm.unwrap_or_else(|| monthly.iter().sum());
            Some(CityRainfall { name: city.name, lat: city.lat, lon: city.lon, annual_mm, monthly })
        })
        .collect();

    RainfallTable::from_cities(cities)
        .map_err(|_| Error::Fetch { url: source.to_string(), message: "no usable cities".to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_body() {
        let body = r#"[
            {"name": "Oslo", "lat": 59.9, "lon": 10.7, "monthly": [1,2,3,4,5,6,7,8,9,10,11,12]},
            {"name": "Short", "lat": 0, "lon": 0, "monthly": [1,2,3]}
        ]"#;
        let table = parse_rainfall_json("test", body).unwrap();
        assert_eq!(table.cities().len(), 1);
        assert_eq!(table.cities()[0].name, "Oslo");
        assert!((table.cities()[0].annual_mm - 78.0).abs() < 1e-3);
    }

    #[test]
    fn test_parse_keeps_explicit_annual() {
        let body = r#"[{"name": "X", "lat": 1, "lon": 2, "annual_mm": 900, "monthly": [0,0,0,0,0,0,0,0,0,0,0,0]}]"#;
        let table = parse_rainfall_json("test", body).unwrap();
        assert!((table.cities()[0].annual_mm - 900.0).abs() < 1e-3);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(parse_rainfall_json("test", "<html>"), Err(Error::Fetch { .. })));
        assert!(matches!(parse_rainfall_json("test", "[]"), Err(Error::Fetch { .. })));
    }

    #[test]
    fn test_unreachable_host_is_fetch_error() {
        let err = fetch_rainfall("http://127.0.0.1:9/rain.json", None, 1).unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }
}
