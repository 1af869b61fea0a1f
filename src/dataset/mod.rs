//! Data loaders.
//!
//! Every dataset is read once at startup into immutable records. Malformed
//! rows are skipped with a warning; an unreadable source, a missing column, or
//! a source with no usable rows is an error.

#[cfg(feature = "fetch")]
pub mod fetch;
pub mod iris;
pub mod rainfall;
mod table;
pub mod tide;

pub use iris::{load_iris, IrisSample, IrisTable, Species, SpeciesStats};
pub use rainfall::{CityHistory, CityRainfall, CitySite, RainfallHistory, RainfallTable, DEFAULT_SITES, MONTH_NAMES};
pub use tide::TideSeries;
