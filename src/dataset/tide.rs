//! Water-level readings for the spiral.

use super::table::TextTable;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::path::Path;

/// Length of the built-in series.
pub const SYNTHETIC_LEN: usize = 2000;

/// An ordered, non-empty series of water-level readings.
#[derive(Debug, Clone, PartialEq)]
pub struct TideSeries {
    samples: Vec<f32>,
}

impl TideSeries {
    /// The built-in series: `sin(i / 20) * 100 + 200` for 2000 samples.
    #[must_use]
    pub fn synthetic() -> Self {
        let samples = (0..SYNTHETIC_LEN).map(|i| (i as f32 / 20.0).sin() * 100.0 + 200.0).collect();
        Self { samples }
    }

    /// Wrap existing readings. Non-finite values are dropped.
    ///
    /// # Errors
    ///
    /// Fails if no finite reading remains.
    pub fn from_samples(samples: Vec<f32>) -> Result<Self> {
        let samples: Vec<f32> = samples.into_iter().filter(|v| v.is_finite()).collect();
        if samples.is_empty() {
            return Err(Error::EmptyData("tide series"));
        }
        Ok(Self { samples })
    }

    /// Load one reading per row from the first column of a CSV file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or holds no numeric rows.
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = TextTable::read(path.as_ref())?;
        Self::from_table(&table)
    }

    /// Parse CSV text; see [`from_csv`](Self::from_csv).
    ///
    /// # Errors
    ///
    /// Fails if the text holds no numeric rows.
    pub fn parse(source_name: &str, text: &str) -> Result<Self> {
        Self::from_table(&TextTable::parse(source_name, text)?)
    }

    fn from_table(table: &TextTable) -> Result<Self> {
        let mut samples = Vec::new();

        // A numeric first line is data, not a header.
        if let Some(v) = table.header().first().and_then(|h| h.parse::<f32>().ok()) {
            samples.push(v);
        }
        for (line, fields) in table.rows() {
            match fields.first().and_then(|f| f.parse::<f32>().ok()).filter(|v| v.is_finite()) {
                Some(v) => samples.push(v),
                None => warn!("{}:{line}: skipping non-numeric tide reading", table.source_name()),
            }
        }

        debug!("loaded {} tide readings from {}", samples.len(), table.source_name());
        Self::from_samples(samples).map_err(|_| Error::dataset(table.source_name(), "no numeric tide readings"))
    }

    /// Number of readings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// All readings.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Reading at `index`, wrapping around the end of the series.
    #[must_use]
    pub fn at(&self, index: usize) -> f32 {
        self.samples[index % self.samples.len()]
    }

    /// `len` consecutive readings starting at `start`, wrapping around.
    pub fn window(&self, start: usize, len: usize) -> impl Iterator<Item = f32> + '_ {
        (start..start + len).map(move |i| self.at(i))
    }
}
