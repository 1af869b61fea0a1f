//! Iris flower measurements.
//!
//! The expected layout is the common `Iris.csv` export:
//! `Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species`, with
//! species written either bare (`setosa`) or prefixed (`Iris-setosa`).

use super::table::{parse_finite, TextTable};
use crate::color::Rgba;
use crate::error::{Error, Result};
use log::{debug, warn};
use std::fmt;
use std::path::Path;

/// The three iris species, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    /// Iris setosa.
    Setosa,
    /// Iris versicolor.
    Versicolor,
    /// Iris virginica.
    Virginica,
}

impl Species {
    /// All species in display order.
    pub const ALL: [Species; 3] = [Species::Setosa, Species::Versicolor, Species::Virginica];

    /// Parse a species label, tolerating an `Iris-` prefix and any case.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        let bare = label
            .get(..5)
            .filter(|p| p.eq_ignore_ascii_case("iris-"))
            .map_or(label, |_| &label[5..]);
        match bare.to_ascii_lowercase().as_str() {
            "setosa" => Some(Self::Setosa),
            "versicolor" => Some(Self::Versicolor),
            "virginica" => Some(Self::Virginica),
            _ => None,
        }
    }

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Setosa => "setosa",
            Self::Versicolor => "versicolor",
            Self::Virginica => "virginica",
        }
    }

    /// Position in [`Species::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Setosa => 0,
            Self::Versicolor => 1,
            Self::Virginica => 2,
        }
    }

    /// Petal color: wisteria, iris purple, lime.
    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            Self::Setosa => Rgba::rgb(0xBA, 0xAC, 0xEB),
            Self::Versicolor => Rgba::rgb(0x5F, 0x5A, 0xA5),
            Self::Virginica => Rgba::rgb(0xB8, 0xD0, 0x62),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the dataset. Measurements are in centimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrisSample {
    /// Row id from the file.
    pub id: u32,
    /// Sepal length.
    pub sepal_length: f32,
    /// Sepal width.
    pub sepal_width: f32,
    /// Petal length.
    pub petal_length: f32,
    /// Petal width.
    pub petal_width: f32,
    /// Species label.
    pub species: Species,
}

/// Mean measurements of one species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesStats {
    /// Which species.
    pub species: Species,
    /// Mean sepal length.
    pub sepal_length: f32,
    /// Mean sepal width.
    pub sepal_width: f32,
    /// Mean petal length.
    pub petal_length: f32,
    /// Mean petal width.
    pub petal_width: f32,
    /// Number of samples averaged.
    pub count: usize,
}

impl SpeciesStats {
    /// Average of sepal length and width.
    #[must_use]
    pub fn sepal_factor(&self) -> f32 {
        (self.sepal_length + self.sepal_width) / 2.0
    }

    /// Interpolate measurements towards `other`. The species label switches
    /// halfway.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Self {
            species: if t < 0.5 { self.species } else { other.species },
            sepal_length: mix(self.sepal_length, other.sepal_length),
            sepal_width: mix(self.sepal_width, other.sepal_width),
            petal_length: mix(self.petal_length, other.petal_length),
            petal_width: mix(self.petal_width, other.petal_width),
            count: if t < 0.5 { self.count } else { other.count },
        }
    }
}

/// Load an iris CSV; shorthand for [`IrisTable::load`].
///
/// # Errors
///
/// See [`IrisTable::load`].
pub fn load_iris<P: AsRef<Path>>(path: P) -> Result<IrisTable> {
    IrisTable::load(path)
}

/// All valid samples of an iris file.
#[derive(Debug, Clone)]
pub struct IrisTable {
    samples: Vec<IrisSample>,
}

impl IrisTable {
    /// Load from a CSV file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, lacks a required column, or has no
    /// valid rows.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let table = TextTable::read(path.as_ref())?;
        Self::from_table(&table)
    }

    /// Parse CSV text. `source_name` is used in error messages.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn parse(source_name: &str, text: &str) -> Result<Self> {
        Self::from_table(&TextTable::parse(source_name, text)?)
    }

    fn from_table(table: &TextTable) -> Result<Self> {
        let id_col = table.column("Id").ok();
        let sl = table.column("SepalLengthCm")?;
        let sw = table.column("SepalWidthCm")?;
        let pl = table.column("PetalLengthCm")?;
        let pw = table.column("PetalWidthCm")?;
        let sp = table.column("Species")?;

        let mut samples = Vec::new();
        for (line, fields) in table.rows() {
            let measurements = (
                parse_finite(fields.get(sl)),
                parse_finite(fields.get(sw)),
                parse_finite(fields.get(pl)),
                parse_finite(fields.get(pw)),
            );
            let species = fields.get(sp).and_then(|s| Species::parse(s));

            match (measurements, species) {
                ((Some(sepal_length), Some(sepal_width), Some(petal_length), Some(petal_width)), Some(species)) => {
                    let id = id_col
                        .and_then(|c| fields.get(c))
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(samples.len() as u32 + 1);
                    samples.push(IrisSample { id, sepal_length, sepal_width, petal_length, petal_width, species });
                }
                _ => warn!("{}:{line}: skipping malformed iris row", table.source_name()),
            }
        }

        if samples.is_empty() {
            return Err(Error::dataset(table.source_name(), "no valid iris rows"));
        }
        debug!("loaded {} iris samples from {}", samples.len(), table.source_name());
        Ok(Self { samples })
    }

    /// All samples in file order.
    #[must_use]
    pub fn samples(&self) -> &[IrisSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the table is empty (never true for a loaded table).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Per-species means in [`Species::ALL`] order.
    ///
    /// # Errors
    ///
    /// Fails if any species has no samples.
    pub fn species_stats(&self) -> Result<[SpeciesStats; 3]> {
        let mut sums = [[0.0f32; 4]; 3];
        let mut counts = [0usize; 3];
        for s in &self.samples {
            let i = s.species.index();
            sums[i][0] += s.sepal_length;
            sums[i][1] += s.sepal_width;
            sums[i][2] += s.petal_length;
            sums[i][3] += s.petal_width;
            counts[i] += 1;
        }

        let stats_for = |species: Species| -> Result<SpeciesStats> {
            let i = species.index();
            if counts[i] == 0 {
                return Err(Error::dataset("iris", format!("no samples for species {species}")));
            }
            let n = counts[i] as f32;
            Ok(SpeciesStats {
                species,
                sepal_length: sums[i][0] / n,
                sepal_width: sums[i][1] / n,
                petal_length: sums[i][2] / n,
                petal_width: sums[i][3] / n,
                count: counts[i],
            })
        };

        Ok([stats_for(Species::Setosa)?, stats_for(Species::Versicolor)?, stats_for(Species::Virginica)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SAMPLE: &str = "\
Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species
1,5.1,3.5,1.4,0.2,Iris-setosa
2,4.9,3.0,1.4,0.2,Iris-setosa
51,7.0,3.2,4.7,1.4,Iris-versicolor
101,6.3,3.3,6.0,2.5,Iris-virginica
";

    #[test]
    fn test_species_parse() {
        assert_eq!(Species::parse("Iris-setosa"), Some(Species::Setosa));
        assert_eq!(Species::parse("VIRGINICA"), Some(Species::Virginica));
        assert_eq!(Species::parse(" versicolor "), Some(Species::Versicolor));
        assert_eq!(Species::parse("Iris-"), None);
        assert_eq!(Species::parse("rose"), None);
    }

    #[test]
    fn test_species_palette() {
        assert_eq!(Species::Setosa.color(), Rgba::from_hex("#BAACEB").unwrap());
        assert_eq!(Species::Versicolor.color(), Rgba::from_hex("#5F5AA5").unwrap());
        assert_eq!(Species::Virginica.color(), Rgba::from_hex("#B8D062").unwrap());
    }

    #[test]
    fn test_parse_and_stats() {
        let table = IrisTable::parse("sample", SAMPLE).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.samples()[2].id, 51);

        let [setosa, versicolor, virginica] = table.species_stats().unwrap();
        assert_eq!(setosa.count, 2);
        assert_abs_diff_eq!(setosa.sepal_length, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(setosa.petal_length, 1.4, epsilon = 1e-5);
        assert_eq!(versicolor.species, Species::Versicolor);
        assert_abs_diff_eq!(virginica.petal_width, 2.5, epsilon = 1e-5);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let text = "\
Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species
1,5.1,3.5,1.4,0.2,Iris-setosa
2,oops,3.0,1.4,0.2,Iris-setosa
3,5.0,NaN,1.4,0.2,Iris-setosa
4,5.0,3.0,1.4,0.2,Iris-rosea
5,5.0,3.0
";
        let table = IrisTable::parse("dirty", text).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_missing_column_is_error() {
        let text = "Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,Species\n1,5.1,3.5,1.4,Iris-setosa\n";
        let err = IrisTable::parse("short", text).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "PetalWidthCm", .. }));
    }

    #[test]
    fn test_no_valid_rows_is_error() {
        let text = "Id,SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species\n";
        assert!(IrisTable::parse("empty", text).is_err());
    }

    #[test]
    fn test_missing_species_fails_stats() {
        let text = "\
SepalLengthCm,SepalWidthCm,PetalLengthCm,PetalWidthCm,Species
5.1,3.5,1.4,0.2,setosa
";
        let table = IrisTable::parse("one", text).unwrap();
        assert_eq!(table.samples()[0].id, 1);
        assert!(table.species_stats().is_err());
    }

    #[test]
    fn test_stats_lerp() {
        let table = IrisTable::parse("sample", SAMPLE).unwrap();
        let [setosa, _, virginica] = table.species_stats().unwrap();
        let mid = setosa.lerp(&virginica, 0.5);
        assert_eq!(mid.species, Species::Virginica);
        assert_abs_diff_eq!(mid.petal_length, (1.4 + 6.0) / 2.0, epsilon = 1e-5);
        assert_eq!(setosa.lerp(&virginica, 0.0), setosa);
    }

    #[test]
    fn test_sepal_factor() {
        let table = IrisTable::parse("sample", SAMPLE).unwrap();
        let [setosa, ..] = table.species_stats().unwrap();
        assert_abs_diff_eq!(setosa.sepal_factor(), (5.0 + 3.25) / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_bundled_dataset_means() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/Iris.csv");
        let table = IrisTable::load(path).unwrap();
        assert_eq!(table.len(), 150);
        let [setosa, versicolor, virginica] = table.species_stats().unwrap();
        assert_abs_diff_eq!(setosa.petal_length, 1.464, epsilon = 1e-3);
        assert_abs_diff_eq!(versicolor.petal_length, 4.26, epsilon = 1e-3);
        assert_abs_diff_eq!(virginica.petal_length, 5.552, epsilon = 1e-3);
    }
}
