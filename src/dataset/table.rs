//! Header-indexed reader for small comma-separated files.
//!
//! Only what the bundled datasets need: one header row, comma separators,
//! optional double quotes around a field, blank lines ignored.

use crate::error::{Error, Result};
use std::path::Path;

/// A parsed text table: header names plus raw string rows.
#[derive(Debug, Clone)]
pub(crate) struct TextTable {
    source_name: String,
    header: Vec<String>,
    /// `(line number, fields)`, line numbers 1-based.
    rows: Vec<(usize, Vec<String>)>,
}

impl TextTable {
    /// Read and parse a file.
    pub(crate) fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::dataset(path.display().to_string(), e.to_string()))?;
        Self::parse(&path.display().to_string(), &text)
    }

    /// Parse text whose first non-blank line is the header.
    pub(crate) fn parse(source_name: &str, text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let Some((_, header_line)) = lines.next() else {
            return Err(Error::dataset(source_name, "file is empty"));
        };
        let header = split_fields(header_line);
        let rows = lines.map(|(n, line)| (n, split_fields(line))).collect();

        Ok(Self { source_name: source_name.to_string(), header, rows })
    }

    /// Index of a header column, compared case-insensitively.
    pub(crate) fn column(&self, name: &'static str) -> Result<usize> {
        self.header
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::MissingColumn { source_name: self.source_name.clone(), column: name })
    }

    pub(crate) fn source_name(&self) -> &str {
        &self.source_name
    }

    pub(crate) fn header(&self) -> &[String] {
        &self.header
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = (usize, &[String])> {
        self.rows.iter().map(|(n, fields)| (*n, fields.as_slice()))
    }
}

fn split_fields(line: &str) -> Vec<String> {
    line.split(',')
        .map(|field| {
            let field = field.trim();
            field
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(field)
                .to_string()
        })
        .collect()
}

/// Parse a finite `f32`, rejecting NaN and infinities.
pub(crate) fn parse_finite(field: Option<&String>) -> Option<f32> {
    field.and_then(|s| s.parse::<f32>().ok()).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_rows() {
        let table = TextTable::parse("t.csv", "a,b\n1,2\n\n3,4\n").unwrap();
        assert_eq!(table.header(), ["a", "b"]);
        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].0, 4);
        assert_eq!(rows[1].1, ["3", "4"]);
    }

    #[test]
    fn test_quoted_fields_and_case_insensitive_columns() {
        let table = TextTable::parse("t.csv", "\"Name\",Value\n\"x\",1\n").unwrap();
        assert_eq!(table.column("name").unwrap(), 0);
        assert_eq!(table.rows().next().unwrap().1[0], "x");
    }

    #[test]
    fn test_missing_column() {
        let table = TextTable::parse("t.csv", "a,b\n").unwrap();
        let err = table.column("Species").unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "Species", .. }));
    }

    #[test]
    fn test_empty_file_is_error() {
        assert!(TextTable::parse("t.csv", "\n  \n").is_err());
    }

    #[test]
    fn test_parse_finite() {
        assert_eq!(parse_finite(Some(&"1.5".to_string())), Some(1.5));
        assert_eq!(parse_finite(Some(&"NaN".to_string())), None);
        assert_eq!(parse_finite(Some(&"abc".to_string())), None);
        assert_eq!(parse_finite(None), None);
    }

    #[test]
    fn test_read_missing_file() {
        let err = TextTable::read(Path::new("/nonexistent/tidebloom.csv")).unwrap_err();
        assert!(err.to_string().contains("tidebloom.csv"));
    }
}
