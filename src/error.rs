//! Error types for tidebloom operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading data, rendering, or encoding frames.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, terminal setup, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// GIF (or other `image` codec) encoding error.
    #[error("image encoding error: {0}")]
    ImageEncoding(#[from] image::ImageError),

    /// Invalid dimensions for a framebuffer or canvas.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Empty data provided where non-empty is required.
    #[error("Empty data provided: {0}")]
    EmptyData(&'static str),

    /// Scale domain error (e.g., equal domain bounds).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A required column is missing from a tabular dataset.
    #[error("{source_name}: missing required column '{column}'")]
    MissingColumn {
        /// Dataset the column was expected in.
        source_name: String,
        /// Column header that was not found.
        column: &'static str,
    },

    /// A dataset could not be used as a whole.
    #[error("{source_name}: {message}")]
    Dataset {
        /// Dataset path or URL.
        source_name: String,
        /// What went wrong.
        message: String,
    },

    /// The rainfall source could not be fetched or decoded.
    #[error("fetch from {url} failed: {message}")]
    Fetch {
        /// Requested URL.
        url: String,
        /// Transport or decoding error message.
        message: String,
    },

    /// A rainfall URL is configured but the crate was built without `fetch`.
    #[error("a rainfall URL is configured ({0}) but tidebloom was built without the `fetch` feature")]
    FetchUnavailable(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    /// Invalid configuration value.
    #[error("invalid configuration value for '{key}': {message}")]
    ConfigInvalid {
        /// The configuration key with invalid value.
        key: &'static str,
        /// Why the value is invalid.
        message: String,
    },
}

impl Error {
    /// Shorthand for a whole-dataset error.
    pub(crate) fn dataset(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Dataset { source_name: source_name.into(), message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidDimensions { width: 0, height: 100 };
        assert!(err.to_string().contains("Invalid dimensions"));
    }

    #[test]
    fn test_missing_column_names_source_and_column() {
        let err = Error::MissingColumn { source_name: "Iris.csv".to_string(), column: "Species" };
        let display = err.to_string();
        assert!(display.contains("Iris.csv"));
        assert!(display.contains("Species"));
    }

    #[test]
    fn test_config_parse_error_includes_line_number() {
        let err = Error::ConfigParse { line: 42, message: "invalid value".to_string() };
        let display = err.to_string();
        assert!(display.contains("42"), "Error should include line number: {display}");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_fetch_unavailable_mentions_feature() {
        let err = Error::FetchUnavailable("https://example.org/rain.json".to_string());
        assert!(err.to_string().contains("`fetch`"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
