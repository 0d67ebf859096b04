//! Error types for plateloc-correct operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plateloc-correct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or correcting plate-location data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The input file name does not end in `.csv`.
    #[error("Not a CSV file: {path}. Please select a CSV file.")]
    NotCsv {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The input contains no non-empty lines.
    #[error("The CSV file appears to be empty.")]
    EmptyFile,

    /// One or both plate-location columns could not be located in the header.
    #[error(
        "Could not find required columns ({}). Please ensure your CSV contains columns with \
         \"PlateLocHeight\" and \"PlateLocSide\" in their names.",
        missing_list(.height, .side)
    )]
    MissingColumns {
        /// The height column was missing.
        height: bool,
        /// The side column was missing.
        side: bool,
    },

    /// Reading or decoding the input file failed.
    #[error("Error reading file {path}: {source}")]
    Read {
        /// Path being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Geometry rejected by strict validation.
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Invalid configuration file contents.
    #[error("Config error: {0}")]
    Config(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn missing_list(height: &bool, side: &bool) -> &'static str {
    match (*height, *side) {
        (true, true) => "plateloche, platelocsi",
        (true, false) => "plateloche",
        (false, true) => "platelocsi",
        (false, false) => "none",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message() {
        let err = Error::MissingColumns {
            height: false,
            side: true,
        };
        let msg = err.to_string();
        assert!(msg.contains("(platelocsi)"));
        assert!(msg.contains("PlateLocHeight"));
    }

    #[test]
    fn test_not_csv_message() {
        let err = Error::NotCsv {
            path: PathBuf::from("data.txt"),
        };
        assert_eq!(err.to_string(), "Not a CSV file: data.txt. Please select a CSV file.");
    }
}
