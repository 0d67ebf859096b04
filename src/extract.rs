//! Plate-location column extraction from CSV exports.
//!
//! The extractor locates the height and side columns by substring match on the
//! lower-cased, trimmed header cells:
//!
//! - height: first header containing `plateloche` (e.g. `PlateLocHeight`)
//! - side: first header containing `platelocsi` (e.g. `PlateLocSide`)
//!
//! Every other column is ignored. Values are returned as raw strings; deciding
//! what is numeric is left to [`crate::driver`].
//!
//! ## Reader Modes
//!
//! - [`ReaderMode::Naive`]: split lines on `\n` and fields on `,`. No quoting.
//!   This matches what most tracking exports need and is the default.
//! - [`ReaderMode::Quoted`]: read records with the `csv` crate, so quoted fields
//!   may contain commas or line breaks.
//!
//! ## Example
//!
//! ```
//! use plateloc_correct::extract::{extract_rows, ReaderMode};
//!
//! let text = "Pitcher,PlateLocHeight,PlateLocSide\nSmith,2.5,0.3\n";
//! let extracted = extract_rows(text, ReaderMode::Naive).unwrap();
//! assert_eq!(extracted.rows[0].height, "2.5");
//! assert_eq!(extracted.rows[0].side, "0.3");
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Substring identifying the height column.
pub const HEIGHT_COLUMN_KEY: &str = "plateloche";

/// Substring identifying the side column.
pub const SIDE_COLUMN_KEY: &str = "platelocsi";

/// How data lines are split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReaderMode {
    /// Comma split with no quoting support.
    #[default]
    Naive,
    /// RFC 4180 quoting via the `csv` crate.
    Quoted,
}

/// Raw height and side strings from one data line.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawRow {
    /// Height field, trimmed; empty when blank or missing.
    pub height: String,
    /// Side field, trimmed; empty when blank or missing.
    pub side: String,
}

impl RawRow {
    /// Create a row from two raw strings.
    #[must_use]
    pub fn new(height: impl Into<String>, side: impl Into<String>) -> Self {
        Self {
            height: height.into(),
            side: side.into(),
        }
    }
}

/// Indices of the two plate-location columns in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnIndices {
    pub height: usize,
    pub side: usize,
}

/// Result of extracting rows from a CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extracted {
    /// Located column positions.
    pub columns: ColumnIndices,
    /// Header name of the height column, as written in the file.
    pub height_header: String,
    /// Header name of the side column, as written in the file.
    pub side_header: String,
    /// Data rows in file order.
    pub rows: Vec<RawRow>,
}

/// Locate both plate-location columns in a header row.
///
/// Matching is case-insensitive and substring-based. The first matching column
/// wins for each axis.
pub fn find_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnIndices> {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| h.as_ref().trim().to_lowercase())
        .collect();

    let height = find_header_containing(&normalized, HEIGHT_COLUMN_KEY);
    let side = find_header_containing(&normalized, SIDE_COLUMN_KEY);

    match (height, side) {
        (Some(height), Some(side)) => Ok(ColumnIndices { height, side }),
        (height, side) => Err(Error::MissingColumns {
            height: height.is_none(),
            side: side.is_none(),
        }),
    }
}

/// Find the first normalized header containing `key`.
fn find_header_containing(headers: &[String], key: &str) -> Option<usize> {
    headers.iter().position(|h| h.contains(key))
}

/// Extract plate-location rows from CSV text.
pub fn extract_rows(text: &str, mode: ReaderMode) -> Result<Extracted> {
    let records = match mode {
        ReaderMode::Naive => naive_records(text),
        ReaderMode::Quoted => quoted_records(text)?,
    };

    let mut records = records.into_iter();
    let header = records.next().ok_or(Error::EmptyFile)?;
    let columns = find_columns(header.as_slice())?;

    let field = |record: &[String], idx: usize| {
        record.get(idx).map(|s| s.trim().to_string()).unwrap_or_default()
    };

    let rows: Vec<RawRow> = records
        .map(|record| RawRow {
            height: field(record.as_slice(), columns.height),
            side: field(record.as_slice(), columns.side),
        })
        .collect();

    tracing::debug!(
        height_column = columns.height,
        side_column = columns.side,
        rows = rows.len(),
        ?mode,
        "extracted plate-location columns"
    );

    Ok(Extracted {
        columns,
        height_header: header[columns.height].trim().to_string(),
        side_header: header[columns.side].trim().to_string(),
        rows,
    })
}

/// Non-empty lines split on commas.
fn naive_records(text: &str) -> Vec<Vec<String>> {
    text.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(',').map(String::from).collect())
        .collect()
}

/// Records parsed with quoting support. Whitespace-only lines are dropped.
fn quoted_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        let blank = record.len() == 1 && record.get(0).is_some_and(|f| f.trim().is_empty());
        if !blank {
            records.push(record.iter().map(String::from).collect());
        }
    }
    Ok(records)
}

/// Whether `path` names a `.csv` file (case-insensitive).
#[must_use]
pub fn has_csv_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".csv"))
        .unwrap_or(false)
}

/// Load and extract a CSV export from disk.
///
/// Files not named `*.csv` are rejected before reading. A leading UTF-8 byte
/// order mark is skipped.
pub fn load_path(path: impl AsRef<Path>, mode: ReaderMode) -> Result<Extracted> {
    let path = path.as_ref();
    if !has_csv_extension(path) {
        return Err(Error::NotCsv {
            path: path.to_path_buf(),
        });
    }

    let text = std::fs::read_to_string(path).map_err(|source| {
        tracing::error!(path = %path.display(), error = %source, "file parsing error");
        Error::Read {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    extract_rows(text, mode)
}
