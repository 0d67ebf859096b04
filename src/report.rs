//! Report types and writers for corrected output.
//!
//! A [`CorrectionReport`] captures everything needed to reproduce a run: the
//! geometry, the derived factors, the summary and the corrected columns. It can
//! be written as plain text blocks, CSV or JSON.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::correction::CorrectionFactors;
use crate::driver::{AxisCounts, CorrectedColumns};
use crate::error::{Error, Result};
use crate::geometry::GeometryParams;
use crate::session::Session;
use crate::summary::AdjustmentSummary;

/// Header of the corrected height column in CSV output.
pub const CSV_HEIGHT_HEADER: &str = "CorrectedPlateLocHeight";

/// Header of the corrected side column in CSV output.
pub const CSV_SIDE_HEADER: &str = "CorrectedPlateLocSide";

/// Output format for a correction report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Two newline-joined blocks with headings.
    #[default]
    Text,
    /// Two-column CSV.
    Csv,
    /// Full JSON report.
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// Complete record of one correction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrectionReport {
    /// Input file, if the rows came from disk.
    pub source_path: Option<PathBuf>,
    pub geometry: GeometryParams,
    pub factors: CorrectionFactors,
    pub summary: AdjustmentSummary,
    /// Number of data rows.
    pub rows: usize,
    pub height_counts: AxisCounts,
    pub side_counts: AxisCounts,
    pub heights: Vec<String>,
    pub sides: Vec<String>,
    /// When this report was generated.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl CorrectionReport {
    /// Build a report from a session.
    #[must_use]
    pub fn from_session(session: &Session, source_path: Option<&Path>) -> Self {
        let output: &CorrectedColumns = session.output();
        Self {
            source_path: source_path.map(Path::to_path_buf),
            geometry: *session.params(),
            factors: *session.factors(),
            summary: AdjustmentSummary::new(session.params(), session.factors()),
            rows: output.len(),
            height_counts: output.height_counts,
            side_counts: output.side_counts,
            heights: output.heights.clone(),
            sides: output.sides.clone(),
            timestamp: chrono::Utc::now(),
        }
    }

    /// Write the report in `format`.
    pub fn write<W: Write>(&self, format: OutputFormat, writer: W) -> Result<()> {
        match format {
            OutputFormat::Text => self.write_text(writer),
            OutputFormat::Csv => self.write_csv(writer),
            OutputFormat::Json => self.write_json(writer),
        }
    }

    /// Write the corrected heights and sides as two headed text blocks.
    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "Corrected Heights ({} values)", self.rows)?;
        writeln!(writer, "{}", self.heights.join("\n"))?;
        writeln!(writer)?;
        writeln!(writer, "Corrected Sides ({} values)", self.rows)?;
        writeln!(writer, "{}", self.sides.join("\n"))?;
        Ok(())
    }

    /// Write a two-column CSV, one record per input row.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record([CSV_HEIGHT_HEADER, CSV_SIDE_HEADER])?;
        for (height, side) in self.heights.iter().zip(&self.sides) {
            csv.write_record([height, side])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the full report as pretty JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Save the report to `path` in `format`.
    pub fn save(&self, path: impl AsRef<Path>, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        self.write(format, &mut writer)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), ?format, "report written");
        Ok(())
    }

    /// Load a JSON report.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Write one newline-joined column to `path`.
pub fn save_column(path: impl AsRef<Path>, values: &[String]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, values.join("\n"))?;
    tracing::info!(path = %path.display(), values = values.len(), "column written");
    Ok(())
}
