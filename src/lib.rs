//! # plateloc-correct
//!
//! Plate-location correction for radar tracking CSV exports.
//!
//! When a tracking unit is mounted at a different distance, height or lateral
//! offset than the one it was calibrated for, the recorded `PlateLocHeight` and
//! `PlateLocSide` values drift. This library rescales them with a
//! distribution-matching transform derived from a reference calibration study
//! and the user's setup geometry.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use plateloc_correct::{GeometryParams, ReaderMode, Session, extract};
//!
//! let extracted = extract::load_path("session.csv", ReaderMode::Naive)?;
//! let session = Session::new(GeometryParams::default().with_actual_distance(22.0))
//!     .with_rows(extracted.rows);
//!
//! println!("{}", session.output().heights_text());
//! # Ok::<(), plateloc_correct::Error>(())
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`geometry`]: Setup versus actual sensor geometry
//! - [`correction`]: Reference calibration and correction factors
//! - [`extract`]: CSV column extraction
//! - [`driver`]: Per-value correction and formatting
//! - [`session`]: Immutable state recomputed from geometry and rows
//! - [`summary`]: Adjustment summary
//! - [`report`]: Text, CSV and JSON output
//! - [`config`]: JSON configuration file

pub mod config;
pub mod correction;
pub mod driver;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod report;
pub mod session;
pub mod summary;

// Re-export commonly used types
pub use config::Config;
pub use correction::{Axis, AxisFactors, CorrectionFactors, ReferenceCalibration};
pub use driver::{CorrectedColumns, correct_rows, correct_value};
pub use error::{Error, Result};
pub use extract::{Extracted, RawRow, ReaderMode};
pub use geometry::{GeometryField, GeometryParams};
pub use report::{CorrectionReport, OutputFormat};
pub use session::Session;
pub use summary::AdjustmentSummary;
