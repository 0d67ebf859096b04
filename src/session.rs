//! Immutable correction state.
//!
//! A [`Session`] bundles the current geometry, the loaded rows and the output
//! derived from them. Every change returns a new session whose output is
//! produced by [`recompute`]; nothing is updated in place.
//!
//! ```
//! use plateloc_correct::{GeometryField, RawRow, Session};
//!
//! let session = Session::default().with_rows(vec![RawRow::new("2.5", "0.3")]);
//! let moved = session.with_input(GeometryField::ActualDistance, "20");
//!
//! assert_eq!(moved.params().actual_distance, 20.0);
//! assert_ne!(moved.output().heights, session.output().heights);
//! ```

use std::sync::Arc;

use crate::correction::{CorrectionFactors, ReferenceCalibration};
use crate::driver::{CorrectedColumns, correct_rows};
use crate::extract::RawRow;
use crate::geometry::{GeometryField, GeometryParams};

/// Derive factors and corrected output from geometry and rows.
#[must_use]
pub fn recompute(
    reference: &ReferenceCalibration,
    params: &GeometryParams,
    rows: &[RawRow],
) -> (CorrectionFactors, CorrectedColumns) {
    let factors = CorrectionFactors::compute(reference, params);
    let output = correct_rows(rows, &factors);
    (factors, output)
}

/// Snapshot of geometry, loaded rows and derived output.
#[derive(Debug, Clone)]
pub struct Session {
    reference: ReferenceCalibration,
    params: GeometryParams,
    rows: Arc<[RawRow]>,
    factors: CorrectionFactors,
    output: CorrectedColumns,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(GeometryParams::default())
    }
}

impl Session {
    /// Create an empty session with the built-in reference study.
    #[must_use]
    pub fn new(params: GeometryParams) -> Self {
        Self::build(ReferenceCalibration::STUDY, params, Arc::from(Vec::new()))
    }

    fn build(reference: ReferenceCalibration, params: GeometryParams, rows: Arc<[RawRow]>) -> Self {
        let (factors, output) = recompute(&reference, &params, &rows);
        Self {
            reference,
            params,
            rows,
            factors,
            output,
        }
    }

    /// Replace the reference calibration.
    #[must_use]
    pub fn with_reference(&self, reference: ReferenceCalibration) -> Self {
        Self::build(reference, self.params, Arc::clone(&self.rows))
    }

    /// Replace all geometry parameters.
    #[must_use]
    pub fn with_params(&self, params: GeometryParams) -> Self {
        Self::build(self.reference, params, Arc::clone(&self.rows))
    }

    /// Apply text input to one geometry field.
    ///
    /// Non-numeric text leaves the geometry unchanged.
    #[must_use]
    pub fn with_input(&self, field: GeometryField, text: &str) -> Self {
        let mut params = self.params;
        if params.apply_input(field, text) {
            self.with_params(params)
        } else {
            self.clone()
        }
    }

    /// Replace the loaded rows. Earlier rows are discarded.
    #[must_use]
    pub fn with_rows(&self, rows: impl Into<Arc<[RawRow]>>) -> Self {
        Self::build(self.reference, self.params, rows.into())
    }

    /// Restore default geometry and clear loaded rows.
    #[must_use]
    pub fn reset(&self) -> Self {
        Self::build(self.reference, GeometryParams::default(), Arc::from(Vec::new()))
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceCalibration {
        &self.reference
    }

    #[must_use]
    pub fn params(&self) -> &GeometryParams {
        &self.params
    }

    #[must_use]
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    #[must_use]
    pub fn factors(&self) -> &CorrectionFactors {
        &self.factors
    }

    #[must_use]
    pub fn output(&self) -> &CorrectedColumns {
        &self.output
    }

    /// Whether any rows are loaded.
    #[must_use]
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<RawRow> {
        vec![
            RawRow::new("2.5", "0.3"),
            RawRow::new("", ""),
            RawRow::new("foo", "bar"),
        ]
    }

    #[test]
    fn test_empty_session() {
        let session = Session::default();
        assert!(!session.has_data());
        assert!(session.output().is_empty());
        assert_eq!(session.factors().height.scale, 1.082);
    }

    #[test]
    fn test_with_rows_recomputes() {
        let session = Session::default().with_rows(sample_rows());
        assert_eq!(session.output().len(), 3);
        assert_eq!(session.output().heights[2], "foo");
    }

    #[test]
    fn test_param_change_leaves_original_untouched() {
        let original = Session::default().with_rows(sample_rows());
        let changed = original.with_params(GeometryParams::default().with_actual_distance(30.0));

        assert_eq!(original.params().actual_distance, 25.0);
        assert_eq!(changed.params().actual_distance, 30.0);
        assert_ne!(original.output().heights[0], changed.output().heights[0]);
        assert_eq!(changed.output().heights[1], "");
    }

    #[test]
    fn test_non_numeric_input_keeps_prior_value() {
        let session = Session::default().with_input(GeometryField::SetupHeight, "9.5");
        let same = session.with_input(GeometryField::SetupHeight, "nine");
        assert_eq!(same.params().setup_height, 9.5);
    }

    #[test]
    fn test_new_rows_overwrite() {
        let session = Session::default()
            .with_rows(sample_rows())
            .with_rows(vec![RawRow::new("1.0", "1.0")]);
        assert_eq!(session.rows().len(), 1);
        assert_eq!(session.output().len(), 1);
    }

    #[test]
    fn test_reset() {
        let session = Session::new(GeometryParams::default().with_setup_distance(10.0))
            .with_rows(sample_rows())
            .reset();
        assert_eq!(*session.params(), GeometryParams::default());
        assert!(!session.has_data());
        assert!(session.output().heights_text().is_empty());
    }

    #[test]
    fn test_recompute_is_pure() {
        let rows = sample_rows();
        let params = GeometryParams::default();
        let a = recompute(&ReferenceCalibration::STUDY, &params, &rows);
        let b = recompute(&ReferenceCalibration::STUDY, &params, &rows);
        assert_eq!(a, b);
    }
}
