//! Human-readable summary of the active adjustment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::correction::CorrectionFactors;
use crate::driver::format_fixed;
use crate::geometry::GeometryParams;

/// Explanation of the correction formula shown with every summary.
pub const FORMULA_TEXT: &str =
    "Corrected Value = (Original - MiscalAvg) × Scale + CorrectAvg";

/// Note describing where the reference factors come from.
pub const REFERENCE_NOTE: &str = "Calibrated for 13ft→25ft distance change. \
     Uses distribution matching instead of geometric scaling.";

/// Summary of setup change and derived scale factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentSummary {
    #[serde(with = "crate::driver::lossless_f64")]
    pub setup_distance: f64,
    #[serde(with = "crate::driver::lossless_f64")]
    pub actual_distance: f64,
    /// Actual minus setup distance.
    #[serde(with = "crate::driver::lossless_f64")]
    pub distance_change: f64,
    #[serde(with = "crate::driver::lossless_f64")]
    pub lateral_change: f64,
    #[serde(with = "crate::driver::lossless_f64")]
    pub height_change: f64,
    #[serde(with = "crate::driver::lossless_f64")]
    pub height_scale: f64,
    #[serde(with = "crate::driver::lossless_f64")]
    pub side_scale: f64,
    pub formula: String,
    pub note: String,
}

impl AdjustmentSummary {
    #[must_use]
    pub fn new(geometry: &GeometryParams, factors: &CorrectionFactors) -> Self {
        Self {
            setup_distance: geometry.setup_distance,
            actual_distance: geometry.actual_distance,
            distance_change: geometry.distance_change(),
            lateral_change: geometry.side_difference(),
            height_change: geometry.height_difference(),
            height_scale: factors.height.scale,
            side_scale: factors.side.scale,
            formula: FORMULA_TEXT.to_string(),
            note: REFERENCE_NOTE.to_string(),
        }
    }

    /// Signed distance change with one decimal, e.g. `+12.0ft`.
    #[must_use]
    pub fn distance_change_label(&self) -> String {
        let sign = if self.distance_change >= 0.0 { "+" } else { "" };
        format!("{sign}{}ft", format_fixed(self.distance_change, 1))
    }

    /// Setup and actual distance, e.g. `13ft → 25ft`.
    #[must_use]
    pub fn distance_label(&self) -> String {
        format!("{}ft → {}ft", self.setup_distance, self.actual_distance)
    }

    /// Height scale with three decimals, e.g. `1.082x`.
    #[must_use]
    pub fn height_scale_label(&self) -> String {
        format!("{}x", format_fixed(self.height_scale, 3))
    }

    /// Side scale with three decimals, e.g. `0.982x`.
    #[must_use]
    pub fn side_scale_label(&self) -> String {
        format!("{}x", format_fixed(self.side_scale, 3))
    }
}

impl fmt::Display for AdjustmentSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Adjustment Summary")?;
        writeln!(f, "{:-<60}", "")?;
        writeln!(
            f,
            "{:<20} {:>10}   {}",
            "Setup change",
            self.distance_change_label(),
            self.distance_label()
        )?;
        writeln!(
            f,
            "{:<20} {:>10}   statistical scale factor",
            "Height correction",
            self.height_scale_label()
        )?;
        writeln!(
            f,
            "{:<20} {:>10}   statistical scale factor",
            "Side correction",
            self.side_scale_label()
        )?;
        writeln!(f, "{:-<60}", "")?;
        writeln!(f, "{}", self.formula)?;
        write!(f, "{}", self.note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_summary() -> AdjustmentSummary {
        let geometry = GeometryParams::default();
        AdjustmentSummary::new(&geometry, &CorrectionFactors::for_geometry(&geometry))
    }

    #[test]
    fn test_default_labels() {
        let summary = default_summary();
        assert_eq!(summary.distance_change_label(), "+12.0ft");
        assert_eq!(summary.distance_label(), "13ft → 25ft");
        assert_eq!(summary.height_scale_label(), "1.082x");
        assert_eq!(summary.side_scale_label(), "0.982x");
        assert_eq!(summary.lateral_change, -6.0);
        assert_eq!(summary.height_change, 0.5);
    }

    #[test]
    fn test_negative_distance_change() {
        let geometry = GeometryParams::default().with_actual_distance(10.5);
        let factors = CorrectionFactors::for_geometry(&geometry);
        let summary = AdjustmentSummary::new(&geometry, &factors);
        assert_eq!(summary.distance_change_label(), "-2.5ft");
        assert_eq!(summary.distance_label(), "13ft → 10.5ft");
    }

    #[test]
    fn test_labels_round_ties_up() {
        let geometry = GeometryParams::default().with_actual_distance(25.25);
        let factors = CorrectionFactors::for_geometry(&geometry);
        let summary = AdjustmentSummary::new(&geometry, &factors);
        assert_eq!(summary.distance_change_label(), "+12.3ft");
        assert_eq!(summary.distance_label(), "13ft → 25.25ft");

        let summary = AdjustmentSummary {
            height_scale: 1.0625,
            side_scale: 0.9375,
            ..default_summary()
        };
        assert_eq!(summary.height_scale_label(), "1.063x");
        assert_eq!(summary.side_scale_label(), "0.938x");
    }

    #[test]
    fn test_display_contains_formula() {
        let text = default_summary().to_string();
        assert!(text.contains("Adjustment Summary"));
        assert!(text.contains("1.082x"));
        assert!(text.contains(FORMULA_TEXT));
    }
}
