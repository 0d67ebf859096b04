//! Reference calibration constants.
//!
//! Values come from an empirical study of a unit calibrated at 13ft and
//! operated at 25ft, with the height raised 0.5ft and the unit moved 6ft
//! laterally. The per-axis averages describe the value distributions measured
//! with the correct setup and with the miscalibrated one.

use serde::{Deserialize, Serialize};

use super::Axis;

/// Distance ratio of the reference case (25ft / 13ft).
pub const REFERENCE_DISTANCE_RATIO: f64 = 25.0 / 13.0;

/// Distribution-matching constants for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisReference {
    /// Scale factor measured in the reference case.
    pub scale: f64,
    /// Mean of the correctly calibrated distribution.
    pub correct_avg: f64,
    /// Mean of the miscalibrated distribution.
    pub miscal_avg: f64,
    /// Fraction of the distance scaling applied to this axis' scale.
    pub damping: f64,
    /// Shift of both means per foot of setup difference on this axis.
    pub offset_gain: f64,
}

/// Complete reference calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCalibration {
    pub distance_ratio: f64,
    pub height: AxisReference,
    pub side: AxisReference,
}

impl ReferenceCalibration {
    /// The 13ft → 25ft study.
    pub const STUDY: Self = Self {
        distance_ratio: REFERENCE_DISTANCE_RATIO,
        height: AxisReference {
            scale: 1.082,
            correct_avg: 2.317,
            miscal_avg: 2.415,
            damping: 0.5,
            offset_gain: 0.1,
        },
        side: AxisReference {
            scale: 0.982,
            correct_avg: 0.058,
            miscal_avg: -0.125,
            damping: 0.3,
            offset_gain: 0.05,
        },
    };

    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisReference {
        match axis {
            Axis::Height => &self.height,
            Axis::Side => &self.side,
        }
    }
}

impl Default for ReferenceCalibration {
    fn default() -> Self {
        Self::STUDY
    }
}
