//! Correction factors and the distribution-matching formula.
//!
//! The reference study gives a scale and two distribution means per axis. Those
//! are adjusted for the user's geometry:
//!
//! ```text
//! distance_scaling = (actual_distance / setup_distance) / (25 / 13)
//! scale            = reference_scale * (1 + (distance_scaling - 1) * damping)
//! correct_avg      = reference_correct_avg + axis_difference * offset_gain
//! miscal_avg       = reference_miscal_avg  + axis_difference * offset_gain
//! corrected        = (value - miscal_avg) * scale + correct_avg
//! ```
//!
//! The result is affine in the input value. Nothing here guards against a zero
//! setup distance; the factors simply become non-finite.

mod reference;

pub use reference::{AxisReference, REFERENCE_DISTANCE_RATIO, ReferenceCalibration};

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::GeometryParams;

/// Measurement axis of a plate location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Vertical position (`PlateLocHeight`).
    Height,
    /// Lateral position (`PlateLocSide`).
    Side,
}

impl Axis {
    pub const ALL: [Self; 2] = [Self::Height, Self::Side];

    /// Setup difference along this axis (actual - setup).
    #[must_use]
    pub fn difference(self, geometry: &GeometryParams) -> f64 {
        match self {
            Self::Height => geometry.height_difference(),
            Self::Side => geometry.side_difference(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Height => f.write_str("height"),
            Self::Side => f.write_str("side"),
        }
    }
}

/// Derived correction parameters for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisFactors {
    /// Multiplier applied after removing the miscalibrated mean.
    #[serde(with = "crate::driver::lossless_f64")]
    pub scale: f64,
    /// Mean the corrected distribution is shifted onto.
    #[serde(with = "crate::driver::lossless_f64")]
    pub correct_avg: f64,
    /// Mean of the distribution being corrected.
    #[serde(with = "crate::driver::lossless_f64")]
    pub miscal_avg: f64,
}

impl AxisFactors {
    /// Derive factors for `axis` from the reference and the distance scaling.
    #[must_use]
    pub fn derive(reference: &AxisReference, distance_scaling: f64, axis_difference: f64) -> Self {
        let damping = 1.0 + (distance_scaling - 1.0) * reference.damping;
        let shift = axis_difference * reference.offset_gain;
        Self {
            scale: reference.scale * damping,
            correct_avg: reference.correct_avg + shift,
            miscal_avg: reference.miscal_avg + shift,
        }
    }

    /// Correct a single value.
    #[must_use]
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.miscal_avg) * self.scale + self.correct_avg
    }

    /// Slope of the affine form `slope * v + intercept`.
    #[must_use]
    pub fn slope(&self) -> f64 {
        self.scale
    }

    /// Intercept of the affine form `slope * v + intercept`.
    #[must_use]
    pub fn intercept(&self) -> f64 {
        self.correct_avg - self.miscal_avg * self.scale
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.correct_avg.is_finite() && self.miscal_avg.is_finite()
    }
}

/// Correction factors for both axes, derived from one geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionFactors {
    /// `actual_distance / setup_distance`.
    #[serde(with = "crate::driver::lossless_f64")]
    pub distance_ratio: f64,
    /// Distance ratio relative to the reference case's ratio.
    #[serde(with = "crate::driver::lossless_f64")]
    pub distance_scaling: f64,
    /// Height axis factors.
    pub height: AxisFactors,
    /// Side axis factors.
    pub side: AxisFactors,
}

impl CorrectionFactors {
    /// Compute factors for `geometry` against `reference`.
    ///
    /// # Example
    ///
    /// ```
    /// use plateloc_correct::{CorrectionFactors, GeometryParams, ReferenceCalibration};
    ///
    /// let geometry = GeometryParams::default();
    /// let factors = CorrectionFactors::compute(&ReferenceCalibration::STUDY, &geometry);
    /// assert_eq!(factors.distance_scaling, 1.0);
    /// assert_eq!(factors.height.scale, 1.082);
    /// ```
    #[must_use]
    pub fn compute(reference: &ReferenceCalibration, geometry: &GeometryParams) -> Self {
        let distance_ratio = geometry.distance_ratio();
        let distance_scaling = distance_ratio / reference.distance_ratio;

        let derive = |axis: Axis| {
            AxisFactors::derive(reference.axis(axis), distance_scaling, axis.difference(geometry))
        };

        Self {
            distance_ratio,
            distance_scaling,
            height: derive(Axis::Height),
            side: derive(Axis::Side),
        }
    }

    /// Factors computed against the built-in reference study.
    #[must_use]
    pub fn for_geometry(geometry: &GeometryParams) -> Self {
        Self::compute(&ReferenceCalibration::STUDY, geometry)
    }

    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisFactors {
        match axis {
            Axis::Height => &self.height,
            Axis::Side => &self.side,
        }
    }

    /// Whether every derived factor is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.distance_scaling.is_finite() && self.height.is_finite() && self.side.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_reference_case_identity() {
        let factors = CorrectionFactors::for_geometry(&GeometryParams::default());
        assert_eq!(factors.distance_scaling, 1.0);
        assert_eq!(factors.height.scale, 1.082);
        assert_eq!(factors.side.scale, 0.982);
    }

    #[test]
    fn test_reference_case_averages() {
        let factors = CorrectionFactors::for_geometry(&GeometryParams::default());
        // height difference +0.5ft, side difference -6ft
        assert_close(factors.height.correct_avg, 2.317 + 0.05);
        assert_close(factors.height.miscal_avg, 2.415 + 0.05);
        assert_close(factors.side.correct_avg, 0.058 - 0.3);
        assert_close(factors.side.miscal_avg, -0.125 - 0.3);
    }

    #[test]
    fn test_damping_per_axis() {
        // Same distance at setup and actual: ratio 1, scaling 13/25.
        let geometry = GeometryParams::default().with_actual_distance(13.0);
        let factors = CorrectionFactors::for_geometry(&geometry);
        let scaling = 13.0 / 25.0;
        assert_close(factors.distance_scaling, scaling);
        assert_close(factors.height.scale, 1.082 * (1.0 + (scaling - 1.0) * 0.5));
        assert_close(factors.side.scale, 0.982 * (1.0 + (scaling - 1.0) * 0.3));
    }

    #[test]
    fn test_affine_in_value() {
        let geometry = GeometryParams::default()
            .with_setup_distance(15.0)
            .with_actual_distance(22.0)
            .with_actual_height(7.0)
            .with_actual_side(4.0);
        let factors = CorrectionFactors::for_geometry(&geometry);

        for axis in Axis::ALL {
            let f = factors.axis(axis);
            let (v1, v2) = (-1.75, 3.5);
            let a = (f.apply(v2) - f.apply(v1)) / (v2 - v1);
            let b = f.apply(v1) - a * v1;
            assert_close(a, f.slope());
            assert_close(b, f.intercept());
            assert_close(f.apply(0.8), f.slope() * 0.8 + f.intercept());
        }
    }

    #[test]
    fn test_zero_setup_distance_is_not_finite() {
        let geometry = GeometryParams::default().with_setup_distance(0.0);
        let factors = CorrectionFactors::for_geometry(&geometry);
        assert!(factors.distance_ratio.is_infinite());
        assert!(!factors.is_finite());
        assert!(!factors.height.apply(2.5).is_finite());
    }

    #[test]
    fn test_apply_reference_value() {
        let factors = CorrectionFactors::for_geometry(&GeometryParams::default());
        let expected = (2.5 - 2.465) * 1.082 + 2.367;
        assert_close(factors.height.apply(2.5), expected);
    }
}
