//! Sensor setup geometry.
//!
//! This module provides [`GeometryParams`], the six values describing where the
//! tracking unit was assumed to be during calibration (the *setup* geometry) and
//! where it actually was while recording (the *actual* geometry).
//!
//! ## Key Concepts
//!
//! - **distance**: distance from the unit to the reference point, in feet.
//! - **side**: lateral offset of the unit, in feet.
//! - **height**: mounting height of the unit, in feet.
//!
//! The defaults reproduce the reference calibration case (13ft → 25ft), for which
//! the distance scaling is exactly one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::driver::parse_leading_float;
use crate::error::{Error, Result};

/// Default setup distance in feet.
pub const DEFAULT_SETUP_DISTANCE: f64 = 13.0;
/// Default actual distance in feet.
pub const DEFAULT_ACTUAL_DISTANCE: f64 = 25.0;
/// Default setup lateral offset in feet.
pub const DEFAULT_SETUP_SIDE: f64 = 2.5;
/// Default actual lateral offset in feet.
pub const DEFAULT_ACTUAL_SIDE: f64 = -3.5;
/// Default setup height in feet.
pub const DEFAULT_SETUP_HEIGHT: f64 = 8.5;
/// Default actual height in feet.
pub const DEFAULT_ACTUAL_HEIGHT: f64 = 9.0;

/// Setup versus actual sensor geometry.
///
/// # Example
///
/// ```
/// use plateloc_correct::GeometryParams;
///
/// let geometry = GeometryParams::default()
///     .with_actual_distance(20.0)
///     .with_actual_height(9.5);
///
/// assert_eq!(geometry.height_difference(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeometryParams {
    /// Distance used when the unit was calibrated.
    #[serde(with = "crate::driver::lossless_f64")]
    pub setup_distance: f64,
    /// Distance during data collection.
    #[serde(with = "crate::driver::lossless_f64")]
    pub actual_distance: f64,
    /// Lateral offset used when the unit was calibrated.
    #[serde(with = "crate::driver::lossless_f64")]
    pub setup_side: f64,
    /// Lateral offset during data collection.
    #[serde(with = "crate::driver::lossless_f64")]
    pub actual_side: f64,
    /// Height used when the unit was calibrated.
    #[serde(with = "crate::driver::lossless_f64")]
    pub setup_height: f64,
    /// Height during data collection.
    #[serde(with = "crate::driver::lossless_f64")]
    pub actual_height: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            setup_distance: DEFAULT_SETUP_DISTANCE,
            actual_distance: DEFAULT_ACTUAL_DISTANCE,
            setup_side: DEFAULT_SETUP_SIDE,
            actual_side: DEFAULT_ACTUAL_SIDE,
            setup_height: DEFAULT_SETUP_HEIGHT,
            actual_height: DEFAULT_ACTUAL_HEIGHT,
        }
    }
}

impl GeometryParams {
    /// Set the setup distance.
    #[must_use]
    pub fn with_setup_distance(mut self, feet: f64) -> Self {
        self.setup_distance = feet;
        self
    }

    /// Set the actual distance.
    #[must_use]
    pub fn with_actual_distance(mut self, feet: f64) -> Self {
        self.actual_distance = feet;
        self
    }

    /// Set the setup lateral offset.
    #[must_use]
    pub fn with_setup_side(mut self, feet: f64) -> Self {
        self.setup_side = feet;
        self
    }

    /// Set the actual lateral offset.
    #[must_use]
    pub fn with_actual_side(mut self, feet: f64) -> Self {
        self.actual_side = feet;
        self
    }

    /// Set the setup height.
    #[must_use]
    pub fn with_setup_height(mut self, feet: f64) -> Self {
        self.setup_height = feet;
        self
    }

    /// Set the actual height.
    #[must_use]
    pub fn with_actual_height(mut self, feet: f64) -> Self {
        self.actual_height = feet;
        self
    }

    /// Ratio of actual to setup distance.
    ///
    /// Not guarded: a zero setup distance yields an infinite or NaN ratio.
    #[must_use]
    pub fn distance_ratio(&self) -> f64 {
        self.actual_distance / self.setup_distance
    }

    /// Signed change in distance (actual - setup).
    #[must_use]
    pub fn distance_change(&self) -> f64 {
        self.actual_distance - self.setup_distance
    }

    /// Signed change in height (actual - setup).
    #[must_use]
    pub fn height_difference(&self) -> f64 {
        self.actual_height - self.setup_height
    }

    /// Signed change in lateral offset (actual - setup).
    #[must_use]
    pub fn side_difference(&self) -> f64 {
        self.actual_side - self.setup_side
    }

    /// Read one field.
    #[must_use]
    pub fn get(&self, field: GeometryField) -> f64 {
        match field {
            GeometryField::SetupDistance => self.setup_distance,
            GeometryField::ActualDistance => self.actual_distance,
            GeometryField::SetupSide => self.setup_side,
            GeometryField::ActualSide => self.actual_side,
            GeometryField::SetupHeight => self.setup_height,
            GeometryField::ActualHeight => self.actual_height,
        }
    }

    /// Return a copy with one field replaced.
    #[must_use]
    pub fn with(mut self, field: GeometryField, value: f64) -> Self {
        let slot = match field {
            GeometryField::SetupDistance => &mut self.setup_distance,
            GeometryField::ActualDistance => &mut self.actual_distance,
            GeometryField::SetupSide => &mut self.setup_side,
            GeometryField::ActualSide => &mut self.actual_side,
            GeometryField::SetupHeight => &mut self.setup_height,
            GeometryField::ActualHeight => &mut self.actual_height,
        };
        *slot = value;
        self
    }

    /// Apply user text to one field.
    ///
    /// Text is read like a data value (leading number, trailing text ignored).
    /// Text with no leading number is ignored and the field keeps its prior
    /// value. Returns `true` when the field was updated.
    pub fn apply_input(&mut self, field: GeometryField, text: &str) -> bool {
        match parse_leading_float(text) {
            Some(value) => {
                *self = self.with(field, value);
                true
            }
            None => {
                tracing::warn!(
                    field = %field,
                    input = text,
                    "ignoring non-numeric geometry input"
                );
                false
            }
        }
    }

    /// Reject geometry that would produce non-finite correction factors.
    ///
    /// Only used in strict mode; the default pipeline lets degenerate values
    /// propagate into the output.
    pub fn validate(&self) -> Result<()> {
        for field in GeometryField::ALL {
            let value = self.get(field);
            if !value.is_finite() {
                return Err(Error::InvalidGeometry(format!("{field} is not finite ({value})")));
            }
        }
        if self.setup_distance <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "setup-distance must be positive (got {})",
                self.setup_distance
            )));
        }
        if self.actual_distance <= 0.0 {
            return Err(Error::InvalidGeometry(format!(
                "actual-distance must be positive (got {})",
                self.actual_distance
            )));
        }
        Ok(())
    }
}

/// One of the six geometry inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeometryField {
    SetupDistance,
    ActualDistance,
    SetupSide,
    ActualSide,
    SetupHeight,
    ActualHeight,
}

impl GeometryField {
    /// All fields in display order.
    pub const ALL: [Self; 6] = [
        Self::SetupDistance,
        Self::ActualDistance,
        Self::SetupSide,
        Self::ActualSide,
        Self::SetupHeight,
        Self::ActualHeight,
    ];

    /// Kebab-case name, as used for CLI flags.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SetupDistance => "setup-distance",
            Self::ActualDistance => "actual-distance",
            Self::SetupSide => "setup-side",
            Self::ActualSide => "actual-side",
            Self::SetupHeight => "setup-height",
            Self::ActualHeight => "actual-height",
        }
    }
}

impl fmt::Display for GeometryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeometryField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| Error::Config(format!("unknown geometry field: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let g = GeometryParams::default();
        assert_eq!(g.setup_distance, 13.0);
        assert_eq!(g.actual_distance, 25.0);
        assert_eq!(g.setup_side, 2.5);
        assert_eq!(g.actual_side, -3.5);
        assert_eq!(g.setup_height, 8.5);
        assert_eq!(g.actual_height, 9.0);
    }

    #[test]
    fn test_differences() {
        let g = GeometryParams::default();
        assert_eq!(g.height_difference(), 0.5);
        assert_eq!(g.side_difference(), -6.0);
        assert_eq!(g.distance_change(), 12.0);
        assert!((g.distance_ratio() - 25.0 / 13.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_input_numeric() {
        let mut g = GeometryParams::default();
        assert!(g.apply_input(GeometryField::ActualHeight, " 10.25 "));
        assert_eq!(g.actual_height, 10.25);
    }

    #[test]
    fn test_apply_input_ignores_non_numeric() {
        let mut g = GeometryParams::default();
        assert!(!g.apply_input(GeometryField::SetupDistance, "abc"));
        assert!(!g.apply_input(GeometryField::SetupDistance, ""));
        assert_eq!(g.setup_distance, 13.0);
    }

    #[test]
    fn test_with_and_get() {
        let g = GeometryParams::default().with(GeometryField::ActualSide, 1.5);
        assert_eq!(g.get(GeometryField::ActualSide), 1.5);
        assert_eq!(g.get(GeometryField::SetupSide), 2.5);
    }

    #[test]
    fn test_field_from_str() {
        let parse = |s: &str| s.parse::<GeometryField>();
        assert_eq!(parse("setup_distance").unwrap(), GeometryField::SetupDistance);
        assert_eq!(parse("Actual-Height").unwrap(), GeometryField::ActualHeight);
        assert!(parse("elevation").is_err());
    }

    #[test]
    fn test_validate() {
        assert!(GeometryParams::default().validate().is_ok());
        assert!(GeometryParams::default().with_setup_distance(0.0).validate().is_err());
        assert!(GeometryParams::default().with_actual_distance(-1.0).validate().is_err());
        assert!(GeometryParams::default().with_setup_height(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_serde_partial() {
        let g: GeometryParams = serde_json::from_str(r#"{"actual_distance": 30.0}"#).unwrap();
        assert_eq!(g.actual_distance, 30.0);
        assert_eq!(g.setup_distance, 13.0);
    }
}
