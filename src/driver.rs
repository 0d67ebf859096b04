//! Per-row correction of extracted plate-location values.
//!
//! Each raw value is handled independently per axis:
//!
//! - blank → blank
//! - no leading number → echoed unchanged
//! - numeric → corrected and rendered with six fractional digits
//!
//! Output is always recomputed in full from the raw rows and the current
//! factors.

use serde::{Deserialize, Serialize};

use crate::correction::{Axis, AxisFactors, CorrectionFactors};
use crate::extract::RawRow;

/// Fractional digits in rendered corrected values.
pub const OUTPUT_DECIMALS: usize = 6;

/// What happened to one raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOutcome {
    /// Input was empty.
    Blank,
    /// Input had no numeric prefix and was echoed.
    Passthrough,
    /// Input was corrected to a finite value.
    Corrected,
    /// Input was numeric but the correction was not finite.
    NonFinite,
}

/// Correct one raw value and report how it was handled.
#[must_use]
pub fn correct_value_with_outcome(raw: &str, factors: &AxisFactors) -> (String, ValueOutcome) {
    if raw.is_empty() {
        return (String::new(), ValueOutcome::Blank);
    }
    match parse_leading_float(raw) {
        None => (raw.to_string(), ValueOutcome::Passthrough),
        Some(value) => {
            let corrected = factors.apply(value);
            let outcome = if corrected.is_finite() {
                ValueOutcome::Corrected
            } else {
                ValueOutcome::NonFinite
            };
            (format_fixed(corrected, OUTPUT_DECIMALS), outcome)
        }
    }
}

/// Correct one raw value.
///
/// ```
/// use plateloc_correct::{driver::correct_value, CorrectionFactors, GeometryParams};
///
/// let factors = CorrectionFactors::for_geometry(&GeometryParams::default());
/// assert_eq!(correct_value("", &factors.height), "");
/// assert_eq!(correct_value("abc", &factors.height), "abc");
/// assert_eq!(correct_value("2.465", &factors.height), "2.367000");
/// ```
#[must_use]
pub fn correct_value(raw: &str, factors: &AxisFactors) -> String {
    correct_value_with_outcome(raw, factors).0
}

/// Parse the longest decimal number at the start of `s`.
///
/// Leading whitespace is skipped and trailing characters are ignored, so
/// `"2.5ft"` parses as `2.5`. Accepts an optional sign, digits with an optional
/// fraction and exponent, or `Infinity`. Returns `None` when no number starts
/// the string.
#[must_use]
pub fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let digits_from = |mut i: usize| {
        while i < len && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if negative { f64::NEG_INFINITY } else { f64::INFINITY });
    }

    let int_end = digits_from(end);
    let mut mantissa_digits = int_end - end;
    end = int_end;

    if end < len && bytes[end] == b'.' {
        let frac_end = digits_from(end + 1);
        let frac_digits = frac_end - (end + 1);
        if mantissa_digits > 0 || frac_digits > 0 {
            mantissa_digits += frac_digits;
            end = frac_end;
        }
    }

    if mantissa_digits == 0 {
        return None;
    }

    if end < len && matches!(bytes[end], b'e' | b'E') {
        let mut exp = end + 1;
        if exp < len && matches!(bytes[exp], b'+' | b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Magnitude from which fixed notation gives way to exponent notation.
const FIXED_NOTATION_LIMIT: f64 = 1e21;

/// Fractional digits needed to write any finite `f64` exactly.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Render with a fixed number of fractional digits.
///
/// Rounds half away from zero on the exact binary value, so `0.0078125`
/// renders as `0.007813` at six digits. Magnitudes of `1e21` and above use
/// exponent form (`1e+21`). Non-finite values render as `Infinity`,
/// `-Infinity` and `NaN`. Negative zero renders without a sign.
///
/// ```
/// use plateloc_correct::driver::format_fixed;
///
/// assert_eq!(format_fixed(12.25, 1), "12.3");
/// assert_eq!(format_fixed(-2.25, 1), "-2.3");
/// assert_eq!(format_fixed(1.005, 2), "1.00");
/// ```
#[must_use]
pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value.abs() >= FIXED_NOTATION_LIMIT {
        return format!("{value:e}").replacen('e', "e+", 1);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}{}", round_half_up(value.abs(), decimals))
}

/// Digits of `magnitude` rounded to `decimals` places, ties rounded up.
fn round_half_up(magnitude: f64, decimals: usize) -> String {
    let precision = (decimals + 1).max(EXACT_FRACTION_DIGITS);
    let exact = format!("{magnitude:.precision$}");
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .collect();

    // The expansion is exact, so a next digit of 5 or more is at least half.
    if frac_part.as_bytes().get(decimals).is_some_and(|&d| d >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == b'9' {
                *digit = b'0';
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, b'1');
        }
    }

    let split = digits.len() - decimals;
    let mut out = String::with_capacity(digits.len() + 1);
    out.extend(digits[..split].iter().map(|&d| char::from(d)));
    if decimals > 0 {
        out.push('.');
        out.extend(digits[split..].iter().map(|&d| char::from(d)));
    }
    out
}

/// Serde adapter for `f64` fields that may hold non-finite values.
///
/// Finite values are plain JSON numbers. Non-finite values are written as the
/// strings `"Infinity"`, `"-Infinity"` and `"NaN"`, matching the rendered
/// columns, and read back from the same strings.
pub(crate) mod lossless_f64 {
    use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_finite() {
            value.serialize(serializer)
        } else {
            super::format_fixed(*value, 0).serialize(serializer)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::custom(format!(
                    "expected a number, \"Infinity\", \"-Infinity\" or \"NaN\", got {other:?}"
                ))),
            },
        }
    }
}

/// Counts of value outcomes for one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisCounts {
    pub corrected: usize,
    pub blank: usize,
    pub passthrough: usize,
    pub non_finite: usize,
}

impl AxisCounts {
    fn record(&mut self, outcome: ValueOutcome) {
        match outcome {
            ValueOutcome::Blank => self.blank += 1,
            ValueOutcome::Passthrough => self.passthrough += 1,
            ValueOutcome::Corrected => self.corrected += 1,
            ValueOutcome::NonFinite => self.non_finite += 1,
        }
    }
}

/// Corrected height and side values, parallel to the input rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrectedColumns {
    pub heights: Vec<String>,
    pub sides: Vec<String>,
    pub height_counts: AxisCounts,
    pub side_counts: AxisCounts,
}

impl CorrectedColumns {
    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Values for one axis.
    #[must_use]
    pub fn column(&self, axis: Axis) -> &[String] {
        match axis {
            Axis::Height => &self.heights,
            Axis::Side => &self.sides,
        }
    }

    /// Outcome counts for one axis.
    #[must_use]
    pub fn counts(&self, axis: Axis) -> &AxisCounts {
        match axis {
            Axis::Height => &self.height_counts,
            Axis::Side => &self.side_counts,
        }
    }

    /// Heights joined with newlines, one line per input row.
    #[must_use]
    pub fn heights_text(&self) -> String {
        self.heights.join("\n")
    }

    /// Sides joined with newlines, one line per input row.
    #[must_use]
    pub fn sides_text(&self) -> String {
        self.sides.join("\n")
    }

    /// Joined text for one axis.
    #[must_use]
    pub fn text(&self, axis: Axis) -> String {
        self.column(axis).join("\n")
    }
}

/// Correct every row with `factors`.
#[must_use]
pub fn correct_rows(rows: &[RawRow], factors: &CorrectionFactors) -> CorrectedColumns {
    let mut out = CorrectedColumns {
        heights: Vec::with_capacity(rows.len()),
        sides: Vec::with_capacity(rows.len()),
        ..CorrectedColumns::default()
    };

    for row in rows {
        let (height, outcome) = correct_value_with_outcome(&row.height, &factors.height);
        out.height_counts.record(outcome);
        out.heights.push(height);

        let (side, outcome) = correct_value_with_outcome(&row.side, &factors.side);
        out.side_counts.record(outcome);
        out.sides.push(side);
    }

    if out.height_counts.non_finite + out.side_counts.non_finite > 0 {
        tracing::warn!(
            height = out.height_counts.non_finite,
            side = out.side_counts.non_finite,
            "corrected values are not finite; check setup distance"
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{ReaderMode, extract_rows};
    use crate::geometry::GeometryParams;

    fn default_factors() -> CorrectionFactors {
        CorrectionFactors::for_geometry(&GeometryParams::default())
    }

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("2.5"), Some(2.5));
        assert_eq!(parse_leading_float("  -0.75"), Some(-0.75));
        assert_eq!(parse_leading_float("+3"), Some(3.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("5."), Some(5.0));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("2.5ft"), Some(2.5));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("1e+"), Some(1.0));
        assert_eq!(parse_leading_float("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float("-"), None);
        assert_eq!(parse_leading_float("NaN"), None);
        assert_eq!(parse_leading_float("inf"), None);
    }

    #[test]
    fn test_format_fixed() {
        assert_eq!(format_fixed(2.5, 6), "2.500000");
        assert_eq!(format_fixed(-0.1234567, 6), "-0.123457");
        assert_eq!(format_fixed(-0.0, 6), "0.000000");
        assert_eq!(format_fixed(f64::INFINITY, 6), "Infinity");
        assert_eq!(format_fixed(f64::NEG_INFINITY, 6), "-Infinity");
        assert_eq!(format_fixed(f64::NAN, 6), "NaN");
    }

    #[test]
    fn test_format_fixed_rounds_ties_away_from_zero() {
        assert_eq!(format_fixed(0.0078125, 6), "0.007813");
        assert_eq!(format_fixed(-0.0078125, 6), "-0.007813");
        assert_eq!(format_fixed(12.25, 1), "12.3");
        assert_eq!(format_fixed(0.5, 0), "1");
        assert_eq!(format_fixed(9.96875, 3), "9.969");
        assert_eq!(format_fixed(99.95, 1), "100.0");
        // 2.675 is stored slightly below the tie.
        assert_eq!(format_fixed(2.675, 2), "2.67");
    }

    #[test]
    fn test_format_fixed_large_magnitudes() {
        assert_eq!(format_fixed(1e21, 6), "1e+21");
        assert_eq!(format_fixed(-1.5e22, 6), "-1.5e+22");
        assert_eq!(format_fixed(1e20, 1), "100000000000000000000.0");
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Wrapped {
        #[serde(with = "lossless_f64")]
        value: f64,
    }

    #[test]
    fn test_lossless_f64_writes_non_finite_as_text() {
        let text = |value| serde_json::to_string(&Wrapped { value }).unwrap();
        assert_eq!(text(2.5), r#"{"value":2.5}"#);
        assert_eq!(text(f64::INFINITY), r#"{"value":"Infinity"}"#);
        assert_eq!(text(f64::NEG_INFINITY), r#"{"value":"-Infinity"}"#);
        assert_eq!(text(f64::NAN), r#"{"value":"NaN"}"#);
    }

    #[test]
    fn test_lossless_f64_reads_back() {
        let read = |json: &str| serde_json::from_str::<Wrapped>(json).map(|w| w.value);
        assert_eq!(read(r#"{"value":3}"#).unwrap(), 3.0);
        assert_eq!(read(r#"{"value":"-Infinity"}"#).unwrap(), f64::NEG_INFINITY);
        assert!(read(r#"{"value":"NaN"}"#).unwrap().is_nan());
        assert!(read(r#"{"value":"inf"}"#).is_err());
        assert!(read(r#"{"value":null}"#).is_err());
    }

    #[test]
    fn test_passthrough_is_axis_independent() {
        let factors = default_factors();
        for axis in Axis::ALL {
            assert_eq!(correct_value("", factors.axis(axis)), "");
            assert_eq!(correct_value("abc", factors.axis(axis)), "abc");
            assert_eq!(correct_value("N/A", factors.axis(axis)), "N/A");
        }
    }

    #[test]
    fn test_numeric_uses_formula() {
        let factors = default_factors();
        // (0.3 + 0.425) * 0.982 - 0.242
        assert_eq!(correct_value("0.3", &factors.side), "0.469950");
        // (2.5 - 2.465) * 1.082 + 2.367
        assert_eq!(correct_value("2.5ft", &factors.height), "2.404870");
    }

    #[test]
    fn test_end_to_end_rows() {
        let text = "Pitcher,PlateLocHeight,PlateLocSide\nSmith,2.5,0.3\n,,\nJones,foo,bar\n";
        let extracted = extract_rows(text, ReaderMode::Naive).unwrap();
        let out = correct_rows(&extracted.rows, &default_factors());

        assert_eq!(out.heights_text(), "2.404870\n\nfoo");
        assert_eq!(out.sides_text(), "0.469950\n\nbar");
        assert_eq!(out.len(), 3);
        assert_eq!(
            out.height_counts,
            AxisCounts {
                corrected: 1,
                blank: 1,
                passthrough: 1,
                non_finite: 0
            }
        );
    }

    #[test]
    fn test_degenerate_geometry_is_non_finite() {
        let geometry = GeometryParams::default().with_setup_distance(0.0);
        let factors = CorrectionFactors::for_geometry(&geometry);
        let rows = vec![RawRow::new("2.5", "0.3"), RawRow::new("1.0", "-1.0")];
        let out = correct_rows(&rows, &factors);

        for value in out.heights.iter().chain(&out.sides) {
            assert!(matches!(value.as_str(), "Infinity" | "-Infinity" | "NaN"), "{value}");
        }
        assert_eq!(out.height_counts.non_finite, 2);
        assert_eq!(out.side_counts.non_finite, 2);
    }

    #[test]
    fn test_row_count_preserved() {
        let factors = default_factors();
        let rows: Vec<RawRow> = (0..25)
            .map(|i| RawRow::new(format!("{}", i as f64 * 0.1), ""))
            .collect();
        let out = correct_rows(&rows, &factors);
        assert_eq!(out.heights.len(), 25);
        assert_eq!(out.sides.len(), 25);
        assert_eq!(out.heights_text().split('\n').count(), 25);
    }
}
