//! CSS Values & Units Level 4 — §4 Numbers
//! Spec: <https://www.w3.org/TR/css-values-4/#numeric-types>
//!
//! Arithmetic on `f64` leaves artifacts such as `0.30000000000000004`; results
//! are snapped back to the short decimal they represent before serialization.

/// Minimum run of repeated `0`/`9` fraction digits treated as a representation artifact.
const SNAP_RUN: usize = 8;

/// Round `value` to `places` decimal places.
#[inline]
pub fn round_to_precision(value: f64, places: u32) -> f64 {
    let exponent = i32::try_from(places).unwrap_or(i32::MAX).min(15);
    let factor = 10f64.powi(exponent);
    (value * factor).round() / factor
}

/// Snap a float to the shortest equivalent decimal when its fraction ends in a
/// long run of `0`s or `9`s (e.g. `0.7999999999999999` becomes `0.8`).
pub fn snap_fraction(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let text = format!("{value}");
    let Some((integer, fraction)) = text.split_once('.') else {
        return value;
    };
    let whole = integer.bytes().any(|digit| matches!(digit, b'1'..=b'9'));
    let digits = fraction.as_bytes();
    let mut run_start = 0usize;
    for (index, &digit) in digits.iter().enumerate() {
        if index > 0 && digits.get(index.saturating_sub(1)) != Some(&digit) {
            run_start = index;
        }
        let run_len = index.saturating_sub(run_start).saturating_add(1);
        // Leading zeros of a small magnitude are significant.
        let artifact = digit == b'9' || (digit == b'0' && (whole || run_start > 0));
        if artifact && run_len >= SNAP_RUN {
            let places = u32::try_from(run_start).unwrap_or(u32::MAX);
            return round_to_precision(value, places);
        }
    }
    value
}

/// Serialize a number the way computed values print it: no trailing `.0`, no `-0`.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    format!("{value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snaps_trailing_zero_runs() {
        assert!((snap_fraction(0.1 + 0.2) - 0.3).abs() < f64::EPSILON);
        assert_eq!(format_number(snap_fraction(0.1 + 0.2)), "0.3");
    }

    #[test]
    fn snaps_trailing_nine_runs() {
        assert_eq!(format_number(snap_fraction(0.1 + 0.7)), "0.8");
        assert_eq!(format_number(snap_fraction(33.333_333_333_333_33 * 3.0)), "100");
    }

    #[test]
    fn leaves_short_fractions_alone() {
        assert_eq!(format_number(snap_fraction(12.345)), "12.345");
        assert_eq!(format_number(snap_fraction(1.000_05)), "1.00005");
        assert_eq!(format_number(snap_fraction(-2.5)), "-2.5");
    }

    #[test]
    fn keeps_small_magnitudes() {
        assert_eq!(format_number(snap_fraction(1e-10)), "0.0000000001");
        assert_eq!(format_number(snap_fraction(-2.5e-9)), "-0.0000000025");
        assert_eq!(format_number(snap_fraction(0.1 + 1e-12)), "0.1");
    }

    #[test]
    fn formats_integers_and_negative_zero() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn rounds_to_precision() {
        assert_eq!(format_number(round_to_precision(1.23456, 2)), "1.23");
        assert_eq!(format_number(round_to_precision(2.5, 0)), "3");
    }
}
