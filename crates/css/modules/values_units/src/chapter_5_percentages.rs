//! CSS Values & Units Level 4 — §5 Percentages
//! Spec: <https://www.w3.org/TR/css-values-4/#percentages>

use crate::Unresolved;
use crate::chapter_6_dimensions::{BoxSize, Numeric, parse_numeric};
use log::debug;

/// A CSS <percentage>, stored as written (`50%` is `Percentage(50.0)`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Percentage(pub f64);

/// Which side of a reference box a percentage is measured against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal extent.
    #[default]
    Width,
    /// Vertical extent.
    Height,
}

/// Parse a CSS <percentage> (§5.1).
pub fn parse_percentage(text: &str) -> Option<Percentage> {
    match parse_numeric(text)? {
        Numeric::Percentage(value) => Some(Percentage(value)),
        Numeric::Number(_) | Numeric::Dimension { .. } => None,
    }
}

/// Resolve `percent` against `basis` along `axis`.
///
/// # Errors
/// Returns `Unresolved::MissingPercentageBasis` when there is no basis or the
/// basis is not finite and non-negative; a missing box never resolves to zero.
pub fn resolve_percentage(percent: f64, basis: Option<BoxSize>, axis: Axis) -> Result<f64, Unresolved> {
    let Some(size) = basis.map(|reference| reference.along(axis)) else {
        debug!("percentage {percent}% has no reference box");
        return Err(Unresolved::MissingPercentageBasis);
    };
    if !size.is_finite() || size < 0.0 {
        debug!("percentage {percent}% against unusable basis {size}");
        return Err(Unresolved::MissingPercentageBasis);
    }
    Ok(percent * size / 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_along_the_requested_axis() {
        let basis = Some(BoxSize::new(200.0, 50.0));
        assert_eq!(resolve_percentage(25.0, basis, Axis::Width), Ok(50.0));
        assert_eq!(resolve_percentage(50.0, basis, Axis::Height), Ok(25.0));
    }

    #[test]
    fn missing_or_invalid_basis_fails() {
        assert_eq!(
            resolve_percentage(10.0, None, Axis::Width),
            Err(Unresolved::MissingPercentageBasis)
        );
        let negative = Some(BoxSize::new(-1.0, 10.0));
        assert_eq!(
            resolve_percentage(10.0, negative, Axis::Width),
            Err(Unresolved::MissingPercentageBasis)
        );
        let infinite = Some(BoxSize::new(10.0, f64::INFINITY));
        assert_eq!(
            resolve_percentage(10.0, infinite, Axis::Height),
            Err(Unresolved::MissingPercentageBasis)
        );
    }

    #[test]
    fn parses_percent_tokens_only() {
        assert_eq!(parse_percentage("12.5%"), Some(Percentage(12.5)));
        assert_eq!(parse_percentage("12.5px"), None);
    }
}
