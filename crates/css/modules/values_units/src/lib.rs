//! CSS Values and Units Module Level 4 — numbers, units and math functions.
//! Spec: <https://www.w3.org/TR/css-values-4/>

#![forbid(unsafe_code)]

use core::error::Error;
use core::fmt;

// Per-chapter modules mirroring the W3C table of contents.
pub mod chapter_10_math_functions;
pub mod chapter_4_numbers;
pub mod chapter_5_percentages;
pub mod chapter_6_dimensions;

pub use chapter_10_math_functions::{
    BoundingContext, CalcNode, CalcType, CalcValue, MATH_FUNCTIONS, MathFunction, Operator,
    UnitKind, calculate, calculate_typed, contains_math_function, evaluate, parse_calc,
    substitute_math_functions,
};
pub use chapter_4_numbers::{format_number, round_to_precision, snap_fraction};
pub use chapter_5_percentages::{Axis, Percentage, parse_percentage, resolve_percentage};
pub use chapter_6_dimensions::{
    AngleUnit, BoxSize, Dimension, DocumentMetrics, LengthUnit, Numeric, TimeUnit, Unit,
    UnitCategory, UnitContext, compute_length_px, convert_unit, parse_numeric, to_normalized,
};

/// Why a value could not be resolved.
///
/// Every failure inside the value pipeline is reported through this type; callers keep
/// whatever value they had before instead of applying a partial result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unresolved {
    /// Unbalanced parentheses, dangling operators, or otherwise unparseable text.
    Malformed,
    /// Operands of incompatible types were combined.
    TypeMismatch,
    /// An operand is not allowed for the requested unit kind.
    IllegalOperand(String),
    /// A dimension used a unit this engine does not know.
    UnknownUnit(String),
    /// A function other than the supported math functions appeared in an expression.
    UnknownFunction(String),
    /// A font-relative unit was used without a font size in context.
    MissingFontSize,
    /// A percentage was used without a finite, non-negative basis.
    MissingPercentageBasis,
    /// Division by a value indistinguishable from zero.
    DivisionByZero,
    /// The result fell outside the permitted range or was not finite.
    OutOfRange,
    /// `var()` named a property with no value and no usable fallback.
    UndefinedCustomProperty(String),
    /// `var()` substitution referenced a property already being substituted.
    CyclicReference(String),
    /// `var()` substitution nested deeper than the configured limit.
    RecursionLimit,
    /// Text that is not a recognizable color.
    InvalidColor(String),
}

impl fmt::Display for Unresolved {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => formatter.write_str("malformed expression"),
            Self::TypeMismatch => formatter.write_str("incompatible operand types"),
            Self::IllegalOperand(operand) => write!(formatter, "illegal operand `{operand}`"),
            Self::UnknownUnit(unit) => write!(formatter, "unknown unit `{unit}`"),
            Self::UnknownFunction(name) => write!(formatter, "unsupported function `{name}()`"),
            Self::MissingFontSize => formatter.write_str("font-relative unit without a font size"),
            Self::MissingPercentageBasis => {
                formatter.write_str("percentage without a usable basis")
            }
            Self::DivisionByZero => formatter.write_str("division by zero"),
            Self::OutOfRange => formatter.write_str("value out of range"),
            Self::UndefinedCustomProperty(name) => {
                write!(formatter, "custom property `{name}` has no value")
            }
            Self::CyclicReference(name) => {
                write!(formatter, "custom property `{name}` references itself")
            }
            Self::RecursionLimit => formatter.write_str("var() substitution nested too deeply"),
            Self::InvalidColor(text) => write!(formatter, "invalid color `{text}`"),
        }
    }
}

impl Error for Unresolved {}
