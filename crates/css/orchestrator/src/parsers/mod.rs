//! Value parsers organized by value shape.
//!
//! Each submodule handles one [`crate::ValueShape`]; the component
//! classification they share lives here.

pub mod colors;
pub mod lists;
pub mod transform;

use crate::value::ResolvedValue;
use css_color::{named_color, parse_color};
use css_syntax::find_matching_close;
use css_values_units::{
    BoundingContext, CalcType, MATH_FUNCTIONS, Unresolved, UnitKind, calculate_typed,
    contains_math_function, parse_numeric, substitute_math_functions,
};
use log::trace;

/// True when `text` is exactly one math function call, such as `calc(1px + 2px)`.
pub fn is_math_call(text: &str) -> bool {
    let Some(open) = text.find('(') else {
        return false;
    };
    let name = text.get(..open).unwrap_or_default();
    MATH_FUNCTIONS
        .iter()
        .any(|candidate| name.eq_ignore_ascii_case(candidate))
        && find_matching_close(text, open).is_some_and(|close| close.saturating_add(1) == text.len())
}

/// True for a numeric token or a math function call.
#[inline]
pub fn is_numeric_component(text: &str) -> bool {
    parse_numeric(text).is_some() || is_math_call(text)
}

/// True when the generic heuristic should try `text` as a color.
///
/// Bare words only count when they are named colors, so `fade` is never read as hex.
fn looks_like_color(text: &str) -> bool {
    text.starts_with('#')
        || text.eq_ignore_ascii_case("transparent")
        || named_color(text).is_some()
        || text.ends_with(')')
}

/// Pass a non-numeric component through, evaluating any math functions nested in it.
fn keyword(
    text: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    if contains_math_function(text) {
        return substitute_math_functions(text, kind, context).map(ResolvedValue::Keyword);
    }
    Ok(ResolvedValue::Keyword(text.to_owned()))
}

/// Resolve one component under `kind`.
///
/// With `allow_number`, a component that evaluates to a plain number is kept
/// as a number even when `kind` asks for a dimension (`line-height: 1.5`).
///
/// # Errors
/// Returns `Unresolved` when a numeric component fails to evaluate under `kind`.
pub fn resolve_component(
    text: &str,
    kind: UnitKind,
    allow_number: bool,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    if !is_numeric_component(text) {
        return keyword(text, kind, context);
    }
    if allow_number
        && let Ok(value) = calculate_typed(text, UnitKind::None, context)
        && value.ty == CalcType::Number
    {
        return Ok(ResolvedValue::Number(value.value));
    }
    calculate_typed(text, kind, context).map(|value| ResolvedValue::from_calc(value, kind))
}

/// Classify a component with no property-specific rules: numbers and
/// dimensions are normalized, colors are parsed, everything else passes through.
///
/// # Errors
/// Returns `Unresolved` when a numeric component fails to evaluate.
pub fn classify_component(
    text: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    if is_numeric_component(text) {
        return resolve_component(text, kind, false, context);
    }
    if looks_like_color(text)
        && let Ok(color) = parse_color(text)
    {
        return Ok(ResolvedValue::Color(color));
    }
    trace!("`{text}` passes through as a keyword");
    keyword(text, kind, context)
}
