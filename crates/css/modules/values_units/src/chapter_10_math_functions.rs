//! CSS Values & Units Level 4 — §10 Mathematical Expressions
//! Spec: <https://www.w3.org/TR/css-values-4/#math>
//!
//! Expressions are parsed once into a [`CalcNode`] tree and then evaluated.
//! Parsing walks the balanced groups produced by `css_syntax::split_groups`:
//! literal text between groups is lexed into operands and operators, and each
//! nested group (`calc()`, `min()`, `max()`, `clamp()`, or bare parentheses)
//! becomes a subtree.
//!
//! Grammar notes that matter for compatibility:
//! - `+` and `-` are only operators when surrounded by whitespace; otherwise
//!   they are signs (`-2px`) or make the token invalid (`1px+2px`).
//! - `*` and `/` need no whitespace.
//! - Sums need operands of one type; products need at least one bare number;
//!   divisors must be bare numbers.

use crate::Unresolved;
use crate::chapter_4_numbers::{format_number, round_to_precision, snap_fraction};
use crate::chapter_5_percentages::{Axis, resolve_percentage};
use crate::chapter_6_dimensions::{
    BoxSize, DocumentMetrics, Numeric, Unit, UnitCategory, UnitContext, parse_numeric,
};
use core::iter::Peekable;
use css_syntax::{GroupMarker, Segment, split_groups, split_top_level};
use log::debug;
use std::vec::IntoIter;

/// Function names that introduce a math expression.
pub const MATH_FUNCTIONS: &[&str] =
    &["calc", "-webkit-calc", "-moz-calc", "min", "max", "clamp"];

/// The unit family an expression must produce.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Any consistent type; the result keeps whatever type the operands had.
    #[default]
    None,
    /// `<length-percentage>`; percentages resolve against the bounding box.
    Length,
    /// `<percentage>`; percentages stay percentages.
    Percent,
    /// `<time>`, normalized to milliseconds.
    Time,
    /// `<angle>`, normalized to degrees.
    Angle,
    /// `<integer>`; the result is rounded to the nearest integer.
    Integer,
    /// `<number>`.
    Decimal,
}

/// Per-call inputs for evaluating an expression.
#[derive(Clone, Copy, Debug)]
pub struct BoundingContext<'metrics> {
    pub metrics: &'metrics DocumentMetrics,
    /// Reference box for percentages under [`UnitKind::Length`].
    pub bounding_box: Option<BoxSize>,
    /// Which side of `bounding_box` percentages measure.
    pub axis: Axis,
    /// Font size for `em`/`ex`/`ch`.
    pub font_size: Option<f64>,
    /// Fixed-width font context (changes the `rem` anchor).
    pub fixed_width: bool,
    /// Viewport override for `vw`/`vh`/`vmin`/`vmax`.
    pub screen_dimension: Option<BoxSize>,
    /// Smallest acceptable result; smaller results are unresolved, not clamped.
    pub min: Option<f64>,
    /// Largest acceptable result.
    pub max: Option<f64>,
    /// Decimal places to round the final result to.
    pub precision: Option<u32>,
}

impl<'metrics> BoundingContext<'metrics> {
    #[inline]
    pub const fn new(metrics: &'metrics DocumentMetrics) -> Self {
        Self {
            metrics,
            bounding_box: None,
            axis: Axis::Width,
            font_size: None,
            fixed_width: false,
            screen_dimension: None,
            min: None,
            max: None,
            precision: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_bounding_box(mut self, bounding_box: BoxSize) -> Self {
        self.bounding_box = Some(bounding_box);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_screen_dimension(mut self, screen: BoxSize) -> Self {
        self.screen_dimension = Some(screen);
        self
    }

    #[inline]
    #[must_use]
    pub const fn with_precision(mut self, places: u32) -> Self {
        self.precision = Some(places);
        self
    }

    fn unit_context(&self) -> UnitContext<'metrics> {
        UnitContext {
            metrics: self.metrics,
            font_size: self.font_size,
            fixed_width: self.fixed_width,
            viewport: self.screen_dimension,
        }
    }
}

/// Binary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

/// Math functions. Bare parentheses parse as [`MathFunction::Calc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MathFunction {
    Calc,
    Min,
    Max,
    Clamp,
}

/// A parsed math expression.
#[derive(Clone, Debug, PartialEq)]
pub enum CalcNode {
    Number(f64),
    /// Percentage as written.
    Percentage(f64),
    Dimension {
        value: f64,
        unit: Unit,
    },
    Binary {
        op: Operator,
        lhs: Box<CalcNode>,
        rhs: Box<CalcNode>,
    },
    Function {
        function: MathFunction,
        args: Vec<CalcNode>,
    },
}

/// The type of an evaluated (sub)expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalcType {
    Number,
    Length,
    Percentage,
    Time,
    Angle,
}

impl CalcType {
    /// Canonical unit suffix used when serializing a value of this type.
    #[inline]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Number => "",
            Self::Length => "px",
            Self::Percentage => "%",
            Self::Time => "ms",
            Self::Angle => "deg",
        }
    }
}

/// An evaluated value with its type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalcValue {
    pub value: f64,
    pub ty: CalcType,
}

impl CalcValue {
    #[inline]
    const fn new(value: f64, ty: CalcType) -> Self {
        Self { value, ty }
    }

    /// Serialize as a CSS value in canonical units (`12px`, `50%`, `3`).
    pub fn to_css(self) -> String {
        format!("{}{}", format_number(self.value), self.ty.suffix())
    }
}

/// Lexed pieces of a group's contents.
enum CalcToken {
    Operand(CalcNode),
    Operator(Operator),
}

/// True when `text` contains a call to a math function.
pub fn contains_math_function(text: &str) -> bool {
    split_groups(text, GroupMarker::Functions(MATH_FUNCTIONS)).is_some_and(|segments| {
        segments
            .iter()
            .any(|segment| matches!(segment, Segment::Group(_)))
    })
}

/// Parse an expression into a tree.
///
/// Accepts a bare expression (`1px + 2px`), a single math function
/// (`calc(1px + 2px)`), or any mix of the two.
///
/// # Errors
/// Returns `Unresolved` for unbalanced input, misplaced operators, unknown
/// functions or units, and operands that are not numeric tokens.
pub fn parse_calc(expr: &str) -> Result<CalcNode, Unresolved> {
    parse_sequence(expr.trim())
}

/// Parse the contents of one group into a tree.
fn parse_sequence(text: &str) -> Result<CalcNode, Unresolved> {
    if text.trim().is_empty() {
        return Err(Unresolved::Malformed);
    }
    let segments = split_groups(text, GroupMarker::Any).ok_or(Unresolved::Malformed)?;
    let last = segments.len().saturating_sub(1);
    let mut tokens = Vec::new();
    for (index, segment) in segments.into_iter().enumerate() {
        match segment {
            Segment::Literal(literal) => lex_literal(literal, index == last, &mut tokens)?,
            Segment::Group(group) => {
                tokens.push(CalcToken::Operand(parse_function(group.name, group.inner)?));
            }
        }
    }
    let mut stream = tokens.into_iter().peekable();
    let node = parse_sum(&mut stream)?;
    if stream.next().is_some() {
        return Err(Unresolved::Malformed);
    }
    Ok(node)
}

/// Parse a named (or anonymous) group into a function node.
fn parse_function(name: &str, inner: &str) -> Result<CalcNode, Unresolved> {
    let lowered = name.to_ascii_lowercase();
    let (function, args) = match lowered.as_str() {
        "" | "calc" | "-webkit-calc" | "-moz-calc" => {
            (MathFunction::Calc, vec![parse_sequence(inner)?])
        }
        "min" | "max" | "clamp" => {
            let args = split_top_level(inner, b',')
                .into_iter()
                .map(parse_sequence)
                .collect::<Result<Vec<_>, _>>()?;
            let function = match lowered.as_str() {
                "min" => MathFunction::Min,
                "max" => MathFunction::Max,
                _ => MathFunction::Clamp,
            };
            if function == MathFunction::Clamp && args.len() != 3 {
                return Err(Unresolved::Malformed);
            }
            (function, args)
        }
        _ => return Err(Unresolved::UnknownFunction(lowered)),
    };
    Ok(CalcNode::Function { function, args })
}

/// Lex literal text between groups into operand and operator tokens.
///
/// `is_last` tells whether anything follows this literal; a trailing `+`/`-`
/// glued to a following group has no whitespace after it and is rejected.
fn lex_literal(literal: &str, is_last: bool, tokens: &mut Vec<CalcToken>) -> Result<(), Unresolved> {
    let bytes = literal.as_bytes();
    let mut index = 0usize;
    while index < bytes.len() {
        if bytes.get(index).is_some_and(u8::is_ascii_whitespace) {
            index = index.saturating_add(1);
            continue;
        }
        let start = index;
        while bytes
            .get(index)
            .is_some_and(|byte| !byte.is_ascii_whitespace())
        {
            index = index.saturating_add(1);
        }
        let word = literal.get(start..index).unwrap_or_default();
        if word == "+" || word == "-" {
            let spaced_before = start > 0 || tokens.is_empty();
            let spaced_after = index < bytes.len() || is_last;
            if !spaced_before || !spaced_after {
                debug!("`{word}` must be surrounded by whitespace in `{literal}`");
                return Err(Unresolved::Malformed);
            }
            let op = if word == "+" {
                Operator::Add
            } else {
                Operator::Subtract
            };
            tokens.push(CalcToken::Operator(op));
            continue;
        }
        lex_word(word, tokens)?;
    }
    Ok(())
}

/// Split a whitespace-free word on `*` and `/`.
fn lex_word(word: &str, tokens: &mut Vec<CalcToken>) -> Result<(), Unresolved> {
    let mut operand_start = 0usize;
    for (index, byte) in word.bytes().enumerate() {
        let op = match byte {
            b'*' => Operator::Multiply,
            b'/' => Operator::Divide,
            _ => continue,
        };
        let operand = word.get(operand_start..index).unwrap_or_default();
        if !operand.is_empty() {
            tokens.push(CalcToken::Operand(parse_operand(operand)?));
        }
        tokens.push(CalcToken::Operator(op));
        operand_start = index.saturating_add(1);
    }
    let operand = word.get(operand_start..).unwrap_or_default();
    if !operand.is_empty() {
        tokens.push(CalcToken::Operand(parse_operand(operand)?));
    }
    Ok(())
}

/// Turn a single numeric token into a leaf node.
fn parse_operand(text: &str) -> Result<CalcNode, Unresolved> {
    match parse_numeric(text) {
        Some(Numeric::Number(value)) => Ok(CalcNode::Number(value)),
        Some(Numeric::Percentage(value)) => Ok(CalcNode::Percentage(value)),
        Some(Numeric::Dimension { value, unit }) => Unit::parse(&unit)
            .map(|parsed| CalcNode::Dimension {
                value,
                unit: parsed,
            })
            .ok_or(Unresolved::UnknownUnit(unit)),
        None => Err(Unresolved::IllegalOperand(text.to_owned())),
    }
}

type TokenStream = Peekable<IntoIter<CalcToken>>;

/// Consume the next token if it is an operator accepted by `accept`.
fn next_operator_if(stream: &mut TokenStream, accept: fn(Operator) -> bool) -> Option<Operator> {
    let op = match stream.peek() {
        Some(CalcToken::Operator(op)) if accept(*op) => *op,
        _ => return None,
    };
    stream.next();
    Some(op)
}

/// sum := product (('+' | '-') product)*
fn parse_sum(stream: &mut TokenStream) -> Result<CalcNode, Unresolved> {
    let mut lhs = parse_product(stream)?;
    while let Some(op) = next_operator_if(stream, |op| {
        matches!(op, Operator::Add | Operator::Subtract)
    }) {
        let rhs = parse_product(stream)?;
        lhs = CalcNode::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
    Ok(lhs)
}

/// product := operand (('*' | '/') operand)*
fn parse_product(stream: &mut TokenStream) -> Result<CalcNode, Unresolved> {
    let mut lhs = parse_leaf(stream)?;
    while let Some(op) = next_operator_if(stream, |op| {
        matches!(op, Operator::Multiply | Operator::Divide)
    }) {
        let rhs = parse_leaf(stream)?;
        lhs = CalcNode::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
    Ok(lhs)
}

fn parse_leaf(stream: &mut TokenStream) -> Result<CalcNode, Unresolved> {
    match stream.next() {
        Some(CalcToken::Operand(node)) => Ok(node),
        Some(CalcToken::Operator(_)) | None => Err(Unresolved::Malformed),
    }
}

/// Evaluate a tree under `kind`.
///
/// # Errors
/// Returns `Unresolved` on illegal operands for `kind`, type mismatches,
/// division by zero, or percentages without a basis.
pub fn evaluate(
    node: &CalcNode,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<CalcValue, Unresolved> {
    match node {
        CalcNode::Number(value) => Ok(CalcValue::new(*value, CalcType::Number)),
        CalcNode::Percentage(value) => evaluate_percentage(*value, kind, context),
        CalcNode::Dimension { value, unit } => evaluate_dimension(*value, *unit, kind, context),
        CalcNode::Binary { op, lhs, rhs } => {
            let left = evaluate(lhs, kind, context)?;
            let right = evaluate(rhs, kind, context)?;
            apply_operator(*op, left, right)
        }
        CalcNode::Function { function, args } => {
            let values = args
                .iter()
                .map(|arg| evaluate(arg, kind, context))
                .collect::<Result<Vec<_>, _>>()?;
            apply_function(*function, &values)
        }
    }
}

fn evaluate_percentage(
    value: f64,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<CalcValue, Unresolved> {
    match kind {
        UnitKind::Length => {
            let px = resolve_percentage(value, context.bounding_box, context.axis)?;
            Ok(CalcValue::new(px, CalcType::Length))
        }
        UnitKind::Percent | UnitKind::None => Ok(CalcValue::new(value, CalcType::Percentage)),
        UnitKind::Time | UnitKind::Angle | UnitKind::Integer | UnitKind::Decimal => {
            Err(Unresolved::IllegalOperand(format!("{}%", format_number(value))))
        }
    }
}

fn evaluate_dimension(
    value: f64,
    unit: Unit,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<CalcValue, Unresolved> {
    let ty = match (unit.category(), kind) {
        (UnitCategory::Length, UnitKind::Length | UnitKind::None) => CalcType::Length,
        (UnitCategory::Time, UnitKind::Time | UnitKind::None) => CalcType::Time,
        (UnitCategory::Angle, UnitKind::Angle | UnitKind::None) => CalcType::Angle,
        _ => {
            debug!("{unit:?} is not a legal operand for {kind:?}");
            return Err(Unresolved::IllegalOperand(format!(
                "{}{}",
                format_number(value),
                unit.name()
            )));
        }
    };
    let factor = unit.factor(&context.unit_context())?;
    Ok(CalcValue::new(value * factor, ty))
}

fn apply_operator(op: Operator, left: CalcValue, right: CalcValue) -> Result<CalcValue, Unresolved> {
    match op {
        Operator::Add | Operator::Subtract => {
            if left.ty != right.ty {
                debug!("cannot combine {:?} with {:?}", left.ty, right.ty);
                return Err(Unresolved::TypeMismatch);
            }
            let value = if op == Operator::Add {
                left.value + right.value
            } else {
                left.value - right.value
            };
            Ok(CalcValue::new(value, left.ty))
        }
        Operator::Multiply => {
            let ty = match (left.ty, right.ty) {
                (CalcType::Number, other) | (other, CalcType::Number) => other,
                _ => return Err(Unresolved::TypeMismatch),
            };
            Ok(CalcValue::new(left.value * right.value, ty))
        }
        Operator::Divide => {
            if right.ty != CalcType::Number {
                return Err(Unresolved::TypeMismatch);
            }
            if right.value.abs() <= f64::EPSILON {
                debug!("division by zero");
                return Err(Unresolved::DivisionByZero);
            }
            Ok(CalcValue::new(left.value / right.value, left.ty))
        }
    }
}

fn apply_function(function: MathFunction, values: &[CalcValue]) -> Result<CalcValue, Unresolved> {
    let Some(first) = values.first() else {
        return Err(Unresolved::Malformed);
    };
    if values.iter().any(|value| value.ty != first.ty) {
        return Err(Unresolved::TypeMismatch);
    }
    let value = match function {
        MathFunction::Calc => first.value,
        MathFunction::Min => values
            .iter()
            .map(|item| item.value)
            .fold(f64::INFINITY, f64::min),
        MathFunction::Max => values
            .iter()
            .map(|item| item.value)
            .fold(f64::NEG_INFINITY, f64::max),
        MathFunction::Clamp => match values {
            [lower, preferred, upper] => lower.value.max(preferred.value.min(upper.value)),
            _ => return Err(Unresolved::Malformed),
        },
    };
    Ok(CalcValue::new(value, first.ty))
}

/// Check the result type against `kind`; integers are rounded.
fn accept_result(result: CalcValue, kind: UnitKind) -> Result<CalcValue, Unresolved> {
    let accepted = match (kind, result.ty) {
        (UnitKind::None, _)
        | (UnitKind::Length, CalcType::Length)
        | (UnitKind::Percent, CalcType::Percentage)
        | (UnitKind::Time, CalcType::Time)
        | (UnitKind::Angle, CalcType::Angle)
        | (UnitKind::Decimal, CalcType::Number) => result,
        // Unitless zero is a valid length.
        (UnitKind::Length, CalcType::Number) if result.value.abs() <= f64::EPSILON => {
            CalcValue::new(0.0, CalcType::Length)
        }
        (UnitKind::Percent, CalcType::Number) => CalcValue::new(result.value, CalcType::Percentage),
        (UnitKind::Angle, CalcType::Number) => CalcValue::new(result.value, CalcType::Angle),
        (UnitKind::Integer, CalcType::Number) => CalcValue::new(result.value.round(), CalcType::Number),
        _ => {
            debug!("{:?} result is not valid for {kind:?}", result.ty);
            return Err(Unresolved::TypeMismatch);
        }
    };
    Ok(accepted)
}

/// Evaluate `expr` and return the value with its type.
///
/// # Errors
/// Returns `Unresolved` when parsing or evaluation fails, when the result type
/// is not valid for `kind`, or when the result lies outside `[min, max]`.
pub fn calculate_typed(
    expr: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<CalcValue, Unresolved> {
    let node = parse_calc(expr)?;
    let result = accept_result(evaluate(&node, kind, context)?, kind)?;
    if !result.value.is_finite() {
        return Err(Unresolved::OutOfRange);
    }
    let snapped = snap_fraction(result.value);
    let value = context
        .precision
        .map_or(snapped, |places| round_to_precision(snapped, places));
    if context.min.is_some_and(|min| value < min) || context.max.is_some_and(|max| value > max) {
        debug!("`{expr}` = {value} is outside {:?}..{:?}", context.min, context.max);
        return Err(Unresolved::OutOfRange);
    }
    Ok(CalcValue::new(value, result.ty))
}

/// Evaluate `expr` to a number in the canonical unit of `kind`.
///
/// # Errors
/// See [`calculate_typed`].
#[inline]
pub fn calculate(
    expr: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<f64, Unresolved> {
    calculate_typed(expr, kind, context).map(|result| result.value)
}

/// Replace every math function embedded in `text` with its serialized result.
///
/// Used for values where math functions sit inside other syntax, such as
/// `translate(calc(10px + 5%), 0)` or `fit-content(min(1px, 2px))`.
///
/// # Errors
/// Returns `Unresolved` when `text` is unbalanced or any embedded expression fails.
pub fn substitute_math_functions(
    text: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<String, Unresolved> {
    let segments =
        split_groups(text, GroupMarker::Functions(MATH_FUNCTIONS)).ok_or(Unresolved::Malformed)?;
    let mut out = String::with_capacity(text.len());
    for segment in segments {
        match segment {
            Segment::Literal(literal) => out.push_str(literal),
            Segment::Group(group) => out.push_str(&calculate_typed(group.full, kind, context)?.to_css()),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str, kind: UnitKind) -> Result<f64, Unresolved> {
        let metrics = DocumentMetrics::default();
        calculate(expr, kind, &BoundingContext::new(&metrics))
    }

    #[test]
    fn respects_precedence() {
        assert_eq!(eval("calc(1px + 2px * 3)", UnitKind::Length), Ok(7.0));
        assert_eq!(eval("calc((1px + 2px) * 3)", UnitKind::Length), Ok(9.0));
        assert_eq!(eval("calc(10px - 4px - 3px)", UnitKind::Length), Ok(3.0));
        assert_eq!(eval("calc(12px / 2 / 3)", UnitKind::Length), Ok(2.0));
    }

    #[test]
    fn nests_functions() {
        assert_eq!(eval("calc(calc(1px + 2px) * 2)", UnitKind::Length), Ok(6.0));
        assert_eq!(eval("calc(min(10px, 4px) + max(1px, 2px))", UnitKind::Length), Ok(6.0));
    }

    #[test]
    fn whitespace_decides_plus_and_minus() {
        assert_eq!(eval("calc(1px -2px)", UnitKind::Length), Err(Unresolved::Malformed));
        assert_eq!(eval("calc(1px+2px)", UnitKind::Length).ok(), None);
        assert_eq!(eval("calc(-1px - -2px)", UnitKind::Length), Ok(1.0));
        assert_eq!(eval("calc(2*3px)", UnitKind::Length), Ok(6.0));
        assert_eq!(eval("calc(1px + (2px))", UnitKind::Length), Ok(3.0));
        assert_eq!(eval("calc(1px +(2px))", UnitKind::Length), Err(Unresolved::Malformed));
        assert_eq!(eval("calc((1px)+ 2px)", UnitKind::Length), Err(Unresolved::Malformed));
    }

    #[test]
    fn rejects_type_mixing() {
        assert_eq!(eval("calc(1px + 2)", UnitKind::Length), Err(Unresolved::TypeMismatch));
        assert_eq!(eval("calc(2px * 3px)", UnitKind::Length), Err(Unresolved::TypeMismatch));
        assert_eq!(eval("calc(2 / 1px)", UnitKind::Length), Err(Unresolved::TypeMismatch));
        assert_eq!(eval("calc(1s + 1px)", UnitKind::None), Err(Unresolved::TypeMismatch));
        assert_eq!(eval("calc(1s)", UnitKind::Length).ok(), None);
    }

    #[test]
    fn division_by_zero_is_unresolved() {
        assert_eq!(eval("calc(1px / 0)", UnitKind::Length), Err(Unresolved::DivisionByZero));
        assert_eq!(
            eval("calc(1px / (1 - 1))", UnitKind::Length),
            Err(Unresolved::DivisionByZero)
        );
    }

    #[test]
    fn unknown_functions_and_garbage_fail() {
        assert_eq!(
            eval("calc(foo(1px))", UnitKind::Length),
            Err(Unresolved::UnknownFunction("foo".to_owned()))
        );
        assert_eq!(eval("calc(1px + )", UnitKind::Length), Err(Unresolved::Malformed));
        assert_eq!(eval("calc(1px", UnitKind::Length), Err(Unresolved::Malformed));
        assert_eq!(eval("", UnitKind::Length), Err(Unresolved::Malformed));
        assert_eq!(eval("clamp(1px, 2px)", UnitKind::Length), Err(Unresolved::Malformed));
    }

    #[test]
    fn clamps_with_min_winning() {
        assert_eq!(eval("clamp(1px, 5px, 3px)", UnitKind::Length), Ok(3.0));
        assert_eq!(eval("clamp(1px, -5px, 3px)", UnitKind::Length), Ok(1.0));
        assert_eq!(eval("clamp(4px, 2px, 3px)", UnitKind::Length), Ok(4.0));
    }

    #[test]
    fn percentages_need_a_box_under_length() {
        let metrics = DocumentMetrics::default();
        let context = BoundingContext::new(&metrics);
        assert_eq!(
            calculate("calc(50% - 10px)", UnitKind::Length, &context),
            Err(Unresolved::MissingPercentageBasis)
        );
        let boxed = context
            .with_bounding_box(BoxSize::new(200.0, 80.0))
            .with_axis(Axis::Height);
        assert_eq!(calculate("calc(50% - 10px)", UnitKind::Length, &boxed), Ok(30.0));
        assert_eq!(calculate("calc(50% - 10%)", UnitKind::Percent, &context), Ok(40.0));
    }

    #[test]
    fn range_limits_reject_instead_of_clamping() {
        let metrics = DocumentMetrics::default();
        let context = BoundingContext::new(&metrics).with_range(Some(0.0), Some(255.0));
        assert_eq!(calculate("calc(200 + 55)", UnitKind::Integer, &context), Ok(255.0));
        assert_eq!(
            calculate("calc(200 + 56)", UnitKind::Integer, &context),
            Err(Unresolved::OutOfRange)
        );
    }

    #[test]
    fn range_applies_to_the_rounded_value() {
        let metrics = DocumentMetrics::default();
        let context = BoundingContext::new(&metrics)
            .with_range(Some(0.0), Some(0.996))
            .with_precision(2);
        assert_eq!(
            calculate("calc(0.9959)", UnitKind::Decimal, &context),
            Err(Unresolved::OutOfRange)
        );
        let capped = context.with_range(Some(0.0), Some(1.0));
        assert_eq!(calculate("calc(1.004)", UnitKind::Decimal, &capped), Ok(1.0));
    }

    #[test]
    fn snaps_and_rounds_results() {
        let metrics = DocumentMetrics::default();
        let context = BoundingContext::new(&metrics);
        assert_eq!(calculate("calc(0.1 + 0.2)", UnitKind::Decimal, &context), Ok(0.3));
        let rounded = context.with_precision(2);
        assert_eq!(calculate("calc(10 / 3)", UnitKind::Decimal, &rounded), Ok(3.33));
        assert_eq!(calculate("calc(1.5 * 3)", UnitKind::Integer, &context), Ok(5.0));
    }

    #[test]
    fn time_and_angle_kinds_normalize() {
        assert_eq!(eval("calc(1s + 250ms)", UnitKind::Time), Ok(1250.0));
        assert_eq!(eval("calc(0.5turn - 90deg)", UnitKind::Angle), Ok(90.0));
        assert_eq!(eval("calc(120 + 30)", UnitKind::Angle), Ok(150.0));
        assert_eq!(eval("calc(10%)", UnitKind::Time).ok(), None);
    }

    #[test]
    fn bare_values_evaluate_without_a_wrapper() {
        assert_eq!(eval("10px", UnitKind::Length), Ok(10.0));
        assert_eq!(eval("0", UnitKind::Length), Ok(0.0));
        assert_eq!(eval("5", UnitKind::Length), Err(Unresolved::TypeMismatch));
    }

    #[test]
    fn substitutes_embedded_functions() {
        let metrics = DocumentMetrics::default();
        let context = BoundingContext::new(&metrics);
        assert_eq!(
            substitute_math_functions("translate(calc(1px + 2px), max(1em, 0px))", UnitKind::Length, &context.with_font_size(10.0)),
            Ok("translate(3px, 10px)".to_owned())
        );
        assert!(contains_math_function("a CALC(1px) b"));
        assert!(!contains_math_function("calculate(1px)"));
    }
}
