//! CSS transform function lists.
//! Spec: <https://www.w3.org/TR/css-transforms-2/#transform-functions>

use super::resolve_component;
use crate::value::{ListSeparator, ResolvedValue};
use css_syntax::{GroupMarker, Segment, split_groups, split_top_level};
use css_values_units::{Axis, BoundingContext, Unresolved, UnitKind};
use log::debug;

/// What one argument of a transform function accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Argument {
    /// Length, with percentages along the given axis of the reference box.
    Length(Axis),
    /// Length with no percentage basis (`translateZ`, `perspective`).
    Depth,
    Angle,
    Number,
}

impl Argument {
    fn resolve(
        self,
        text: &str,
        context: &BoundingContext<'_>,
    ) -> Result<ResolvedValue, Unresolved> {
        match self {
            Self::Length(axis) => {
                resolve_component(text, UnitKind::Length, false, &context.with_axis(axis))
            }
            Self::Depth => {
                let mut depth = *context;
                depth.bounding_box = None;
                resolve_component(text, UnitKind::Length, false, &depth)
            }
            Self::Angle => resolve_component(text, UnitKind::Angle, false, context),
            Self::Number => resolve_component(text, UnitKind::Decimal, false, context),
        }
    }
}

/// Accepted argument counts for a transform function.
fn arity(name: &str) -> Option<(usize, usize)> {
    let counts = match name {
        "translate" | "scale" | "skew" => (1, 2),
        "translatex" | "translatey" | "translatez" | "scalex" | "scaley" | "scalez" | "rotate"
        | "rotatex" | "rotatey" | "rotatez" | "skewx" | "skewy" | "perspective" => (1, 1),
        "translate3d" | "scale3d" => (3, 3),
        "rotate3d" => (4, 4),
        "matrix" => (6, 6),
        "matrix3d" => (16, 16),
        _ => return None,
    };
    Some(counts)
}

/// The argument type at `index` of the (lowercased) function `name`.
fn argument_at(name: &str, index: usize) -> Argument {
    match (name, index) {
        ("translate" | "translate3d", 0) | ("translatex", _) => Argument::Length(Axis::Width),
        ("translate" | "translate3d", 1) | ("translatey", _) => Argument::Length(Axis::Height),
        ("translate3d" | "translatez" | "perspective", _) => Argument::Depth,
        ("rotate3d", 3)
        | ("rotate" | "rotatex" | "rotatey" | "rotatez" | "skew" | "skewx" | "skewy", _) => {
            Argument::Angle
        }
        _ => Argument::Number,
    }
}

/// Resolve one transform function call.
fn resolve_function(
    name: &str,
    inner: &str,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    let lowered = name.to_ascii_lowercase();
    let Some((min, max)) = arity(&lowered) else {
        debug!("unknown transform function `{name}()`");
        return Err(Unresolved::UnknownFunction(name.to_owned()));
    };
    let arguments = split_top_level(inner, b',');
    if !(min..=max).contains(&arguments.len()) || arguments.iter().any(|arg| arg.is_empty()) {
        debug!("`{name}()` takes {min}..={max} arguments, got `{inner}`");
        return Err(Unresolved::Malformed);
    }
    let args = arguments
        .into_iter()
        .enumerate()
        .map(|(index, argument)| argument_at(&lowered, index).resolve(argument, context))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResolvedValue::Function {
        name: name.to_owned(),
        args,
    })
}

/// Resolve a `transform` value into its list of functions.
///
/// Translation percentages use the context's reference box (the element's own
/// border box); `none` passes through.
///
/// # Errors
/// Returns `Unresolved::Malformed` for text between functions or wrong
/// argument counts, `Unresolved::UnknownFunction` for unsupported functions,
/// or the first argument failure.
pub fn resolve_transform(
    text: &str,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    if text.eq_ignore_ascii_case("none") {
        return Ok(ResolvedValue::Keyword("none".to_owned()));
    }
    let segments = split_groups(text, GroupMarker::Any).ok_or(Unresolved::Malformed)?;
    let mut functions = Vec::new();
    for segment in segments {
        match segment {
            Segment::Literal(literal) if literal.trim().is_empty() => {}
            Segment::Literal(literal) => {
                debug!("stray `{literal}` in transform list");
                return Err(Unresolved::Malformed);
            }
            Segment::Group(group) if group.name.is_empty() => return Err(Unresolved::Malformed),
            Segment::Group(group) => {
                functions.push(resolve_function(group.name, group.inner, context)?);
            }
        }
    }
    if functions.is_empty() {
        return Err(Unresolved::Malformed);
    }
    Ok(ResolvedValue::list(ListSeparator::Space, functions))
}
