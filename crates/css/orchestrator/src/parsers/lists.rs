//! Single values, space-separated shorthands, comma lists and mixed layers.

use super::{classify_component, resolve_component};
use crate::property::PropertyPolicy;
use crate::value::{ListSeparator, ResolvedValue};
use css_syntax::{split_top_level, split_top_level_whitespace};
use css_values_units::{BoundingContext, Unresolved, UnitKind};
use log::debug;

/// A value that must be exactly one component (`width`, `opacity`).
///
/// # Errors
/// Returns `Unresolved::Malformed` for several components, or the component's own failure.
pub fn resolve_single(
    text: &str,
    policy: &PropertyPolicy,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    if split_top_level_whitespace(text).len() > 1 {
        debug!("`{text}` has more than one component");
        return Err(Unresolved::Malformed);
    }
    resolve_component(
        text,
        policy.kind,
        policy.allow_number,
        &context.with_axis(policy.axis_for(0)),
    )
}

/// Space-separated components; percentages take the policy axis for their position
/// (`inset: 10% 20%` measures height, then width).
///
/// # Errors
/// Returns the first component failure.
pub fn resolve_sides(
    text: &str,
    policy: &PropertyPolicy,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    let items = split_top_level_whitespace(text)
        .into_iter()
        .enumerate()
        .map(|(index, component)| {
            resolve_component(
                component,
                policy.kind,
                policy.allow_number,
                &context.with_axis(policy.axis_for(index)),
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResolvedValue::list(ListSeparator::Space, items))
}

/// Comma-separated single components (`transition-duration: 1s, 250ms`).
///
/// # Errors
/// Returns `Unresolved::Malformed` for empty entries (`1s,,2s`), or the first entry failure.
pub fn resolve_comma_list(
    text: &str,
    policy: &PropertyPolicy,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    let items = split_top_level(text, b',')
        .into_iter()
        .map(|entry| {
            if entry.is_empty() {
                return Err(Unresolved::Malformed);
            }
            resolve_single(entry, policy, context)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResolvedValue::list(ListSeparator::Comma, items))
}

/// Comma-separated layers of space-separated components, each classified on its
/// own (`box-shadow: 0 0 4px red, inset 1px 1px blue`).
///
/// Numeric components are evaluated under `kind`; colors are parsed; anything
/// else passes through as a keyword.
///
/// # Errors
/// Returns `Unresolved::Malformed` for empty layers, or the first component failure.
pub fn resolve_layers(
    text: &str,
    kind: UnitKind,
    context: &BoundingContext<'_>,
) -> Result<ResolvedValue, Unresolved> {
    let layers = split_top_level(text, b',')
        .into_iter()
        .map(|layer| {
            if layer.is_empty() {
                return Err(Unresolved::Malformed);
            }
            let items = split_top_level_whitespace(layer)
                .into_iter()
                .map(|component| classify_component(component, kind, context))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResolvedValue::list(ListSeparator::Space, items))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ResolvedValue::list(ListSeparator::Comma, layers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::{Property, policy_for};
    use css_values_units::{BoxSize, DocumentMetrics};

    fn context(metrics: &DocumentMetrics) -> BoundingContext<'_> {
        BoundingContext::new(metrics)
            .with_bounding_box(BoxSize::new(400.0, 200.0))
            .with_font_size(16.0)
    }

    #[test]
    fn sides_cycle_axes() {
        let metrics = DocumentMetrics::default();
        let policy = policy_for(&Property::Inset);
        let value = resolve_sides("10% 10% auto", &policy, &context(&metrics));
        assert_eq!(
            value.map(|resolved| resolved.to_string()),
            Ok("20px 40px auto".to_owned())
        );
    }

    #[test]
    fn single_values_reject_extra_components() {
        let metrics = DocumentMetrics::default();
        let policy = policy_for(&Property::Width);
        let ctx = context(&metrics).with_range(policy.min, policy.max);
        assert_eq!(
            resolve_single("10px 20px", &policy, &ctx),
            Err(Unresolved::Malformed)
        );
        assert_eq!(resolve_single("-5px", &policy, &ctx), Err(Unresolved::OutOfRange));
    }

    #[test]
    fn comma_lists_normalize_each_entry() {
        let metrics = DocumentMetrics::default();
        let policy = policy_for(&Property::TransitionDuration);
        let ctx = context(&metrics).with_range(policy.min, policy.max);
        assert_eq!(
            resolve_comma_list("1s, calc(100ms * 2)", &policy, &ctx)
                .map(|resolved| resolved.to_string()),
            Ok("1000ms, 200ms".to_owned())
        );
        assert_eq!(
            resolve_comma_list("1s,,2s", &policy, &ctx),
            Err(Unresolved::Malformed)
        );
    }

    #[test]
    fn layers_mix_lengths_colors_and_keywords() {
        let metrics = DocumentMetrics::default();
        let value = resolve_layers(
            "inset 0 0 1em red, 2px 2px rgb(0 0 255)",
            UnitKind::Length,
            &context(&metrics),
        );
        assert_eq!(
            value.map(|resolved| resolved.to_string()),
            Ok("inset 0px 0px 16px #ff0000, 2px 2px #0000ff".to_owned())
        );
    }
}
