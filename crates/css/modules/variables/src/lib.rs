//! CSS Custom Properties for Cascading Variables Module Level 1 — CSS variables.
//! Spec: <https://www.w3.org/TR/css-variables-1/>

#![forbid(unsafe_code)]

use core::hash::BuildHasher;
use css_syntax::{GroupMarker, Segment, split_groups, split_top_level};
use css_values_units::Unresolved;
use log::{debug, trace};
use std::collections::HashMap;

/// Default bound on nested `var()` substitution.
pub const MAX_VAR_DEPTH: usize = 32;

/// Alias used by helpers that operate on a set of custom properties.
/// Keys are property names (including the leading `--`); values are raw token strings.
pub type CustomProperties = HashMap<String, String>;

/// Source of custom property values for `var()` substitution.
pub trait CustomPropertyLookup {
    /// The value of `name` (including the leading `--`), or an empty string when unset.
    fn custom_property(&self, name: &str) -> String;
}

impl<S: BuildHasher> CustomPropertyLookup for HashMap<String, String, S> {
    #[inline]
    fn custom_property(&self, name: &str) -> String {
        self.get(name).cloned().unwrap_or_default()
    }
}

/// Extract custom properties (`--*`) from a declaration map.
///
/// This is a simple filter that keeps only entries whose property name begins with `--`.
/// It can be used on inline style maps or computed declaration maps to produce a
/// custom properties environment for `var()` resolution.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#custom-properties>
#[inline]
pub fn extract_custom_properties<S: BuildHasher + Default>(
    declarations: &HashMap<String, String, S>,
) -> CustomProperties {
    declarations
        .iter()
        .filter(|(key, _)| key.starts_with("--"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// True when `value` contains a `var()` reference.
#[inline]
pub fn contains_var(value: &str) -> bool {
    value.to_ascii_lowercase().contains("var(")
}

/// Substitute every `var()` in `value` using `lookup`.
///
/// - The looked-up value is trimmed; values that themselves contain `var()` are expanded.
/// - When the property is empty, the fallback is split on top-level commas and the first
///   alternative that expands to something non-empty wins.
/// - Cycles and nesting beyond [`MAX_VAR_DEPTH`] are unresolved rather than looping.
///
/// # Errors
/// Returns `Unresolved::UndefinedCustomProperty` when neither the property nor any
/// fallback alternative yields a value, `Unresolved::CyclicReference` for cycles, and
/// `Unresolved::Malformed` for unbalanced input or invalid names.
///
/// Spec: <https://www.w3.org/TR/css-variables-1/#using-variables>
#[inline]
pub fn resolve_vars<L: CustomPropertyLookup + ?Sized>(
    value: &str,
    lookup: &L,
) -> Result<String, Unresolved> {
    resolve_vars_with_limit(value, lookup, MAX_VAR_DEPTH)
}

/// [`resolve_vars`] with an explicit nesting limit.
///
/// # Errors
/// See [`resolve_vars`]; exceeding `max_depth` yields `Unresolved::RecursionLimit`.
pub fn resolve_vars_with_limit<L: CustomPropertyLookup + ?Sized>(
    value: &str,
    lookup: &L,
    max_depth: usize,
) -> Result<String, Unresolved> {
    let mut resolver = Resolver {
        lookup,
        max_depth,
        stack: Vec::new(),
    };
    let resolved = resolver.expand(value)?;
    Ok(resolved.trim().to_owned())
}

/// Carries the chain of properties being substituted for cycle detection.
struct Resolver<'lookup, L: ?Sized> {
    lookup: &'lookup L,
    max_depth: usize,
    stack: Vec<String>,
}

impl<L: CustomPropertyLookup + ?Sized> Resolver<'_, L> {
    /// Expand every `var()` in `value`.
    fn expand(&mut self, value: &str) -> Result<String, Unresolved> {
        if !contains_var(value) {
            return Ok(value.to_owned());
        }
        if self.stack.len() >= self.max_depth {
            debug!("var() nesting exceeded {} levels", self.max_depth);
            return Err(Unresolved::RecursionLimit);
        }
        let segments =
            split_groups(value, GroupMarker::Function("var")).ok_or(Unresolved::Malformed)?;
        let mut out = String::with_capacity(value.len());
        for segment in segments {
            match segment {
                Segment::Literal(literal) => out.push_str(literal),
                Segment::Group(group) => out.push_str(&self.substitute(group.inner)?),
            }
        }
        Ok(out)
    }

    /// Resolve the arguments of one `var(--name[, fallback])`.
    fn substitute(&mut self, args: &str) -> Result<String, Unresolved> {
        let (name, fallback) = split_name_and_fallback(args);
        if !name.starts_with("--") || name.len() <= 2 {
            debug!("invalid custom property name `{name}`");
            return Err(Unresolved::Malformed);
        }
        if self.stack.iter().any(|active| active == name) {
            debug!("cyclic reference to `{name}`");
            return Err(Unresolved::CyclicReference(name.to_owned()));
        }

        let mut failure = Unresolved::UndefinedCustomProperty(name.to_owned());
        let looked_up = self.lookup.custom_property(name);
        let candidates = core::iter::once(looked_up.trim()).chain(
            fallback
                .map(|text| split_top_level(text, b','))
                .unwrap_or_default(),
        );
        for candidate in candidates {
            if candidate.is_empty() {
                continue;
            }
            self.stack.push(name.to_owned());
            let expanded = self.expand(candidate);
            self.stack.pop();
            match expanded {
                Ok(text) if !text.trim().is_empty() => {
                    trace!("var({name}) -> `{}`", text.trim());
                    return Ok(text.trim().to_owned());
                }
                Ok(_) => {}
                Err(err) => failure = err,
            }
        }
        debug!("var({name}) has no usable value");
        Err(failure)
    }
}

/// Split `--name, fallback` at the first top-level comma.
fn split_name_and_fallback(args: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    for (index, byte) in args.bytes().enumerate() {
        match byte {
            b'(' => depth = depth.saturating_add(1),
            b')' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                return (
                    args.get(..index).unwrap_or_default().trim(),
                    args.get(index.saturating_add(1)..),
                );
            }
            _ => {}
        }
    }
    (args.trim(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(entries: &[(&str, &str)]) -> CustomProperties {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect()
    }

    #[test]
    fn substitutes_defined_properties() {
        let vars = props(&[("--gap", " 12px ")]);
        assert_eq!(
            resolve_vars("calc(var(--gap) * 2)", &vars),
            Ok("calc(12px * 2)".to_owned())
        );
    }

    #[test]
    fn uses_first_non_empty_fallback() {
        let vars = props(&[("--empty", "  ")]);
        assert_eq!(resolve_vars("var(--missing, 4px)", &vars), Ok("4px".to_owned()));
        assert_eq!(resolve_vars("var(--empty, , 5px)", &vars), Ok("5px".to_owned()));
        assert_eq!(
            resolve_vars("var(--missing, rgb(1, 2, 3), red)", &vars),
            Ok("rgb(1, 2, 3)".to_owned())
        );
    }

    #[test]
    fn fallbacks_can_nest_references() {
        let vars = props(&[("--inner", "7px")]);
        assert_eq!(
            resolve_vars("var(--outer, var(--inner))", &vars),
            Ok("7px".to_owned())
        );
        assert_eq!(
            resolve_vars("var(--outer, var(--other), 9px)", &vars),
            Ok("9px".to_owned())
        );
    }

    #[test]
    fn expands_references_inside_values() {
        let vars = props(&[("--base", "2px"), ("--double", "calc(var(--base) * 2)")]);
        assert_eq!(
            resolve_vars("var(--double)", &vars),
            Ok("calc(2px * 2)".to_owned())
        );
    }

    #[test]
    fn missing_without_fallback_is_unresolved() {
        let vars = CustomProperties::new();
        assert_eq!(
            resolve_vars("var(--nope)", &vars),
            Err(Unresolved::UndefinedCustomProperty("--nope".to_owned()))
        );
        assert_eq!(resolve_vars("var(--nope", &vars), Err(Unresolved::Malformed));
    }

    #[test]
    fn cycles_terminate() {
        let vars = props(&[("--a", "var(--b)"), ("--b", "var(--a)")]);
        assert!(matches!(
            resolve_vars("var(--a)", &vars),
            Err(Unresolved::CyclicReference(_))
        ));
        let selfish = CustomProperties::new();
        assert_eq!(resolve_vars("var(--x, var(--x))", &selfish).ok(), None);
        let cyclic_with_exit = props(&[("--a", "var(--a)")]);
        assert_eq!(
            resolve_vars("var(--a, 3px)", &cyclic_with_exit),
            Ok("3px".to_owned())
        );
    }

    #[test]
    fn depth_limit_applies() {
        let vars = props(&[("--a", "var(--b)"), ("--b", "var(--c)"), ("--c", "1px")]);
        assert_eq!(resolve_vars_with_limit("var(--a)", &vars, 8), Ok("1px".to_owned()));
        assert_eq!(
            resolve_vars_with_limit("var(--a)", &vars, 2),
            Err(Unresolved::RecursionLimit)
        );
    }

    #[test]
    fn extracts_only_custom_properties() {
        let decls = props(&[("--x", "1"), ("color", "red")]);
        let custom = extract_custom_properties(&decls);
        assert_eq!(custom.len(), 1);
        assert_eq!(custom.get("--x").map(String::as_str), Some("1"));
    }
}
