//! Resolving declaration values against an element.
//!
//! [`ValueResolver`] runs the full pipeline for one value: `var()`
//! substitution, the property policy lookup, choosing the percentage basis,
//! and the shape-specific parser. Nothing is cached between calls; all state
//! comes from the borrowed providers and the document metrics.

use crate::config::ResolverConfig;
use crate::geometry::{computed_font_size, percentage_basis};
use crate::parsers::colors::resolve_color;
use crate::parsers::lists::{resolve_comma_list, resolve_layers, resolve_sides, resolve_single};
use crate::parsers::transform::resolve_transform;
use crate::property::{Property, ValueShape, policy_for};
use crate::providers::{GeometryProvider, StyleProvider};
use crate::value::ResolvedValue;
use css_color::{Color, parse_color};
use css_selectors::{Specificity, score_selector_list};
use css_syntax::{Declaration, parse_declarations};
use css_values_units::{
    BoundingContext, BoxSize, DocumentMetrics, UnitContext, Unresolved, convert_unit,
};
use css_variables::{
    CustomProperties, CustomPropertyLookup, MAX_VAR_DEPTH, contains_var, resolve_vars_with_limit,
};
use log::{debug, trace};
use rayon::prelude::*;

/// Custom properties of one element, optionally overlaid by a declaration block.
struct ElementVars<'provider, S: StyleProvider> {
    style: &'provider S,
    element: S::Handle,
    overrides: Option<&'provider CustomProperties>,
}

impl<S: StyleProvider> CustomPropertyLookup for ElementVars<'_, S> {
    fn custom_property(&self, name: &str) -> String {
        if let Some(value) = self.overrides.and_then(|overrides| overrides.get(name)) {
            return value.clone();
        }
        self.style.custom_property(self.element, name)
    }
}

/// One entry of a [`ValueResolver::resolve_batch`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveRequest<H> {
    pub property: String,
    pub raw: String,
    pub element: H,
    /// Replaces the percentage basis the property would otherwise use.
    pub bounding_box: Option<BoxSize>,
}

impl<H> ResolveRequest<H> {
    #[inline]
    pub fn new(property: &str, raw: &str, element: H) -> Self {
        Self {
            property: property.to_owned(),
            raw: raw.to_owned(),
            element,
            bounding_box: None,
        }
    }
}

/// Resolves raw declaration values for elements of one document.
pub struct ValueResolver<'provider, S, G> {
    style: &'provider S,
    geometry: &'provider G,
    metrics: DocumentMetrics,
    max_var_depth: usize,
}

impl<'provider, S, G> ValueResolver<'provider, S, G>
where
    S: StyleProvider,
    G: GeometryProvider<Handle = S::Handle>,
{
    pub fn new(style: &'provider S, geometry: &'provider G, config: &ResolverConfig) -> Self {
        Self {
            style,
            geometry,
            metrics: config.metrics(),
            max_var_depth: config.max_var_depth,
        }
    }

    /// A resolver with explicit metrics and the default `var()` depth limit.
    pub const fn with_metrics(
        style: &'provider S,
        geometry: &'provider G,
        metrics: DocumentMetrics,
    ) -> Self {
        Self {
            style,
            geometry,
            metrics,
            max_var_depth: MAX_VAR_DEPTH,
        }
    }

    #[inline]
    pub const fn metrics(&self) -> &DocumentMetrics {
        &self.metrics
    }

    /// Font size `em` resolves against. `font-size` itself uses the parent's,
    /// falling back to the root font size at the document root.
    fn font_size(&self, element: S::Handle, property: &Property) -> Option<f64> {
        if property.is_font_size() {
            return Some(
                self.geometry
                    .parent_of(element)
                    .and_then(|parent| computed_font_size(self.style, parent))
                    .unwrap_or(self.metrics.root_font_size),
            );
        }
        computed_font_size(self.style, element)
    }

    fn is_monospace(&self, element: S::Handle) -> bool {
        self.style
            .computed_value(element, "font-family")
            .to_ascii_lowercase()
            .contains("monospace")
    }

    /// Replace every `var()` in `raw` using the element's custom properties.
    ///
    /// # Errors
    /// Returns the substitution failure (undefined property, cycle, depth limit).
    pub fn substitute_vars(&self, raw: &str, element: S::Handle) -> Result<String, Unresolved> {
        self.substitute_with(raw, element, None)
    }

    fn substitute_with(
        &self,
        raw: &str,
        element: S::Handle,
        overrides: Option<&CustomProperties>,
    ) -> Result<String, Unresolved> {
        if !contains_var(raw) {
            return Ok(raw.to_owned());
        }
        let lookup = ElementVars {
            style: self.style,
            element,
            overrides,
        };
        resolve_vars_with_limit(raw, &lookup, self.max_var_depth)
    }

    /// Resolve `raw` as the value of `property` on `element`.
    ///
    /// `bounding_box` replaces the box percentages would otherwise be measured
    /// against.
    ///
    /// # Errors
    /// Returns `Unresolved` when any step fails; callers should keep the value
    /// they had rather than apply a partial result.
    pub fn resolve_value(
        &self,
        property: &str,
        raw: &str,
        element: S::Handle,
        bounding_box: Option<BoxSize>,
    ) -> Result<ResolvedValue, Unresolved> {
        self.resolve_with(property, raw, element, bounding_box, None)
    }

    fn resolve_with(
        &self,
        name: &str,
        raw: &str,
        element: S::Handle,
        bounding_box: Option<BoxSize>,
        overrides: Option<&CustomProperties>,
    ) -> Result<ResolvedValue, Unresolved> {
        let substituted = self.substitute_with(raw.trim(), element, overrides)?;
        let text = substituted.trim();
        if text.is_empty() {
            debug!("{name}: empty value");
            return Err(Unresolved::Malformed);
        }
        let property = Property::from_name(name);
        let policy = policy_for(&property);

        let mut context = BoundingContext::new(&self.metrics).with_range(policy.min, policy.max);
        if let Some(font_size) = self.font_size(element, &property) {
            context = context.with_font_size(font_size);
        }
        context.fixed_width = self.is_monospace(element);
        if text.contains('%')
            && let Some(size) = bounding_box.or_else(|| {
                percentage_basis(
                    self.style,
                    self.geometry,
                    &self.metrics,
                    element,
                    policy.basis,
                )
            })
        {
            context = context.with_bounding_box(size);
        }

        let resolved = match policy.shape {
            ValueShape::Single => resolve_single(text, &policy, &context),
            ValueShape::Sides => resolve_sides(text, &policy, &context),
            ValueShape::CommaList => resolve_comma_list(text, &policy, &context),
            ValueShape::Transform => resolve_transform(text, &context),
            ValueShape::Color => resolve_color(text),
            ValueShape::Mixed | ValueShape::Generic => resolve_layers(text, policy.kind, &context),
        };
        match &resolved {
            Ok(value) => trace!("{name}: `{raw}` -> `{value}`"),
            Err(err) => debug!("{name}: `{raw}` unresolved: {err}"),
        }
        resolved
    }

    /// Parse a declaration block and resolve each declaration against `element`.
    ///
    /// Custom properties declared in the block are visible to `var()` in the
    /// same block and take precedence over the element's own; they are not
    /// returned themselves.
    pub fn resolve_declarations(
        &self,
        block: &str,
        element: S::Handle,
    ) -> Vec<(Declaration, Result<ResolvedValue, Unresolved>)> {
        let declarations = parse_declarations(block);
        let custom: CustomProperties = declarations
            .iter()
            .filter(|declaration| declaration.is_custom_property())
            .map(|declaration| (declaration.name.clone(), declaration.value.clone()))
            .collect();
        declarations
            .into_iter()
            .filter(|declaration| !declaration.is_custom_property())
            .map(|declaration| {
                let resolved = self.resolve_with(
                    &declaration.name,
                    &declaration.value,
                    element,
                    None,
                    Some(&custom),
                );
                (declaration, resolved)
            })
            .collect()
    }

    /// Convert `text` into `target_unit`, with font-relative units taken from `element`.
    ///
    /// # Errors
    /// Returns `Unresolved` for unknown units, mismatched categories, or
    /// font-relative units when `element` has no computed font size.
    pub fn convert_unit(
        &self,
        text: &str,
        target_unit: &str,
        element: S::Handle,
    ) -> Result<f64, Unresolved> {
        let mut context = UnitContext::new(&self.metrics);
        if let Some(font_size) = computed_font_size(self.style, element) {
            context = context.with_font_size(font_size);
        }
        context.fixed_width = self.is_monospace(element);
        convert_unit(text, target_unit, &context)
    }
}

impl<S, G> ValueResolver<'_, S, G>
where
    S: StyleProvider + Sync,
    G: GeometryProvider<Handle = S::Handle> + Sync,
    S::Handle: Send + Sync,
{
    /// Resolve independent requests in parallel; results keep the request order.
    pub fn resolve_batch(
        &self,
        requests: &[ResolveRequest<S::Handle>],
    ) -> Vec<Result<ResolvedValue, Unresolved>> {
        requests
            .par_iter()
            .map(|request| {
                self.resolve_value(
                    &request.property,
                    &request.raw,
                    request.element,
                    request.bounding_box,
                )
            })
            .collect()
    }
}

/// Specificity of a selector list (the most specific alternative).
#[inline]
pub fn score_specificity(selector: &str) -> Specificity {
    score_selector_list(selector)
}

/// Parse a standalone color value.
///
/// # Errors
/// Returns `Unresolved::InvalidColor` or a channel failure.
#[inline]
pub fn parse_color_value(value: &str) -> Result<Color, Unresolved> {
    parse_color(value)
}
