//! Choosing the box percentages are measured against.
//! Spec: <https://www.w3.org/TR/css-position-3/#def-cb>

use crate::property::PercentBasis;
use crate::providers::{GeometryProvider, StyleProvider};
use css_values_units::{BoxSize, DocumentMetrics, Numeric, parse_numeric};
use log::trace;

/// Computed `font-size` of `element` in pixels, when it is an absolute length.
pub fn computed_font_size<S: StyleProvider>(style: &S, element: S::Handle) -> Option<f64> {
    match parse_numeric(&style.computed_value(element, "font-size"))? {
        Numeric::Dimension { value, unit } if unit == "px" => Some(value),
        Numeric::Number(value) => Some(value),
        _ => None,
    }
}

/// Whether `position` keeps an element from establishing a containing block.
fn is_static(position: &str) -> bool {
    let trimmed = position.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("static")
}

/// Content box of the nearest ancestor that can serve as containing block.
///
/// Starts at the parent. When `element` is out of flow, statically positioned
/// ancestors are skipped, whether it is `absolute` or `fixed`; the root is
/// always eligible.
pub fn containing_block<S, G>(style: &S, geometry: &G, element: S::Handle) -> Option<BoxSize>
where
    S: StyleProvider,
    G: GeometryProvider<Handle = S::Handle>,
{
    let out_of_flow = geometry.is_out_of_flow(element);
    let mut current = geometry.parent_of(element);
    while let Some(ancestor) = current {
        let parent = geometry.parent_of(ancestor);
        let skipped = out_of_flow
            && parent.is_some()
            && is_static(&style.computed_value(ancestor, "position"));
        if !skipped
            && let Some(size) = geometry.content_box(ancestor)
            && size.is_usable()
        {
            return Some(size);
        }
        current = parent;
    }
    trace!("no ancestor with a usable content box");
    None
}

/// The reference box for percentages under `basis`.
///
/// Font-size bases come back as a square box so either axis yields the font size.
pub fn percentage_basis<S, G>(
    style: &S,
    geometry: &G,
    metrics: &DocumentMetrics,
    element: S::Handle,
    basis: PercentBasis,
) -> Option<BoxSize>
where
    S: StyleProvider,
    G: GeometryProvider<Handle = S::Handle>,
{
    let size = match basis {
        PercentBasis::ContainingBlock => containing_block(style, geometry, element),
        PercentBasis::OwnContentBox => geometry.content_box(element),
        PercentBasis::OwnBorderBox => geometry.bounding_rect(element).map(|rect| rect.size()),
        PercentBasis::ParentFontSize => Some(BoxSize::square(
            geometry
                .parent_of(element)
                .and_then(|parent| computed_font_size(style, parent))
                .unwrap_or(metrics.root_font_size),
        )),
        PercentBasis::OwnFontSize => computed_font_size(style, element).map(BoxSize::square),
        PercentBasis::None => None,
    };
    size.filter(|found| found.is_usable())
}
