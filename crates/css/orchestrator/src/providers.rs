//! Collaborators the resolver reads from.
//!
//! Implement these for your DOM layer; the resolver only ever borrows them
//! immutably, so implementations that are `Sync` can serve parallel batches.

use css_values_units::BoxSize;

/// Read access to computed styles.
pub trait StyleProvider {
    type Handle: Copy + Eq;

    /// Computed value of `property` for `element`, or an empty string when unknown.
    fn computed_value(&self, element: Self::Handle, property: &str) -> String;

    /// Value of the custom property `name` (including `--`) on `element`, or an
    /// empty string when unset.
    fn custom_property(&self, element: Self::Handle, name: &str) -> String;
}

/// Border-box rectangle in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn size(self) -> BoxSize {
        BoxSize::new(self.width, self.height)
    }
}

/// Read access to layout geometry.
pub trait GeometryProvider {
    type Handle: Copy + Eq;

    /// Content box (border box minus borders and padding), when laid out.
    fn content_box(&self, element: Self::Handle) -> Option<BoxSize>;

    /// Border box in page coordinates, when laid out.
    fn bounding_rect(&self, element: Self::Handle) -> Option<Rect>;

    /// Parent element, `None` for the document root.
    fn parent_of(&self, element: Self::Handle) -> Option<Self::Handle>;

    /// True for absolutely or fixed positioned elements.
    fn is_out_of_flow(&self, element: Self::Handle) -> bool;
}
