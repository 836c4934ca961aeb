//! Property policies: how each property's value is shaped, typed and bounded.
//!
//! Known properties map to a static [`PropertyPolicy`]; anything else falls
//! back to the generic heuristic, which recognizes colors and lengths per
//! component.

use css_values_units::{Axis, UnitKind};

/// Both axes, cycled per component (`x y`).
const WIDTH_HEIGHT: &[Axis] = &[Axis::Width, Axis::Height];
/// Vertical then horizontal, cycled per component (`top right bottom left`).
const HEIGHT_WIDTH: &[Axis] = &[Axis::Height, Axis::Width];
const WIDTH: &[Axis] = &[Axis::Width];
const HEIGHT: &[Axis] = &[Axis::Height];

/// How a value is split into components.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueShape {
    /// One component.
    Single,
    /// Space-separated components; percentages cycle through the policy axes.
    Sides,
    /// Comma-separated components (`transition-duration: 1s, 200ms`).
    CommaList,
    /// A list of transform functions.
    Transform,
    /// A single color.
    Color,
    /// Comma-separated layers of mixed lengths, colors and keywords (`box-shadow`, `border`).
    Mixed,
    /// Unknown property; every component is classified on its own.
    Generic,
}

/// What percentages are measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PercentBasis {
    /// Content box of the nearest usable ancestor.
    ContainingBlock,
    /// The element's own content box.
    OwnContentBox,
    /// The element's own border box.
    OwnBorderBox,
    /// The parent's font size.
    ParentFontSize,
    /// The element's own font size.
    OwnFontSize,
    /// Percentages are not allowed.
    None,
}

/// Static resolution rules for one property.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropertyPolicy {
    pub shape: ValueShape,
    pub kind: UnitKind,
    /// Axis per component, cycled; the first entry is used for single values.
    pub axes: &'static [Axis],
    pub basis: PercentBasis,
    /// Whether a bare number is a valid value in its own right (`line-height: 1.5`).
    pub allow_number: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PropertyPolicy {
    const fn new(shape: ValueShape, kind: UnitKind) -> Self {
        Self {
            shape,
            kind,
            axes: WIDTH,
            basis: PercentBasis::None,
            allow_number: false,
            min: None,
            max: None,
        }
    }

    const fn length(axes: &'static [Axis]) -> Self {
        Self::new(ValueShape::Single, UnitKind::Length).relative_to(PercentBasis::ContainingBlock, axes)
    }

    const fn relative_to(mut self, basis: PercentBasis, axes: &'static [Axis]) -> Self {
        self.basis = basis;
        self.axes = axes;
        self
    }

    const fn shaped(mut self, shape: ValueShape) -> Self {
        self.shape = shape;
        self
    }

    const fn non_negative(mut self) -> Self {
        self.min = Some(0.0);
        self
    }

    const fn between(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    const fn with_numbers(mut self) -> Self {
        self.allow_number = true;
        self
    }

    /// The axis for the component at `index`.
    #[inline]
    pub fn axis_for(&self, index: usize) -> Axis {
        match self.axes.len() {
            0 => Axis::Width,
            len => self.axes.get(index % len).copied().unwrap_or_default(),
        }
    }
}

/// Properties with dedicated policies.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Property {
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    Top,
    Right,
    Bottom,
    Left,
    Inset,
    Margin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderWidth,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderRadius,
    OutlineWidth,
    OutlineOffset,
    FontSize,
    FontWeight,
    LineHeight,
    LetterSpacing,
    WordSpacing,
    TextIndent,
    Gap,
    RowGap,
    ColumnGap,
    FlexBasis,
    FlexGrow,
    FlexShrink,
    Order,
    ZIndex,
    Opacity,
    Color,
    BackgroundColor,
    BorderColor,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    OutlineColor,
    TextDecorationColor,
    BackgroundSize,
    Transform,
    TransformOrigin,
    Perspective,
    TransitionDuration,
    TransitionDelay,
    AnimationDuration,
    AnimationDelay,
    BoxShadow,
    TextShadow,
    Border,
    BorderTop,
    BorderRight,
    BorderBottom,
    BorderLeft,
    Outline,
    /// Any property without a dedicated policy, lowercased.
    Other(String),
}

impl Property {
    /// Look up a property by its (ASCII case-insensitive) CSS name.
    pub fn from_name(name: &str) -> Self {
        let lowered = name.trim().to_ascii_lowercase();
        match lowered.as_str() {
            "width" => Self::Width,
            "height" => Self::Height,
            "min-width" => Self::MinWidth,
            "min-height" => Self::MinHeight,
            "max-width" => Self::MaxWidth,
            "max-height" => Self::MaxHeight,
            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            "inset" => Self::Inset,
            "margin" => Self::Margin,
            "margin-top" => Self::MarginTop,
            "margin-right" => Self::MarginRight,
            "margin-bottom" => Self::MarginBottom,
            "margin-left" => Self::MarginLeft,
            "padding" => Self::Padding,
            "padding-top" => Self::PaddingTop,
            "padding-right" => Self::PaddingRight,
            "padding-bottom" => Self::PaddingBottom,
            "padding-left" => Self::PaddingLeft,
            "border-width" => Self::BorderWidth,
            "border-top-width" => Self::BorderTopWidth,
            "border-right-width" => Self::BorderRightWidth,
            "border-bottom-width" => Self::BorderBottomWidth,
            "border-left-width" => Self::BorderLeftWidth,
            "border-radius" => Self::BorderRadius,
            "outline-width" => Self::OutlineWidth,
            "outline-offset" => Self::OutlineOffset,
            "font-size" => Self::FontSize,
            "font-weight" => Self::FontWeight,
            "line-height" => Self::LineHeight,
            "letter-spacing" => Self::LetterSpacing,
            "word-spacing" => Self::WordSpacing,
            "text-indent" => Self::TextIndent,
            "gap" | "grid-gap" => Self::Gap,
            "row-gap" | "grid-row-gap" => Self::RowGap,
            "column-gap" | "grid-column-gap" => Self::ColumnGap,
            "flex-basis" => Self::FlexBasis,
            "flex-grow" => Self::FlexGrow,
            "flex-shrink" => Self::FlexShrink,
            "order" => Self::Order,
            "z-index" => Self::ZIndex,
            "opacity" => Self::Opacity,
            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,
            "border-color" => Self::BorderColor,
            "border-top-color" => Self::BorderTopColor,
            "border-right-color" => Self::BorderRightColor,
            "border-bottom-color" => Self::BorderBottomColor,
            "border-left-color" => Self::BorderLeftColor,
            "outline-color" => Self::OutlineColor,
            "text-decoration-color" => Self::TextDecorationColor,
            "background-size" => Self::BackgroundSize,
            "transform" => Self::Transform,
            "transform-origin" => Self::TransformOrigin,
            "perspective" => Self::Perspective,
            "transition-duration" => Self::TransitionDuration,
            "transition-delay" => Self::TransitionDelay,
            "animation-duration" => Self::AnimationDuration,
            "animation-delay" => Self::AnimationDelay,
            "box-shadow" => Self::BoxShadow,
            "text-shadow" => Self::TextShadow,
            "border" => Self::Border,
            "border-top" => Self::BorderTop,
            "border-right" => Self::BorderRight,
            "border-bottom" => Self::BorderBottom,
            "border-left" => Self::BorderLeft,
            "outline" => Self::Outline,
            _ => Self::Other(lowered),
        }
    }

    /// True when percentages are measured against font sizes rather than boxes.
    #[inline]
    pub fn is_font_size(&self) -> bool {
        matches!(self, Self::FontSize)
    }
}

/// The resolution rules for `property`.
pub fn policy_for(property: &Property) -> PropertyPolicy {
    use PercentBasis as Basis;
    use UnitKind as Kind;
    use ValueShape as Shape;

    match property {
        Property::Width | Property::MinWidth | Property::MaxWidth | Property::FlexBasis => {
            PropertyPolicy::length(WIDTH).non_negative()
        }
        Property::Height | Property::MinHeight | Property::MaxHeight => {
            PropertyPolicy::length(HEIGHT).non_negative()
        }
        Property::Top | Property::Bottom => PropertyPolicy::length(HEIGHT),
        Property::Left
        | Property::Right
        | Property::TextIndent
        | Property::MarginTop
        | Property::MarginRight
        | Property::MarginBottom
        | Property::MarginLeft => PropertyPolicy::length(WIDTH),
        Property::Inset => PropertyPolicy::length(HEIGHT_WIDTH).shaped(Shape::Sides),
        // Margin and padding percentages refer to the containing block's width on every side.
        Property::Margin => PropertyPolicy::length(WIDTH).shaped(Shape::Sides),
        Property::Padding => PropertyPolicy::length(WIDTH)
            .shaped(Shape::Sides)
            .non_negative(),
        Property::PaddingTop
        | Property::PaddingRight
        | Property::PaddingBottom
        | Property::PaddingLeft => PropertyPolicy::length(WIDTH).non_negative(),
        Property::BorderWidth => PropertyPolicy::new(Shape::Sides, Kind::Length).non_negative(),
        Property::BorderTopWidth
        | Property::BorderRightWidth
        | Property::BorderBottomWidth
        | Property::BorderLeftWidth
        | Property::OutlineWidth
        | Property::Perspective => PropertyPolicy::new(Shape::Single, Kind::Length).non_negative(),
        Property::OutlineOffset | Property::LetterSpacing | Property::WordSpacing => {
            PropertyPolicy::new(Shape::Single, Kind::Length)
        }
        Property::BorderRadius => PropertyPolicy::new(Shape::Sides, Kind::Length)
            .relative_to(Basis::OwnBorderBox, WIDTH)
            .non_negative(),
        Property::FontSize => PropertyPolicy::new(Shape::Single, Kind::Length)
            .relative_to(Basis::ParentFontSize, WIDTH)
            .non_negative(),
        Property::LineHeight => PropertyPolicy::new(Shape::Single, Kind::Length)
            .relative_to(Basis::OwnFontSize, WIDTH)
            .with_numbers()
            .non_negative(),
        Property::FontWeight => PropertyPolicy::new(Shape::Single, Kind::Decimal).between(1.0, 1000.0),
        Property::Gap => PropertyPolicy::length(HEIGHT_WIDTH)
            .shaped(Shape::Sides)
            .non_negative(),
        Property::RowGap => PropertyPolicy::length(HEIGHT).non_negative(),
        Property::ColumnGap => PropertyPolicy::length(WIDTH).non_negative(),
        Property::FlexGrow | Property::FlexShrink => {
            PropertyPolicy::new(Shape::Single, Kind::Decimal).non_negative()
        }
        Property::Order | Property::ZIndex => PropertyPolicy::new(Shape::Single, Kind::Integer),
        Property::Opacity => PropertyPolicy::new(Shape::Single, Kind::Decimal).between(0.0, 1.0),
        Property::Color
        | Property::BackgroundColor
        | Property::BorderTopColor
        | Property::BorderRightColor
        | Property::BorderBottomColor
        | Property::BorderLeftColor
        | Property::OutlineColor
        | Property::TextDecorationColor => PropertyPolicy::new(Shape::Color, Kind::None),
        Property::BorderColor => PropertyPolicy::new(Shape::Mixed, Kind::None),
        Property::BackgroundSize => PropertyPolicy::new(Shape::Sides, Kind::Length)
            .relative_to(Basis::OwnContentBox, WIDTH_HEIGHT)
            .non_negative(),
        Property::Transform => PropertyPolicy::new(Shape::Transform, Kind::Length)
            .relative_to(Basis::OwnBorderBox, WIDTH_HEIGHT),
        Property::TransformOrigin => PropertyPolicy::new(Shape::Sides, Kind::Length)
            .relative_to(Basis::OwnBorderBox, WIDTH_HEIGHT),
        Property::TransitionDuration | Property::AnimationDuration => {
            PropertyPolicy::new(Shape::CommaList, Kind::Time).non_negative()
        }
        Property::TransitionDelay | Property::AnimationDelay => {
            PropertyPolicy::new(Shape::CommaList, Kind::Time)
        }
        Property::BoxShadow
        | Property::TextShadow
        | Property::Border
        | Property::BorderTop
        | Property::BorderRight
        | Property::BorderBottom
        | Property::BorderLeft
        | Property::Outline => PropertyPolicy::new(Shape::Mixed, Kind::Length),
        Property::Other(_) => PropertyPolicy::new(Shape::Generic, Kind::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(Property::from_name("Width"), Property::Width);
        assert_eq!(Property::from_name(" grid-gap "), Property::Gap);
        assert_eq!(
            Property::from_name("Mask-Size"),
            Property::Other("mask-size".to_owned())
        );
    }

    #[test]
    fn axes_cycle_per_component() {
        let inset = policy_for(&Property::Inset);
        assert_eq!(inset.axis_for(0), Axis::Height);
        assert_eq!(inset.axis_for(1), Axis::Width);
        assert_eq!(inset.axis_for(2), Axis::Height);
        assert_eq!(policy_for(&Property::Margin).axis_for(3), Axis::Width);
    }

    #[test]
    fn unknown_properties_use_the_heuristic() {
        let policy = policy_for(&Property::from_name("mask-size"));
        assert_eq!(policy.shape, ValueShape::Generic);
        assert_eq!(policy.kind, UnitKind::None);
    }

    #[test]
    fn sizes_cannot_go_negative() {
        assert_eq!(policy_for(&Property::Width).min, Some(0.0));
        assert_eq!(policy_for(&Property::Left).min, None);
        assert_eq!(policy_for(&Property::Opacity).max, Some(1.0));
    }
}
