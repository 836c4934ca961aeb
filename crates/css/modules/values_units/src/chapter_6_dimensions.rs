//! CSS Values & Units Level 4 — §6 Distance, §7 Other quantities
//! Spec: <https://www.w3.org/TR/css-values-4/#lengths>
//! Spec: <https://www.w3.org/TR/css-values-4/#other-units>
//!
//! Every quantity is normalized to a canonical unit: lengths to `px`, times to
//! `ms`, angles to `deg`.

use crate::Unresolved;
use core::f64::consts::PI;
use cssparser::{Parser, ParserInput, Token};
use log::trace;

/// Width and height of a reference box, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoxSize {
    pub width: f64,
    pub height: f64,
}

impl BoxSize {
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A box whose sides both equal `side` (used for font-size bases).
    #[inline]
    pub const fn square(side: f64) -> Self {
        Self::new(side, side)
    }

    /// The extent along `axis`.
    #[inline]
    pub const fn along(self, axis: crate::Axis) -> f64 {
        match axis {
            crate::Axis::Width => self.width,
            crate::Axis::Height => self.height,
        }
    }

    /// True when both sides are finite and non-negative.
    #[inline]
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Document-wide inputs for unit conversion.
///
/// Built once per document (or test) and passed by reference; nothing here is global.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentMetrics {
    /// Computed font size of the root element, in px.
    pub root_font_size: f64,
    /// Font size used for `rem` inside fixed-width (monospace) contexts.
    pub fixed_font_size: f64,
    /// Device pixels per inch; absolute units are anchored to this.
    pub dpi: f64,
    /// Viewport size used by `vw`/`vh`/`vmin`/`vmax`.
    pub viewport: BoxSize,
}

impl Default for DocumentMetrics {
    #[inline]
    fn default() -> Self {
        Self {
            root_font_size: 16.0,
            fixed_font_size: 13.0,
            dpi: 96.0,
            viewport: BoxSize::new(1024.0, 768.0),
        }
    }
}

/// Per-call context for unit conversion.
#[derive(Clone, Copy, Debug)]
pub struct UnitContext<'metrics> {
    pub metrics: &'metrics DocumentMetrics,
    /// Font size for `em`/`ex`/`ch`; absent means those units cannot resolve.
    pub font_size: Option<f64>,
    /// Whether the element uses a fixed-width font, which changes the `rem` anchor.
    pub fixed_width: bool,
    /// Overrides the metrics viewport for viewport-relative units.
    pub viewport: Option<BoxSize>,
}

impl<'metrics> UnitContext<'metrics> {
    #[inline]
    pub const fn new(metrics: &'metrics DocumentMetrics) -> Self {
        Self {
            metrics,
            font_size: None,
            fixed_width: false,
            viewport: None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = Some(font_size);
        self
    }

    #[inline]
    fn viewport(&self) -> BoxSize {
        self.viewport.unwrap_or(self.metrics.viewport)
    }
}

/// Supported CSS <length> units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LengthUnit {
    Pixels,
    Inches,
    Centimeters,
    Millimeters,
    QuarterMillimeters,
    Points,
    Picas,
    Ems,
    Exs,
    Chs,
    RootEms,
    ViewportWidth,
    ViewportHeight,
    ViewportMin,
    ViewportMax,
}

/// Supported CSS <time> units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
}

/// Supported CSS <angle> units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    Degrees,
    Radians,
    Gradians,
    Turns,
}

impl AngleUnit {
    /// Convert `value` in this unit to degrees.
    #[inline]
    pub fn to_degrees(self, value: f64) -> f64 {
        match self {
            Self::Degrees => value,
            Self::Radians => value * 180.0 / PI,
            Self::Gradians => value * 0.9,
            Self::Turns => value * 360.0,
        }
    }
}

/// The quantity a unit measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitCategory {
    Length,
    Time,
    Angle,
}

/// Any unit this engine can normalize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Length(LengthUnit),
    Time(TimeUnit),
    Angle(AngleUnit),
}

impl Unit {
    /// Look up a unit by its (ASCII case-insensitive) CSS name.
    pub fn parse(name: &str) -> Option<Self> {
        let unit = match name.to_ascii_lowercase().as_str() {
            "px" => Self::Length(LengthUnit::Pixels),
            "in" => Self::Length(LengthUnit::Inches),
            "cm" => Self::Length(LengthUnit::Centimeters),
            "mm" => Self::Length(LengthUnit::Millimeters),
            "q" => Self::Length(LengthUnit::QuarterMillimeters),
            "pt" => Self::Length(LengthUnit::Points),
            "pc" => Self::Length(LengthUnit::Picas),
            "em" => Self::Length(LengthUnit::Ems),
            "ex" => Self::Length(LengthUnit::Exs),
            "ch" => Self::Length(LengthUnit::Chs),
            "rem" => Self::Length(LengthUnit::RootEms),
            "vw" => Self::Length(LengthUnit::ViewportWidth),
            "vh" => Self::Length(LengthUnit::ViewportHeight),
            "vmin" => Self::Length(LengthUnit::ViewportMin),
            "vmax" => Self::Length(LengthUnit::ViewportMax),
            "s" => Self::Time(TimeUnit::Seconds),
            "ms" => Self::Time(TimeUnit::Milliseconds),
            "deg" => Self::Angle(AngleUnit::Degrees),
            "rad" => Self::Angle(AngleUnit::Radians),
            "grad" => Self::Angle(AngleUnit::Gradians),
            "turn" => Self::Angle(AngleUnit::Turns),
            _ => return None,
        };
        Some(unit)
    }

    /// The CSS spelling of this unit.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Length(LengthUnit::Pixels) => "px",
            Self::Length(LengthUnit::Inches) => "in",
            Self::Length(LengthUnit::Centimeters) => "cm",
            Self::Length(LengthUnit::Millimeters) => "mm",
            Self::Length(LengthUnit::QuarterMillimeters) => "q",
            Self::Length(LengthUnit::Points) => "pt",
            Self::Length(LengthUnit::Picas) => "pc",
            Self::Length(LengthUnit::Ems) => "em",
            Self::Length(LengthUnit::Exs) => "ex",
            Self::Length(LengthUnit::Chs) => "ch",
            Self::Length(LengthUnit::RootEms) => "rem",
            Self::Length(LengthUnit::ViewportWidth) => "vw",
            Self::Length(LengthUnit::ViewportHeight) => "vh",
            Self::Length(LengthUnit::ViewportMin) => "vmin",
            Self::Length(LengthUnit::ViewportMax) => "vmax",
            Self::Time(TimeUnit::Seconds) => "s",
            Self::Time(TimeUnit::Milliseconds) => "ms",
            Self::Angle(AngleUnit::Degrees) => "deg",
            Self::Angle(AngleUnit::Radians) => "rad",
            Self::Angle(AngleUnit::Gradians) => "grad",
            Self::Angle(AngleUnit::Turns) => "turn",
        }
    }

    #[inline]
    pub const fn category(self) -> UnitCategory {
        match self {
            Self::Length(_) => UnitCategory::Length,
            Self::Time(_) => UnitCategory::Time,
            Self::Angle(_) => UnitCategory::Angle,
        }
    }

    /// Multiplier from this unit to its category's canonical unit.
    ///
    /// # Errors
    /// Returns `Unresolved::MissingFontSize` for `em`/`ex`/`ch` without a font size.
    pub fn factor(self, context: &UnitContext<'_>) -> Result<f64, Unresolved> {
        match self {
            Self::Length(unit) => compute_length_px(1.0, unit, context),
            Self::Time(TimeUnit::Seconds) => Ok(1000.0),
            Self::Time(TimeUnit::Milliseconds) => Ok(1.0),
            Self::Angle(unit) => Ok(unit.to_degrees(1.0)),
        }
    }
}

/// A single numeric token.
#[derive(Clone, Debug, PartialEq)]
pub enum Numeric {
    Number(f64),
    /// Percentage as written (`50%` is `50.0`).
    Percentage(f64),
    Dimension {
        value: f64,
        unit: String,
    },
}

/// A value normalized to its category's canonical unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dimension {
    pub value: f64,
    pub category: UnitCategory,
}

/// Classify a single numeric token (`12`, `-3.5%`, `1e2px`).
///
/// `cssparser` decides what the token is; the number itself is re-read from the
/// source text so it keeps full `f64` precision.
pub fn parse_numeric(text: &str) -> Option<Numeric> {
    let trimmed = text.trim();
    let mut input = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut input);
    let token = parser.next_including_whitespace_and_comments().ok()?.clone();
    parser.expect_exhausted().ok()?;
    match token {
        Token::Number { .. } => trimmed.parse::<f64>().ok().map(Numeric::Number),
        Token::Percentage { .. } => trimmed
            .strip_suffix('%')?
            .parse::<f64>()
            .ok()
            .map(Numeric::Percentage),
        Token::Dimension { unit, .. } => {
            let unit_text: &str = &unit;
            let number_text = trimmed.get(..trimmed.len().checked_sub(unit_text.len())?)?;
            let value = number_text.parse::<f64>().ok()?;
            Some(Numeric::Dimension {
                value,
                unit: unit_text.to_ascii_lowercase(),
            })
        }
        _ => None,
    }
}

/// Compute the pixel value of `value` in `unit`.
///
/// # Errors
/// Returns `Unresolved::MissingFontSize` when a font-relative unit has no font size.
pub fn compute_length_px(
    value: f64,
    unit: LengthUnit,
    context: &UnitContext<'_>,
) -> Result<f64, Unresolved> {
    let metrics = context.metrics;
    let viewport = context.viewport();
    let px = match unit {
        LengthUnit::Pixels => value,
        LengthUnit::Inches => value * metrics.dpi,
        LengthUnit::Centimeters => value * metrics.dpi / 2.54,
        LengthUnit::Millimeters => value * metrics.dpi / 25.4,
        LengthUnit::QuarterMillimeters => value * metrics.dpi / 101.6,
        LengthUnit::Points => value * metrics.dpi / 72.0,
        LengthUnit::Picas => value * metrics.dpi / 6.0,
        LengthUnit::Ems => value * context.font_size.ok_or(Unresolved::MissingFontSize)?,
        // No glyph metrics here; both use the conventional half-em approximation.
        LengthUnit::Exs | LengthUnit::Chs => {
            value * context.font_size.ok_or(Unresolved::MissingFontSize)? / 2.0
        }
        LengthUnit::RootEms => {
            if context.fixed_width {
                value * metrics.fixed_font_size
            } else {
                value * metrics.root_font_size
            }
        }
        LengthUnit::ViewportWidth => value * viewport.width / 100.0,
        LengthUnit::ViewportHeight => value * viewport.height / 100.0,
        LengthUnit::ViewportMin => value * viewport.width.min(viewport.height) / 100.0,
        LengthUnit::ViewportMax => value * viewport.width.max(viewport.height) / 100.0,
    };
    Ok(px)
}

/// Normalize a length, time or angle token to `px`, `ms` or `deg`.
///
/// # Errors
/// Returns `Unresolved` when the token is not a dimension, the unit is unknown,
/// or a font-relative unit lacks a font size.
pub fn to_normalized(token: &str, context: &UnitContext<'_>) -> Result<Dimension, Unresolved> {
    match parse_numeric(token) {
        Some(Numeric::Dimension { value, unit }) => {
            let parsed = Unit::parse(&unit).ok_or(Unresolved::UnknownUnit(unit))?;
            Ok(Dimension {
                value: value * parsed.factor(context)?,
                category: parsed.category(),
            })
        }
        Some(Numeric::Number(_) | Numeric::Percentage(_)) | None => {
            Err(Unresolved::IllegalOperand(token.trim().to_owned()))
        }
    }
}

/// Convert `text` into `target_unit`, going through the canonical unit.
///
/// A bare number is taken to already be in the canonical unit of the target's
/// category (so `convert_unit("96", "in", ..)` is one inch).
///
/// # Errors
/// Returns `Unresolved` for unknown units, mismatched categories (`1s` to `px`),
/// or font-relative units without a font size.
pub fn convert_unit(
    text: &str,
    target_unit: &str,
    context: &UnitContext<'_>,
) -> Result<f64, Unresolved> {
    let target = Unit::parse(target_unit.trim())
        .ok_or_else(|| Unresolved::UnknownUnit(target_unit.trim().to_owned()))?;
    let canonical = match parse_numeric(text) {
        Some(Numeric::Number(value)) => value,
        _ => {
            let normalized = to_normalized(text, context)?;
            if normalized.category != target.category() {
                trace!("cannot convert `{text}` to `{target_unit}`");
                return Err(Unresolved::TypeMismatch);
            }
            normalized.value
        }
    };
    let factor = target.factor(context)?;
    if factor.abs() < f64::EPSILON {
        return Err(Unresolved::DivisionByZero);
    }
    Ok(canonical / factor)
}
