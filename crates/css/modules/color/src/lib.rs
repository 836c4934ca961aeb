//! CSS Color Module Level 4 — Color spaces, color values, and opacity.
//! Spec: <https://www.w3.org/TR/css-color-4/>

#![forbid(unsafe_code)]

use core::fmt;
use csscolorparser::Color as ExtendedColor;
use css_values_units::{Unresolved, contains_math_function, format_number, round_to_precision};
use log::debug;

pub mod adjust;
pub mod functional;
pub mod hex;
pub mod hsl;
pub mod named;

pub use functional::{calculate_color, parse_color_function};
pub use hex::{hex_value, parse_hex_color, to_hex};
pub use hsl::{Hsla, hsla_to_rgba, rgba_to_hsla};
pub use named::{NAMED_COLORS, NamedColor, keyword_for, named_color};

/// 8-bit RGBA channels; alpha is on the same 0-255 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Alpha in `[0, 1]`.
    #[inline]
    pub fn alpha_fraction(self) -> f64 {
        f64::from(self.alpha) / 255.0
    }
}

/// A parsed color with its canonical hex form and, for opaque colors that
/// match the named-color table, its keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub rgba: Rgba,
    pub hex: String,
    pub keyword: Option<&'static str>,
}

impl Color {
    pub fn from_rgba(rgba: Rgba) -> Self {
        Self {
            rgba,
            hex: to_hex(rgba),
            keyword: keyword_for(rgba),
        }
    }

    #[inline]
    pub fn to_hsla(&self) -> Hsla {
        rgba_to_hsla(self.rgba)
    }

    /// `#rrggbb` when opaque, otherwise `rgba(r, g, b, a)`.
    pub fn to_css(&self) -> String {
        let Rgba {
            red,
            green,
            blue,
            alpha,
        } = self.rgba;
        if alpha == u8::MAX {
            return self.hex.clone();
        }
        let fraction = format_number(round_to_precision(self.rgba.alpha_fraction(), 3));
        format!("rgba({red}, {green}, {blue}, {fraction})")
    }
}

impl From<Rgba> for Color {
    #[inline]
    fn from(rgba: Rgba) -> Self {
        Self::from_rgba(rgba)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.to_css())
    }
}

/// Parse a CSS `<color>`.
///
/// Accepts `transparent`, hex notation, named colors and `rgb()`/`hsl()` in
/// legacy and modern syntax. Channels using math functions are computed
/// first. Other CSS Color 4 notations (`hwb()`, `lab()`, ...) are handed to
/// `csscolorparser`.
///
/// # Errors
/// Returns `Unresolved::InvalidColor` for text that is not a color, or the
/// failure of a computed channel.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#typedef-color>
pub fn parse_color(value: &str) -> Result<Color, Unresolved> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Unresolved::InvalidColor(String::new()));
    }
    let computed = if contains_math_function(trimmed) {
        calculate_color(trimmed)?
    } else {
        trimmed.to_owned()
    };
    parse_rgba(&computed).map(Color::from_rgba)
}

fn parse_rgba(text: &str) -> Result<Rgba, Unresolved> {
    if text.eq_ignore_ascii_case("transparent") {
        return Ok(Rgba::TRANSPARENT);
    }
    if text.starts_with('#') {
        return parse_hex_color(text).ok_or_else(|| Unresolved::InvalidColor(text.to_owned()));
    }
    if let Some(entry) = named_color(text) {
        return Ok(entry.rgba());
    }
    if let Some(parsed) = functional::parse_functional(text) {
        return parsed;
    }
    match text.parse::<ExtendedColor>() {
        Ok(parsed) => {
            let [red, green, blue, alpha] = parsed.to_rgba8();
            Ok(Rgba::new(red, green, blue, alpha))
        }
        Err(err) => {
            debug!("`{text}` is not a color: {err}");
            Err(Unresolved::InvalidColor(text.to_owned()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_notation() {
        assert_eq!(parse_color("#0f0").map(|color| color.rgba), Ok(Rgba::new(0, 255, 0, 255)));
        assert_eq!(parse_color("Teal").map(|color| color.rgba), Ok(Rgba::new(0, 128, 128, 255)));
        assert_eq!(parse_color("transparent").map(|color| color.rgba), Ok(Rgba::TRANSPARENT));
        assert_eq!(
            parse_color("hsl(0, 100%, 50%)").map(|color| color.keyword),
            Ok(Some("red"))
        );
        assert_eq!(
            parse_color("hwb(0 0% 0%)").map(|color| color.rgba),
            Ok(Rgba::new(255, 0, 0, 255))
        );
    }

    #[test]
    fn computes_channels_before_parsing() {
        assert_eq!(
            parse_color("rgb(calc(1 + 2), 0, 0)").map(|color| color.rgba),
            Ok(Rgba::new(3, 0, 0, 255))
        );
    }

    #[test]
    fn keywords_attach_only_to_opaque_colors() {
        assert_eq!(parse_color("#ff0000").map(|color| color.keyword), Ok(Some("red")));
        assert_eq!(parse_color("#ff000080").map(|color| color.keyword), Ok(None));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_color("notacolor"), Err(Unresolved::InvalidColor(_))));
        assert!(matches!(parse_color("#12"), Err(Unresolved::InvalidColor(_))));
        assert_eq!(parse_color("").ok(), None);
    }

    #[test]
    fn serializes() {
        assert_eq!(Color::from_rgba(Rgba::new(255, 0, 0, 255)).to_css(), "#ff0000");
        assert_eq!(
            Color::from_rgba(Rgba::new(255, 0, 0, 128)).to_string(),
            "rgba(255, 0, 0, 0.502)"
        );
    }
}
