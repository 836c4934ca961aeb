//! `rgb()`, `rgba()`, `hsl()` and `hsla()`.
//! Spec: <https://www.w3.org/TR/css-color-4/#rgb-functions>
//! Spec: <https://www.w3.org/TR/css-color-4/#the-hsl-notation>

use crate::Rgba;
use crate::hsl::{Hsla, channel_to_u8, hsla_to_rgba};
use css_syntax::{GroupMarker, Segment, split_groups, split_top_level, split_top_level_whitespace};
use css_values_units::{
    BoundingContext, DocumentMetrics, Numeric, Unit, UnitKind, Unresolved, calculate_typed,
    contains_math_function, parse_numeric,
};
use log::{debug, trace};

/// Color functions handled here; the `a` forms are aliases.
const COLOR_FUNCTIONS: &[&str] = &["rgb", "rgba", "hsl", "hsla"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ColorModel {
    Rgb,
    Hsl,
}

impl ColorModel {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => Some(Self::Rgb),
            "hsl" | "hsla" => Some(Self::Hsl),
            _ => None,
        }
    }

    /// Unit kind and permitted range for a computed channel.
    fn channel_kind(self, index: usize, text: &str) -> (UnitKind, f64, f64) {
        let percent = text.contains('%');
        match (self, index) {
            (_, 3) if percent => (UnitKind::Percent, 0.0, 100.0),
            (_, 3) => (UnitKind::Decimal, 0.0, 1.0),
            (Self::Rgb, _) if percent => (UnitKind::Percent, 0.0, 100.0),
            (Self::Rgb, _) => (UnitKind::Integer, 0.0, 255.0),
            (Self::Hsl, 0) => (UnitKind::Angle, f64::NEG_INFINITY, f64::INFINITY),
            (Self::Hsl, _) => (UnitKind::Percent, 0.0, 100.0),
        }
    }
}

/// Color channels, plus alpha when present.
fn split_channels(inner: &str) -> Result<Vec<&str>, Unresolved> {
    let mut channels = match split_top_level(inner, b'/').as_slice() {
        [body] => {
            let commas = split_top_level(*body, b',');
            if commas.len() > 1 {
                commas
            } else {
                split_top_level_whitespace(*body)
            }
        }
        [body, alpha] => {
            let mut channels = split_top_level_whitespace(*body);
            channels.push(*alpha);
            channels
        }
        _ => return Err(Unresolved::Malformed),
    };
    channels.retain(|channel| !channel.is_empty());
    if !(3..=4).contains(&channels.len()) {
        debug!("expected 3 or 4 color channels in `{inner}`");
        return Err(Unresolved::InvalidColor(inner.trim().to_owned()));
    }
    Ok(channels)
}

/// Resolve every math function inside color functions in `value`.
///
/// Each computed channel is checked against its own range: RGB channels as
/// integers in `[0, 255]` (percent in `[0, 100]` when written with `%`), hue as
/// an angle, saturation and lightness as percent in `[0, 100]`, alpha as a
/// number in `[0, 1]` (percent with `%`). Channels are rewritten comma
/// separated, alpha last.
///
/// # Errors
/// Returns `Unresolved` for unbalanced input or when any channel fails.
pub fn calculate_color(value: &str) -> Result<String, Unresolved> {
    let segments =
        split_groups(value, GroupMarker::Functions(COLOR_FUNCTIONS)).ok_or(Unresolved::Malformed)?;
    let metrics = DocumentMetrics::default();
    let mut out = String::with_capacity(value.len());
    for segment in segments {
        match segment {
            Segment::Literal(literal) => out.push_str(literal),
            Segment::Group(group) => {
                let model = ColorModel::from_name(group.name).ok_or(Unresolved::Malformed)?;
                let mut channels = Vec::new();
                for (index, channel) in split_channels(group.inner)?.into_iter().enumerate() {
                    if !contains_math_function(channel) {
                        channels.push(channel.to_owned());
                        continue;
                    }
                    let (kind, min, max) = model.channel_kind(index, channel);
                    let context = BoundingContext::new(&metrics).with_range(Some(min), Some(max));
                    let computed = calculate_typed(channel, kind, &context)?;
                    trace!("color channel `{channel}` -> {}", computed.to_css());
                    channels.push(computed.to_css());
                }
                out.push_str(group.name);
                out.push('(');
                out.push_str(&channels.join(", "));
                out.push(')');
            }
        }
    }
    Ok(out)
}

fn invalid_channel(text: &str) -> Unresolved {
    Unresolved::InvalidColor(text.to_owned())
}

/// An RGB channel on the 0-255 scale.
fn rgb_channel(text: &str) -> Result<f64, Unresolved> {
    if text.eq_ignore_ascii_case("none") {
        return Ok(0.0);
    }
    match parse_numeric(text) {
        Some(Numeric::Number(value)) => Ok(value.clamp(0.0, 255.0)),
        Some(Numeric::Percentage(percent)) => Ok((percent * 2.55).clamp(0.0, 255.0)),
        _ => Err(invalid_channel(text)),
    }
}

/// A hue in degrees.
fn hue_channel(text: &str) -> Result<f64, Unresolved> {
    if text.eq_ignore_ascii_case("none") {
        return Ok(0.0);
    }
    match parse_numeric(text) {
        Some(Numeric::Number(value)) => Ok(value),
        Some(Numeric::Dimension { value, unit }) => match Unit::parse(&unit) {
            Some(Unit::Angle(angle)) => Ok(angle.to_degrees(value)),
            _ => Err(invalid_channel(text)),
        },
        _ => Err(invalid_channel(text)),
    }
}

/// Saturation or lightness in percent.
fn percent_channel(text: &str) -> Result<f64, Unresolved> {
    if text.eq_ignore_ascii_case("none") {
        return Ok(0.0);
    }
    match parse_numeric(text) {
        Some(Numeric::Percentage(value) | Numeric::Number(value)) => Ok(value.clamp(0.0, 100.0)),
        _ => Err(invalid_channel(text)),
    }
}

/// Alpha in `[0, 1]`.
fn alpha_channel(text: Option<&str>) -> Result<f64, Unresolved> {
    let Some(text) = text else {
        return Ok(1.0);
    };
    if text.eq_ignore_ascii_case("none") {
        return Ok(0.0);
    }
    match parse_numeric(text) {
        Some(Numeric::Number(value)) => Ok(value.clamp(0.0, 1.0)),
        Some(Numeric::Percentage(percent)) => Ok((percent / 100.0).clamp(0.0, 1.0)),
        _ => Err(invalid_channel(text)),
    }
}

/// Parse the arguments of a color function named `name`.
///
/// # Errors
/// Returns `Unresolved::InvalidColor` for unknown functions, wrong channel
/// counts, or channels of the wrong type.
pub fn parse_color_function(name: &str, inner: &str) -> Result<Rgba, Unresolved> {
    let model = ColorModel::from_name(name)
        .ok_or_else(|| Unresolved::InvalidColor(format!("{name}({inner})")))?;
    let channels = split_channels(inner)?;
    let alpha = alpha_channel(channels.get(3).copied())?;
    let [first, second, third] = [0, 1, 2].map(|index| channels.get(index).copied().unwrap_or_default());
    match model {
        ColorModel::Rgb => Ok(Rgba::new(
            channel_to_u8(rgb_channel(first)?),
            channel_to_u8(rgb_channel(second)?),
            channel_to_u8(rgb_channel(third)?),
            channel_to_u8(alpha * 255.0),
        )),
        ColorModel::Hsl => Ok(hsla_to_rgba(Hsla::new(
            hue_channel(first)?,
            percent_channel(second)?,
            percent_channel(third)?,
            alpha,
        ))),
    }
}

/// Parse `text` when it is exactly one color function.
///
/// Returns `None` when `text` is not a color function call at all.
pub fn parse_functional(text: &str) -> Option<Result<Rgba, Unresolved>> {
    let segments = split_groups(text, GroupMarker::Functions(COLOR_FUNCTIONS))?;
    match segments.as_slice() {
        [Segment::Group(group)] if group.full.len() == text.len() => {
            Some(parse_color_function(group.name, group.inner))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_and_space_syntax() {
        assert_eq!(parse_color_function("rgb", "255, 0, 128"), Ok(Rgba::new(255, 0, 128, 255)));
        assert_eq!(
            parse_color_function("rgba", "255, 0, 128, 0.5"),
            Ok(Rgba::new(255, 0, 128, 128))
        );
        assert_eq!(
            parse_color_function("rgb", "255 0 128 / 25%"),
            Ok(Rgba::new(255, 0, 128, 64))
        );
        assert_eq!(parse_color_function("rgb", "100% 50% 0%"), Ok(Rgba::new(255, 128, 0, 255)));
    }

    #[test]
    fn parses_hsl_with_angles() {
        assert_eq!(parse_color_function("hsl", "120, 100%, 50%"), Ok(Rgba::new(0, 255, 0, 255)));
        assert_eq!(parse_color_function("hsl", "0.5turn 100% 50%"), Ok(Rgba::new(0, 255, 255, 255)));
        assert_eq!(
            parse_color_function("hsla", "240deg 100% 50% / 0"),
            Ok(Rgba::new(0, 0, 255, 0))
        );
    }

    #[test]
    fn rejects_bad_channels() {
        assert_eq!(parse_color_function("rgb", "1, 2").ok(), None);
        assert_eq!(parse_color_function("rgb", "1px, 2, 3").ok(), None);
        assert_eq!(parse_color_function("hsl", "10px 50% 50%").ok(), None);
    }

    #[test]
    fn computes_channels() {
        assert_eq!(
            calculate_color("rgb(calc(1 + 2), 0, 0)"),
            Ok("rgb(3, 0, 0)".to_owned())
        );
        assert_eq!(
            calculate_color("hsl(calc(60 * 2) calc(50% + 50%) 50%)"),
            Ok("hsl(120deg, 100%, 50%)".to_owned())
        );
        assert_eq!(
            calculate_color("rgba(0, 0, 0, calc(0.25 * 2))"),
            Ok("rgba(0, 0, 0, 0.5)".to_owned())
        );
    }

    #[test]
    fn computed_channels_respect_ranges() {
        assert_eq!(
            calculate_color("rgb(calc(200 + 100), 0, 0)"),
            Err(Unresolved::OutOfRange)
        );
        assert_eq!(
            calculate_color("rgba(0, 0, 0, calc(2 * 1))"),
            Err(Unresolved::OutOfRange)
        );
        assert_eq!(calculate_color("rgb(calc(1px), 0, 0)").ok(), None);
    }

    #[test]
    fn recognizes_single_functions_only() {
        assert!(parse_functional("rgb(1, 2, 3)").is_some());
        assert!(parse_functional("rgb(1, 2, 3) red").is_none());
        assert!(parse_functional("#fff").is_none());
    }
}
