//! Color-valued properties.

use crate::value::ResolvedValue;
use css_color::parse_color;
use css_values_units::Unresolved;

/// Keywords a color property accepts besides colors.
const COLOR_KEYWORDS: &[&str] = &[
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "revert",
    "revert-layer",
];

/// Resolve a color property value.
///
/// # Errors
/// Returns `Unresolved::InvalidColor` (or a channel failure) for anything that
/// is neither a color nor one of the accepted keywords.
pub fn resolve_color(text: &str) -> Result<ResolvedValue, Unresolved> {
    if let Some(keyword) = COLOR_KEYWORDS
        .iter()
        .find(|keyword| text.eq_ignore_ascii_case(keyword))
    {
        return Ok(ResolvedValue::Keyword((*keyword).to_owned()));
    }
    parse_color(text).map(ResolvedValue::Color)
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_color::{Color, Rgba};

    #[test]
    fn colors_and_keywords() {
        assert_eq!(
            resolve_color("rgb(calc(1 + 2), 0, 0)"),
            Ok(ResolvedValue::Color(Color::from_rgba(Rgba::new(3, 0, 0, 255))))
        );
        assert_eq!(
            resolve_color("CurrentColor"),
            Ok(ResolvedValue::Keyword("currentcolor".to_owned()))
        );
        assert!(matches!(
            resolve_color("not-a-color"),
            Err(Unresolved::InvalidColor(_))
        ));
    }
}
