//! Resolved values.

use core::fmt;
use css_color::Color;
use css_values_units::{CalcType, CalcValue, UnitKind, format_number};

/// How the items of a [`ResolvedValue::List`] were separated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListSeparator {
    Space,
    Comma,
}

impl ListSeparator {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Space => " ",
            Self::Comma => ", ",
        }
    }
}

/// A fully resolved value in canonical units.
#[derive(Clone, Debug, PartialEq)]
pub enum ResolvedValue {
    /// Pixels.
    Length(f64),
    Percentage(f64),
    /// Milliseconds.
    Time(f64),
    /// Degrees.
    Angle(f64),
    Number(f64),
    Integer(i64),
    Color(Color),
    /// Identifiers and any other text passed through as written.
    Keyword(String),
    Function {
        name: String,
        args: Vec<ResolvedValue>,
    },
    List {
        separator: ListSeparator,
        items: Vec<ResolvedValue>,
    },
}

impl ResolvedValue {
    /// Convert an evaluated expression; integer kinds become [`ResolvedValue::Integer`].
    pub fn from_calc(value: CalcValue, kind: UnitKind) -> Self {
        match (value.ty, kind) {
            (CalcType::Number, UnitKind::Integer) => Self::Integer(value.value.round() as i64),
            (CalcType::Number, _) => Self::Number(value.value),
            (CalcType::Length, _) => Self::Length(value.value),
            (CalcType::Percentage, _) => Self::Percentage(value.value),
            (CalcType::Time, _) => Self::Time(value.value),
            (CalcType::Angle, _) => Self::Angle(value.value),
        }
    }

    /// A list, or the lone item when there is exactly one.
    pub fn list(separator: ListSeparator, mut items: Vec<Self>) -> Self {
        if items.len() == 1
            && let Some(item) = items.pop()
        {
            return item;
        }
        Self::List { separator, items }
    }

    /// Pixel value of a length.
    #[inline]
    pub const fn as_px(&self) -> Option<f64> {
        match *self {
            Self::Length(px) => Some(px),
            _ => None,
        }
    }
}

fn write_joined(
    formatter: &mut fmt::Formatter<'_>,
    items: &[ResolvedValue],
    separator: &str,
) -> fmt::Result {
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            formatter.write_str(separator)?;
        }
        write!(formatter, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for ResolvedValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length(px) => write!(formatter, "{}px", format_number(*px)),
            Self::Percentage(percent) => write!(formatter, "{}%", format_number(*percent)),
            Self::Time(millis) => write!(formatter, "{}ms", format_number(*millis)),
            Self::Angle(degrees) => write!(formatter, "{}deg", format_number(*degrees)),
            Self::Number(number) => formatter.write_str(&format_number(*number)),
            Self::Integer(integer) => write!(formatter, "{integer}"),
            Self::Color(color) => formatter.write_str(&color.to_css()),
            Self::Keyword(keyword) => formatter.write_str(keyword),
            Self::Function { name, args } => {
                write!(formatter, "{name}(")?;
                write_joined(formatter, args, ", ")?;
                formatter.write_str(")")
            }
            Self::List { separator, items } => write_joined(formatter, items, separator.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use css_color::Rgba;

    #[test]
    fn serializes_canonical_units() {
        assert_eq!(ResolvedValue::Length(12.5).to_string(), "12.5px");
        assert_eq!(ResolvedValue::Time(-0.0).to_string(), "0ms");
        assert_eq!(ResolvedValue::Integer(3).to_string(), "3");
        assert_eq!(
            ResolvedValue::Color(Color::from_rgba(Rgba::new(0, 0, 255, 255))).to_string(),
            "#0000ff"
        );
    }

    #[test]
    fn serializes_nested_lists() {
        let value = ResolvedValue::list(
            ListSeparator::Space,
            vec![
                ResolvedValue::Function {
                    name: "translate".to_owned(),
                    args: vec![ResolvedValue::Length(10.0), ResolvedValue::Length(0.0)],
                },
                ResolvedValue::Function {
                    name: "rotate".to_owned(),
                    args: vec![ResolvedValue::Angle(90.0)],
                },
            ],
        );
        assert_eq!(value.to_string(), "translate(10px, 0px) rotate(90deg)");
    }

    #[test]
    fn single_item_lists_collapse() {
        assert_eq!(
            ResolvedValue::list(ListSeparator::Comma, vec![ResolvedValue::Number(1.0)]),
            ResolvedValue::Number(1.0)
        );
    }
}
