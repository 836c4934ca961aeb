//! Hex color notation.
//! Spec: <https://www.w3.org/TR/css-color-4/#hex-notation>

use crate::Rgba;

/// Bit count used to duplicate a single hex nibble into a full byte.
const NIBBLE_SHIFT: u32 = 4;

/// Convert an ASCII hex digit to its numeric value.
pub const fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// One channel written as a single nibble (`a` -> `aa`).
fn short_channel(bytes: &[u8], index: usize) -> Option<u8> {
    let nibble = bytes.get(index).copied().and_then(hex_value)?;
    Some(nibble.wrapping_shl(NIBBLE_SHIFT) | nibble)
}

/// One channel written as two nibbles.
fn long_channel(bytes: &[u8], index: usize) -> Option<u8> {
    let high = bytes.get(index).copied().and_then(hex_value)?;
    let low = bytes.get(index.saturating_add(1)).copied().and_then(hex_value)?;
    Some(high.wrapping_shl(NIBBLE_SHIFT) | low)
}

/// Parse `#rgb`, `#rgba`, `#rrggbb` or `#rrggbbaa`. The leading `#` is optional.
pub fn parse_hex_color(text: &str) -> Option<Rgba> {
    let trimmed = text.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    let bytes = digits.as_bytes();
    if !bytes.iter().all(|&byte| hex_value(byte).is_some()) {
        return None;
    }
    match bytes.len() {
        3 | 4 => Some(Rgba::new(
            short_channel(bytes, 0)?,
            short_channel(bytes, 1)?,
            short_channel(bytes, 2)?,
            if bytes.len() == 4 {
                short_channel(bytes, 3)?
            } else {
                u8::MAX
            },
        )),
        6 | 8 => Some(Rgba::new(
            long_channel(bytes, 0)?,
            long_channel(bytes, 2)?,
            long_channel(bytes, 4)?,
            if bytes.len() == 8 {
                long_channel(bytes, 6)?
            } else {
                u8::MAX
            },
        )),
        _ => None,
    }
}

/// Lowercase hex serialization; alpha is included only when not opaque.
pub fn to_hex(rgba: Rgba) -> String {
    if rgba.alpha == u8::MAX {
        format!("#{:02x}{:02x}{:02x}", rgba.red, rgba.green, rgba.blue)
    } else {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            rgba.red, rgba.green, rgba.blue, rgba.alpha
        )
    }
}
