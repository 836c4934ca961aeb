//! HSL colors.
//! Spec: <https://www.w3.org/TR/css-color-4/#the-hsl-notation>

use crate::Rgba;

/// Hue in degrees, saturation and lightness in percent, alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsla {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Hsla {
    #[inline]
    pub const fn new(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }
}

/// Round and clamp a `[0, 255]` channel.
#[inline]
pub(crate) fn channel_to_u8(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 255.0) as u8
}

/// Convert to 8-bit RGBA.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#hsl-to-rgb>
pub fn hsla_to_rgba(hsla: Hsla) -> Rgba {
    let hue = hsla.hue.rem_euclid(360.0);
    let saturation = (hsla.saturation / 100.0).clamp(0.0, 1.0);
    let lightness = (hsla.lightness / 100.0).clamp(0.0, 1.0);
    let chroma = saturation * lightness.min(1.0 - lightness);
    let component = |offset: f64| {
        let sector = (offset + hue / 30.0).rem_euclid(12.0);
        let weight = (sector - 3.0).min(9.0 - sector).clamp(-1.0, 1.0);
        (lightness - chroma * weight) * 255.0
    };
    Rgba::new(
        channel_to_u8(component(0.0)),
        channel_to_u8(component(8.0)),
        channel_to_u8(component(4.0)),
        channel_to_u8(hsla.alpha.clamp(0.0, 1.0) * 255.0),
    )
}

/// Convert 8-bit RGBA to HSL. Achromatic colors get hue 0.
///
/// Spec: <https://www.w3.org/TR/css-color-4/#rgb-to-hsl>
pub fn rgba_to_hsla(rgba: Rgba) -> Hsla {
    let red = f64::from(rgba.red) / 255.0;
    let green = f64::from(rgba.green) / 255.0;
    let blue = f64::from(rgba.blue) / 255.0;
    let max = red.max(green).max(blue);
    let min = red.min(green).min(blue);
    let delta = max - min;
    let lightness = f64::midpoint(max, min);
    let alpha = f64::from(rgba.alpha) / 255.0;
    if delta <= f64::EPSILON {
        return Hsla::new(0.0, 0.0, lightness * 100.0, alpha);
    }
    let saturation = if lightness <= 0.0 || lightness >= 1.0 {
        0.0
    } else {
        (max - lightness) / lightness.min(1.0 - lightness)
    };
    let sector = if (max - red).abs() <= f64::EPSILON {
        (green - blue) / delta + if green < blue { 6.0 } else { 0.0 }
    } else if (max - green).abs() <= f64::EPSILON {
        (blue - red) / delta + 2.0
    } else {
        (red - green) / delta + 4.0
    };
    Hsla::new(
        (sector * 60.0).rem_euclid(360.0),
        saturation * 100.0,
        lightness * 100.0,
        alpha,
    )
}
