//! Lightening, darkening and nearest named color.

use crate::hsl::{channel_to_u8, rgba_to_hsla};
use crate::named::{NAMED_COLORS, NamedColor};
use crate::{Color, Rgba};
use log::trace;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// Named colors sharing one whole-degree hue.
struct HueBucket {
    hue: u16,
    /// Each member with its `lightness + saturation`.
    members: Vec<(NamedColor, f64)>,
}

/// Whole-degree hue used as a bucket key.
fn hue_key(rgba: Rgba) -> u16 {
    (rgba_to_hsla(rgba).hue.round() as u16) % 360
}

fn tone(rgba: Rgba) -> f64 {
    let hsla = rgba_to_hsla(rgba);
    hsla.lightness + hsla.saturation
}

/// The named-color table grouped by hue, ascending.
static HUE_BUCKETS: Lazy<Vec<HueBucket>> = Lazy::new(|| {
    let mut buckets: BTreeMap<u16, Vec<(NamedColor, f64)>> = BTreeMap::new();
    for entry in &NAMED_COLORS {
        buckets
            .entry(hue_key(entry.rgba()))
            .or_default()
            .push((*entry, tone(entry.rgba())));
    }
    buckets
        .into_iter()
        .map(|(hue, members)| HueBucket { hue, members })
        .collect()
});

/// Move each RGB channel `fraction` of the way toward `target`.
fn blend(rgba: Rgba, target: f64, percent: f64) -> Rgba {
    let fraction = percent.clamp(0.0, 100.0) / 100.0;
    let mix = |channel: u8| {
        let value = f64::from(channel);
        channel_to_u8(value + (target - value) * fraction)
    };
    Rgba::new(mix(rgba.red), mix(rgba.green), mix(rgba.blue), rgba.alpha)
}

impl Color {
    /// Blend toward white by `percent` (clamped to `[0, 100]`); alpha is kept.
    #[must_use]
    pub fn lighten(&self, percent: f64) -> Self {
        Self::from_rgba(blend(self.rgba, 255.0, percent))
    }

    /// Blend toward black by `percent` (clamped to `[0, 100]`); alpha is kept.
    #[must_use]
    pub fn darken(&self, percent: f64) -> Self {
        Self::from_rgba(blend(self.rgba, 0.0, percent))
    }

    /// The closest named color.
    ///
    /// Picks the first hue bucket at or above this color's hue (wrapping
    /// around to the lowest), then the member whose `lightness + saturation`
    /// differs least from this color's.
    #[must_use]
    pub fn nearest(&self) -> Self {
        let hue = hue_key(self.rgba);
        let target = tone(self.rgba);
        let bucket = HUE_BUCKETS
            .iter()
            .find(|bucket| bucket.hue >= hue)
            .or_else(|| HUE_BUCKETS.first());
        let closest = bucket.and_then(|found| {
            found
                .members
                .iter()
                .min_by(|left, right| (left.1 - target).abs().total_cmp(&(right.1 - target).abs()))
        });
        match closest {
            Some((named, _)) => {
                trace!("nearest named color to {} is {}", self.hex, named.name);
                Self::from_rgba(named.rgba())
            }
            None => self.clone(),
        }
    }
}
