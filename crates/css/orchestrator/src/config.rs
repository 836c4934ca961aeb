//! Configuration for value resolution.
//!
//! Document metrics can be set programmatically or loaded from environment
//! variables, which keeps tests deterministic while letting embedders match
//! the real device.

use anyhow::{Context as _, Result, ensure};
use css_values_units::{BoxSize, DocumentMetrics};
use css_variables::MAX_VAR_DEPTH;
use std::env;

/// Runtime configuration for a [`crate::ValueResolver`].
#[derive(Clone, Debug, PartialEq)]
pub struct ResolverConfig {
    /// Viewport width in pixels
    pub viewport_width: f64,
    /// Viewport height in pixels
    pub viewport_height: f64,
    /// Root element font size in pixels (`rem`)
    pub root_font_size: f64,
    /// `rem` anchor inside monospace text
    pub fixed_font_size: f64,
    /// Device pixels per inch
    pub dpi: f64,
    /// Deepest allowed `var()` nesting
    pub max_var_depth: usize,
}

impl Default for ResolverConfig {
    #[inline]
    fn default() -> Self {
        let metrics = DocumentMetrics::default();
        Self {
            viewport_width: metrics.viewport.width,
            viewport_height: metrics.viewport.height,
            root_font_size: metrics.root_font_size,
            fixed_font_size: metrics.fixed_font_size,
            dpi: metrics.dpi,
            max_var_depth: MAX_VAR_DEPTH,
        }
    }
}

/// Parse a positive, finite number.
fn parse_positive(key: &str, raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .with_context(|| format!("{key} must be a number, got `{raw}`"))?;
    ensure!(
        value.is_finite() && value > 0.0,
        "{key} must be positive, got `{raw}`"
    );
    Ok(value)
}

impl ResolverConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads the following environment variables, keeping the default for any that are unset:
    /// - `CSS_VALUES_VIEWPORT_WIDTH`: Viewport width in pixels (default: 1024)
    /// - `CSS_VALUES_VIEWPORT_HEIGHT`: Viewport height in pixels (default: 768)
    /// - `CSS_VALUES_ROOT_FONT_SIZE`: Root font size in pixels (default: 16)
    /// - `CSS_VALUES_FIXED_FONT_SIZE`: Monospace root font size in pixels (default: 13)
    /// - `CSS_VALUES_DPI`: Device pixels per inch (default: 96)
    /// - `CSS_VALUES_MAX_VAR_DEPTH`: Deepest `var()` nesting (default: 32)
    ///
    /// # Errors
    /// Returns an error naming the variable when a value is not a positive number.
    #[inline]
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup, such as a map in tests.
    ///
    /// # Errors
    /// Returns an error naming the key when a value is not a positive number.
    pub fn from_source<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let numbers: [(&str, &mut f64); 5] = [
            ("CSS_VALUES_VIEWPORT_WIDTH", &mut config.viewport_width),
            ("CSS_VALUES_VIEWPORT_HEIGHT", &mut config.viewport_height),
            ("CSS_VALUES_ROOT_FONT_SIZE", &mut config.root_font_size),
            ("CSS_VALUES_FIXED_FONT_SIZE", &mut config.fixed_font_size),
            ("CSS_VALUES_DPI", &mut config.dpi),
        ];
        for (key, slot) in numbers {
            if let Some(raw) = lookup(key) {
                *slot = parse_positive(key, &raw)?;
            }
        }
        if let Some(raw) = lookup("CSS_VALUES_MAX_VAR_DEPTH") {
            let depth = raw.trim().parse::<usize>().with_context(|| {
                format!("CSS_VALUES_MAX_VAR_DEPTH must be an integer, got `{raw}`")
            })?;
            ensure!(depth > 0, "CSS_VALUES_MAX_VAR_DEPTH must be at least 1");
            config.max_var_depth = depth;
        }
        Ok(config)
    }

    /// The document metrics this configuration describes.
    #[inline]
    pub const fn metrics(&self) -> DocumentMetrics {
        DocumentMetrics {
            root_font_size: self.root_font_size,
            fixed_font_size: self.fixed_font_size,
            dpi: self.dpi,
            viewport: BoxSize::new(self.viewport_width, self.viewport_height),
        }
    }
}
