//! Orchestrates value resolution across the CSS module crates.
//!
//! Callers provide computed styles and geometry through [`StyleProvider`] and
//! [`GeometryProvider`]; [`ValueResolver`] turns raw declaration values into
//! [`ResolvedValue`]s in canonical units.

#![forbid(unsafe_code)]

pub mod config;
pub mod geometry;
pub mod parsers;
pub mod property;
pub mod providers;
mod resolver;
pub mod value;

pub use config::ResolverConfig;
pub use property::{PercentBasis, Property, PropertyPolicy, ValueShape, policy_for};
pub use providers::{GeometryProvider, Rect, StyleProvider};
pub use resolver::{ResolveRequest, ValueResolver, parse_color_value, score_specificity};
pub use value::{ListSeparator, ResolvedValue};

pub use css_color::{Color, Rgba};
pub use css_selectors::Specificity;
pub use css_values_units::{BoxSize, DocumentMetrics, Unresolved};
