//! CSS Syntax Module Level 3 — balanced groups and declaration lists.
//! Spec: <https://www.w3.org/TR/css-syntax-3/>

#![forbid(unsafe_code)]

pub mod declarations;
pub mod groups;

pub use declarations::{Declaration, parse_declarations};
pub use groups::{
    Group, GroupMarker, Segment, find_matching_close, is_balanced, is_ident_byte, split_groups,
    split_top_level, split_top_level_whitespace,
};
