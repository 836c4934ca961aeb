//! CSS selector specificity calculation.
//! Spec: <https://www.w3.org/TR/selectors-4/#specificity-rules>

use crate::SimpleSelector;
use crate::tokenizer::{SelectorTokenizer, Tok};
use core::ops::{Add, AddAssign};
use css_syntax::{GroupMarker, Segment, split_groups, split_top_level};
use log::trace;

/// Logical pseudo-classes whose argument is a selector list.
const LOGICAL_PSEUDO_CLASSES: &[&str] = &[
    "is",
    "matches",
    "-webkit-any",
    "-moz-any",
    "not",
    "has",
    "where",
];

/// Specificity triple (ids, class-like, type-like).
/// Spec: Section 17 — Calculating a selector's specificity
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Specificity(pub u16, pub u16, pub u16);

impl Specificity {
    pub const ID: Self = Self(1, 0, 0);
    pub const CLASS: Self = Self(0, 1, 0);
    pub const TYPE: Self = Self(0, 0, 1);

    /// Component-wise addition that saturates instead of overflowing.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(
            self.0.saturating_add(other.0),
            self.1.saturating_add(other.1),
            self.2.saturating_add(other.2),
        )
    }
}

impl Add for Specificity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Specificity {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

/// Specificity of a selector list: the most specific alternative.
///
/// Commas inside brackets, quotes and parentheses do not separate alternatives.
pub fn score_selector_list(text: &str) -> Specificity {
    split_top_level(text, b',')
        .into_iter()
        .filter(|alternative| !alternative.is_empty())
        .map(score)
        .max()
        .unwrap_or_default()
}

/// Specificity of a single complex selector.
///
/// `:is()`, `:matches()`, `:-webkit-any()`, `:-moz-any()`, `:not()` and
/// `:has()` count as their most specific argument; `:where()` counts as zero.
pub fn score(selector: &str) -> Specificity {
    let Some(segments) = split_groups(selector, GroupMarker::Functions(LOGICAL_PSEUDO_CLASSES))
    else {
        return score_tokens(selector);
    };
    let mut total = Specificity::default();
    let mut remainder = String::with_capacity(selector.len());
    for segment in segments {
        match segment {
            Segment::Literal(literal) => remainder.push_str(literal),
            Segment::Group(group) if remainder.ends_with(':') && !remainder.ends_with("::") => {
                remainder.pop();
                // Keep a combinator boundary where the group was.
                remainder.push(' ');
                if !group.name.eq_ignore_ascii_case("where") {
                    total += score_selector_list(group.inner);
                }
            }
            Segment::Group(group) => remainder.push_str(group.full),
        }
    }
    total += score_tokens(&remainder);
    trace!("specificity of `{selector}` is {total:?}");
    total
}

/// Specificity of a selector without logical pseudo-classes.
fn score_tokens(selector: &str) -> Specificity {
    SelectorTokenizer::new(selector)
        .filter_map(|token| match token {
            Tok::Simple(simple) => Some(score_simple(&simple)),
            Tok::Combinator(_) | Tok::DescendantWS => None,
        })
        .fold(Specificity::default(), Add::add)
}

fn score_simple(simple: &SimpleSelector) -> Specificity {
    match simple {
        SimpleSelector::Id(_) => Specificity::ID,
        SimpleSelector::Class(_) | SimpleSelector::Attribute(_) => Specificity::CLASS,
        SimpleSelector::PseudoClass { name, argument } => match argument {
            // `:nth-child(An+B of S)` also counts its most specific selector.
            Some(argument) if name == "nth-child" || name == "nth-last-child" => {
                let lowered = argument.to_ascii_lowercase();
                lowered.find(" of ").map_or(Specificity::CLASS, |position| {
                    let selectors = argument.get(position.saturating_add(4)..).unwrap_or_default();
                    Specificity::CLASS + score_selector_list(selectors)
                })
            }
            _ => Specificity::CLASS,
        },
        SimpleSelector::Type(_) | SimpleSelector::PseudoElement { .. } => Specificity::TYPE,
        SimpleSelector::Universal => Specificity::default(),
    }
}
