//! Selectors Level 4 — tokenizing and specificity.
//! Spec: <https://www.w3.org/TR/selectors-4/>
//!
//! Only what specificity needs is implemented:
//! - A byte tokenizer for type, universal, class, id, attribute, pseudo-class
//!   and pseudo-element selectors plus combinators
//! - Specificity of selectors and selector lists, including the logical
//!   pseudo-classes `:is()`, `:not()`, `:has()` and `:where()`
//!
//! Matching selectors against elements is out of scope.

#![forbid(unsafe_code)]

mod specificity;
mod tokenizer;

pub use specificity::{Specificity, score, score_selector_list};
pub use tokenizer::{SelectorTokenizer, Tok};

/// Simple selectors as written.
/// Spec: <https://www.w3.org/TR/selectors-4/#simple>
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SimpleSelector {
    /// Element type, ASCII lowercased. Spec: Section 5.1
    Type(String),
    /// `*`. Spec: Section 5.2
    Universal,
    /// `.name`. Spec: Section 6.6
    Class(String),
    /// `#name`. Spec: Section 6.7
    Id(String),
    /// `[name]`, `[name=value]`, `[name~="value" i]`, ... with the brackets stripped.
    /// Spec: Section 6
    Attribute(String),
    /// `:name` or `:name(argument)`.
    PseudoClass {
        name: String,
        argument: Option<String>,
    },
    /// `::name`, `::name(argument)` or a legacy single-colon pseudo-element.
    PseudoElement {
        name: String,
        argument: Option<String>,
    },
}

/// Combinators between compounds.
/// Spec: Section 15 — Combinators
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}
