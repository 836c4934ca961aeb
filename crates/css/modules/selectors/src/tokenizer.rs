//! Selector tokenizing.
//! Spec: <https://www.w3.org/TR/selectors-4/#syntax>

use crate::{Combinator, SimpleSelector};
use css_syntax::{find_matching_close, is_ident_byte};

/// Pseudo-elements that may be written with a single colon.
/// Spec: <https://www.w3.org/TR/selectors-4/#pseudo-element-syntax>
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Tokenizer token kinds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// A combinator token like child/adjacent/general sibling.
    Combinator(Combinator),
    /// Whitespace that implies a descendant combinator.
    DescendantWS,
    /// A simple selector token.
    Simple(SimpleSelector),
}

/// Tokenizer over a selector string.
pub struct SelectorTokenizer<'input> {
    /// The selector text.
    input: &'input str,
    /// Current cursor index into `input`.
    index: usize,
    /// Whether we should emit a descendant whitespace token on `next()` call.
    pending_whitespace: bool,
}

impl<'input> SelectorTokenizer<'input> {
    /// Construct a tokenizer from input.
    #[inline]
    pub const fn new(input: &'input str) -> Self {
        Self {
            input,
            index: 0,
            pending_whitespace: false,
        }
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.index).copied()
    }

    #[inline]
    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.input
            .as_bytes()
            .get(self.index.saturating_add(offset))
            .copied()
    }

    #[inline]
    fn advance(&mut self, count: usize) {
        self.index = self.index.saturating_add(count).min(self.input.len());
    }

    /// Skip whitespace and mark that a descendant combinator should be emitted next.
    #[inline]
    fn skip_whitespace_descendant(&mut self) {
        let start = self.index;
        let mut saw = false;
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            saw = true;
            self.advance(1);
        }
        if saw && start > 0 && self.index < self.input.len() {
            self.pending_whitespace = true;
        }
    }

    /// Skip ASCII whitespace.
    #[inline]
    fn skip_spaces(&mut self) {
        while self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
            self.advance(1);
        }
    }

    /// True when the cursor sits on the start of an identifier.
    fn at_ident_start(&self) -> bool {
        match self.peek() {
            Some(b'\\') => true,
            Some(b'-') => self
                .peek_at(1)
                .is_some_and(|next| is_ident_byte(next) || next == b'\\'),
            Some(byte) => is_ident_byte(byte) && !byte.is_ascii_digit(),
            None => false,
        }
    }

    /// Consume an identifier, keeping escapes as written.
    fn consume_ident(&mut self) -> &'input str {
        let start = self.index;
        while let Some(byte) = self.peek() {
            if byte == b'\\' {
                self.advance(1);
                self.consume_escape();
            } else if is_ident_byte(byte) {
                self.advance(1);
            } else {
                break;
            }
        }
        self.input.get(start..self.index).unwrap_or_default()
    }

    /// Consume the body of an escape; the backslash is already consumed.
    fn consume_escape(&mut self) {
        let mut hex_digits = 0usize;
        while hex_digits < 6 && self.peek().is_some_and(|byte| byte.is_ascii_hexdigit()) {
            hex_digits = hex_digits.saturating_add(1);
            self.advance(1);
        }
        if hex_digits > 0 {
            if self.peek().is_some_and(|byte| byte.is_ascii_whitespace()) {
                self.advance(1);
            }
        } else if let Some(escaped) = self.input.get(self.index..).and_then(|rest| rest.chars().next()) {
            self.advance(escaped.len_utf8());
        }
    }

    /// Consume a balanced `( ... )` argument if one starts at the cursor.
    fn consume_argument(&mut self) -> Option<String> {
        if self.peek() != Some(b'(') {
            return None;
        }
        let close = find_matching_close(self.input, self.index).unwrap_or(self.input.len());
        let argument = self
            .input
            .get(self.index.saturating_add(1)..close)
            .unwrap_or_default()
            .trim()
            .to_owned();
        self.index = close.saturating_add(1).min(self.input.len());
        Some(argument)
    }

    /// Parse an attribute selector; the brackets are dropped and quoted text is kept whole.
    fn consume_attr(&mut self) -> Tok {
        // skip '['
        self.advance(1);
        let start = self.index;
        let mut quote: Option<u8> = None;
        while let Some(byte) = self.peek() {
            match (quote, byte) {
                (Some(open), _) if byte == open => quote = None,
                (Some(_), b'\\') => self.advance(1),
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(byte),
                (None, b']') => break,
                (None, _) => {}
            }
            self.advance(1);
        }
        let body = self.input.get(start..self.index).unwrap_or_default().trim();
        if self.peek() == Some(b']') {
            self.advance(1);
        }
        Tok::Simple(SimpleSelector::Attribute(body.to_owned()))
    }

    /// Parse `:name`, `:name(...)`, `::name` or `::name(...)`.
    fn consume_pseudo(&mut self) -> Tok {
        // skip ':'
        self.advance(1);
        let double = self.peek() == Some(b':');
        if double {
            self.advance(1);
        }
        let name = self.consume_ident().to_ascii_lowercase();
        let argument = self.consume_argument();
        if double || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str()) {
            Tok::Simple(SimpleSelector::PseudoElement { name, argument })
        } else {
            Tok::Simple(SimpleSelector::PseudoClass { name, argument })
        }
    }

    /// Parse a class selector following '.'.
    #[inline]
    fn consume_class(&mut self) -> Tok {
        // skip '.'
        self.advance(1);
        Tok::Simple(SimpleSelector::Class(self.consume_ident().to_owned()))
    }

    /// Parse an id selector following '#'.
    #[inline]
    fn consume_id(&mut self) -> Tok {
        // skip '#'
        self.advance(1);
        Tok::Simple(SimpleSelector::Id(self.consume_ident().to_owned()))
    }

    /// Consume a `|` that ends a namespace prefix (`svg|`, `*|`), leaving `||` alone.
    fn consume_namespace_bar(&mut self) -> bool {
        if self.peek() == Some(b'|') && self.peek_at(1) != Some(b'|') {
            self.advance(1);
            return true;
        }
        false
    }

    /// Parse a type selector identifier.
    #[inline]
    fn consume_type(&mut self) -> Tok {
        let ident = self.consume_ident().to_ascii_lowercase();
        Tok::Simple(SimpleSelector::Type(ident))
    }
}

impl Iterator for SelectorTokenizer<'_> {
    type Item = Tok;

    /// Return the next selector token, if any. Bytes that start no token are skipped.
    fn next(&mut self) -> Option<Tok> {
        loop {
            if self.pending_whitespace {
                self.pending_whitespace = false;
                return Some(Tok::DescendantWS);
            }
            self.skip_whitespace_descendant();
            if self.pending_whitespace {
                continue;
            }
            let current = self.peek()?;
            let token = match current {
                b'*' => {
                    self.advance(1);
                    if self.consume_namespace_bar() {
                        continue;
                    }
                    Tok::Simple(SimpleSelector::Universal)
                }
                b'.' => self.consume_class(),
                b'#' => self.consume_id(),
                b'[' => self.consume_attr(),
                b':' => self.consume_pseudo(),
                b'>' | b'+' | b'~' => {
                    self.advance(1);
                    self.skip_spaces();
                    Tok::Combinator(match current {
                        b'>' => Combinator::Child,
                        b'+' => Combinator::AdjacentSibling,
                        _ => Combinator::GeneralSibling,
                    })
                }
                _ if self.at_ident_start() => {
                    let token = self.consume_type();
                    if self.consume_namespace_bar() {
                        continue;
                    }
                    token
                }
                _ => {
                    // Bare namespace bars, nesting markers and stray punctuation carry no weight.
                    let width = self
                        .input
                        .get(self.index..)
                        .and_then(|rest| rest.chars().next())
                        .map_or(1, char::len_utf8);
                    self.advance(width);
                    continue;
                }
            };
            return Some(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Tok> {
        SelectorTokenizer::new(input).collect()
    }

    #[test]
    fn splits_compound_and_combinators() {
        assert_eq!(
            tokens("DIV.a#b > *"),
            vec![
                Tok::Simple(SimpleSelector::Type("div".to_owned())),
                Tok::Simple(SimpleSelector::Class("a".to_owned())),
                Tok::Simple(SimpleSelector::Id("b".to_owned())),
                Tok::DescendantWS,
                Tok::Combinator(Combinator::Child),
                Tok::Simple(SimpleSelector::Universal),
            ]
        );
    }

    #[test]
    fn attribute_values_may_contain_brackets() {
        assert_eq!(
            tokens("[title=\"a]b\"]p"),
            vec![
                Tok::Simple(SimpleSelector::Attribute("title=\"a]b\"".to_owned())),
                Tok::Simple(SimpleSelector::Type("p".to_owned())),
            ]
        );
    }

    #[test]
    fn distinguishes_pseudo_classes_and_elements() {
        assert_eq!(
            tokens("a:hover::before:after:nth-child(2n + 1)"),
            vec![
                Tok::Simple(SimpleSelector::Type("a".to_owned())),
                Tok::Simple(SimpleSelector::PseudoClass {
                    name: "hover".to_owned(),
                    argument: None,
                }),
                Tok::Simple(SimpleSelector::PseudoElement {
                    name: "before".to_owned(),
                    argument: None,
                }),
                Tok::Simple(SimpleSelector::PseudoElement {
                    name: "after".to_owned(),
                    argument: None,
                }),
                Tok::Simple(SimpleSelector::PseudoClass {
                    name: "nth-child".to_owned(),
                    argument: Some("2n + 1".to_owned()),
                }),
            ]
        );
    }

    #[test]
    fn escapes_stay_inside_identifiers() {
        assert_eq!(
            tokens(".a\\:b .\\31 0"),
            vec![
                Tok::Simple(SimpleSelector::Class("a\\:b".to_owned())),
                Tok::DescendantWS,
                Tok::Simple(SimpleSelector::Class("\\31 0".to_owned())),
            ]
        );
    }

    #[test]
    fn namespace_prefixes_are_dropped() {
        assert_eq!(
            tokens("svg|rect"),
            vec![Tok::Simple(SimpleSelector::Type("rect".to_owned()))]
        );
        assert_eq!(tokens("ns|*"), vec![Tok::Simple(SimpleSelector::Universal)]);
        assert_eq!(
            tokens("*|a"),
            vec![Tok::Simple(SimpleSelector::Type("a".to_owned()))]
        );
        assert_eq!(
            tokens("|a"),
            vec![Tok::Simple(SimpleSelector::Type("a".to_owned()))]
        );
    }
}
