//! Balanced parenthesis groups and depth-aware splitting.
//!
//! Every value-level consumer in the workspace (math functions, `var()`
//! substitution, color channels, logical selector pseudo-classes) walks its
//! input through these helpers instead of tokenizing it fully.

/// Selects which `(` opens a group during [`split_groups`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupMarker<'marker> {
    /// Every `(` opens a group; the group name is the identifier right before it (possibly empty).
    Any,
    /// Only `name(` opens a group (ASCII case-insensitive).
    Function(&'marker str),
    /// Any of the listed function names opens a group (ASCII case-insensitive).
    Functions(&'marker [&'marker str]),
}

impl GroupMarker<'_> {
    /// Whether a group introduced by `name` should be split out.
    fn accepts(&self, name: &str) -> bool {
        match *self {
            Self::Any => true,
            Self::Function(expected) => name.eq_ignore_ascii_case(expected),
            Self::Functions(names) => names
                .iter()
                .any(|expected| name.eq_ignore_ascii_case(expected)),
        }
    }
}

/// A balanced group found by [`split_groups`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Group<'text> {
    /// Identifier immediately preceding the opening parenthesis, as written.
    pub name: &'text str,
    /// Contents between the outer parentheses.
    pub inner: &'text str,
    /// Name, parentheses and contents.
    pub full: &'text str,
}

/// One piece of a string split into literal text and groups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'text> {
    /// Text outside any selected group.
    Literal(&'text str),
    /// A selected group, including everything nested inside it.
    Group(Group<'text>),
}

/// True for bytes that may appear inside a CSS identifier (ASCII subset plus non-ASCII).
#[inline]
pub const fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' || byte >= 0x80
}

/// Tracks quoted strings and backslash escapes across a byte scan.
#[derive(Clone, Copy, Debug, Default)]
struct QuoteScanner {
    quote: Option<u8>,
    escaped: bool,
}

impl QuoteScanner {
    /// Feed the next byte; true when it is outside any string and not escaped.
    fn is_structural(&mut self, byte: u8) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if byte == b'\\' {
            self.escaped = true;
            return false;
        }
        if let Some(open_quote) = self.quote {
            if byte == open_quote {
                self.quote = None;
            }
            return false;
        }
        if byte == b'"' || byte == b'\'' {
            self.quote = Some(byte);
            return false;
        }
        true
    }

    #[inline]
    const fn in_string(&self) -> bool {
        self.quote.is_some()
    }
}

/// Find the index of the `)` closing the `(` at `open`.
///
/// Nested parentheses of any kind count toward depth; parentheses inside
/// quoted strings or after a backslash do not. Returns `None` when the group never closes.
pub fn find_matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0usize;
    let mut scanner = QuoteScanner::default();
    for (index, &byte) in bytes.iter().enumerate().skip(open) {
        if !scanner.is_structural(byte) {
            continue;
        }
        match byte {
            b'(' => depth = depth.saturating_add(1),
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

/// True when every `(` and `[` in `text` is closed in order (quoted text ignored).
pub fn is_balanced(text: &str) -> bool {
    let mut stack: Vec<u8> = Vec::new();
    let mut scanner = QuoteScanner::default();
    for &byte in text.as_bytes() {
        if !scanner.is_structural(byte) {
            continue;
        }
        match byte {
            b'(' | b'[' => stack.push(byte),
            b')' => {
                if stack.pop() != Some(b'(') {
                    return false;
                }
            }
            b']' => {
                if stack.pop() != Some(b'[') {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty() && !scanner.in_string()
}

/// Split `text` into alternating literal segments and balanced groups.
///
/// A group starts at a `(` whose preceding identifier is accepted by
/// `marker` and ends where nesting depth returns to zero. Parentheses that do
/// not open a selected group still contribute to depth, so `calc()` inside
/// `translate()` is found while `translate(` itself stays literal.
///
/// Returns `None` when the input is unbalanced.
pub fn split_groups<'text>(
    text: &'text str,
    marker: GroupMarker<'_>,
) -> Option<Vec<Segment<'text>>> {
    if !is_balanced(text) {
        return None;
    }
    let bytes = text.as_bytes();
    let mut segments = Vec::new();
    let mut literal_start = 0usize;
    let mut index = 0usize;
    let mut scanner = QuoteScanner::default();
    while let Some(&byte) = bytes.get(index) {
        if !scanner.is_structural(byte) || byte != b'(' {
            index = index.saturating_add(1);
            continue;
        }
        let mut name_start = index;
        while name_start > literal_start
            && bytes
                .get(name_start.saturating_sub(1))
                .is_some_and(|&prev| is_ident_byte(prev))
        {
            name_start = name_start.saturating_sub(1);
        }
        let name = text.get(name_start..index).unwrap_or_default();
        if !marker.accepts(name) {
            index = index.saturating_add(1);
            continue;
        }
        let close = find_matching_close(text, index)?;
        if name_start > literal_start {
            segments.push(Segment::Literal(
                text.get(literal_start..name_start).unwrap_or_default(),
            ));
        }
        segments.push(Segment::Group(Group {
            name,
            inner: text
                .get(index.saturating_add(1)..close)
                .unwrap_or_default(),
            full: text
                .get(name_start..=close)
                .unwrap_or_default(),
        }));
        index = close.saturating_add(1);
        literal_start = index;
    }
    if literal_start < bytes.len() {
        segments.push(Segment::Literal(
            text.get(literal_start..).unwrap_or_default(),
        ));
    }
    Some(segments)
}

/// Split on `delimiter` occurring outside `()`, `[]` and quoted strings.
///
/// Pieces are trimmed; empty pieces are kept so callers can detect `a,,b`.
pub fn split_top_level(text: &str, delimiter: u8) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut scanner = QuoteScanner::default();
    let mut start = 0usize;
    for (index, &byte) in text.as_bytes().iter().enumerate() {
        if !scanner.is_structural(byte) {
            continue;
        }
        match byte {
            b'(' | b'[' => depth = depth.saturating_add(1),
            b')' | b']' => depth = depth.saturating_sub(1),
            _ if byte == delimiter && depth == 0 => {
                pieces.push(text.get(start..index).unwrap_or_default().trim());
                start = index.saturating_add(1);
            }
            _ => {}
        }
    }
    pieces.push(text.get(start..).unwrap_or_default().trim());
    pieces
}

/// Split on whitespace runs outside `()`, `[]` and quoted strings, dropping empty pieces.
pub fn split_top_level_whitespace(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut scanner = QuoteScanner::default();
    let mut start: Option<usize> = None;
    for (index, &byte) in text.as_bytes().iter().enumerate() {
        let structural = scanner.is_structural(byte);
        let separates = structural && depth == 0 && byte.is_ascii_whitespace();
        if structural {
            match byte {
                b'(' | b'[' => depth = depth.saturating_add(1),
                b')' | b']' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        match (separates, start) {
            (true, Some(begin)) => {
                pieces.push(text.get(begin..index).unwrap_or_default());
                start = None;
            }
            (false, None) => start = Some(index),
            _ => {}
        }
    }
    if let Some(begin) = start {
        pieces.push(text.get(begin..).unwrap_or_default());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_literals_and_groups() {
        let segments = split_groups("1px + calc(2px * (3 + 4)) - 5px", GroupMarker::Function("calc"))
            .unwrap_or_default();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0], Segment::Literal("1px + "));
        assert_eq!(
            segments[1],
            Segment::Group(Group {
                name: "calc",
                inner: "2px * (3 + 4)",
                full: "calc(2px * (3 + 4))",
            })
        );
        assert_eq!(segments[2], Segment::Literal(" - 5px"));
    }

    #[test]
    fn unselected_parentheses_still_nest() {
        let segments = split_groups("translate(calc(1px), 2px)", GroupMarker::Function("calc"))
            .unwrap_or_default();
        assert_eq!(
            segments,
            vec![
                Segment::Literal("translate("),
                Segment::Group(Group {
                    name: "calc",
                    inner: "1px",
                    full: "calc(1px)",
                }),
                Segment::Literal(", 2px)"),
            ]
        );
    }

    #[test]
    fn unclosed_group_is_rejected() {
        assert!(split_groups("calc(1px + (2px)", GroupMarker::Any).is_none());
        assert!(split_groups("min(1px))", GroupMarker::Any).is_none());
    }

    #[test]
    fn anonymous_groups_have_empty_names() {
        let segments = split_groups("(1px) * 2", GroupMarker::Any).unwrap_or_default();
        assert_eq!(
            segments.first(),
            Some(&Segment::Group(Group {
                name: "",
                inner: "1px",
                full: "(1px)",
            }))
        );
    }

    #[test]
    fn top_level_commas_ignore_nesting() {
        assert_eq!(
            split_top_level("a, rgb(1, 2, 3), [x=\"1,2\"], 'q,r'", b','),
            vec!["a", "rgb(1, 2, 3)", "[x=\"1,2\"]", "'q,r'"]
        );
        assert_eq!(split_top_level("a,,b", b','), vec!["a", "", "b"]);
    }

    #[test]
    fn escaped_quotes_stay_inside_strings() {
        let text = "\"a\\\"(b\" f(x)";
        assert!(is_balanced(text));
        assert_eq!(
            split_groups(text, GroupMarker::Any),
            Some(vec![
                Segment::Literal("\"a\\\"(b\" "),
                Segment::Group(Group {
                    name: "f",
                    inner: "x",
                    full: "f(x)",
                }),
            ])
        );
        assert_eq!(find_matching_close("f('\\')')", 1), Some(7));
        assert_eq!(split_top_level_whitespace("'a\\' b' c"), vec!["'a\\' b'", "c"]);
    }

    #[test]
    fn escaped_parentheses_are_not_structural() {
        assert!(is_balanced("a\\(b"));
        assert_eq!(find_matching_close("(\\))", 0), Some(3));
    }

    #[test]
    fn top_level_whitespace_keeps_functions_whole() {
        assert_eq!(
            split_top_level_whitespace("  10px calc(1px + 2px)\tauto "),
            vec!["10px", "calc(1px + 2px)", "auto"]
        );
    }
}
