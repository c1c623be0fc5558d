use std::fmt;

use crate::lexer::TokenKind;
use crate::text::{Spanned, TextRange};

/// A recoverable syntax error
///
/// The parser never stops at an error; it records one of these and keeps
/// building the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    kind: ErrorKind,
    range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ErrorKind {
    Unexpected {
        expected: Vec<TokenKind>,
        found: Option<TokenKind>,
    },
    /// Parentheses opened past the nesting limit; the rest of the input is not parsed
    TooDeep,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Unexpected { expected, found } => f.write_str(&describe(expected, found)),
            ErrorKind::TooDeep => f.write_str("expression nested too deeply"),
        }
    }
}

impl ParseError {
    pub(crate) fn new(mut expected: Vec<TokenKind>, found: Option<TokenKind>, range: TextRange) -> Self {
        let mut seen = Vec::with_capacity(expected.len());
        expected.retain(|kind| {
            if seen.contains(kind) {
                false
            } else {
                seen.push(*kind);
                true
            }
        });

        Self {
            kind: ErrorKind::Unexpected { expected, found },
            range,
        }
    }

    pub(crate) fn too_deep(range: TextRange) -> Self {
        Self {
            kind: ErrorKind::TooDeep,
            range,
        }
    }

    /// Token kinds that would have been accepted, in the order the parser tried them
    pub fn expected(&self) -> &[TokenKind] {
        match &self.kind {
            ErrorKind::Unexpected { expected, .. } => expected,
            ErrorKind::TooDeep => &[],
        }
    }

    /// The offending token, or `None` at end of input
    pub fn found(&self) -> Option<TokenKind> {
        match &self.kind {
            ErrorKind::Unexpected { found, .. } => *found,
            ErrorKind::TooDeep => None,
        }
    }

    /// Whether parsing stopped here because parentheses were nested too deeply
    pub fn is_too_deep(&self) -> bool {
        self.kind == ErrorKind::TooDeep
    }
}

impl Spanned for ParseError {
    fn span(&self) -> TextRange {
        self.range
    }
}

fn describe(expected: &[TokenKind], found: &Option<TokenKind>) -> String {
    match (expected.is_empty(), found) {
        (true, Some(found)) => format!("unexpected {found}"),
        (true, None) => "unexpected end of input".to_owned(),
        (false, Some(found)) => format!("expected {}, found {found}", FriendlyList(expected)),
        (false, None) => format!("expected {}", FriendlyList(expected)),
    }
}

/// `a`, `a or b`, `a, b, or c`
struct FriendlyList<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for FriendlyList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => Ok(()),
            [only] => write!(f, "{only}"),
            [first, second] => write!(f, "{first} or {second}"),
            [init @ .., last] => {
                for item in init {
                    write!(f, "{item}, ")?;
                }
                write!(f, "or {last}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_two_kinds_with_or() {
        let error = ParseError::new(
            vec![TokenKind::Period, TokenKind::Colon],
            Some(TokenKind::Error),
            TextRange::new(2.into(), 3.into()),
        );
        assert_eq!(error.to_string(), "expected '.' or ':', found error");
    }

    #[test]
    fn lists_many_kinds_with_oxford_comma() {
        let error = ParseError::new(
            vec![TokenKind::Boolean, TokenKind::String, TokenKind::Integer],
            None,
            TextRange::new(0.into(), 1.into()),
        );
        assert_eq!(error.to_string(), "expected boolean, string, or integer");
    }

    #[test]
    fn duplicate_expectations_are_dropped() {
        let error = ParseError::new(
            vec![TokenKind::Ident, TokenKind::Ident, TokenKind::LParen],
            Some(TokenKind::RParen),
            TextRange::new(0.into(), 1.into()),
        );
        assert_eq!(error.expected(), &[TokenKind::Ident, TokenKind::LParen]);
    }

    #[test]
    fn nothing_expected() {
        let error = ParseError::new(vec![], Some(TokenKind::RParen), TextRange::new(4.into(), 5.into()));
        assert_eq!(error.to_string(), "unexpected ')'");
        assert_eq!(error.span(), TextRange::new(4.into(), 5.into()));
    }

    #[test]
    fn too_deep_has_its_own_message() {
        let error = ParseError::too_deep(TextRange::new(4.into(), 9.into()));
        assert_eq!(error.to_string(), "expression nested too deeply");
        assert!(error.is_too_deep());
        assert!(error.expected().is_empty());
        assert_eq!(error.found(), None);
    }
}
