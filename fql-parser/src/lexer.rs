//! Tokenization for FQL
//!
//! The lexer is a thin wrapper around a logos-generated state machine. It
//! never fails: bytes that match no rule become [`TokenKind::Error`] tokens so
//! the parser can report them and keep going.

use std::fmt;

use logos::Logos;

use crate::text::{text_size, TextRange};

/// A single lexed token with the slice of input it covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub range: TextRange,
}

pub(crate) struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Error);
        let span = self.inner.span();

        Some(Token {
            kind,
            text: self.inner.slice(),
            range: TextRange::new(text_size(span.start), text_size(span.end)),
        })
    }
}

/// All token kinds of the FQL grammar
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    #[regex(r"\s+")]
    Whitespace,

    // Literals
    #[regex("'[^']*'")]
    String,

    #[regex(r"\d+")]
    Integer,

    #[token("true")]
    #[token("false")]
    Boolean,

    #[regex(r"[a-z]\w*")]
    Ident,

    #[token(".")]
    Period,

    #[token(":")]
    Colon,

    // Operators
    #[token("!")]
    Bang,
    #[token(">")]
    Gt,
    #[token("<")]
    Lt,
    #[token(">=")]
    Ge,
    #[token("<=")]
    Le,
    #[token("~")]
    Tilde,
    #[token("!~")]
    BangTilde,

    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    // Compound operators: `+` is "and", `,` is "or"
    #[token("+")]
    Plus,
    #[token(",")]
    Comma,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    /// Anything the rules above do not match
    Error,
}

impl TokenKind {
    /// Tokens the parser steps over without looking at them
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::Whitespace => "whitespace",
            TokenKind::String => "string",
            TokenKind::Integer => "integer",
            TokenKind::Boolean => "boolean",
            TokenKind::Ident => "ident",
            TokenKind::Period => "'.'",
            TokenKind::Colon => "':'",
            TokenKind::Bang => "'!'",
            TokenKind::Gt => "'>'",
            TokenKind::Lt => "'<'",
            TokenKind::Ge => "'>='",
            TokenKind::Le => "'<='",
            TokenKind::Tilde => "'~'",
            TokenKind::BangTilde => "'!~'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::Plus => "'+'",
            TokenKind::Comma => "','",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Error => "error",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Lexer, TokenKind};
    use crate::text::TextSize;
    use rstest::rstest;

    fn kinds(input: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(input).map(|t| (t.kind, t.text)).collect()
    }

    #[rstest]
    #[case(" ", TokenKind::Whitespace)]
    #[case(" \t ", TokenKind::Whitespace)]
    #[case("true", TokenKind::Boolean)]
    #[case("false", TokenKind::Boolean)]
    #[case("h", TokenKind::Ident)]
    #[case("hos5", TokenKind::Ident)]
    #[case("truth", TokenKind::Ident)]
    #[case("sensor_version", TokenKind::Ident)]
    #[case("''", TokenKind::String)]
    #[case("'hello world'", TokenKind::String)]
    #[case("100", TokenKind::Integer)]
    #[case(">=", TokenKind::Ge)]
    #[case("!~", TokenKind::BangTilde)]
    #[case("?", TokenKind::Error)]
    fn single_token(#[case] input: &str, #[case] kind: TokenKind) {
        assert_eq!(kinds(input), vec![(kind, input)]);
    }

    #[test]
    fn clause() {
        use TokenKind::*;

        assert_eq!(
            kinds("host.online:true"),
            vec![
                (Ident, "host"),
                (Period, "."),
                (Ident, "online"),
                (Colon, ":"),
                (Boolean, "true"),
            ]
        );
    }

    #[test]
    fn compound_with_operators() {
        use TokenKind::*;

        assert_eq!(
            kinds("name:!'x',risk:>10"),
            vec![
                (Ident, "name"),
                (Colon, ":"),
                (Bang, "!"),
                (String, "'x'"),
                (Comma, ","),
                (Ident, "risk"),
                (Colon, ":"),
                (Gt, ">"),
                (Integer, "10"),
            ]
        );
    }

    #[test]
    fn ranges_are_contiguous() {
        let input = "a = 'é' + b";
        let mut expected_start = TextSize::from(0);
        for token in Lexer::new(input) {
            assert_eq!(token.range.start(), expected_start);
            assert_eq!(&input[token.range], token.text);
            expected_start = token.range.end();
        }
        assert_eq!(usize::from(expected_start), input.len());
    }
}
