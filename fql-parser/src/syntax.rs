//! Lossless syntax tree on `rowan`
//!
//! Token kinds and node kinds share one [`SyntaxKind`] so both fit in a rowan
//! green tree. Every token of the input, whitespace included, appears in the
//! tree exactly once, so the text of the root is the input.

use rowan::Language;

use crate::lexer::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum SyntaxKind {
    Whitespace,
    String,
    Integer,
    Boolean,
    Ident,
    Period,
    Colon,
    Bang,
    Gt,
    Lt,
    Ge,
    Le,
    Tilde,
    BangTilde,
    LBracket,
    RBracket,
    Plus,
    Comma,
    LParen,
    RParen,

    /// A period-delimited list of identifiers
    Property,
    Operator,
    /// A literal is a string, integer, or boolean.
    Literal,
    Operand,
    /// A clause is `property:[operator]operand`
    Clause,
    /// One or more operands joined by the same compound operator
    InfixExpr,
    ParenExpr,
    Root,
    /// Unlexable input, and the nodes holding tokens the parser could not place
    Error,
}

impl SyntaxKind {
    /// Every kind, indexed by its raw value
    const ALL: [SyntaxKind; 29] = [
        SyntaxKind::Whitespace,
        SyntaxKind::String,
        SyntaxKind::Integer,
        SyntaxKind::Boolean,
        SyntaxKind::Ident,
        SyntaxKind::Period,
        SyntaxKind::Colon,
        SyntaxKind::Bang,
        SyntaxKind::Gt,
        SyntaxKind::Lt,
        SyntaxKind::Ge,
        SyntaxKind::Le,
        SyntaxKind::Tilde,
        SyntaxKind::BangTilde,
        SyntaxKind::LBracket,
        SyntaxKind::RBracket,
        SyntaxKind::Plus,
        SyntaxKind::Comma,
        SyntaxKind::LParen,
        SyntaxKind::RParen,
        SyntaxKind::Property,
        SyntaxKind::Operator,
        SyntaxKind::Literal,
        SyntaxKind::Operand,
        SyntaxKind::Clause,
        SyntaxKind::InfixExpr,
        SyntaxKind::ParenExpr,
        SyntaxKind::Root,
        SyntaxKind::Error,
    ];

    pub fn is_trivia(self) -> bool {
        self == SyntaxKind::Whitespace
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Whitespace => SyntaxKind::Whitespace,
            TokenKind::String => SyntaxKind::String,
            TokenKind::Integer => SyntaxKind::Integer,
            TokenKind::Boolean => SyntaxKind::Boolean,
            TokenKind::Ident => SyntaxKind::Ident,
            TokenKind::Period => SyntaxKind::Period,
            TokenKind::Colon => SyntaxKind::Colon,
            TokenKind::Bang => SyntaxKind::Bang,
            TokenKind::Gt => SyntaxKind::Gt,
            TokenKind::Lt => SyntaxKind::Lt,
            TokenKind::Ge => SyntaxKind::Ge,
            TokenKind::Le => SyntaxKind::Le,
            TokenKind::Tilde => SyntaxKind::Tilde,
            TokenKind::BangTilde => SyntaxKind::BangTilde,
            TokenKind::LBracket => SyntaxKind::LBracket,
            TokenKind::RBracket => SyntaxKind::RBracket,
            TokenKind::Plus => SyntaxKind::Plus,
            TokenKind::Comma => SyntaxKind::Comma,
            TokenKind::LParen => SyntaxKind::LParen,
            TokenKind::RParen => SyntaxKind::RParen,
            TokenKind::Error => SyntaxKind::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Fql {}

impl Language for Fql {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        SyntaxKind::ALL
            .get(usize::from(raw.0))
            .copied()
            .unwrap_or(SyntaxKind::Error)
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}

pub type SyntaxNode = rowan::SyntaxNode<Fql>;
pub type SyntaxToken = rowan::SyntaxToken<Fql>;
pub type SyntaxElement = rowan::SyntaxElement<Fql>;
