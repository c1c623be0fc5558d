//! Recursive-descent parser driving a rowan [`GreenNodeBuilder`]
//!
//! The grammar functions in [`crate::grammar`] talk to the [`Parser`] only
//! through the small API below (`at`, `bump`, `expect`, node start/finish).
//! Whitespace is trivia: the parser looks past it when peeking and attaches
//! it to whichever node is open when the next real token is consumed.

use std::mem;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, Language};

use crate::ast::Expr;
use crate::error::ParseError;
use crate::grammar;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::syntax::{Fql, SyntaxKind, SyntaxNode};
use crate::text::{TextRange, TextSize};

/// Tokens an error never swallows, so an enclosing rule can still match them
const RECOVERY_SET: &[TokenKind] = &[TokenKind::RParen];

/// Parse `input` as an FQL expression.
///
/// Never fails: syntax errors are collected in the returned [`Parse`] and the
/// tree covers the whole input regardless.
pub fn parse(input: &str) -> Parse {
    let tokens = Lexer::new(input).collect::<Vec<_>>();
    let mut parser = Parser::new(&tokens);

    parser.start_node(SyntaxKind::Root);
    if !parser.at_end() {
        grammar::root(&mut parser);
    }
    parser.eat_trivia();
    parser.finish_node();

    Parse {
        green: parser.builder.finish(),
        errors: parser.errors,
    }
}

pub(crate) struct Parser<'t, 'input> {
    tokens: &'t [Token<'input>],
    cursor: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
    expected: Vec<TokenKind>,
    /// Parenthesized expressions currently open
    nesting: usize,
    /// Set once the rest of the input went into an `Error` node unparsed
    gave_up: bool,
}

impl<'t, 'input> Parser<'t, 'input> {
    fn new(tokens: &'t [Token<'input>]) -> Self {
        Self {
            tokens,
            cursor: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
            expected: Vec::new(),
            nesting: 0,
            gave_up: false,
        }
    }

    /// The next non-trivia token
    fn peek_token(&self) -> Option<&'t Token<'input>> {
        self.tokens[self.cursor..]
            .iter()
            .find(|token| !token.kind.is_trivia())
    }

    pub(crate) fn peek(&self) -> Option<TokenKind> {
        self.peek_token().map(|token| token.kind)
    }

    pub(crate) fn at_end(&self) -> bool {
        self.peek().is_none()
    }

    /// Check the next token, remembering `kind` for the error message if it
    /// turns out nothing matches.
    pub(crate) fn at(&mut self, kind: TokenKind) -> bool {
        self.expected.push(kind);
        self.peek() == Some(kind)
    }

    pub(crate) fn at_set(&mut self, kinds: &[TokenKind]) -> bool {
        let found = self.peek().is_some_and(|next| kinds.contains(&next));
        if !found {
            self.expected.extend_from_slice(kinds);
        }
        found
    }

    /// Consume the next non-trivia token into the open node
    pub(crate) fn bump(&mut self) {
        self.eat_trivia();
        let tokens = self.tokens;
        let token = &tokens[self.cursor];
        self.cursor += 1;
        self.push_token(token);
        self.expected.clear();
    }

    pub(crate) fn expect(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error();
            false
        }
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(Fql::kind_to_raw(kind));
    }

    pub(crate) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(crate) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    pub(crate) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, Fql::kind_to_raw(kind));
    }

    pub(crate) fn nesting(&self) -> usize {
        self.nesting
    }

    pub(crate) fn enter_paren(&mut self) {
        self.nesting += 1;
    }

    pub(crate) fn exit_paren(&mut self) {
        self.nesting -= 1;
    }

    /// Record an error at the next token and, unless it belongs to
    /// [`RECOVERY_SET`], consume it into an `Error` node.
    pub(crate) fn error(&mut self) {
        let found = self.peek_token().copied();
        self.push_error(found);

        if let Some(token) = found {
            if !RECOVERY_SET.contains(&token.kind) {
                self.start_node(SyntaxKind::Error);
                self.bump();
                self.finish_node();
            }
        }
    }

    /// Record one error and consume everything that is left into an `Error` node.
    pub(crate) fn error_until_end(&mut self) {
        let found = self.peek_token().copied();
        self.push_error(found);

        if found.is_some() {
            self.start_node(SyntaxKind::Error);
            while !self.at_end() {
                self.bump();
            }
            self.finish_node();
        }
    }

    /// Stop parsing: one error from the next token to the end of the input,
    /// which goes into an `Error` node as is. Later expectations that fail
    /// (unclosed parentheses, mostly) are not reported.
    pub(crate) fn give_up_too_deep(&mut self) {
        let Some(first) = self.peek_token().copied() else {
            return;
        };
        let end = self.tokens.last().map_or(first.range.end(), |token| token.range.end());
        self.expected.clear();
        self.errors
            .push(ParseError::too_deep(TextRange::new(first.range.start(), end)));
        self.gave_up = true;

        self.start_node(SyntaxKind::Error);
        while !self.at_end() {
            self.bump();
        }
        self.finish_node();
    }

    fn push_error(&mut self, found: Option<Token<'input>>) {
        let expected = mem::take(&mut self.expected);
        if self.gave_up {
            return;
        }
        let (found, range) = match found {
            Some(token) => (Some(token.kind), token.range),
            None => (
                None,
                self.tokens
                    .last()
                    .map_or(TextRange::empty(TextSize::from(0)), |token| token.range),
            ),
        };
        self.errors.push(ParseError::new(expected, found, range));
    }

    fn push_token(&mut self, token: &Token<'input>) {
        self.builder
            .token(Fql::kind_to_raw(SyntaxKind::from(token.kind)), token.text);
    }

    fn eat_trivia(&mut self) {
        let tokens = self.tokens;
        while let Some(token) = tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.push_token(token);
            self.cursor += 1;
        }
    }
}

/// The result of parsing: a lossless tree plus every error found on the way
///
/// Holds the green tree, which is `Send`; [`Parse::syntax`] hands out a
/// fresh root to walk.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The top-level expression, if the parser found any fragment of one
    pub fn to_expr(&self) -> Option<Expr> {
        self.syntax().children().find_map(Expr::cast)
    }

    /// rowan's indented `Kind@start..end` dump of the whole tree, one element
    /// per line
    pub fn debug_tree(&self) -> String {
        let mut text = format!("{:#?}", self.syntax());
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
pub(crate) fn check(input: &str) -> String {
    let parse = parse(input);
    let mut actual = parse.debug_tree();
    for error in parse.errors() {
        actual.push_str(&format!("\n{:?} {}", crate::text::Spanned::span(error), error));
    }
    actual
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing() {
        assert_eq!(check(""), "Root@0..0");
    }

    #[test]
    fn only_whitespace() {
        let parse = parse("   ");
        assert!(parse.is_ok());
        assert_eq!(parse.debug_tree(), "Root@0..3\n  Whitespace@0..3 \"   \"");
    }

    #[test]
    fn tree_is_lossless() {
        let input = " (a.b : 'x' ,c:?1) + ";
        assert_eq!(parse(input).syntax().text().to_string(), input);
    }

    #[test]
    fn errors_stay_in_bounds_for_trailing_whitespace() {
        let input = "a = ";
        let parse = parse(input);
        assert!(!parse.is_ok());
        for error in parse.errors() {
            let span = crate::text::Spanned::span(error);
            assert!(usize::from(span.end()) <= input.len());
        }
    }

    #[test]
    fn deep_nesting_stops_with_one_error() {
        let input = "(".repeat(100_000);
        let parse = parse(&input);
        assert_eq!(parse.error_messages(), vec!["expression nested too deeply"]);
        assert_eq!(parse.syntax().text().len(), TextSize::of(input.as_str()));
        assert!(parse.debug_tree().ends_with("LParen@99999..100000 \"(\""));
    }

    #[test]
    fn nesting_below_the_limit_parses_cleanly() {
        let depth = grammar::MAX_NESTING;
        let input = format!("{}a:1{}", "(".repeat(depth), ")".repeat(depth));
        let parse = parse(&input);
        assert!(parse.is_ok(), "{:?}", parse.error_messages());
    }
}
