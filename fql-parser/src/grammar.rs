//! FQL grammar
//!
//! ```text
//! expr     := lhs (('+' | ',') expr)*      ',' binds looser than '+'
//! lhs      := '(' expr ')' | clause
//! clause   := property ':' operator? operand
//! property := ident ('.' ident)*
//! operator := '!' | '>' | '<' | '>=' | '<=' | '~' | '!~'
//! operand  := '[' string ']' | boolean | string | integer
//! ```
//!
//! A run of one compound operator (`a + b + c`) becomes a single `InfixExpr`
//! holding every operand, so long filters stay shallow. Only parentheses
//! nest, up to [`MAX_NESTING`] levels.

use crate::lexer::TokenKind;
use crate::parser::Parser;
use crate::syntax::SyntaxKind;

const OPERATORS: &[TokenKind] = &[
    TokenKind::Bang,
    TokenKind::Gt,
    TokenKind::Lt,
    TokenKind::Ge,
    TokenKind::Le,
    TokenKind::Tilde,
    TokenKind::BangTilde,
];

const LITERALS: &[TokenKind] = &[TokenKind::Boolean, TokenKind::String, TokenKind::Integer];

/// Deepest parenthesized expression that is still parsed
pub(crate) const MAX_NESTING: usize = 64;

/// Entry point: one expression, then nothing but trivia
pub(crate) fn root(p: &mut Parser) {
    expr(p);
    if !p.at_end() {
        p.error_until_end();
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CompoundOp {
    And,
    Or,
}

impl CompoundOp {
    fn peek(p: &mut Parser) -> Option<Self> {
        if p.at(TokenKind::Plus) {
            Some(Self::And)
        } else if p.at(TokenKind::Comma) {
            Some(Self::Or)
        } else {
            None
        }
    }

    fn binding_power(self) -> (u8, u8) {
        match self {
            Self::Or => (1, 2),
            Self::And => (3, 4),
        }
    }
}

pub(crate) fn expr(p: &mut Parser) -> bool {
    expr_binding_power(p, 0)
}

fn expr_binding_power(p: &mut Parser, min_power: u8) -> bool {
    let checkpoint = p.checkpoint();
    if !lhs(p) {
        return false;
    }

    // The operator of the InfixExpr currently open at this level
    let mut open: Option<CompoundOp> = None;
    while let Some(op) = CompoundOp::peek(p) {
        let (left_power, right_power) = op.binding_power();
        if left_power < min_power {
            break;
        }

        if open != Some(op) {
            if open.is_some() {
                p.finish_node();
            }
            p.start_node_at(checkpoint, SyntaxKind::InfixExpr);
            open = Some(op);
        }
        p.bump();
        if !expr_binding_power(p, right_power) {
            p.error();
            break;
        }
    }
    if open.is_some() {
        p.finish_node();
    }

    true
}

fn lhs(p: &mut Parser) -> bool {
    paren_expr(p) || clause(p)
}

fn paren_expr(p: &mut Parser) -> bool {
    if !p.at(TokenKind::LParen) {
        return false;
    }

    if p.nesting() >= MAX_NESTING {
        p.give_up_too_deep();
        return true;
    }

    p.start_node(SyntaxKind::ParenExpr);
    p.bump();
    p.enter_paren();
    if !expr(p) {
        p.error();
    }
    p.exit_paren();
    p.expect(TokenKind::RParen);
    p.finish_node();
    true
}

fn clause(p: &mut Parser) -> bool {
    let checkpoint = p.checkpoint();
    if !property(p) {
        return false;
    }

    p.start_node_at(checkpoint, SyntaxKind::Clause);
    p.expect(TokenKind::Colon);
    operator(p);
    if !operand(p) {
        p.error();
    }
    p.finish_node();
    true
}

fn property(p: &mut Parser) -> bool {
    if !p.at(TokenKind::Ident) {
        return false;
    }

    p.start_node(SyntaxKind::Property);
    p.bump();
    while p.at(TokenKind::Period) {
        p.bump();
        p.expect(TokenKind::Ident);
    }
    p.finish_node();
    true
}

fn operator(p: &mut Parser) -> bool {
    if !p.at_set(OPERATORS) {
        return false;
    }

    p.start_node(SyntaxKind::Operator);
    p.bump();
    p.finish_node();
    true
}

fn operand(p: &mut Parser) -> bool {
    if p.at(TokenKind::LBracket) {
        p.start_node(SyntaxKind::Operand);
        p.bump();
        if p.at(TokenKind::String) {
            literal(p);
        } else {
            p.error();
        }
        p.expect(TokenKind::RBracket);
        p.finish_node();
        true
    } else if p.at_set(LITERALS) {
        p.start_node(SyntaxKind::Operand);
        literal(p);
        p.finish_node();
        true
    } else {
        false
    }
}

fn literal(p: &mut Parser) {
    p.start_node(SyntaxKind::Literal);
    p.bump();
    p.finish_node();
}

#[cfg(test)]
mod tests {
    use super::MAX_NESTING;
    use crate::parser::check;

    #[test]
    fn bool_clause() {
        insta::assert_snapshot!(check("host.online:true"), @r#"
        Root@0..16
          Clause@0..16
            Property@0..11
              Ident@0..4 "host"
              Period@4..5 "."
              Ident@5..11 "online"
            Colon@11..12 ":"
            Operand@12..16
              Literal@12..16
                Boolean@12..16 "true"
        "#);
    }

    #[test]
    fn not_string() {
        insta::assert_snapshot!(check("platform:!'Linux'"), @r#"
        Root@0..17
          Clause@0..17
            Property@0..8
              Ident@0..8 "platform"
            Colon@8..9 ":"
            Operator@9..10
              Bang@9..10 "!"
            Operand@10..17
              Literal@10..17
                String@10..17 "'Linux'"
        "#);
    }

    #[test]
    fn exact_string() {
        insta::assert_snapshot!(check("name:['db']"), @r#"
        Root@0..11
          Clause@0..11
            Property@0..4
              Ident@0..4 "name"
            Colon@4..5 ":"
            Operand@5..11
              LBracket@5..6 "["
              Literal@6..10
                String@6..10 "'db'"
              RBracket@10..11 "]"
        "#);
    }

    #[test]
    fn or_binds_looser_than_and() {
        insta::assert_snapshot!(check("a:1,b:2+c:3"), @r#"
        Root@0..11
          InfixExpr@0..11
            Clause@0..3
              Property@0..1
                Ident@0..1 "a"
              Colon@1..2 ":"
              Operand@2..3
                Literal@2..3
                  Integer@2..3 "1"
            Comma@3..4 ","
            InfixExpr@4..11
              Clause@4..7
                Property@4..5
                  Ident@4..5 "b"
                Colon@5..6 ":"
                Operand@6..7
                  Literal@6..7
                    Integer@6..7 "2"
              Plus@7..8 "+"
              Clause@8..11
                Property@8..9
                  Ident@8..9 "c"
                Colon@9..10 ":"
                Operand@10..11
                  Literal@10..11
                    Integer@10..11 "3"
        "#);
    }

    #[test]
    fn and_chain_is_one_node() {
        insta::assert_snapshot!(check("a:1+b:2+c:3"), @r#"
        Root@0..11
          InfixExpr@0..11
            Clause@0..3
              Property@0..1
                Ident@0..1 "a"
              Colon@1..2 ":"
              Operand@2..3
                Literal@2..3
                  Integer@2..3 "1"
            Plus@3..4 "+"
            Clause@4..7
              Property@4..5
                Ident@4..5 "b"
              Colon@5..6 ":"
              Operand@6..7
                Literal@6..7
                  Integer@6..7 "2"
            Plus@7..8 "+"
            Clause@8..11
              Property@8..9
                Ident@8..9 "c"
              Colon@9..10 ":"
              Operand@10..11
                Literal@10..11
                  Integer@10..11 "3"
        "#);
    }

    #[test]
    fn and_run_then_or() {
        insta::assert_snapshot!(check("a:1+b:2,c:3"), @r#"
        Root@0..11
          InfixExpr@0..11
            InfixExpr@0..7
              Clause@0..3
                Property@0..1
                  Ident@0..1 "a"
                Colon@1..2 ":"
                Operand@2..3
                  Literal@2..3
                    Integer@2..3 "1"
              Plus@3..4 "+"
              Clause@4..7
                Property@4..5
                  Ident@4..5 "b"
                Colon@5..6 ":"
                Operand@6..7
                  Literal@6..7
                    Integer@6..7 "2"
            Comma@7..8 ","
            Clause@8..11
              Property@8..9
                Ident@8..9 "c"
              Colon@9..10 ":"
              Operand@10..11
                Literal@10..11
                  Integer@10..11 "3"
        "#);
    }

    #[test]
    fn parens_past_the_limit_are_not_parsed() {
        let input = format!("{}a:1", "(".repeat(MAX_NESTING + 1));
        let parse = crate::parse(&input);
        let errors = parse.errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].is_too_deep());
        assert_eq!(
            crate::text::Spanned::span(&errors[0]),
            crate::TextRange::new((MAX_NESTING as u32).into(), (input.len() as u32).into())
        );
    }

    #[test]
    fn whitespace_is_kept_inside_clauses() {
        insta::assert_snapshot!(check(" a : 1 "), @r#"
        Root@0..7
          Whitespace@0..1 " "
          Clause@1..6
            Property@1..2
              Ident@1..2 "a"
            Whitespace@2..3 " "
            Colon@3..4 ":"
            Whitespace@4..5 " "
            Operand@5..6
              Literal@5..6
                Integer@5..6 "1"
          Whitespace@6..7 " "
        "#);
    }

    #[test]
    fn empty_parens() {
        insta::assert_snapshot!(check("()"), @r#"
        Root@0..2
          ParenExpr@0..2
            LParen@0..1 "("
            RParen@1..2 ")"
        1..2 expected '(' or ident, found ')'
        "#);
    }

    #[test]
    fn incomplete_compound() {
        insta::assert_snapshot!(check("a:true+"), @r#"
        Root@0..7
          InfixExpr@0..7
            Clause@0..6
              Property@0..1
                Ident@0..1 "a"
              Colon@1..2 ":"
              Operand@2..6
                Literal@2..6
                  Boolean@2..6 "true"
            Plus@6..7 "+"
        6..7 expected '(' or ident
        "#);
    }

    #[test]
    fn missing_operand() {
        insta::assert_snapshot!(check("host:"), @r#"
        Root@0..5
          Clause@0..5
            Property@0..4
              Ident@0..4 "host"
            Colon@4..5 ":"
        4..5 expected '!', '>', '<', '>=', '<=', '~', '!~', '[', boolean, string, or integer
        "#);
    }

    #[test]
    fn not_an_operator() {
        insta::assert_snapshot!(check("a:?true"), @r#"
        Root@0..7
          Clause@0..3
            Property@0..1
              Ident@0..1 "a"
            Colon@1..2 ":"
            Error@2..3
              Error@2..3 "?"
          Error@3..7
            Boolean@3..7 "true"
        2..3 expected '!', '>', '<', '>=', '<=', '~', '!~', '[', boolean, string, or integer, found error
        3..7 expected '+' or ',', found boolean
        "#);
    }

    #[test]
    fn assignment_is_not_fql() {
        insta::assert_snapshot!(check("a = "), @r#"
        Root@0..4
          Clause@0..3
            Property@0..1
              Ident@0..1 "a"
            Whitespace@1..2 " "
            Error@2..3
              Error@2..3 "="
          Whitespace@3..4 " "
        2..3 expected '.' or ':', found error
        3..4 expected '!', '>', '<', '>=', '<=', '~', '!~', '[', boolean, string, or integer
        "#);
    }

    #[test]
    fn unclosed_paren() {
        insta::assert_snapshot!(check("(a:1"), @r#"
        Root@0..4
          ParenExpr@0..4
            LParen@0..1 "("
            Clause@1..4
              Property@1..2
                Ident@1..2 "a"
              Colon@2..3 ":"
              Operand@3..4
                Literal@3..4
                  Integer@3..4 "1"
        3..4 expected '+', ',', or ')'
        "#);
    }

    #[test]
    fn stray_closing_paren() {
        insta::assert_snapshot!(check("a:1)"), @r#"
        Root@0..4
          Clause@0..3
            Property@0..1
              Ident@0..1 "a"
            Colon@1..2 ":"
            Operand@2..3
              Literal@2..3
                Integer@2..3 "1"
          Error@3..4
            RParen@3..4 ")"
        3..4 expected '+' or ',', found ')'
        "#);
    }

    #[test]
    fn extra_periods() {
        insta::assert_snapshot!(check("a..b:1"), @r#"
        Root@0..6
          Clause@0..5
            Property@0..3
              Ident@0..1 "a"
              Period@1..2 "."
              Error@2..3
                Period@2..3 "."
            Error@3..4
              Ident@3..4 "b"
            Error@4..5
              Colon@4..5 ":"
          Error@5..6
            Integer@5..6 "1"
        2..3 expected ident, found '.'
        3..4 expected '.' or ':', found ident
        4..5 expected '!', '>', '<', '>=', '<=', '~', '!~', '[', boolean, string, or integer, found ':'
        5..6 expected '+' or ',', found integer
        "#);
    }
}
