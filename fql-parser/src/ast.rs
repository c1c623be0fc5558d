//! Typed views over the syntax tree
//!
//! Each view wraps a [`SyntaxNode`] whose kind has been checked. Accessors
//! return `None` when the parser had to recover and the corresponding piece
//! is missing.

use std::fmt;

use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident from $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then_some(Self(node))
            }

            pub fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Binary(ExprBinary),
    Paren(ExprParen),
    Clause(Clause),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::InfixExpr => ExprBinary::cast(node).map(Self::Binary),
            SyntaxKind::ParenExpr => ExprParen::cast(node).map(Self::Paren),
            SyntaxKind::Clause => Clause::cast(node).map(Self::Clause),
            _ => None,
        }
    }

    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Binary(v) => v.syntax(),
            Expr::Paren(v) => v.syntax(),
            Expr::Clause(v) => v.syntax(),
        }
    }

    /// Every clause in the expression, in source order
    pub fn clauses(&self) -> Vec<Clause> {
        self.syntax().descendants().filter_map(Clause::cast).collect()
    }
}

ast_node!(ExprBinary from InfixExpr);

/// Logical connective of a binary expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    And,
    /// `,`
    Or,
}

impl ExprBinary {
    /// The joined expressions, two or more unless the parser had to recover
    pub fn operands(&self) -> impl Iterator<Item = Expr> {
        self.0.children().filter_map(Expr::cast)
    }

    pub fn op(&self) -> Option<BinaryOp> {
        tokens(&self.0).find_map(|token| match token.kind() {
            SyntaxKind::Plus => Some(BinaryOp::And),
            SyntaxKind::Comma => Some(BinaryOp::Or),
            _ => None,
        })
    }
}

ast_node!(ExprParen from ParenExpr);

impl ExprParen {
    pub fn body(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(Clause from Clause);

impl Clause {
    pub fn property(&self) -> Option<Property> {
        self.0.children().find_map(Property::cast)
    }

    pub fn operator(&self) -> Option<SyntaxToken> {
        self.0
            .children()
            .find(|node| node.kind() == SyntaxKind::Operator)
            .and_then(|node| tokens(&node).find(|t| !t.kind().is_trivia()))
    }

    pub fn operand(&self) -> Option<Operand> {
        self.0.children().find_map(Operand::cast)
    }
}

ast_node!(Property from Property);

impl Property {
    /// The identifiers making up the property path
    pub fn segments(&self) -> impl Iterator<Item = SyntaxToken> {
        tokens(&self.0).filter(|t| t.kind() == SyntaxKind::Ident)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self
            .segments()
            .map(|token| token.text().to_owned())
            .collect::<Vec<_>>();
        f.write_str(&segments.join("."))
    }
}

ast_node!(Operand from Operand);

impl Operand {
    /// Bracketed operands ask for an exact match
    pub fn is_exact(&self) -> bool {
        tokens(&self.0).any(|t| t.kind() == SyntaxKind::LBracket)
    }

    pub fn literal(&self) -> Option<Lit> {
        self.0
            .children()
            .find(|node| node.kind() == SyntaxKind::Literal)
            .and_then(|node| tokens(&node).find_map(|token| Lit::new(&token)))
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.text().to_string().trim())
    }
}

/// The value of a literal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lit {
    /// String contents without the surrounding quotes
    Str(String),
    Int(u64),
    Bool(bool),
}

impl Lit {
    fn new(token: &SyntaxToken) -> Option<Self> {
        let text = token.text();
        match token.kind() {
            SyntaxKind::String => text
                .strip_prefix('\'')
                .and_then(|s| s.strip_suffix('\''))
                .map(|s| Lit::Str(s.to_owned())),
            // Out-of-range integers have no value
            SyntaxKind::Integer => text.parse().ok().map(Lit::Int),
            SyntaxKind::Boolean => Some(Lit::Bool(text == "true")),
            _ => None,
        }
    }
}

/// Direct child tokens of `node`
fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn clauses_in_source_order() {
        let parse = parse("(host.online:true,host.last_online:'today')+sensor:['current']");
        let expr = parse.to_expr().unwrap();

        let properties = expr
            .clauses()
            .iter()
            .filter_map(|clause| clause.property().map(|p| p.to_string()))
            .collect::<Vec<_>>();
        assert_eq!(
            properties,
            vec!["host.online", "host.last_online", "sensor"]
        );
    }

    #[test]
    fn binary_op_and_operands() {
        let parse = parse("a:1,b:2,(c:3)");
        let Some(Expr::Binary(binary)) = parse.to_expr() else {
            panic!("expected a binary expression");
        };
        assert_eq!(binary.op(), Some(BinaryOp::Or));
        let operands = binary.operands().collect::<Vec<_>>();
        assert_eq!(operands.len(), 3);
        assert!(matches!(operands[0], Expr::Clause(_)));
        assert!(matches!(operands[2], Expr::Paren(_)));
    }

    #[test]
    fn long_chains_list_every_clause() {
        let input = "a:1+".repeat(25_000) + "a:1";
        let parse = parse(&input);
        assert!(parse.is_ok());
        assert_eq!(parse.to_expr().map(|expr| expr.clauses().len()), Some(25_001));
    }

    #[test]
    fn operand_values() {
        let parse = parse("a:'x'+b:42+c:false+d:['y']");
        let literals = parse
            .to_expr()
            .unwrap()
            .clauses()
            .iter()
            .map(|c| c.operand().and_then(|o| o.literal()))
            .collect::<Vec<_>>();
        assert_eq!(
            literals,
            vec![
                Some(Lit::Str("x".to_owned())),
                Some(Lit::Int(42)),
                Some(Lit::Bool(false)),
                Some(Lit::Str("y".to_owned())),
            ]
        );
    }

    #[test]
    fn unclosed_bracket_is_still_exact() {
        let parse = parse("platform:['windows'");
        let Some(Expr::Clause(clause)) = parse.to_expr() else {
            panic!("expected a clause");
        };
        assert!(clause.operand().unwrap().is_exact());
    }

    #[test]
    fn operator_token() {
        let parse = parse("risk:>=10");
        let Some(Expr::Clause(clause)) = parse.to_expr() else {
            panic!("expected a clause");
        };
        assert_eq!(clause.operator().map(|t| t.kind()), Some(SyntaxKind::Ge));
        assert_eq!(clause.operand().unwrap().to_string(), "10");
    }

    #[test]
    fn no_expression_in_empty_input() {
        assert!(parse("").to_expr().is_none());
    }
}
