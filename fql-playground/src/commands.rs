//! One-shot commands that print to a writer instead of opening the UI

use std::io::Write;

use fql_parser::ast::Expr;
use serde::Serialize;
use tracing::warn;

use crate::engine::ParseEngine;
use crate::error::PlaygroundError;
use crate::parse::{derive_parse_result, diagnostic_rows, Diagnostic};

#[derive(Serialize)]
struct ParseReport<'a> {
    engine: &'a str,
    diagnostics: &'a [Diagnostic],
    debug_tree: String,
}

/// Diagnostic rows, a blank line, then the debug tree (or one JSON document).
pub fn parse(
    engine: &dyn ParseEngine,
    filter: &str,
    json: bool,
    out: &mut impl Write,
) -> Result<(), PlaygroundError> {
    let result = derive_parse_result(engine, filter);

    if json {
        let report = ParseReport {
            engine: engine.name(),
            diagnostics: result.diagnostics(),
            debug_tree: result.debug_tree(),
        };
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        return Ok(());
    }

    let rows = diagnostic_rows(&result);
    if rows.is_empty() {
        writeln!(out, "no diagnostics")?;
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }
    writeln!(out)?;
    writeln!(out, "{}", result.debug_tree())?;
    Ok(())
}

/// `binary`, `parenthesized` or `clause`
pub fn facts(filter: &str, out: &mut impl Write) -> Result<(), PlaygroundError> {
    let parse = fql_parser::parse(filter);
    let Some(expr) = parse.to_expr() else {
        warn!(filter, "no expression found");
        return Ok(());
    };
    let kind = match expr {
        Expr::Binary(_) => "binary",
        Expr::Paren(_) => "parenthesized",
        Expr::Clause(_) => "clause",
    };
    writeln!(out, "{kind}")?;
    Ok(())
}

/// One property path per clause, in source order
pub fn properties(filter: &str, out: &mut impl Write) -> Result<(), PlaygroundError> {
    let parse = fql_parser::parse(filter);
    let Some(expr) = parse.to_expr() else {
        warn!(filter, "no expression found");
        return Ok(());
    };
    for clause in expr.clauses() {
        if let Some(property) = clause.property() {
            writeln!(out, "{property}")?;
        }
    }
    Ok(())
}

/// One operand per clause, as written
pub fn operands(filter: &str, out: &mut impl Write) -> Result<(), PlaygroundError> {
    let parse = fql_parser::parse(filter);
    let Some(expr) = parse.to_expr() else {
        warn!(filter, "no expression found");
        return Ok(());
    };
    for clause in expr.clauses() {
        if let Some(operand) = clause.operand() {
            writeln!(out, "{operand}")?;
        }
    }
    Ok(())
}
