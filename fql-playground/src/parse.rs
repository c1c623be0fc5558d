//! Parse results as the playground sees them
//!
//! Whatever engine is loaded, its output is reduced to a [`ParseResult`]: an
//! opaque tree that can only render itself as debug text, plus an ordered list
//! of [`Diagnostic`]s with character offsets into the parsed text.
//! [`derive_parse_result`] is the single call boundary between the view and
//! the engine.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;
use tracing::{debug, error, warn};

use crate::engine::ParseEngine;

/// A half-open range of zero-based character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

impl TextRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Pull both offsets into `0..=len`, keeping `start <= end`
    pub fn clamp_to(self, len: usize) -> TextRange {
        let start = self.start.min(len);
        let end = self.end.min(len).max(start);
        TextRange { start, end }
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub range: TextRange,
}

impl Diagnostic {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// The tree half of a parse result. The playground never looks inside it.
pub trait SyntaxTree {
    fn render_debug_text(&self) -> String;
}

/// Stands in for the tree when the engine produced none
#[derive(Debug)]
struct NoTree;

impl SyntaxTree for NoTree {
    fn render_debug_text(&self) -> String {
        String::new()
    }
}

pub struct ParseResult {
    tree: Box<dyn SyntaxTree>,
    diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    pub fn new(tree: Box<dyn SyntaxTree>, diagnostics: Vec<Diagnostic>) -> Self {
        Self { tree, diagnostics }
    }

    pub fn tree(&self) -> &dyn SyntaxTree {
        self.tree.as_ref()
    }

    /// Diagnostics in the order the engine reported them
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn debug_tree(&self) -> String {
        self.tree.render_debug_text()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl fmt::Debug for ParseResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseResult")
            .field("tree", &self.tree.render_debug_text())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

/// Parse `text` with `engine`.
///
/// Never panics outward. A panic inside the engine becomes a single
/// `internal parser fault` diagnostic spanning the whole text, and any range
/// the engine reports outside of `text` is clamped back into it.
pub fn derive_parse_result(engine: &dyn ParseEngine, text: &str) -> ParseResult {
    let char_len = text.chars().count();

    match panic::catch_unwind(AssertUnwindSafe(|| engine.parse(text))) {
        Ok(result) => {
            let result = clamp_ranges(result, char_len, engine.name());
            debug!(
                engine = engine.name(),
                chars = char_len,
                diagnostics = result.diagnostics.len(),
                "derived parse result"
            );
            result
        }
        Err(payload) => {
            let reason = panic_reason(payload.as_ref());
            error!(engine = engine.name(), %reason, "parse engine panicked");
            ParseResult::new(
                Box::new(NoTree),
                vec![Diagnostic::new(
                    format!("internal parser fault: {reason}"),
                    TextRange::new(0, char_len),
                )],
            )
        }
    }
}

fn clamp_ranges(mut result: ParseResult, char_len: usize, engine: &str) -> ParseResult {
    for diagnostic in &mut result.diagnostics {
        let clamped = diagnostic.range.clamp_to(char_len);
        if clamped != diagnostic.range {
            warn!(
                engine,
                reported = %diagnostic.range,
                clamped = %clamped,
                "diagnostic range outside of the parsed text"
            );
            diagnostic.range = clamped;
        }
    }
    result
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_owned()
    }
}

/// `"<message> [Char <start>]"`, the start offset zero-based with digit grouping
pub fn diagnostic_row(diagnostic: &Diagnostic) -> String {
    format!(
        "{} [Char {}]",
        diagnostic.message,
        group_digits(diagnostic.range.start)
    )
}

pub fn diagnostic_rows(result: &ParseResult) -> Vec<String> {
    result.diagnostics().iter().map(diagnostic_row).collect()
}

/// `1234567` as `1,234,567`
pub fn group_digits(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    struct FixedTree(&'static str);

    impl SyntaxTree for FixedTree {
        fn render_debug_text(&self) -> String {
            self.0.to_owned()
        }
    }

    /// Reports a diagnostic that runs past the end of any text
    struct OverreachingEngine;

    impl ParseEngine for OverreachingEngine {
        fn name(&self) -> &str {
            "overreaching"
        }

        fn parse(&self, text: &str) -> ParseResult {
            ParseResult::new(
                Box::new(FixedTree("Root")),
                vec![
                    Diagnostic::new("past the end", TextRange::new(text.len() + 5, text.len() + 9)),
                    Diagnostic::new("backwards", TextRange::new(2, 1)),
                ],
            )
        }
    }

    struct PanickingEngine;

    impl ParseEngine for PanickingEngine {
        fn name(&self) -> &str {
            "panicking"
        }

        fn parse(&self, _text: &str) -> ParseResult {
            panic!("grammar table corrupted")
        }
    }

    #[rstest]
    #[case(0, "0")]
    #[case(7, "7")]
    #[case(999, "999")]
    #[case(1000, "1,000")]
    #[case(12345, "12,345")]
    #[case(1234567, "1,234,567")]
    fn groups_digits_in_threes(#[case] value: usize, #[case] expected: &str) {
        assert_eq!(group_digits(value), expected);
    }

    #[test]
    fn row_shows_zero_based_start() {
        let diagnostic = Diagnostic::new("expected ident", TextRange::new(1234, 1240));
        assert_eq!(diagnostic_row(&diagnostic), "expected ident [Char 1,234]");
    }

    #[test]
    fn out_of_bounds_ranges_are_clamped() {
        let result = derive_parse_result(&OverreachingEngine, "héllo");
        let ranges = result
            .diagnostics()
            .iter()
            .map(|d| d.range)
            .collect::<Vec<_>>();
        assert_eq!(ranges, vec![TextRange::new(5, 5), TextRange::new(2, 2)]);
    }

    #[test]
    fn engine_panic_becomes_a_diagnostic() {
        let result = derive_parse_result(&PanickingEngine, "a:1");
        assert_eq!(
            result.diagnostics(),
            &[Diagnostic::new(
                "internal parser fault: grammar table corrupted",
                TextRange::new(0, 3),
            )]
        );
        assert_eq!(result.debug_tree(), "");
    }

    #[test]
    fn clamp_keeps_valid_ranges() {
        assert_eq!(TextRange::new(1, 3).clamp_to(4), TextRange::new(1, 3));
        assert_eq!(TextRange::new(1, 3).clamp_to(2), TextRange::new(1, 2));
        assert_eq!(TextRange::new(6, 9).clamp_to(4), TextRange::new(4, 4));
        assert!(TextRange::new(6, 9).clamp_to(4).is_empty());
    }
}
