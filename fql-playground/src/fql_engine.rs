//! [`ParseEngine`] backed by `fql-parser`
//!
//! The parser reports byte ranges; the playground works in characters, so
//! every range is converted here before it leaves the adapter.

use fql_parser::Spanned;
use tracing::debug;

use crate::engine::{EngineError, ParseEngine};
use crate::parse::{Diagnostic, ParseResult, SyntaxTree, TextRange};

/// Parsed during initialization; must come back without errors.
const SELF_CHECK: &str = "host.online:true+(platform:'windows',risk:>=10)";

#[derive(Debug, Default)]
pub struct FqlEngine {
    _private: (),
}

impl FqlEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring up the engine, checking that it parses a known-good filter.
    pub async fn initialize() -> Result<Self, EngineError> {
        tokio::task::yield_now().await;

        let check = fql_parser::parse(SELF_CHECK);
        if !check.is_ok() {
            return Err(EngineError::Init(format!(
                "self-check parse reported: {}",
                check.error_messages().join("; ")
            )));
        }
        debug!(filter = SELF_CHECK, "fql self-check passed");
        Ok(Self::new())
    }
}

impl ParseEngine for FqlEngine {
    fn name(&self) -> &str {
        "fql"
    }

    fn parse(&self, text: &str) -> ParseResult {
        let parse = fql_parser::parse(text);
        let offsets = CharOffsets::new(text);
        let diagnostics = parse
            .errors()
            .iter()
            .map(|error| {
                let span = error.span();
                Diagnostic::new(
                    error.to_string(),
                    TextRange::new(
                        offsets.char_offset(span.start().into()),
                        offsets.char_offset(span.end().into()),
                    ),
                )
            })
            .collect();
        ParseResult::new(Box::new(FqlTree(parse)), diagnostics)
    }
}

struct FqlTree(fql_parser::Parse);

impl SyntaxTree for FqlTree {
    fn render_debug_text(&self) -> String {
        self.0.debug_tree()
    }
}

/// Byte offset to character offset lookup for one text
struct CharOffsets {
    /// Byte index of every character, ascending
    starts: Vec<usize>,
}

impl CharOffsets {
    fn new(text: &str) -> Self {
        Self {
            starts: text.char_indices().map(|(index, _)| index).collect(),
        }
    }

    /// Number of characters that start before byte offset `byte`
    fn char_offset(&self, byte: usize) -> usize {
        self.starts.partition_point(|start| *start < byte)
    }
}
