//! Live parse view: the input text, its parse result, and the mapping from
//! diagnostics back onto the input control.

use fql_config::ViewConfig;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::engine::EngineHandle;
use crate::input::{InputControl, SelectionRequest};
use crate::parse::{derive_parse_result, diagnostic_rows, Diagnostic, ParseResult};

/// Configuration toggles of the view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub enable_range_selection: bool,
    pub placeholder: Option<String>,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            enable_range_selection: true,
            placeholder: None,
        }
    }
}

impl From<&ViewConfig> for ViewOptions {
    fn from(config: &ViewConfig) -> Self {
        Self {
            enable_range_selection: config.enable_range_selection,
            placeholder: config.placeholder().map(str::to_owned),
        }
    }
}

pub struct LiveParseView {
    engine: EngineHandle,
    input: InputControl,
    text: String,
    result: ParseResult,
    tree: TreeText,
    derivations: u64,
    enable_range_selection: bool,
}

impl LiveParseView {
    /// Mount the view on a ready engine, starting from empty input.
    pub fn new(engine: EngineHandle, options: ViewOptions) -> Self {
        let result = derive_parse_result(engine.as_ref(), "");
        let tree = TreeText::new(result.debug_tree());
        Self {
            engine,
            input: InputControl::new(options.placeholder),
            text: String::new(),
            result,
            tree,
            derivations: 1,
            enable_range_selection: options.enable_range_selection,
        }
    }

    /// Replace the input text and derive a fresh parse result from it.
    ///
    /// The control mirrors the text, so it is updated too when the new value
    /// did not come from it.
    pub fn on_input_changed(&mut self, new_text: impl Into<String>) {
        self.text = new_text.into();
        if self.input.text() != self.text {
            self.input.set_text(self.text.clone());
        }
        self.result = derive_parse_result(self.engine.as_ref(), &self.text);
        self.tree = TreeText::new(self.result.debug_tree());
        self.derivations += 1;
    }

    /// Select `diagnostic`'s range in the input control.
    ///
    /// Leaves the text and the parse result alone. Returns whether a
    /// selection was made.
    pub fn select_range(&mut self, diagnostic: &Diagnostic) -> bool {
        if !self.enable_range_selection {
            debug!("range selection is disabled");
            return false;
        }
        SelectionRequest::forward(diagnostic.range).apply(&mut self.input)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        self.result.diagnostics()
    }

    pub fn diagnostic_rows(&self) -> Vec<String> {
        diagnostic_rows(&self.result)
    }

    /// Debug text of the current tree, rendered once per derivation
    pub fn debug_tree(&self) -> &str {
        &self.tree.text
    }

    pub fn tree_line_count(&self) -> usize {
        self.tree.lines
    }

    /// Display width of the widest tree line
    pub fn tree_width(&self) -> usize {
        self.tree.width
    }

    pub fn input(&self) -> &InputControl {
        &self.input
    }

    /// The control, for edits that are followed by [`Self::on_input_changed`]
    pub fn input_mut(&mut self) -> &mut InputControl {
        &mut self.input
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// How many parse results have been derived since the view was mounted
    pub fn derivations(&self) -> u64 {
        self.derivations
    }

    pub fn range_selection_enabled(&self) -> bool {
        self.enable_range_selection
    }
}

struct TreeText {
    text: String,
    lines: usize,
    width: usize,
}

impl TreeText {
    fn new(text: String) -> Self {
        let (lines, width) = text
            .lines()
            .fold((0, 0), |(lines, width), line| (lines + 1, width.max(line.width())));
        Self { text, lines, width }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fql_engine::FqlEngine;
    use crate::parse::TextRange;
    use std::sync::Arc;

    fn view(options: ViewOptions) -> LiveParseView {
        LiveParseView::new(Arc::new(FqlEngine::new()), options)
    }

    #[test]
    fn empty_input_parses() {
        let view = view(ViewOptions::default());
        assert_eq!(view.text(), "");
        assert!(view.diagnostics().is_empty());
        assert_eq!(view.debug_tree(), "Root@0..0");
    }

    #[test]
    fn same_text_gives_identical_results() {
        let mut view = view(ViewOptions::default());
        view.on_input_changed("a = ");
        let first = (view.diagnostics().to_vec(), view.debug_tree().to_owned());
        view.on_input_changed("a = ");
        let second = (view.diagnostics().to_vec(), view.debug_tree().to_owned());
        assert_eq!(first, second);
    }

    #[test]
    fn selecting_a_diagnostic_does_not_rederive() {
        let mut view = view(ViewOptions::default());
        view.on_input_changed("a = ");
        let derivations = view.derivations();
        let diagnostic = view.diagnostics()[0].clone();

        assert!(view.select_range(&diagnostic));
        assert_eq!(view.input().selection(), Some(TextRange::new(2, 3)));
        assert_eq!(view.text(), "a = ");
        assert_eq!(view.derivations(), derivations);
    }

    #[test]
    fn disabled_range_selection_is_a_no_op() {
        let mut view = view(ViewOptions {
            enable_range_selection: false,
            placeholder: None,
        });
        view.on_input_changed("a = ");
        let diagnostic = view.diagnostics()[0].clone();
        assert!(!view.select_range(&diagnostic));
        assert_eq!(view.input().selection(), None);
    }

    #[test]
    fn programmatic_change_updates_the_control() {
        let mut view = view(ViewOptions::default());
        view.on_input_changed("host:");
        assert_eq!(view.input().text(), "host:");
        assert_eq!(view.input().cursor(), 5);
    }

    #[test]
    fn options_from_config() {
        let config = fql_config::load_defaults().expect("defaults");
        let options = ViewOptions::from(&config.view);
        assert!(options.enable_range_selection);
        assert_eq!(
            options.placeholder.as_deref(),
            Some("host.online:true+platform:'windows'")
        );
    }

    #[test]
    fn tree_measurements_follow_the_text() {
        let mut view = view(ViewOptions::default());
        assert_eq!(view.tree_line_count(), 1);
        assert_eq!(view.tree_width(), "Root@0..0".len());

        view.on_input_changed("name:'日本'");
        let widest = view
            .debug_tree()
            .lines()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        assert_eq!(view.tree_line_count(), view.debug_tree().lines().count());
        // Wide characters take two columns each
        assert_eq!(view.tree_width(), widest + 2);
    }
}
