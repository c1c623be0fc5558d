//! Debug tree panel: the engine's debug text, verbatim, scrolled by line and
//! by column

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel::{Panel, PanelEvent};
use crate::view::LiveParseView;

const PAGE_STEP: usize = 10;
/// Columns moved per Left/Right press
const COLUMN_STEP: usize = 4;

#[derive(Debug, Default)]
pub struct TreePanel {
    scroll: usize,
    column: usize,
}

impl TreePanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// First visible column
    pub fn column(&self) -> usize {
        self.column
    }

    /// Keep the first visible line and column inside a tree of `lines`
    /// lines whose widest line is `width` columns
    pub fn clamp(&mut self, lines: usize, width: usize) {
        self.scroll = self.scroll.min(lines.saturating_sub(1));
        self.column = self.column.min(width.saturating_sub(1));
    }

    pub fn scroll_by(&mut self, delta: isize, view: &LiveParseView) {
        self.scroll = self.scroll.saturating_add_signed(delta);
        self.clamp(view.tree_line_count(), view.tree_width());
    }

    pub fn scroll_columns_by(&mut self, delta: isize, view: &LiveParseView) {
        self.column = self.column.saturating_add_signed(delta);
        self.clamp(view.tree_line_count(), view.tree_width());
    }
}

impl Panel for TreePanel {
    fn render(&self, frame: &mut Frame, area: Rect, view: &LiveParseView, _focused: bool) {
        let row = u16::try_from(self.scroll).unwrap_or(u16::MAX);
        let column = u16::try_from(self.column).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(view.debug_tree()).scroll((row, column));
        frame.render_widget(paragraph, area);
    }

    fn handle_key(&mut self, key: KeyEvent, view: &mut LiveParseView) -> PanelEvent {
        let step = COLUMN_STEP as isize;
        match key.code {
            KeyCode::Up => self.scroll_by(-1, view),
            KeyCode::Down => self.scroll_by(1, view),
            KeyCode::PageUp => self.scroll_by(-(PAGE_STEP as isize), view),
            KeyCode::PageDown => self.scroll_by(PAGE_STEP as isize, view),
            KeyCode::Left => self.scroll_columns_by(-step, view),
            KeyCode::Right => self.scroll_columns_by(step, view),
            KeyCode::Home => {
                self.scroll = 0;
                self.column = 0;
            }
            KeyCode::End => self.scroll = view.tree_line_count().saturating_sub(1),
            _ => {}
        }
        PanelEvent::NoChange
    }
}
