//! Common interface of the three panels (input, diagnostics, tree)

use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::Frame;

use crate::view::LiveParseView;

/// What a panel asks the app to do after handling a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelEvent {
    NoChange,
    /// The input control's text changed
    InputEdited,
    /// Select the range of the diagnostic at this index
    Activate(usize),
}

pub trait Panel {
    /// Draw the panel's content inside `area` (borders are drawn by the caller)
    fn render(&self, frame: &mut Frame, area: Rect, view: &LiveParseView, focused: bool);

    fn handle_key(&mut self, key: KeyEvent, view: &mut LiveParseView) -> PanelEvent;
}
