//! Diagnostics panel: one row per diagnostic, in the order the parser
//! reported them, with a highlighted row that `Enter` activates.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use super::panel::{Panel, PanelEvent};
use super::ui;
use crate::view::LiveParseView;

const PAGE_STEP: usize = 5;

#[derive(Debug, Default)]
pub struct DiagnosticList {
    highlighted: usize,
}

impl DiagnosticList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }

    /// Keep the highlight on an existing row after the list changed
    pub fn clamp(&mut self, rows: usize) {
        self.highlighted = self.highlighted.min(rows.saturating_sub(1));
    }

    /// Index of the first row shown in a viewport `height` rows tall
    fn offset(&self, height: usize) -> usize {
        self.highlighted.saturating_sub(height.saturating_sub(1))
    }

    /// The diagnostic drawn at screen row `y` of `area`, if any
    pub fn row_at(&self, area: Rect, column: u16, y: u16, rows: usize) -> Option<usize> {
        if !ui::contains(area, column, y) {
            return None;
        }
        let index = self.offset(area.height as usize) + (y - area.y) as usize;
        (index < rows).then_some(index)
    }

    fn move_by(&mut self, delta: isize, rows: usize) {
        let target = self.highlighted.saturating_add_signed(delta);
        self.highlighted = target.min(rows.saturating_sub(1));
    }
}

impl Panel for DiagnosticList {
    fn render(&self, frame: &mut Frame, area: Rect, view: &LiveParseView, focused: bool) {
        let rows = view.diagnostic_rows();
        if rows.is_empty() {
            let paragraph =
                Paragraph::new("No diagnostics").style(Style::default().fg(Color::Green));
            frame.render_widget(paragraph, area);
            return;
        }

        let offset = self.offset(area.height as usize);
        let lines = rows
            .into_iter()
            .enumerate()
            .skip(offset)
            .take(area.height as usize)
            .map(|(index, row)| {
                if focused && index == self.highlighted {
                    Line::styled(
                        row,
                        Style::default()
                            .fg(Color::Black)
                            .bg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Line::styled(row, Style::default().fg(Color::Red))
                }
            })
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, view: &mut LiveParseView) -> PanelEvent {
        let rows = view.diagnostics().len();
        match key.code {
            KeyCode::Up => self.move_by(-1, rows),
            KeyCode::Down => self.move_by(1, rows),
            KeyCode::PageUp => self.move_by(-(PAGE_STEP as isize), rows),
            KeyCode::PageDown => self.move_by(PAGE_STEP as isize, rows),
            KeyCode::Home => self.highlighted = 0,
            KeyCode::End => self.highlighted = rows.saturating_sub(1),
            KeyCode::Enter if self.highlighted < rows => {
                return PanelEvent::Activate(self.highlighted)
            }
            _ => {}
        }
        PanelEvent::NoChange
    }
}
