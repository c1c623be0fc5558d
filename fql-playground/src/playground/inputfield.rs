//! Input field panel: edits the input control and draws it on one line
//!
//! The control counts characters; the screen counts columns. Wide characters
//! take two columns, so scrolling and the cursor are measured in display
//! width.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use unicode_width::UnicodeWidthChar;

use super::panel::{Panel, PanelEvent};
use crate::view::LiveParseView;

#[derive(Debug, Default)]
pub struct InputField;

impl InputField {
    pub fn new() -> Self {
        InputField
    }
}

fn char_width(ch: char) -> usize {
    ch.width().unwrap_or(0)
}

/// First visible character so that the cursor, one column past the
/// character before it, stays inside `width` columns
fn scroll_offset(text: &str, cursor: usize, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let widths = text.chars().take(cursor).map(char_width).collect::<Vec<_>>();
    let mut offset = widths.len();
    let mut used = 1;
    for ch_width in widths.iter().rev() {
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        offset -= 1;
    }
    offset
}

/// Screen column of the cursor when drawing starts at character `offset`
fn cursor_column(text: &str, offset: usize, cursor: usize) -> usize {
    text.chars()
        .take(cursor)
        .skip(offset)
        .map(char_width)
        .sum()
}

impl Panel for InputField {
    fn render(&self, frame: &mut Frame, area: Rect, view: &LiveParseView, focused: bool) {
        let input = view.input();
        let width = area.width as usize;

        let line = match input.placeholder() {
            Some(placeholder) if input.text().is_empty() => {
                Line::from(Span::styled(placeholder, Style::default().fg(Color::DarkGray)))
            }
            _ => {
                let offset = scroll_offset(input.text(), input.cursor(), width);
                let selection = input.selection();
                let mut used = 0;
                let spans = input
                    .text()
                    .chars()
                    .enumerate()
                    .skip(offset)
                    .take_while(|(_, ch)| {
                        used += char_width(*ch);
                        used <= width
                    })
                    .map(|(index, ch)| {
                        let selected = selection
                            .is_some_and(|range| range.start <= index && index < range.end);
                        if selected {
                            Span::styled(
                                ch.to_string(),
                                Style::default().bg(Color::Blue).fg(Color::White),
                            )
                        } else {
                            Span::raw(ch.to_string())
                        }
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            }
        };
        frame.render_widget(Paragraph::new(line), area);

        if focused && area.width > 0 {
            let offset = scroll_offset(input.text(), input.cursor(), width);
            let column = cursor_column(input.text(), offset, input.cursor());
            let column = u16::try_from(column).unwrap_or(u16::MAX).min(area.width - 1);
            frame.set_cursor_position((area.x + column, area.y));
        }
    }

    fn handle_key(&mut self, key: KeyEvent, view: &mut LiveParseView) -> PanelEvent {
        let input = view.input_mut();
        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        let command = key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        let edited = match key.code {
            KeyCode::Char('a') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                input.select_all();
                false
            }
            KeyCode::Char(ch) if !command => input.insert_char(ch),
            KeyCode::Backspace => input.backspace(),
            KeyCode::Delete => input.delete(),
            KeyCode::Left => {
                input.move_left(shift);
                false
            }
            KeyCode::Right => {
                input.move_right(shift);
                false
            }
            KeyCode::Home => {
                input.move_home(shift);
                false
            }
            KeyCode::End => {
                input.move_end(shift);
                false
            }
            _ => false,
        };

        if edited {
            PanelEvent::InputEdited
        } else {
            PanelEvent::NoChange
        }
    }
}
