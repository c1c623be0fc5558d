//! UI rendering
//!
//! Layout, top to bottom:
//! - Title bar (1 line)
//! - Input field (3 lines with border)
//! - Diagnostics (fixed height)
//! - Debug tree (remaining space)
//! - Status line (1 line)
//!
//! Until the engine is ready only the title bar and a loading or failure
//! message are drawn; the input field does not exist yet.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, Focus};
use super::panel::Panel;
use crate::engine::{EngineError, EngineState};
use crate::view::LiveParseView;

/// Minimum terminal width required for the UI
const MIN_TERMINAL_WIDTH: u16 = 40;
const INPUT_HEIGHT: u16 = 3;
const DIAGNOSTICS_HEIGHT: u16 = 8;
const STATUS_LINE_HEIGHT: u16 = 1;

/// Screen areas of the interactive layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaygroundLayout {
    pub title: Rect,
    pub input: Rect,
    pub diagnostics: Rect,
    /// Inside the diagnostics border, where the rows are drawn
    pub diagnostic_rows: Rect,
    pub tree: Rect,
    pub tree_lines: Rect,
    pub status: Rect,
}

pub fn layout(area: Rect) -> PlaygroundLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(DIAGNOSTICS_HEIGHT),
            Constraint::Min(3),
            Constraint::Length(STATUS_LINE_HEIGHT),
        ])
        .split(area);

    PlaygroundLayout {
        title: chunks[0],
        input: chunks[1],
        diagnostics: chunks[2],
        diagnostic_rows: bordered(chunks[2]),
        tree: chunks[3],
        tree_lines: bordered(chunks[3]),
        status: chunks[4],
    }
}

/// Whether the cell at `column`, `row` lies inside `area`
pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    (area.x..area.right()).contains(&column) && (area.y..area.bottom()).contains(&row)
}

fn bordered(area: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(area)
}

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, area);
        return;
    }

    match (app.engine_state(), app.view()) {
        (EngineState::Ready(_), Some(view)) => render_playground(frame, area, app, view),
        (EngineState::Failed(err), _) => render_failure(frame, area, err),
        _ => render_loading(frame, area),
    }
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, engine: Option<&str>) {
    let title = match engine {
        Some(name) => format!("fql:: playground ({name})"),
        None => "fql:: playground".to_owned(),
    };
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

/// Title bar over a centered message block
fn split_message_screen(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Percentage(40),
            Constraint::Min(3),
        ])
        .split(area);
    (chunks[0], chunks[2])
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let (title, body) = split_message_screen(area);
    render_title_bar(frame, title, None);

    let lines = vec![
        Line::styled(
            "Loading parse engine...",
            Style::default().fg(Color::Yellow),
        ),
        Line::styled("Esc to quit", Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

fn render_failure(frame: &mut Frame, area: Rect, err: &EngineError) {
    let (title, body) = split_message_screen(area);
    render_title_bar(frame, title, None);

    let lines = vec![
        Line::styled(
            "Failed to load the parse engine",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Line::raw(err.to_string()),
        Line::raw(""),
        Line::styled(
            "Restart fqlp to try again. Esc to quit.",
            Style::default().fg(Color::DarkGray),
        ),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, body);
}

fn render_playground(frame: &mut Frame, area: Rect, app: &App, view: &LiveParseView) {
    let layout = layout(area);

    render_title_bar(frame, layout.title, Some(view.engine_name()));

    let diagnostics_title = format!("Diagnostics ({})", view.diagnostics().len());
    let panels: [(&dyn Panel, Focus, &str, Rect); 3] = [
        (&app.input_field, Focus::Input, "Input", layout.input),
        (
            &app.diagnostic_list,
            Focus::Diagnostics,
            &diagnostics_title,
            layout.diagnostics,
        ),
        (&app.tree_panel, Focus::Tree, "Debug tree", layout.tree),
    ];

    for (panel, focus, name, panel_area) in panels {
        let focused = app.focus == focus;
        let title = if focused {
            format!("{name} [FOCUSED]")
        } else {
            name.to_owned()
        };
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title);
        let inner = block.inner(panel_area);
        frame.render_widget(block, panel_area);
        panel.render(frame, inner, view, focused);
    }

    render_status_line(frame, layout.status, app, view);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App, view: &LiveParseView) {
    let label = Style::default().fg(Color::Yellow);
    let input = view.input();

    let mut spans = vec![
        Span::styled(
            app.focus.label(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("Chars: ", label),
        Span::raw(input.char_len().to_string()),
        Span::raw(" | "),
        Span::styled("Cursor: ", label),
        Span::raw(input.cursor().to_string()),
    ];
    if let Some(selection) = input.selection() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled("Sel: ", label));
        spans.push(Span::raw(selection.to_string()));
    }
    if !view.range_selection_enabled() {
        spans.push(Span::raw(" | "));
        spans.push(Span::raw("range selection off"));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    frame.render_widget(paragraph, area);
}
