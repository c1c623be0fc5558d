//! Application state and event routing
//!
//! The app owns the engine loader and, once the engine is ready, the live
//! parse view. Key and mouse events edit the input control right away, but
//! the parse result is only re-derived in [`App::flush_input`], which the
//! event loop calls after draining every queued event. A burst of
//! keystrokes therefore costs one derivation, for the last value.

use std::future::Future;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::{debug, info};

use super::diagnosticlist::DiagnosticList;
use super::inputfield::InputField;
use super::panel::{Panel, PanelEvent};
use super::treepanel::TreePanel;
use super::ui;
use crate::engine::{EngineError, EngineLoader, EngineState, EngineStatus, ParseEngine};
use crate::view::{LiveParseView, ViewOptions};

/// Two clicks on the same row within this window activate it
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

pub(crate) const MOUSE_SCROLL_LINES: isize = 3;

/// Which panel currently has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Diagnostics,
    Tree,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::Input => Focus::Diagnostics,
            Focus::Diagnostics => Focus::Tree,
            Focus::Tree => Focus::Input,
        }
    }

    pub fn previous(self) -> Focus {
        match self {
            Focus::Input => Focus::Tree,
            Focus::Diagnostics => Focus::Input,
            Focus::Tree => Focus::Diagnostics,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Focus::Input => "Input",
            Focus::Diagnostics => "Diagnostics",
            Focus::Tree => "Tree",
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Click {
    row: usize,
    at: Instant,
}

pub struct App {
    loader: EngineLoader,
    options: ViewOptions,
    view: Option<LiveParseView>,
    pub focus: Focus,
    pub input_field: InputField,
    pub diagnostic_list: DiagnosticList,
    pub tree_panel: TreePanel,
    input_dirty: bool,
    last_click: Option<Click>,
    pub should_quit: bool,
}

impl App {
    pub fn new(options: ViewOptions) -> Self {
        App {
            loader: EngineLoader::new(),
            options,
            view: None,
            focus: Focus::default(),
            input_field: InputField::new(),
            diagnostic_list: DiagnosticList::new(),
            tree_panel: TreePanel::new(),
            input_dirty: false,
            last_click: None,
            should_quit: false,
        }
    }

    /// Kick off engine initialization. See [`EngineLoader::load`].
    pub fn start_loading<F, E>(&mut self, init: F) -> bool
    where
        F: Future<Output = Result<E, EngineError>> + Send + 'static,
        E: ParseEngine + 'static,
    {
        self.loader.load(init)
    }

    /// Check for the engine without waiting; mounts the view once it is ready.
    pub fn poll_engine(&mut self) -> EngineStatus {
        let status = self.loader.poll();
        self.mount_view();
        status
    }

    /// Wait for the engine; mounts the view if it came up.
    pub async fn resolve_engine(&mut self) -> EngineStatus {
        let status = self.loader.resolve().await.status();
        self.mount_view();
        status
    }

    fn mount_view(&mut self) {
        if self.view.is_some() {
            return;
        }
        if let Some(engine) = self.loader.state().engine() {
            self.view = Some(LiveParseView::new(engine.clone(), self.options.clone()));
            info!(engine = engine.name(), "live parse view mounted");
        }
    }

    pub fn engine_state(&self) -> &EngineState {
        self.loader.state()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.loader.status(),
            EngineStatus::Unloaded | EngineStatus::Loading
        )
    }

    pub fn view(&self) -> Option<&LiveParseView> {
        self.view.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut LiveParseView> {
        self.view.as_mut()
    }

    pub fn handle_event(&mut self, event: Event, area: Rect, now: Instant) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, area, now),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if is_quit_key(key, self.focus, self.view.is_some()) {
            self.should_quit = true;
            return;
        }

        let Some(view) = self.view.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            _ => {
                let panel: &mut dyn Panel = match self.focus {
                    Focus::Input => &mut self.input_field,
                    Focus::Diagnostics => &mut self.diagnostic_list,
                    Focus::Tree => &mut self.tree_panel,
                };
                match panel.handle_key(key, view) {
                    PanelEvent::NoChange => {}
                    PanelEvent::InputEdited => self.input_dirty = true,
                    PanelEvent::Activate(row) => self.activate_diagnostic(row),
                }
            }
        }
    }

    /// Mouse events, with `area` the full terminal area the UI is drawn in
    pub fn handle_mouse(&mut self, mouse: MouseEvent, area: Rect, now: Instant) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        let layout = ui::layout(area);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let rows = view.diagnostics().len();
                let Some(row) =
                    self.diagnostic_list
                        .row_at(layout.diagnostic_rows, mouse.column, mouse.row, rows)
                else {
                    self.last_click = None;
                    return;
                };

                let is_double = self.last_click.is_some_and(|click| {
                    click.row == row && now.saturating_duration_since(click.at) <= DOUBLE_CLICK_WINDOW
                });
                if is_double {
                    self.last_click = None;
                    self.activate_diagnostic(row);
                } else {
                    self.last_click = Some(Click { row, at: now });
                }
            }
            MouseEventKind::ScrollDown | MouseEventKind::ScrollUp => {
                if ui::contains(layout.tree_lines, mouse.column, mouse.row) {
                    let delta = if mouse.kind == MouseEventKind::ScrollDown {
                        MOUSE_SCROLL_LINES
                    } else {
                        -MOUSE_SCROLL_LINES
                    };
                    self.tree_panel.scroll_by(delta, view);
                }
            }
            _ => {}
        }
    }

    /// Select the range of the diagnostic shown at `row`. Focus and the
    /// highlighted row stay where they are.
    fn activate_diagnostic(&mut self, row: usize) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let Some(diagnostic) = view.diagnostics().get(row).cloned() else {
            return;
        };
        debug!(row, range = %diagnostic.range, "diagnostic activated");
        view.select_range(&diagnostic);
    }

    /// Re-derive the parse result if the input changed since the last call.
    /// Returns whether a derivation happened.
    pub fn flush_input(&mut self) -> bool {
        if !self.input_dirty {
            return false;
        }
        self.input_dirty = false;

        let Some(view) = self.view.as_mut() else {
            return false;
        };
        let text = view.input().text().to_owned();
        view.on_input_changed(text);

        self.diagnostic_list.clamp(view.diagnostics().len());
        self.tree_panel
            .clamp(view.tree_line_count(), view.tree_width());
        self.last_click = None;
        true
    }
}

fn is_quit_key(key: KeyEvent, focus: Focus, mounted: bool) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => true,
        // Plain `q` is text while typing in the input field
        KeyCode::Char('q') => !mounted || focus != Focus::Input,
        _ => false,
    }
}
