//! Interactive terminal playground
//!
//! [`run_playground`] owns the terminal and the event loop. Everything it
//! draws comes from [`app::App`], so tests drive the same `App` through a
//! `TestBackend` without a real terminal.

pub mod app;
mod diagnosticlist;
mod inputfield;
mod panel;
mod treepanel;
pub mod ui;


use std::io::{self, Stdout};
use std::ops::{Deref, DerefMut};
use std::panic;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use fql_config::{LoadingStrategy, PlaygroundConfig};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::{error, info};

use crate::error::PlaygroundError;
use crate::fql_engine::FqlEngine;
use crate::view::ViewOptions;
use app::App;

/// How long to wait for input before redrawing
const TICK: Duration = Duration::from_millis(250);
/// Redraw interval while the engine is loading
const LOADING_TICK: Duration = Duration::from_millis(16);

/// Run the playground until the user quits.
pub fn run_playground(config: &PlaygroundConfig) -> Result<(), PlaygroundError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    // Dropped after the terminal session, so an unwinding panic is
    // reported on the restored screen.
    let _panic_hook = PanicHookGuard::install();
    runtime.block_on(event_loop(config))
}

async fn event_loop(config: &PlaygroundConfig) -> Result<(), PlaygroundError> {
    let mut terminal = TerminalSession::start()?;
    let mut app = App::new(ViewOptions::from(&config.view));

    let strategy = config.engine.loading_strategy;
    info!(%strategy, "starting playground");
    app.start_loading(FqlEngine::initialize());

    if strategy == LoadingStrategy::Suspense {
        terminal.draw(|frame| ui::render(frame, &app))?;
        app.resolve_engine().await;
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;
        if app.should_quit {
            break;
        }

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        if app.is_loading() {
            tokio::time::sleep(LOADING_TICK).await;
            app.poll_engine();
            drain_events(&mut app, area, Duration::ZERO)?;
        } else {
            drain_events(&mut app, area, TICK)?;
            app.flush_input();
        }
    }

    info!("playground closed");
    Ok(())
}

/// Wait up to `wait` for an event, then handle it and everything queued
/// behind it.
fn drain_events(app: &mut App, area: Rect, wait: Duration) -> io::Result<()> {
    if !event::poll(wait)? {
        return Ok(());
    }
    loop {
        let event = event::read()?;
        app.handle_event(event, area, Instant::now());
        if app.should_quit || !event::poll(Duration::ZERO)? {
            return Ok(());
        }
    }
}

/// Keeps panic reports off the alternate screen
///
/// While active, panics go to the log and each report is kept. Once the
/// guard drops, the hook hands panics to the previous hook again. A drop
/// during an unwind cannot swap hooks back, so it writes the last report to
/// stderr instead; by then the terminal session has restored the screen.
struct PanicHookGuard {
    active: Arc<AtomicBool>,
    reports: Arc<Mutex<Vec<String>>>,
    restore: Option<Box<dyn FnOnce()>>,
}

impl PanicHookGuard {
    fn install() -> Self {
        let active = Arc::new(AtomicBool::new(true));
        let reports = Arc::new(Mutex::new(Vec::new()));
        let previous = Arc::new(panic::take_hook());

        let hook_active = Arc::clone(&active);
        let sink = Arc::clone(&reports);
        let fallback = Arc::clone(&previous);
        panic::set_hook(Box::new(move |info| {
            if hook_active.load(Ordering::SeqCst) {
                error!("panic: {info}");
                sink.lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push(info.to_string());
            } else {
                fallback(info);
            }
        }));

        Self {
            active,
            reports,
            restore: Some(Box::new(move || {
                panic::set_hook(Box::new(move |info| previous(info)));
            })),
        }
    }

    /// Reports recorded while active, oldest first
    fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for PanicHookGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
        if thread::panicking() {
            if let Some(report) = self.reports().last() {
                eprintln!("fqlp {report}");
            }
        } else if let Some(restore) = self.restore.take() {
            restore();
        }
    }
}

/// Raw-mode alternate screen with mouse capture, restored on drop
struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    fn start() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Deref for TerminalSession {
    type Target = Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for TerminalSession {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        );
        let _ = self.terminal.show_cursor();
    }
}
