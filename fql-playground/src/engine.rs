//! Engine contract and one-shot loader
//!
//! The parse engine becomes usable only after an asynchronous
//! initialization. [`EngineLoader`] runs that initialization exactly once and
//! moves through `Unloaded -> Loading -> Ready | Failed`, never backwards.
//! The UI reads the state; only the loader writes it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error, info};

use crate::parse::ParseResult;

/// A parser the playground can drive.
///
/// `parse` is called synchronously on every input change and must be a pure
/// function of `text`.
pub trait ParseEngine: Send + Sync {
    /// Short name for logs and the status line
    fn name(&self) -> &str;

    fn parse(&self, text: &str) -> ParseResult;
}

/// Shared handle to a ready engine
pub type EngineHandle = Arc<dyn ParseEngine>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("engine initialization failed: {0}")]
    Init(String),
    #[error("engine initialization stopped before reporting a result")]
    Aborted,
}

#[derive(Clone)]
pub enum EngineState {
    Unloaded,
    Loading,
    Ready(EngineHandle),
    Failed(EngineError),
}

/// [`EngineState`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl EngineState {
    pub fn status(&self) -> EngineStatus {
        match self {
            EngineState::Unloaded => EngineStatus::Unloaded,
            EngineState::Loading => EngineStatus::Loading,
            EngineState::Ready(_) => EngineStatus::Ready,
            EngineState::Failed(_) => EngineStatus::Failed,
        }
    }

    pub fn engine(&self) -> Option<&EngineHandle> {
        match self {
            EngineState::Ready(engine) => Some(engine),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EngineError> {
        match self {
            EngineState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Debug for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineState::Unloaded => f.write_str("Unloaded"),
            EngineState::Loading => f.write_str("Loading"),
            EngineState::Ready(engine) => f.debug_tuple("Ready").field(&engine.name()).finish(),
            EngineState::Failed(err) => f.debug_tuple("Failed").field(err).finish(),
        }
    }
}

type Completion = Result<EngineHandle, EngineError>;

pub struct EngineLoader {
    state: EngineState,
    pending: Option<oneshot::Receiver<Completion>>,
}

impl EngineLoader {
    pub fn new() -> Self {
        Self {
            state: EngineState::Unloaded,
            pending: None,
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn status(&self) -> EngineStatus {
        self.state.status()
    }

    /// Start initializing the engine with `init`.
    ///
    /// Only the first call does anything; later calls return `false` and
    /// leave the state alone. Must be called from within a tokio runtime,
    /// which drives `init` to completion.
    pub fn load<F, E>(&mut self, init: F) -> bool
    where
        F: Future<Output = Result<E, EngineError>> + Send + 'static,
        E: ParseEngine + 'static,
    {
        if !matches!(self.state, EngineState::Unloaded) {
            debug!(state = ?self.state, "engine load already triggered");
            return false;
        }

        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let completion = init.await.map(|engine| Arc::new(engine) as EngineHandle);
            // The loader may be gone already; nobody is left to tell.
            let _ = tx.send(completion);
        });

        self.pending = Some(rx);
        self.state = EngineState::Loading;
        info!("loading parse engine");
        true
    }

    /// Apply the initialization outcome if it has arrived, without waiting.
    pub fn poll(&mut self) -> EngineStatus {
        if let Some(rx) = self.pending.as_mut() {
            match rx.try_recv() {
                Ok(completion) => self.finish(completion),
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => self.finish(Err(EngineError::Aborted)),
            }
        }
        self.status()
    }

    /// Wait for the initialization outcome.
    ///
    /// Returns immediately when nothing is pending, including when `load`
    /// was never called.
    pub async fn resolve(&mut self) -> &EngineState {
        if let Some(rx) = self.pending.take() {
            let completion = rx.await.unwrap_or(Err(EngineError::Aborted));
            self.finish(completion);
        }
        &self.state
    }

    fn finish(&mut self, completion: Completion) {
        self.pending = None;
        self.state = match completion {
            Ok(engine) => {
                info!(engine = engine.name(), "parse engine ready");
                EngineState::Ready(engine)
            }
            Err(err) => {
                error!(%err, "parse engine failed to load");
                EngineState::Failed(err)
            }
        };
    }
}

impl Default for EngineLoader {
    fn default() -> Self {
        Self::new()
    }
}
