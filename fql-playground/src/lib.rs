//! Interactive playground for the FQL filter query language.
//!
//! The parse engine is initialized once, asynchronously ([`engine`]). Once it
//! is ready, a [`view::LiveParseView`] re-parses the input on every change and
//! shows the diagnostics and a debug dump of the syntax tree. Activating a
//! diagnostic selects its range in the input.
//!
//! The `fqlp` binary runs the terminal UI in [`playground`], or one of the
//! one-shot [`commands`].

pub mod cli;
pub mod commands;
pub mod engine;
pub mod error;
pub mod fql_engine;
pub mod input;
pub mod logging;
pub mod parse;
pub mod playground;
pub mod view;

pub use engine::{EngineError, EngineLoader, EngineState, ParseEngine};
pub use error::PlaygroundError;
pub use parse::{derive_parse_result, Diagnostic, ParseResult, TextRange};
pub use view::{LiveParseView, ViewOptions};
