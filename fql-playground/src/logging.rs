//! Logging setup with `tracing` and `tracing-subscriber`.
//!
//! The interactive playground owns the terminal, so it only logs when a log
//! file is given. The one-shot commands log to stderr.
//!
//! Levels used across the crate:
//!
//! - `error`: engine load failures, parser faults
//! - `warn`: engine output that had to be corrected
//! - `info`: engine lifecycle
//! - `debug`: derivations and selection requests

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::PlaygroundError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Nothing is logged
    Off,
    Stderr,
    /// Append to a file
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// A filter directive such as `info` or `fql_playground=debug`.
    /// `RUST_LOG` takes precedence when set.
    pub filter: String,
    pub target: LogTarget,
}

impl LogConfig {
    pub fn new(filter: impl Into<String>, target: LogTarget) -> Self {
        Self {
            filter: filter.into(),
            target,
        }
    }
}

/// Install the global subscriber. Call once, at startup.
pub fn init_logging(config: &LogConfig) -> Result<(), PlaygroundError> {
    match &config.target {
        LogTarget::Off => Ok(()),
        LogTarget::Stderr => init_with_writer(&config.filter, io::stderr, true),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| PlaygroundError::LogFile {
                    path: path.clone(),
                    source,
                })?;
            init_with_writer(&config.filter, SharedFileWriter::new(file), false)
        }
    }
}

fn init_with_writer<W>(filter: &str, writer: W, ansi: bool) -> Result<(), PlaygroundError>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(true);

    tracing_subscriber::registry()
        .with(build_env_filter(filter)?)
        .with(layer)
        .try_init()
        .map_err(|err| PlaygroundError::Logging(err.to_string()))
}

fn build_env_filter(filter: &str) -> Result<EnvFilter, PlaygroundError> {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return Ok(from_env);
    }
    EnvFilter::try_new(filter).map_err(|err| PlaygroundError::LogFilter {
        filter: filter.to_owned(),
        reason: err.to_string(),
    })
}

#[derive(Clone)]
struct SharedFileWriter {
    file: Arc<Mutex<File>>,
}

impl SharedFileWriter {
    fn new(file: File) -> Self {
        Self {
            file: Arc::new(Mutex::new(file)),
        }
    }
}

struct SharedFileGuard {
    file: Arc<Mutex<File>>,
}

impl Write for SharedFileGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        file.flush()
    }
}

impl<'a> MakeWriter<'a> for SharedFileWriter {
    type Writer = SharedFileGuard;

    fn make_writer(&'a self) -> Self::Writer {
        SharedFileGuard {
            file: Arc::clone(&self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filters() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_env_filter("fql_playground=loud").unwrap_err();
        assert!(matches!(err, PlaygroundError::LogFilter { .. }));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = LogConfig::new("info", LogTarget::File(dir.path().join("missing/fqlp.log")));
        let err = init_logging(&config).unwrap_err();
        assert!(err.to_string().starts_with("cannot open log file"));
    }

    #[test]
    fn shared_writer_appends_to_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("fqlp.log");
        let file = File::create(&path).expect("log file");
        let writer = SharedFileWriter::new(file);

        writer.make_writer().write_all(b"first\n").expect("write");
        writer.make_writer().write_all(b"second\n").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "first\nsecond\n");
    }
}
