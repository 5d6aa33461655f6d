//! Logging capability used by the [resolver](crate::resolver).
//!
//! The resolver never calls the `log` macros directly. It receives something implementing [ResolveLog],
//! so callers and tests can swap in [NoopLog] or [RecordingLog] without touching global state.
//! [LogFacade] is the default and forwards to the `log` crate.

use std::sync::{Mutex, PoisonError};

/// Log target used by [LogFacade].
pub const RESOLVER_LOG_TARGET: &str = "promptload::resolver";

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Error,
}

/// Sink for the messages emitted while resolving templates.
pub trait ResolveLog {
    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message)
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message)
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message)
    }
}

impl<T: ResolveLog + ?Sized> ResolveLog for &T {
    fn log(&self, level: LogLevel, message: &str) {
        (**self).log(level, message)
    }
}

/// Forwards to the `log` facade, so whatever logger the application installed receives the records.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl ResolveLog for LogFacade {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => log::debug!(target: RESOLVER_LOG_TARGET, "{}", message),
            LogLevel::Info => log::info!(target: RESOLVER_LOG_TARGET, "{}", message),
            LogLevel::Error => log::error!(target: RESOLVER_LOG_TARGET, "{}", message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLog;

impl ResolveLog for NoopLog {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Keeps every record in memory. Mostly useful in tests.
#[derive(Debug, Default)]
pub struct RecordingLog {
    records: Mutex<Vec<(LogLevel, String)>>,
}

impl RecordingLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records so far, oldest first.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Messages logged at `level`, oldest first.
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.records()
            .into_iter()
            .filter_map(|(l, message)| (l == level).then_some(message))
            .collect()
    }

    pub fn clear(&self) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl ResolveLog for RecordingLog {
    fn log(&self, level: LogLevel, message: &str) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((level, message.to_string()));
    }
}

#[cfg(test)]
mod test_logging {
    use super::{LogLevel, NoopLog, RecordingLog, ResolveLog};

    #[test]
    fn test_recording_log_keeps_order() {
        let log = RecordingLog::new();
        log.info("first");
        log.error("second");
        log.info("third");
        assert_eq!(log.records(), vec![
            (LogLevel::Info, "first".to_string()),
            (LogLevel::Error, "second".to_string()),
            (LogLevel::Info, "third".to_string()),
        ]);
        assert_eq!(log.messages(LogLevel::Info), vec!["first", "third"]);
        log.clear();
        assert!(log.records().is_empty());
    }

    #[test]
    fn test_borrowed_logger() {
        let log = RecordingLog::new();
        let borrowed = &log;
        borrowed.debug("through a reference");
        assert_eq!(log.messages(LogLevel::Debug), vec!["through a reference"]);
    }

    #[test]
    fn test_noop_log() {
        NoopLog.error("nothing happens");
    }
}
