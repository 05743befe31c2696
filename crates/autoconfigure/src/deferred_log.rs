use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredRecord {
    pub level: LogLevel,
    pub message: String,
}

/// Buffers log records emitted before the host has installed a logging sink.
///
/// Records keep their insertion order and are forwarded to `tracing` by
/// [`DeferredLog::replay`].
#[derive(Debug, Default)]
pub struct DeferredLog {
    records: Vec<DeferredRecord>,
}

impl DeferredLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn debug(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Debug, message);
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message);
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Warn, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message);
    }

    pub fn records(&self) -> &[DeferredRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any buffered record at `level` contains `needle`.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .iter()
            .any(|record| record.level == level && record.message.contains(needle))
    }

    /// Emits every buffered record through `tracing`, oldest first, and
    /// empties the buffer. Returns the number of records replayed.
    pub fn replay(&mut self) -> usize {
        let count = self.records.len();
        for record in self.records.drain(..) {
            match record.level {
                LogLevel::Debug => debug!(target: "wavefront::account", "{}", record.message),
                LogLevel::Info => info!(target: "wavefront::account", "{}", record.message),
                LogLevel::Warn => warn!(target: "wavefront::account", "{}", record.message),
                LogLevel::Error => error!(target: "wavefront::account", "{}", record.message),
            }
        }
        count
    }

    fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        self.records.push(DeferredRecord {
            level,
            message: message.into(),
        });
    }
}
