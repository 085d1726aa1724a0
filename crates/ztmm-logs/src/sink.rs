//! Output sinks for mirrored log entries.
//!
//! This module provides the [`LogSink`] trait and default implementations.
//! A store formats each admitted entry once and hands the line to every
//! registered sink.

use chrono::SecondsFormat;
use parking_lot::Mutex;

use crate::types::{LogEntry, LogLevel};

/// Trait for mirrored-output destinations.
///
/// Implement this trait to forward entries somewhere other than the
/// in-memory store (console, file, status bar).
pub trait LogSink: Send + Sync {
    /// Accepts one formatted entry.
    fn emit(&self, entry: &LogEntry, line: &str);
}

/// Renders an entry as a single line.
///
/// Layout is `[timestamp] [context] message`, with each bracket omitted when
/// disabled or absent.
#[must_use]
pub fn format_entry(entry: &LogEntry, include_timestamp: bool) -> String {
    let mut line = String::with_capacity(entry.message.len() + 48);
    if include_timestamp {
        line.push('[');
        line.push_str(&entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true));
        line.push_str("] ");
    }
    if let Some(ref context) = entry.context {
        line.push('[');
        line.push_str(context);
        line.push_str("] ");
    }
    line.push_str(&entry.message);
    line
}

/// Sink that uses the `tracing` infrastructure.
///
/// Each level goes to the matching tracing macro:
/// - Error → `tracing::error!`
/// - Warn → `tracing::warn!`
/// - Info → `tracing::info!`
/// - Debug → `tracing::debug!`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a new tracing-backed sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for TracingSink {
    fn emit(&self, entry: &LogEntry, line: &str) {
        let context = entry.context.as_deref().unwrap_or("");
        let error = entry
            .error
            .as_ref()
            .map(|e| format!("{}: {}", e.name, e.message));

        match entry.level {
            LogLevel::Error => {
                tracing::error!(target: "ztmm_logs", context, error = ?error, data = ?entry.data, "{line}");
            }
            LogLevel::Warn => {
                tracing::warn!(target: "ztmm_logs", context, error = ?error, data = ?entry.data, "{line}");
            }
            LogLevel::Info => {
                tracing::info!(target: "ztmm_logs", context, data = ?entry.data, "{line}");
            }
            LogLevel::Debug => {
                tracing::debug!(target: "ztmm_logs", context, data = ?entry.data, "{line}");
            }
        }
    }
}

/// A no-op sink for disabled scenarios.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Creates a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl LogSink for NoopSink {
    fn emit(&self, _entry: &LogEntry, _line: &str) {}
}

/// Sink that keeps formatted lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    /// Creates an empty memory sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the captured `(level, line)` pairs.
    #[must_use]
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Number of captured lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn emit(&self, entry: &LogEntry, line: &str) {
        self.lines.lock().push((entry.level, line.to_string()));
    }
}

/// A boxed sink for dynamic dispatch.
pub type BoxedSink = Box<dyn LogSink>;

impl LogSink for BoxedSink {
    fn emit(&self, entry: &LogEntry, line: &str) {
        (**self).emit(entry, line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CapturedError;
    use chrono::{TimeZone, Utc};

    fn fixed_entry() -> Option<LogEntry> {
        let ts = Utc.with_ymd_and_hms(2026, 10, 1, 12, 0, 0).single()?;
        Some(LogEntry::new(LogLevel::Warn, "Assessment draft not saved").with_timestamp(ts))
    }

    #[test]
    fn format_with_timestamp_and_context() {
        let entry = fixed_entry().map(|e| e.with_context("DraftService"));
        assert_eq!(
            entry.map(|e| format_entry(&e, true)),
            Some("[2026-10-01T12:00:00.000Z] [DraftService] Assessment draft not saved".to_string())
        );
    }

    #[test]
    fn format_without_timestamp() {
        let entry = fixed_entry().map(|e| e.with_context("DraftService"));
        assert_eq!(
            entry.map(|e| format_entry(&e, false)),
            Some("[DraftService] Assessment draft not saved".to_string())
        );
    }

    #[test]
    fn format_bare_message() {
        assert_eq!(
            fixed_entry().map(|e| format_entry(&e, false)),
            Some("Assessment draft not saved".to_string())
        );
    }

    #[test]
    fn tracing_sink_emits_every_level() {
        // Verifies the sink does not panic under an installed subscriber
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let sink = TracingSink::new();
            for level in LogLevel::ALL {
                let entry = LogEntry::new(level, "mirrored")
                    .with_context("Test")
                    .with_error(CapturedError::new("Error", "boom"));
                sink.emit(&entry, &format_entry(&entry, true));
            }
        });
    }

    #[test]
    fn noop_sink_does_nothing() {
        let sink = NoopSink::new();
        let entry = LogEntry::new(LogLevel::Info, "ignored");
        sink.emit(&entry, "ignored");
    }

    #[test]
    fn memory_sink_captures_lines() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        let entry = LogEntry::new(LogLevel::Error, "boom");
        sink.emit(&entry, "boom");
        sink.emit(&entry, "boom again");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines()[1], (LogLevel::Error, "boom again".to_string()));
    }

    #[test]
    fn boxed_sink_delegates() {
        let boxed: BoxedSink = Box::new(MemorySink::new());
        let entry = LogEntry::new(LogLevel::Info, "via box");
        boxed.emit(&entry, "via box");
    }
}
