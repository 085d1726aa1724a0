//! Bounded in-memory log storage.
//!
//! This module provides:
//! - [`LogStore`] - Thread-safe ring of entries with level-gated admission
//! - [`SharedLogStore`] - `Arc` handle passed around by the composition root

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::config::{LogStoreConfig, LoggerConfig, LoggerConfigPatch};
use crate::error::Result;
use crate::sink::{format_entry, LogSink};
use crate::types::{CapturedError, LevelSummary, LogEntry, LogFilter, LogLevel};

/// Thread-safe in-memory log store with a fixed capacity.
///
/// When an insert would exceed the capacity the single oldest entry is
/// evicted. Reads return copies, never views into the ring.
pub struct LogStore {
    /// Maximum retained entries
    capacity: usize,
    /// All log entries, ordered by insertion
    entries: RwLock<VecDeque<LogEntry>>,
    /// Current logger behavior
    config: RwLock<LoggerConfig>,
    /// Mirrored-output destinations
    sinks: RwLock<Vec<Arc<dyn LogSink>>>,
}

impl Default for LogStore {
    fn default() -> Self {
        Self::with_config(LogStoreConfig::default())
    }
}

impl std::fmt::Debug for LogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStore")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .field("config", &*self.config.read())
            .field("sinks", &self.sinks.read().len())
            .finish()
    }
}

impl LogStore {
    /// Creates a store with the default logger configuration.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self::with_config(LogStoreConfig::default().with_capacity(capacity))
    }

    /// Creates a store with full configuration.
    #[must_use]
    pub fn with_config(config: LogStoreConfig) -> Self {
        Self {
            capacity: config.capacity,
            entries: RwLock::new(VecDeque::with_capacity(config.capacity)),
            config: RwLock::new(config.logger),
            sinks: RwLock::new(Vec::new()),
        }
    }

    /// Registers a sink that receives every admitted entry while mirroring
    /// is enabled.
    pub fn add_sink(&self, sink: Arc<dyn LogSink>) {
        self.sinks.write().push(sink);
    }

    /// Records an entry stamped with the current time.
    ///
    /// Returns `false` when the level is below the configured threshold; that
    /// is a skip, not an error.
    pub fn record(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        context: Option<&str>,
        data: Option<serde_json::Value>,
        error: Option<CapturedError>,
    ) -> bool {
        let config = self.config.read().clone();
        if !level.admits_under(config.min_level) {
            return false;
        }

        let mut entry = LogEntry::new(level, message);
        entry.context = context.map(str::to_string);
        entry.data = data;
        entry.error = error;
        self.admit(entry, &config)
    }

    /// Records a pre-built entry through the same level gate.
    pub fn record_entry(&self, entry: LogEntry) -> bool {
        let config = self.config.read().clone();
        if !entry.level.admits_under(config.min_level) {
            return false;
        }
        self.admit(entry, &config)
    }

    // Gate, retention and mirroring all see the same config snapshot.
    fn admit(&self, entry: LogEntry, config: &LoggerConfig) -> bool {
        let LoggerConfig {
            mirror_output,
            include_timestamps,
            ..
        } = *config;

        let mirrored = mirror_output.then(|| entry.clone());

        {
            let mut entries = self.entries.write();
            entries.push_back(entry);
            if entries.len() > self.capacity {
                entries.pop_front();
            }
        }

        if let Some(entry) = mirrored {
            let sinks = self.sinks.read().clone();
            if !sinks.is_empty() {
                let line = format_entry(&entry, include_timestamps);
                for sink in &sinks {
                    sink.emit(&entry, &line);
                }
            }
        }

        true
    }

    /// Records an ERROR entry.
    pub fn error(&self, message: impl Into<String>, context: Option<&str>) -> bool {
        self.record(LogLevel::Error, message, context, None, None)
    }

    /// Records a WARN entry.
    pub fn warn(&self, message: impl Into<String>, context: Option<&str>) -> bool {
        self.record(LogLevel::Warn, message, context, None, None)
    }

    /// Records an INFO entry.
    pub fn info(&self, message: impl Into<String>, context: Option<&str>) -> bool {
        self.record(LogLevel::Info, message, context, None, None)
    }

    /// Records a DEBUG entry.
    pub fn debug(&self, message: impl Into<String>, context: Option<&str>) -> bool {
        self.record(LogLevel::Debug, message, context, None, None)
    }

    /// Returns a copy of stored entries in insertion order, optionally
    /// restricted to an exact level.
    #[must_use]
    pub fn query(&self, level: Option<LogLevel>) -> Vec<LogEntry> {
        let entries = self.entries.read();
        match level {
            Some(level) => entries.iter().filter(|e| e.level == level).cloned().collect(),
            None => entries.iter().cloned().collect(),
        }
    }

    /// Returns a copy of the entries matching `filter`, in insertion order.
    #[must_use]
    pub fn query_filtered(&self, filter: &LogFilter) -> Vec<LogEntry> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.matches(filter))
            .cloned()
            .collect()
    }

    /// Distinct contexts, in the order they were first seen.
    #[must_use]
    pub fn contexts(&self) -> Vec<String> {
        let entries = self.entries.read();
        let mut seen: Vec<String> = Vec::new();
        for context in entries.iter().filter_map(|e| e.context.as_deref()) {
            if !seen.iter().any(|s| s == context) {
                seen.push(context.to_string());
            }
        }
        seen
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Counts stored entries per level.
    #[must_use]
    pub fn summarize(&self) -> LevelSummary {
        LevelSummary::from_entries(self.entries.read().iter())
    }

    /// Serializes all entries as a pretty JSON array, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry's payload fails to serialize.
    pub fn serialize(&self) -> Result<String> {
        let entries = self.entries.read();
        Ok(serde_json::to_string_pretty(&*entries)?)
    }

    /// Merges `patch` into the current configuration.
    pub fn configure(&self, patch: &LoggerConfigPatch) {
        let mut config = self.config.write();
        config.apply(patch);
        tracing::debug!(
            min_level = %config.min_level,
            mirror_output = config.mirror_output,
            include_timestamps = config.include_timestamps,
            "log store reconfigured"
        );
    }

    /// Returns a snapshot of the current configuration.
    #[must_use]
    pub fn config(&self) -> LoggerConfig {
        self.config.read().clone()
    }

    /// Returns the number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Shared log store handle.
pub type SharedLogStore = Arc<LogStore>;

/// Creates a new shared log store with the default logger configuration.
#[must_use]
pub fn shared_store(capacity: usize) -> SharedLogStore {
    Arc::new(LogStore::new(capacity))
}
