//! Core types for the session log.
//!
//! This module provides:
//! - [`LogLevel`] - Severity levels, most urgent first
//! - [`LogEntry`] - One immutable recorded event
//! - [`CapturedError`] - Error snapshot attached to an entry
//! - [`LogFilter`] - Viewer filter (level, context, search)
//! - [`LevelSummary`] - Per-level counts

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LogError;

/// Log severity levels, ordered from most to least urgent.
///
/// The discriminant is the level's rank: an entry is admitted when its rank
/// is less than or equal to the configured threshold's rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Failures that need attention
    Error = 0,
    /// Unexpected but recoverable conditions
    Warn = 1,
    /// General information
    Info = 2,
    /// Debugging information
    Debug = 3,
}

impl LogLevel {
    /// All levels, most urgent first.
    pub const ALL: [Self; 4] = [Self::Error, Self::Warn, Self::Info, Self::Debug];

    /// Returns the numeric rank (0 is most urgent).
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Returns true if this level passes a threshold of `min_level`.
    #[must_use]
    pub const fn admits_under(self, min_level: Self) -> bool {
        self.rank() <= min_level.rank()
    }

    /// Returns the string representation of this level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ERROR" => Ok(Self::Error),
            "WARN" | "WARNING" => Ok(Self::Warn),
            "INFO" => Ok(Self::Info),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(LogError::InvalidLevel(s.to_string())),
        }
    }
}

/// Snapshot of an error attached to a log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    /// Short type name of the error
    pub name: String,
    /// The error's display message
    pub message: String,
    /// Rendered chain of underlying causes, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl CapturedError {
    /// Creates a captured error from its parts.
    #[must_use]
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Captures an error value, walking its `source()` chain into `stack`.
    #[must_use]
    pub fn from_error<E: std::error::Error>(err: &E) -> Self {
        let full_name = std::any::type_name::<E>();
        let name = full_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(full_name);

        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name: name.to_string(),
            message: err.to_string(),
            stack: (!causes.is_empty()).then(|| causes.join("\n")),
        }
    }
}

/// One recorded diagnostic event.
///
/// Timestamps are kept at millisecond precision so that an entry survives
/// an export/import cycle unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity level
    pub level: LogLevel,
    /// When the entry was created
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// The log message
    pub message: String,
    /// Optional label of the producing component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Optional structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Optional captured error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<CapturedError>,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Utc::now().trunc_subsecs(3),
            message: message.into(),
            context: None,
            data: None,
            error: None,
        }
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp.trunc_subsecs(3);
        self
    }

    /// Sets the context label.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Attaches a structured payload.
    #[must_use]
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attaches a captured error.
    #[must_use]
    pub fn with_error(mut self, error: CapturedError) -> Self {
        self.error = Some(error);
        self
    }

    /// Checks if this entry matches the given filter.
    #[must_use]
    pub fn matches(&self, filter: &LogFilter) -> bool {
        if let Some(level) = filter.level {
            if self.level != level {
                return false;
            }
        }

        if let Some(ref context) = filter.context {
            if self.context.as_deref() != Some(context.as_str()) {
                return false;
            }
        }

        if let Some(ref search) = filter.search {
            let needle = search.to_lowercase();
            let in_message = self.message.to_lowercase().contains(&needle);
            let in_context = self
                .context
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle));
            if !in_message && !in_context {
                return false;
            }
        }

        true
    }
}

/// Filter criteria used by the viewer and recorded in exports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Exact level match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
    /// Exact context match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    /// Case-insensitive search over message and context
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl LogFilter {
    /// Creates a new empty filter that matches all entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one level.
    #[must_use]
    pub const fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// Restricts to one context.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Adds a text search.
    #[must_use]
    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Returns true if no criteria are set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.level.is_none() && self.context.is_none() && self.search.is_none()
    }
}

/// Count of stored entries per level.
///
/// Every level is always present, so an empty store reports zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LevelSummary {
    /// Number of ERROR entries
    pub error: usize,
    /// Number of WARN entries
    pub warn: usize,
    /// Number of INFO entries
    pub info: usize,
    /// Number of DEBUG entries
    pub debug: usize,
}

impl LevelSummary {
    /// Tallies a sequence of entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.increment(entry.level);
        }
        summary
    }

    fn increment(&mut self, level: LogLevel) {
        match level {
            LogLevel::Error => self.error += 1,
            LogLevel::Warn => self.warn += 1,
            LogLevel::Info => self.info += 1,
            LogLevel::Debug => self.debug += 1,
        }
    }

    /// Returns the count for one level.
    #[must_use]
    pub const fn get(&self, level: LogLevel) -> usize {
        match level {
            LogLevel::Error => self.error,
            LogLevel::Warn => self.warn,
            LogLevel::Info => self.info,
            LogLevel::Debug => self.debug,
        }
    }

    /// Total entries across all levels.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.error + self.warn + self.info + self.debug
    }

    /// Iterates `(level, count)` pairs, most urgent first.
    pub fn iter(&self) -> impl Iterator<Item = (LogLevel, usize)> + '_ {
        LogLevel::ALL.into_iter().map(|level| (level, self.get(level)))
    }
}

/// ISO-8601 timestamps with millisecond precision and a `Z` suffix.
pub(crate) mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
