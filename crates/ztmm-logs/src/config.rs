//! Logger and store configuration.

use serde::{Deserialize, Serialize};

use crate::types::LogLevel;

/// Default number of entries retained by a store.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Runtime behavior of the logger.
///
/// Replaced piecewise through [`LoggerConfigPatch`]; a change applies to
/// entries recorded after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfig {
    /// Least urgent level that is still recorded.
    pub min_level: LogLevel,
    /// Whether admitted entries are forwarded to registered sinks.
    pub mirror_output: bool,
    /// Whether mirrored lines carry a timestamp prefix.
    pub include_timestamps: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            mirror_output: true,
            include_timestamps: true,
        }
    }
}

impl LoggerConfig {
    /// Set the minimum recorded level.
    #[must_use]
    pub const fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Enable or disable sink mirroring.
    #[must_use]
    pub const fn with_mirror_output(mut self, enabled: bool) -> Self {
        self.mirror_output = enabled;
        self
    }

    /// Enable or disable timestamp prefixes.
    #[must_use]
    pub const fn with_timestamps(mut self, enabled: bool) -> Self {
        self.include_timestamps = enabled;
        self
    }

    /// Merges the fields present in `patch`, keeping the rest.
    pub fn apply(&mut self, patch: &LoggerConfigPatch) {
        if let Some(level) = patch.min_level {
            self.min_level = level;
        }
        if let Some(mirror) = patch.mirror_output {
            self.mirror_output = mirror;
        }
        if let Some(timestamps) = patch.include_timestamps {
            self.include_timestamps = timestamps;
        }
    }
}

/// Partial update for [`LoggerConfig`]. Absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggerConfigPatch {
    /// New minimum level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_level: Option<LogLevel>,
    /// New mirroring flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_output: Option<bool>,
    /// New timestamp flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_timestamps: Option<bool>,
}

impl LoggerConfigPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum level.
    #[must_use]
    pub const fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    /// Sets the mirroring flag.
    #[must_use]
    pub const fn mirror_output(mut self, enabled: bool) -> Self {
        self.mirror_output = Some(enabled);
        self
    }

    /// Sets the timestamp flag.
    #[must_use]
    pub const fn include_timestamps(mut self, enabled: bool) -> Self {
        self.include_timestamps = Some(enabled);
        self
    }
}

/// Construction-time configuration for a [`LogStore`](crate::LogStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogStoreConfig {
    /// Maximum number of entries kept.
    pub capacity: usize,
    /// Initial logger behavior.
    pub logger: LoggerConfig,
}

impl Default for LogStoreConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            logger: LoggerConfig::default(),
        }
    }
}

impl LogStoreConfig {
    /// Set the retained entry count.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the initial logger configuration.
    #[must_use]
    pub fn with_logger(mut self, logger: LoggerConfig) -> Self {
        self.logger = logger;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.min_level, LogLevel::Info);
        assert!(config.mirror_output);
        assert!(config.include_timestamps);

        let store = LogStoreConfig::default();
        assert_eq!(store.capacity, 1000);
        assert_eq!(store.logger, config);
    }

    #[test]
    fn config_builder() {
        let config = LoggerConfig::default()
            .with_min_level(LogLevel::Debug)
            .with_mirror_output(false)
            .with_timestamps(false);
        assert_eq!(config.min_level, LogLevel::Debug);
        assert!(!config.mirror_output);
        assert!(!config.include_timestamps);
    }

    #[test]
    fn patch_merges_only_present_fields() {
        let mut config = LoggerConfig::default();
        config.apply(&LoggerConfigPatch::new().min_level(LogLevel::Warn));

        assert_eq!(config.min_level, LogLevel::Warn);
        assert!(config.mirror_output);
        assert!(config.include_timestamps);

        config.apply(&LoggerConfigPatch::new().mirror_output(false));
        assert_eq!(config.min_level, LogLevel::Warn);
        assert!(!config.mirror_output);
    }

    #[test]
    fn empty_patch_is_identity() {
        let mut config = LoggerConfig::default().with_min_level(LogLevel::Error);
        let before = config.clone();
        config.apply(&LoggerConfigPatch::default());
        assert_eq!(config, before);
    }

    #[test]
    fn patch_deserializes_from_partial_json() {
        let patch: Result<LoggerConfigPatch, _> =
            serde_json::from_str(r#"{"minLevel":"DEBUG"}"#).map_err(|e| e.to_string());
        assert_eq!(
            patch,
            Ok(LoggerConfigPatch::new().min_level(LogLevel::Debug))
        );
    }

    #[test]
    fn config_serializes_camel_case() {
        let json = serde_json::to_value(LoggerConfig::default()).map_err(|e| e.to_string());
        assert_eq!(
            json,
            Ok(serde_json::json!({
                "minLevel": "INFO",
                "mirrorOutput": true,
                "includeTimestamps": true
            }))
        );
    }
}
