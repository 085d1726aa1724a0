//! Checksummed export and verified import of log entries.
//!
//! This module provides:
//! - [`ExportBundle`] - The on-disk export format
//! - [`verify_import`] - Parses a bundle and checks its checksum
//! - [`LogTransfer`] - Store-aware export/import with boundary error capture
//!
//! An import never touches the live store; the verified entries are handed
//! back for display only.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::checksum::checksum;
use crate::error::{LogError, Result};
use crate::store::SharedLogStore;
use crate::types::{iso_millis, CapturedError, LevelSummary, LogEntry, LogFilter, LogLevel};

/// Version string written into every export.
pub const EXPORT_FORMAT_VERSION: &str = "1.0.0";

/// Context label used when a transfer failure is recorded in the store.
pub const TRANSFER_CONTEXT: &str = "LogTransfer";

/// Exported log payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBundle {
    /// When the export was produced
    #[serde(with = "iso_millis")]
    pub export_date: DateTime<Utc>,
    /// Export format version
    pub version: String,
    /// Checksum over the canonical JSON of `logs`
    pub checksum: String,
    /// Number of entries in `logs`
    pub total_logs: usize,
    /// Filter that was active when exporting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<LogFilter>,
    /// Exported entries, oldest first
    pub logs: Vec<LogEntry>,
}

/// Compact JSON of an entry list; the exact text the checksum covers.
///
/// Entries pass through an order-preserving [`serde_json::Value`] so export
/// and import checksum the same rendering.
///
/// # Errors
///
/// Returns an error if an entry fails to serialize.
pub fn canonical_json(entries: &[LogEntry]) -> Result<String> {
    compact_logs(&serde_json::to_value(entries)?)
}

fn compact_logs(logs: &serde_json::Value) -> Result<String> {
    Ok(serde_json::to_string(logs)?)
}

/// Bundle as read from an import, with `logs` kept as written.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedBundle {
    #[serde(with = "iso_millis")]
    export_date: DateTime<Utc>,
    version: String,
    checksum: String,
    total_logs: usize,
    #[serde(default)]
    filters: Option<LogFilter>,
    logs: serde_json::Value,
}

impl ExportBundle {
    /// Builds a bundle stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries fail to serialize.
    pub fn new(logs: Vec<LogEntry>, filters: Option<LogFilter>) -> Result<Self> {
        Self::at(Utc::now(), logs, filters)
    }

    /// Builds a bundle with an explicit export date.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries fail to serialize.
    pub fn at(
        export_date: DateTime<Utc>,
        logs: Vec<LogEntry>,
        filters: Option<LogFilter>,
    ) -> Result<Self> {
        let checksum = checksum(&canonical_json(&logs)?);
        Ok(Self {
            export_date,
            version: EXPORT_FORMAT_VERSION.to_string(),
            checksum,
            total_logs: logs.len(),
            filters: filters.filter(|f| !f.is_empty()),
            logs,
        })
    }

    /// Pretty-printed JSON of the bundle.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Recomputes the checksum over `logs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries fail to serialize.
    pub fn computed_checksum(&self) -> Result<String> {
        Ok(checksum(&canonical_json(&self.logs)?))
    }
}

/// Summary of a successfully verified import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// When the bundle was exported
    pub export_date: DateTime<Utc>,
    /// Format version of the bundle
    pub version: String,
    /// Entry count declared by the bundle
    pub total_logs: usize,
    /// Filter active at export time
    pub filters: Option<LogFilter>,
    /// The imported entries, read-only
    pub entries: Vec<LogEntry>,
    /// Per-level counts of the imported entries
    pub summary: LevelSummary,
}

/// Parses an export bundle and verifies its checksum.
///
/// # Errors
///
/// - [`LogError::MalformedImport`] if `text` is not a bundle
/// - [`LogError::ChecksumMismatch`] if the logs were altered
pub fn verify_import(text: &str) -> Result<ImportReport> {
    let bundle: ImportedBundle =
        serde_json::from_str(text).map_err(|e| LogError::MalformedImport(e.to_string()))?;
    if !bundle.logs.is_array() {
        return Err(LogError::MalformedImport("`logs` is not an array".to_string()));
    }

    let actual = checksum(&compact_logs(&bundle.logs)?);
    if actual != bundle.checksum {
        return Err(LogError::ChecksumMismatch {
            expected: bundle.checksum,
            actual,
        });
    }

    let entries: Vec<LogEntry> = serde_json::from_value(bundle.logs)
        .map_err(|e| LogError::MalformedImport(e.to_string()))?;
    let summary = LevelSummary::from_entries(&entries);
    Ok(ImportReport {
        export_date: bundle.export_date,
        version: bundle.version,
        total_logs: bundle.total_logs,
        filters: bundle.filters,
        entries,
        summary,
    })
}

/// Suggested file name for an export made at `at`.
#[must_use]
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("ztmm-logs-{}.json", at.format("%Y%m%d-%H%M%S"))
}

/// Export/import bound to a live store.
///
/// Unexpected failures are recorded in the store as ERROR entries before
/// being returned; validation failures are only returned.
#[derive(Debug, Clone)]
pub struct LogTransfer {
    store: SharedLogStore,
}

impl LogTransfer {
    /// Creates a transfer helper for `store`.
    #[must_use]
    pub const fn new(store: SharedLogStore) -> Self {
        Self { store }
    }

    /// Builds a bundle from the store, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the entries fail to serialize.
    pub fn bundle(&self, filter: Option<&LogFilter>) -> Result<ExportBundle> {
        let entries = match filter {
            Some(filter) => self.store.query_filtered(filter),
            None => self.store.query(None),
        };
        ExportBundle::new(entries, filter.cloned()).map_err(|e| self.capture("export", e))
    }

    /// Exports the store as bundle JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn export(&self, filter: Option<&LogFilter>) -> Result<String> {
        let bundle = self.bundle(filter)?;
        let json = bundle.to_json().map_err(|e| self.capture("export", e))?;
        debug!(total_logs = bundle.total_logs, checksum = %bundle.checksum, "exported logs");
        Ok(json)
    }

    /// Verifies an import payload.
    ///
    /// # Errors
    ///
    /// Returns the validation error for malformed or tampered payloads.
    pub fn import(&self, text: &str) -> Result<ImportReport> {
        match verify_import(text) {
            Ok(report) => {
                debug!(total_logs = report.total_logs, version = %report.version, "verified log import");
                Ok(report)
            }
            Err(e) if e.is_validation() => {
                warn!(error = %e, "rejected log import");
                Err(e)
            }
            Err(e) => Err(self.capture("import", e)),
        }
    }

    /// Writes an export to `path`, returning the number of entries written.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub async fn export_to_file(
        &self,
        path: impl AsRef<Path>,
        filter: Option<&LogFilter>,
    ) -> Result<usize> {
        let bundle = self.bundle(filter)?;
        let json = bundle.to_json().map_err(|e| self.capture("export", e))?;
        tokio::fs::write(path.as_ref(), json)
            .await
            .map_err(|e| self.capture("export", e.into()))?;
        Ok(bundle.total_logs)
    }

    /// Reads and verifies an export from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the payload is invalid.
    pub async fn import_from_file(&self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let text = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| self.capture("import", e.into()))?;
        self.import(&text)
    }

    fn capture(&self, operation: &str, err: LogError) -> LogError {
        self.store.record(
            LogLevel::Error,
            format!("Log {operation} failed: {err}"),
            Some(TRANSFER_CONTEXT),
            None,
            Some(CapturedError::from_error(&err)),
        );
        err
    }
}
