//! # ztmm-logs
//!
//! Session diagnostics for the Zero Trust Maturity Model assessment client.
//!
//! This crate provides:
//!
//! - [`LogEntry`] - Immutable structured log entries
//! - [`LogLevel`] - Severity levels (Error, Warn, Info, Debug)
//! - [`LogStore`] - Bounded in-memory store with level-gated admission
//! - [`LogSink`] - Pluggable mirrored output ([`TracingSink`], [`MemorySink`])
//! - [`LogTransfer`] - Checksummed export and verified, read-only import
//! - [`AutoRefresh`] - Periodic re-query for log viewers
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ztmm_logs::{shared_store, LogFilter, LogLevel, LogTransfer, TracingSink};
//!
//! let store = shared_store(1000);
//! store.add_sink(Arc::new(TracingSink::new()));
//!
//! store.info("Assessment loaded", Some("AssessmentService"));
//! store.error("PDF export failed", Some("ReportExport"));
//!
//! let transfer = LogTransfer::new(store.clone());
//! let filter = LogFilter::new().with_level(LogLevel::Error);
//! if let Ok(json) = transfer.export(Some(&filter)) {
//!     let report = transfer.import(&json);
//!     assert_eq!(report.map(|r| r.total_logs).ok(), Some(1));
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod checksum;
pub mod config;
pub mod error;
pub mod refresh;
pub mod sink;
pub mod store;
pub mod transfer;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types
pub use checksum::{checksum, rolling_hash};
pub use config::{LogStoreConfig, LoggerConfig, LoggerConfigPatch, DEFAULT_CAPACITY};
pub use error::{LogError, Result};
pub use refresh::{AutoRefresh, RefreshSnapshot, DEFAULT_REFRESH_PERIOD, MIN_REFRESH_PERIOD};
pub use sink::{format_entry, BoxedSink, LogSink, MemorySink, NoopSink, TracingSink};
pub use store::{shared_store, LogStore, SharedLogStore};
pub use transfer::{
    canonical_json, export_file_name, verify_import, ExportBundle, ImportReport, LogTransfer,
    EXPORT_FORMAT_VERSION, TRANSFER_CONTEXT,
};
pub use types::{CapturedError, LevelSummary, LogEntry, LogFilter, LogLevel};
