//! Error types for the log store and its export/import protocol.

use thiserror::Error;

/// Errors that can occur while exporting or importing logs.
///
/// Recording, querying and clearing never fail; only the transfer paths
/// and level parsing produce these.
#[derive(Debug, Error)]
pub enum LogError {
    /// The import payload could not be parsed as an export bundle.
    #[error("malformed import: {0}")]
    MalformedImport(String),

    /// The recomputed checksum does not match the one stored in the bundle.
    #[error("checksum mismatch: expected {expected}, computed {actual}")]
    ChecksumMismatch {
        /// Checksum carried by the bundle.
        expected: String,
        /// Checksum recomputed over the bundle's logs.
        actual: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A level name could not be parsed.
    #[error("invalid log level: {0}")]
    InvalidLevel(String),
}

impl LogError {
    /// Returns true for failures caused by the imported data itself
    /// (unparsable or tampered), as opposed to unexpected runtime failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MalformedImport(_) | Self::ChecksumMismatch { .. })
    }
}

/// Result type alias for log operations.
pub type Result<T> = std::result::Result<T, LogError>;
