//! Error types for the md-notion-sync library.
//!
//! Two distinct error types reflect two distinct layers:
//!
//! * [`ConvertError`]: the conversion engine is fail-soft on malformed
//!   Markdown and only rejects input that is not text at all.
//! * [`SyncError`]: **Fatal** errors of the sync layer: the file cannot be
//!   read, the configuration is incomplete, or the Notion API rejected a
//!   request. Returned from [`crate::sync`] and [`crate::notion`].

use std::path::PathBuf;
use thiserror::Error;

/// Precondition violations of the conversion engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// The input could not be interpreted as the expected kind of data.
    #[error("Invalid input: expected {expected}, {detail}")]
    InvalidInput {
        expected: &'static str,
        detail: String,
    },
}

/// All fatal errors returned by the sync layer.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Markdown file was not found at the given path.
    #[error("File not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Any other read failure.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but is not valid Markdown text.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    // ── Config errors ─────────────────────────────────────────────────────
    /// No integration token was supplied.
    #[error(
        "Notion token is required.\n\
Provide it via --token or the NOTION_TOKEN environment variable."
    )]
    MissingToken,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Notion API errors ─────────────────────────────────────────────────
    /// The request never produced an HTTP response (DNS, TLS, timeout…).
    #[error("HTTP request failed: {reason}")]
    Http { reason: String },

    /// Notion answered with a non-success status.
    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// Appending one batch of blocks failed; later batches were not sent.
    #[error("Failed to append batch {batch}/{total}: {source}")]
    BatchFailed {
        batch: usize,
        total: usize,
        #[source]
        source: Box<SyncError>,
    },

    /// Existing page content could not be removed.
    #[error("Could not clear existing content: {reason}")]
    ClearFailed { reason: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Http {
            reason: e.to_string(),
        }
    }
}
