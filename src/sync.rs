//! Sync entry points: read Markdown, convert it, and upload it to a page.
//!
//! ```text
//! file ──read──▶ markdown ──convert──▶ blocks ──clear?──▶ append (batches of N)
//! ```
//!
//! A failed clear is logged and the upload continues; a failed batch aborts
//! the sync.

use crate::block::Block;
use crate::config::SyncConfig;
use crate::convert::{convert_with_observer, decode_utf8};
use crate::error::SyncError;
use crate::notion::NotionClient;
use crate::progress::{LoggingObserver, NoopProgressCallback, SyncProgressCallback};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Summary of a completed sync.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    /// Blocks produced by the conversion and uploaded.
    pub blocks: usize,
    /// Append calls made.
    pub batches: usize,
    /// Existing children deleted, or `None` when clearing was skipped or failed.
    pub cleared: Option<usize>,
    /// Wall-clock duration of the whole sync.
    pub duration_ms: u64,
}

/// Read a Markdown file as UTF-8 text.
pub async fn read_markdown(path: impl AsRef<Path>) -> Result<String, SyncError> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        let path: PathBuf = path.to_path_buf();
        match e.kind() {
            std::io::ErrorKind::NotFound => SyncError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => SyncError::PermissionDenied { path },
            _ => SyncError::ReadFailed { path, source: e },
        }
    })?;
    Ok(decode_utf8(&bytes)?.to_string())
}

/// Read, convert and upload a Markdown file to the configured page.
pub async fn sync_file(
    path: impl AsRef<Path>,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let path = path.as_ref();
    info!("Reading {}", path.display());
    let markdown = read_markdown(path).await?;
    sync_markdown(&markdown, config).await
}

/// Convert and upload Markdown text to the configured page.
pub async fn sync_markdown(markdown: &str, config: &SyncConfig) -> Result<SyncReport, SyncError> {
    let client = NotionClient::new(config)?;
    sync_with_client(&client, markdown, config).await
}

/// [`sync_markdown`] with a caller-supplied client.
pub async fn sync_with_client(
    client: &NotionClient,
    markdown: &str,
    config: &SyncConfig,
) -> Result<SyncReport, SyncError> {
    let start = Instant::now();

    info!("Converting markdown to Notion blocks");
    let blocks: Vec<Block> = convert_with_observer(markdown, &LoggingObserver);
    info!("Generated {} blocks", blocks.len());

    let noop = NoopProgressCallback;
    let progress: &dyn SyncProgressCallback = match config.progress_callback {
        Some(ref cb) => cb.as_ref(),
        None => &noop,
    };

    let cleared = if config.clear_existing {
        info!("Clearing existing content of page {}", config.page_id);
        match client.clear_page(&config.page_id).await {
            Ok(n) => {
                progress.on_clear_complete(n);
                Some(n)
            }
            Err(e) => {
                warn!("{}", e);
                None
            }
        }
    } else {
        debug!("Keeping existing page content");
        None
    };

    info!("Adding {} blocks to page {}", blocks.len(), config.page_id);
    let batches = client
        .append_blocks(&config.page_id, &blocks, config.batch_size, progress)
        .await?;

    let report = SyncReport {
        blocks: blocks.len(),
        batches,
        cleared,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    info!(
        "Synced {} blocks in {} batches ({}ms)",
        report.blocks, report.batches, report.duration_ms
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_missing_file() {
        let err = read_markdown("./definitely-not-here.md").await.unwrap_err();
        assert!(matches!(err, SyncError::FileNotFound { .. }), "got: {err}");
        assert!(err.to_string().contains("definitely-not-here.md"));
    }

    #[tokio::test]
    async fn read_rejects_non_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00]).unwrap();
        let err = read_markdown(file.path()).await.unwrap_err();
        assert!(matches!(err, SyncError::Convert(_)), "got: {err}");
    }

    #[tokio::test]
    async fn read_utf8_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("# Héllo\n".as_bytes()).unwrap();
        assert_eq!(read_markdown(file.path()).await.unwrap(), "# Héllo\n");
    }
}
