//! Observer traits for conversion diagnostics and sync progress.
//!
//! Two independent hooks, both with default no-op methods so implementors
//! override only what they need:
//!
//! * [`ConversionObserver`]: receives diagnostics from the pure conversion
//!   engine (for example when a malformed table falls back to a paragraph).
//!   The engine itself never logs; pass [`LoggingObserver`] to route these
//!   events into `tracing`.
//! * [`SyncProgressCallback`]: receives upload events from
//!   [`crate::sync`] so a host application can drive a progress bar.
//!
//! # Example
//!
//! ```rust
//! use md_notion_sync::{convert_with_observer, ConversionObserver};
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! #[derive(Default)]
//! struct CountFallbacks(AtomicUsize);
//!
//! impl ConversionObserver for CountFallbacks {
//!     fn on_table_fallback(&self, _line: usize, _discarded_lines: usize) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let observer = CountFallbacks::default();
//! convert_with_observer("| A | B |\n|---|---|", &observer);
//! assert_eq!(observer.0.load(Ordering::SeqCst), 1);
//! ```

use std::sync::Arc;
use tracing::{debug, warn};

/// Diagnostics emitted while converting one document.
pub trait ConversionObserver {
    /// A run of pipe lines starting at 0-indexed `line` did not form a table.
    ///
    /// Only the first line was kept (as a paragraph); `discarded_lines`
    /// following lines of the run were dropped.
    fn on_table_fallback(&self, line: usize, discarded_lines: usize) {
        let _ = (line, discarded_lines);
    }

    /// Called once when the whole document has been converted.
    fn on_conversion_complete(&self, total_lines: usize, block_count: usize) {
        let _ = (total_lines, block_count);
    }
}

/// Ignores every event. Used by [`crate::convert::convert`].
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Forwards conversion diagnostics to `tracing`.
pub struct LoggingObserver;

impl ConversionObserver for LoggingObserver {
    fn on_table_fallback(&self, line: usize, discarded_lines: usize) {
        warn!(
            "Line {}: pipe lines did not form a table; kept first line as a paragraph, dropped {} line(s)",
            line + 1,
            discarded_lines
        );
    }

    fn on_conversion_complete(&self, total_lines: usize, block_count: usize) {
        debug!("Converted {} lines into {} blocks", total_lines, block_count);
    }
}

/// Called by [`crate::sync`] as it clears a page and appends batches.
///
/// Implementations must be `Send + Sync`; the callback is shared through an
/// `Arc` stored in [`crate::config::SyncConfig`].
pub trait SyncProgressCallback: Send + Sync {
    /// Called after the page's existing children were deleted.
    fn on_clear_complete(&self, deleted: usize) {
        let _ = deleted;
    }

    /// Called once before the first batch is sent.
    ///
    /// # Arguments
    /// * `total_blocks`: blocks that will be uploaded
    /// * `total_batches`: number of append calls that will be made
    fn on_upload_start(&self, total_blocks: usize, total_batches: usize) {
        let _ = (total_blocks, total_batches);
    }

    /// Called when a batch was appended.
    ///
    /// # Arguments
    /// * `batch`: 1-indexed batch number
    /// * `total_batches`: number of batches
    /// * `block_count`: blocks in this batch
    fn on_batch_complete(&self, batch: usize, total_batches: usize, block_count: usize) {
        let _ = (batch, total_batches, block_count);
    }

    /// Called when a batch failed. No further batches are sent.
    fn on_batch_error(&self, batch: usize, total_batches: usize, error: &str) {
        let _ = (batch, total_batches, error);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl SyncProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SyncConfig`].
pub type ProgressCallback = Arc<dyn SyncProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        cleared: AtomicUsize,
        batches: AtomicUsize,
        blocks: AtomicUsize,
        errors: AtomicUsize,
    }

    impl SyncProgressCallback for TrackingCallback {
        fn on_clear_complete(&self, deleted: usize) {
            self.cleared.store(deleted, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, _batch: usize, _total: usize, block_count: usize) {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.blocks.fetch_add(block_count, Ordering::SeqCst);
        }

        fn on_batch_error(&self, _batch: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callbacks_do_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_clear_complete(3);
        cb.on_upload_start(120, 3);
        cb.on_batch_complete(1, 3, 50);
        cb.on_batch_error(2, 3, "boom");

        let observer = NoopObserver;
        observer.on_table_fallback(4, 2);
        observer.on_conversion_complete(10, 3);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_clear_complete(7);
        tracker.on_batch_complete(1, 3, 50);
        tracker.on_batch_complete(2, 3, 50);
        tracker.on_batch_error(3, 3, "HTTP 400");

        assert_eq!(tracker.cleared.load(Ordering::SeqCst), 7);
        assert_eq!(tracker.batches.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.blocks.load(Ordering::SeqCst), 100);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_upload_start(10, 1);
        cb.on_batch_complete(1, 1, 10);
    }
}
