//! # md-notion-sync
//!
//! Convert Markdown documents into Notion blocks and sync them to a page.
//!
//! ## Why this crate?
//!
//! Notion's API does not accept Markdown. Content has to be appended as
//! typed block objects (`heading_1`, `paragraph`, `code`, `table`, …) whose
//! rich text is pre-split into styled spans, and the API rejects whole
//! requests for details such as a relative link target or a code span over
//! 2000 characters. This crate does that translation, degrading gracefully
//! instead of failing on Markdown it does not understand.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Split     lines, CRLF tolerated
//!  ├─ 2. Dispatch  classify each line: heading, fence, table, list, quote, rule, paragraph
//!  ├─ 3. Collect   per-kind collectors consume spans of lines
//!  ├─ 4. Inline    bold / italic / code / link spans, links sanitised
//!  └─ 5. Upload    optional clear, then ordered batches of ≤100 blocks
//! ```
//!
//! Steps 1–4 are pure ([`convert`]); step 5 lives in [`sync`] and [`notion`].
//!
//! ## Quick Start
//!
//! ```rust
//! use md_notion_sync::{convert, Block};
//!
//! let blocks = convert("# Title\n\n- one\n- two\n\n```rust\nfn main() {}\n```");
//! assert_eq!(blocks.len(), 4);
//! assert!(matches!(blocks[3], Block::Code { .. }));
//!
//! // Notion wire format
//! let json = serde_json::to_value(&blocks[0]).unwrap();
//! assert_eq!(json["type"], "heading_1");
//! ```
//!
//! Uploading:
//!
//! ```rust,no_run
//! use md_notion_sync::{sync_file, SyncConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SyncConfig::builder()
//!         .token(std::env::var("NOTION_TOKEN")?)
//!         .page_id("https://www.notion.so/My-Page-0123456789abcdef0123456789abcdef")
//!         .build()?;
//!     let report = sync_file("README.md", &config).await?;
//!     eprintln!("{} blocks in {} batches", report.blocks, report.batches);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md-notion-sync` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! ## Supported Markdown
//!
//! | Markdown | Notion block |
//! |----------|--------------|
//! | `#`, `##`, `###` (deeper levels fold into 3) | `heading_1..3` |
//! | fenced code (split past 2000 chars) | `code` |
//! | pipe tables | `table` |
//! | `1.` / `-` `*` `+` items (flat) | `numbered_list_item` / `bulleted_list_item` |
//! | `>` | `quote` |
//! | `---`, `***`, `___` | `divider` |
//! | everything else | `paragraph` |
//!
//! Images, anchor links and relative links are removed; other links that are
//! not absolute web URLs keep only their label.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod block;
pub mod config;
pub mod convert;
pub mod error;
pub mod notion;
pub mod pipeline;
pub mod progress;
pub mod sync;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use block::{Block, BlockKind, HeadingLevel, RichText, Row, Style, Table};
pub use config::{normalize_page_id, SyncConfig, SyncConfigBuilder};
pub use convert::{convert, convert_bytes, convert_with_observer};
pub use error::{ConvertError, SyncError};
pub use notion::NotionClient;
pub use progress::{
    ConversionObserver, LoggingObserver, NoopObserver, NoopProgressCallback, ProgressCallback,
    SyncProgressCallback,
};
pub use sync::{sync_file, sync_markdown, SyncReport};
