//! Minimal Notion REST client: list, delete and append block children.
//!
//! Only the three endpoints the sync needs are wrapped. Requests carry the
//! integration token as a bearer header and the configured
//! `Notion-Version`. Batches are sent strictly in order; the first failure
//! aborts the upload and nothing is retried.

use crate::block::{Block, BlockKind};
use crate::config::{SyncConfig, MAX_BATCH_SIZE};
use crate::error::SyncError;
use crate::progress::SyncProgressCallback;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Page size used when listing children (Notion's maximum).
const LIST_PAGE_SIZE: &str = "100";

/// HTTP client bound to one integration token.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChildrenPage {
    results: Vec<BlockRef>,
    #[serde(default)]
    has_more: bool,
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BlockRef {
    id: String,
}

/// Notion's JSON error body.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct AppendRequest<'a> {
    children: &'a [Block],
}

impl NotionClient {
    /// Build a client from the token, version, base URL and timeout in `config`.
    pub fn new(config: &SyncConfig) -> Result<Self, SyncError> {
        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(&format!("Bearer {}", config.token.trim()))
            .map_err(|_| SyncError::InvalidConfig("Token contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, auth);
        let version = HeaderValue::from_str(&config.notion_version).map_err(|_| {
            SyncError::InvalidConfig(format!(
                "Invalid Notion-Version '{}'",
                config.notion_version
            ))
        })?;
        headers.insert(HeaderName::from_static("notion-version"), version);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn children_url(&self, block_id: &str) -> String {
        format!("{}/blocks/{}/children", self.base_url, block_id)
    }

    /// Ids of every direct child of `block_id`, following pagination.
    pub async fn list_children(&self, block_id: &str) -> Result<Vec<String>, SyncError> {
        let mut ids = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .http
                .get(self.children_url(block_id))
                .query(&[("page_size", LIST_PAGE_SIZE)]);
            if let Some(ref c) = cursor {
                request = request.query(&[("start_cursor", c.as_str())]);
            }

            let page: ChildrenPage = check(request.send().await?).await?.json().await?;
            ids.extend(page.results.into_iter().map(|b| b.id));

            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Block {} has {} children", block_id, ids.len());
        Ok(ids)
    }

    /// Archive (delete) one block.
    pub async fn delete_block(&self, block_id: &str) -> Result<(), SyncError> {
        let url = format!("{}/blocks/{}", self.base_url, block_id);
        check(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    /// Delete every child of `page_id`, returning how many were removed.
    ///
    /// Any failure is reported as [`SyncError::ClearFailed`]; blocks deleted
    /// before the failure stay deleted.
    pub async fn clear_page(&self, page_id: &str) -> Result<usize, SyncError> {
        let result = async {
            let ids = self.list_children(page_id).await?;
            for id in &ids {
                self.delete_block(id).await?;
            }
            Ok::<_, SyncError>(ids.len())
        }
        .await;

        match result {
            Ok(n) => {
                info!("Cleared {} existing blocks", n);
                Ok(n)
            }
            Err(e) => Err(SyncError::ClearFailed {
                reason: e.to_string(),
            }),
        }
    }

    /// Append `blocks` to `page_id` in a single call.
    pub async fn append_children(&self, page_id: &str, blocks: &[Block]) -> Result<(), SyncError> {
        let response = self
            .http
            .patch(self.children_url(page_id))
            .json(&AppendRequest { children: blocks })
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Append `blocks` in order, at most `batch_size` per call.
    ///
    /// `batch_size` is clamped to `1..=`[`MAX_BATCH_SIZE`].
    ///
    /// Stops at the first failed batch and returns
    /// [`SyncError::BatchFailed`]. Returns the number of batches sent.
    pub async fn append_blocks(
        &self,
        page_id: &str,
        blocks: &[Block],
        batch_size: usize,
        progress: &dyn SyncProgressCallback,
    ) -> Result<usize, SyncError> {
        let batch_size = batch_size.clamp(1, MAX_BATCH_SIZE);
        let total = blocks.len().div_ceil(batch_size);
        progress.on_upload_start(blocks.len(), total);

        for (i, batch) in blocks.chunks(batch_size).enumerate() {
            let n = i + 1;
            match self.append_children(page_id, batch).await {
                Ok(()) => {
                    info!("Added batch {}/{}", n, total);
                    progress.on_batch_complete(n, total, batch.len());
                }
                Err(e) => {
                    warn!(
                        "Error adding batch {}/{} ({}): {}",
                        n,
                        total,
                        describe_batch(batch),
                        e
                    );
                    if let Ok(json) = serde_json::to_string_pretty(batch) {
                        debug!("Rejected batch {}:\n{}", n, json);
                    }
                    progress.on_batch_error(n, total, &e.to_string());
                    return Err(SyncError::BatchFailed {
                        batch: n,
                        total,
                        source: Box::new(e),
                    });
                }
            }
        }

        Ok(total)
    }
}

/// Block-type tally of a batch, e.g. `"2 paragraph, 1 table"`, in first-seen order.
fn describe_batch(batch: &[Block]) -> String {
    let mut counts: Vec<(BlockKind, usize)> = Vec::new();
    for kind in batch.iter().map(Block::kind) {
        match counts.iter().position(|(k, _)| *k == kind) {
            Some(i) => counts[i].1 += 1,
            None => counts.push((kind, 1)),
        }
    }
    counts
        .iter()
        .map(|(kind, n)| format!("{n} {kind}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Turn a non-success response into [`SyncError::Api`].
async fn check(response: reqwest::Response) -> Result<reqwest::Response, SyncError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
    let (code, message) = match parsed {
        Some(e) => (e.code, e.message),
        None => (String::from("unknown"), body),
    };

    Err(SyncError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::RichText;

    #[test]
    fn client_rejects_invalid_token_characters() {
        let config = SyncConfig::builder()
            .token("bad\ntoken")
            .page_id("p")
            .build()
            .unwrap();
        assert!(matches!(
            NotionClient::new(&config),
            Err(SyncError::InvalidConfig(_))
        ));
    }

    #[test]
    fn append_request_wraps_children() {
        let blocks = [Block::Divider];
        let v = serde_json::to_value(AppendRequest { children: &blocks }).unwrap();
        assert_eq!(v["children"][0]["type"], "divider");
    }

    #[test]
    fn describe_batch_counts_kinds_in_order() {
        let batch = [
            Block::Paragraph {
                spans: vec![RichText::plain("a")],
            },
            Block::Divider,
            Block::Paragraph {
                spans: vec![RichText::plain("b")],
            },
        ];
        assert_eq!(describe_batch(&batch), "2 paragraph, 1 divider");
        assert_eq!(describe_batch(&[]), "");
    }

    #[test]
    fn children_page_defaults() {
        let page: ChildrenPage =
            serde_json::from_str(r#"{"results":[{"id":"a"},{"id":"b"}],"next_cursor":null}"#)
                .unwrap();
        assert_eq!(page.results.len(), 2);
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }
}
