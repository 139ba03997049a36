//! Configuration for syncing Markdown into a Notion page.
//!
//! All sync behaviour is controlled through [`SyncConfig`], built via its
//! [`SyncConfigBuilder`]. The conversion engine itself takes no
//! configuration; everything here concerns the Notion API.

use crate::error::SyncError;
use crate::progress::ProgressCallback;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Default Notion REST endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.notion.com/v1";

/// `Notion-Version` header sent with every request.
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Blocks per append call. Notion accepts up to [`MAX_BATCH_SIZE`].
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Notion's per-request limit on appended children.
pub const MAX_BATCH_SIZE: usize = 100;

/// Configuration for a Markdown-to-Notion sync.
///
/// # Example
/// ```rust
/// use md_notion_sync::SyncConfig;
///
/// let config = SyncConfig::builder()
///     .token("secret_abc")
///     .page_id("0123456789abcdef0123456789abcdef")
///     .clear_existing(false)
///     .batch_size(25)
///     .build()
///     .unwrap();
/// assert_eq!(config.batch_size, 25);
/// ```
#[derive(Clone)]
pub struct SyncConfig {
    /// Notion integration token.
    pub token: String,

    /// Target page id, normalised to Notion's dashed UUID form when possible.
    pub page_id: String,

    /// Delete the page's existing children before appending. Default: true.
    pub clear_existing: bool,

    /// Blocks per append call, 1–100. Default: 50.
    pub batch_size: usize,

    /// Base URL of the Notion API. Default: [`DEFAULT_API_BASE_URL`].
    pub api_base_url: String,

    /// Value of the `Notion-Version` header. Default: [`DEFAULT_NOTION_VERSION`].
    pub notion_version: String,

    /// Per-request timeout in seconds. Default: 30.
    pub timeout_secs: u64,

    /// Optional upload progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            page_id: String::new(),
            clear_existing: true,
            batch_size: DEFAULT_BATCH_SIZE,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            timeout_secs: 30,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("token", &"<redacted>")
            .field("page_id", &self.page_id)
            .field("clear_existing", &self.clear_existing)
            .field("batch_size", &self.batch_size)
            .field("api_base_url", &self.api_base_url)
            .field("notion_version", &self.notion_version)
            .field("timeout_secs", &self.timeout_secs)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn SyncProgressCallback>"),
            )
            .finish()
    }
}

impl SyncConfig {
    /// Create a new builder for `SyncConfig`.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SyncConfig`].
#[derive(Debug)]
pub struct SyncConfigBuilder {
    config: SyncConfig,
}

impl SyncConfigBuilder {
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    /// Accepts a bare id, a dashed UUID, or a full Notion page URL.
    pub fn page_id(mut self, page_id: impl AsRef<str>) -> Self {
        self.config.page_id = normalize_page_id(page_id.as_ref());
        self
    }

    pub fn clear_existing(mut self, v: bool) -> Self {
        self.config.clear_existing = v;
        self
    }

    pub fn batch_size(mut self, n: usize) -> Self {
        self.config.batch_size = n.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn notion_version(mut self, version: impl Into<String>) -> Self {
        self.config.notion_version = version.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SyncConfig, SyncError> {
        let c = &self.config;
        if c.token.trim().is_empty() {
            return Err(SyncError::MissingToken);
        }
        if c.page_id.trim().is_empty() {
            return Err(SyncError::InvalidConfig("Page id must not be empty".into()));
        }
        if c.batch_size == 0 || c.batch_size > MAX_BATCH_SIZE {
            return Err(SyncError::InvalidConfig(format!(
                "Batch size must be 1–{MAX_BATCH_SIZE}, got {}",
                c.batch_size
            )));
        }
        if url::Url::parse(&c.api_base_url).is_err() {
            return Err(SyncError::InvalidConfig(format!(
                "API base URL is not a valid URL: '{}'",
                c.api_base_url
            )));
        }
        Ok(self.config)
    }
}

static RE_PAGE_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9a-fA-F]{8})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{4})-?([0-9a-fA-F]{12})(?:[^0-9a-fA-F]|$)")
        .unwrap()
});

/// Extract a Notion page id from a bare id, a dashed UUID or a page URL.
///
/// The last 32-hex-digit group in the input wins (page URLs end with the id,
/// optionally followed by a query string). Returns the dashed lowercase form,
/// or the trimmed input unchanged when no id is found.
pub fn normalize_page_id(input: &str) -> String {
    let trimmed = input.trim();
    let path = trimmed.split(['?', '#']).next().unwrap_or(trimmed);
    match RE_PAGE_ID.captures_iter(path).last() {
        Some(caps) => format!(
            "{}-{}-{}-{}-{}",
            &caps[1], &caps[2], &caps[3], &caps[4], &caps[5]
        )
        .to_lowercase(),
        None => trimmed.to_string(),
    }
}
