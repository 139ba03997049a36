//! CLI binary for md-notion-sync.
//!
//! A thin shim over the library crate that maps CLI flags to `SyncConfig`
//! and prints results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use md_notion_sync::{
    convert_with_observer, sync_file, LoggingObserver, ProgressCallback, SyncConfig,
    SyncProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar advancing per appended batch.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Contacting Notion…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl SyncProgressCallback for CliProgressCallback {
    fn on_clear_complete(&self, deleted: usize) {
        self.bar.println(format!(
            "  {} Cleared {} existing block(s)",
            green("✓"),
            deleted
        ));
    }

    fn on_upload_start(&self, total_blocks: usize, total_batches: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} batches  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        if total_batches == 0 {
            self.bar.finish_and_clear();
            return;
        }
        self.bar.set_length(total_batches as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!("{total_blocks} blocks"));
    }

    fn on_batch_complete(&self, batch: usize, total_batches: usize, _block_count: usize) {
        self.bar.inc(1);
        if batch == total_batches {
            self.bar.finish_and_clear();
        }
    }

    fn on_batch_error(&self, batch: usize, total_batches: usize, error: &str) {
        let msg = if error.chars().count() > 80 {
            format!("{}\u{2026}", error.chars().take(79).collect::<String>())
        } else {
            error.to_string()
        };
        self.bar.println(format!(
            "  {} Batch {}/{}  {}",
            red("✗"),
            batch,
            total_batches,
            red(&msg)
        ));
        self.bar.abandon();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Replace the content of a page with README.md
  md-notion-sync sync -f README.md -p 0123456789abcdef0123456789abcdef

  # Append without clearing, token from the command line
  md-notion-sync sync -f notes.md -p <page-url> -t secret_... --no-clear

  # Show the Notion blocks without uploading
  md-notion-sync convert -f README.md --pretty

  # Write a sample .env file
  md-notion-sync init

ENVIRONMENT VARIABLES:
  NOTION_TOKEN            Notion integration token
  NOTION_PAGE_ID          Default target page for `sync`
  RUST_LOG                Override log filtering (e.g. md_notion_sync=debug)
"#;

const ENV_TEMPLATE: &str = r#"# Notion API Configuration
# md-notion-sync reads this file from the current directory on startup.
# Variables already set in the environment take precedence.
NOTION_TOKEN=your_notion_token_here

# Optional default target page
# NOTION_PAGE_ID=your_page_id_here

# Example usage:
#   md-notion-sync sync -f README.md -p your_page_id_here
"#;

/// Sync Markdown files to Notion pages with proper formatting.
#[derive(Parser, Debug)]
#[command(
    name = "md-notion-sync",
    version,
    about = "Sync Markdown files to Notion pages with proper formatting",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "MD_NOTION_SYNC_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "MD_NOTION_SYNC_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sync a Markdown file to a Notion page.
    Sync {
        /// Path to the Markdown file.
        #[arg(short, long)]
        file: PathBuf,

        /// Notion page id or page URL.
        #[arg(short, long, env = "NOTION_PAGE_ID")]
        page_id: String,

        /// Notion API token.
        #[arg(short, long, env = "NOTION_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Do not clear existing content before syncing.
        #[arg(long)]
        no_clear: bool,

        /// Blocks per append request (1–100).
        #[arg(long, default_value_t = 50,
              value_parser = clap::value_parser!(u16).range(1..=100))]
        batch_size: u16,

        /// Per-request timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Disable progress bar.
        #[arg(long)]
        no_progress: bool,
    },

    /// Print the Notion blocks for a Markdown file as JSON, without uploading.
    Convert {
        /// Path to the Markdown file.
        #[arg(short, long)]
        file: PathBuf,

        /// Pretty-print the JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// Create a sample .env configuration file.
    Init {
        /// Overwrite an existing .env file.
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is not an error; flags and the real environment still apply.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Sync {
            file,
            page_id,
            token,
            no_clear,
            batch_size,
            timeout,
            no_progress,
        } => {
            let Some(token) = token.filter(|t| !t.trim().is_empty()) else {
                bail!(
                    "Notion token is required. Provide it via --token flag or NOTION_TOKEN environment variable."
                );
            };

            let show_progress = !cli.quiet && !no_progress && !cli.verbose;
            let progress: Option<ProgressCallback> = if show_progress {
                Some(CliProgressCallback::new() as ProgressCallback)
            } else {
                None
            };

            let mut builder = SyncConfig::builder()
                .token(token)
                .page_id(&page_id)
                .clear_existing(!no_clear)
                .batch_size(batch_size as usize)
                .timeout_secs(timeout);
            if let Some(cb) = progress {
                builder = builder.progress_callback(cb);
            }
            let config = builder.build().context("Invalid configuration")?;

            let report = sync_file(&file, &config).await.context("Sync failed")?;

            if !cli.quiet {
                if let Some(n) = report.cleared.filter(|_| !show_progress) {
                    eprintln!("Cleared {n} existing block(s)");
                }
                eprintln!(
                    "{} {} blocks in {} batch(es)  {}  →  {}",
                    green("✔"),
                    bold(&report.blocks.to_string()),
                    report.batches,
                    dim(&format!("{}ms", report.duration_ms)),
                    bold(&config.page_id),
                );
            }
        }

        Command::Convert { file, pretty } => {
            let markdown = md_notion_sync::sync::read_markdown(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let blocks = convert_with_observer(&markdown, &LoggingObserver);

            let json = if pretty {
                serde_json::to_string_pretty(&blocks)
            } else {
                serde_json::to_string(&blocks)
            }
            .context("Failed to serialise blocks")?;

            let stdout = io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{json}").context("Failed to write to stdout")?;

            if !cli.quiet {
                eprintln!("Generated {} blocks", blocks.len());
            }
        }

        Command::Init { force } => {
            write_env_template(Path::new(".env"), force)?;
            if !cli.quiet {
                eprintln!("{} Created .env configuration file", green("✔"));
                eprintln!("  Edit .env and add your Notion token");
            }
        }
    }

    Ok(())
}

/// Write the sample `.env`, refusing to clobber an existing file unless forced.
fn write_env_template(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; pass --force to overwrite it",
            path.display()
        );
    }
    std::fs::write(path, ENV_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))
}
