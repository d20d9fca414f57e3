//! TG Digest - summarizes Telegram conversations with a local LLM.
//!
//! A run reads a bounded set of messages from an account, groups them by
//! conversation, splits each conversation into batches that fit the model's
//! context, and condenses every conversation into a short digest.
//!
//! # Architecture
//!
//! The pipeline is strictly sequential:
//! - `worker::collect` selects messages from a `source::MessageSource`
//! - `worker::chunk` partitions each conversation by character budget
//! - `worker::summarize` summarizes batches and merges partial summaries
//! - `worker::deliver` renders the report
//!
//! Generation goes through `ai::TextGenerator`, implemented by the
//! Ollama client.
//!
//! # Example
//!
//! ```no_run
//! use tg_digest::ai::OllamaClient;
//! use tg_digest::core::config::DigestConfig;
//! use tg_digest::core::models::RunMode;
//! use tg_digest::source::ExportSource;
//! use tg_digest::worker::{DigestOutcome, deliver, run_digest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     tg_digest::setup_logging(false);
//!
//!     let source = ExportSource::open(std::path::Path::new("export.json")).await?;
//!     let client = OllamaClient::new("http://localhost:11434".to_string(), None)?;
//!     let config = DigestConfig::default();
//!
//!     let outcome = run_digest(
//!         &source,
//!         &client,
//!         &RunMode::Unread,
//!         &config,
//!         std::future::pending(),
//!     )
//!     .await?;
//!
//!     match outcome {
//!         DigestOutcome::Report(report) => print!("{}", deliver::render_report(&report)),
//!         DigestOutcome::NoMessages => println!("{}", deliver::NO_MESSAGES_TEXT),
//!     }
//!     Ok(())
//! }
//! ```

pub mod ai;
pub mod cli;
pub mod core;
pub mod errors;
pub mod source;
pub mod worker;

pub use errors::DigestError;

/// Configure structured logging on stderr.
///
/// The level comes from `RUST_LOG` when set, otherwise `info` with `verbose`
/// and `warn` without. `LOG_FORMAT=json` switches to JSON lines. Calling it
/// again after a subscriber is installed is a no-op.
///
/// # Example
///
/// ```
/// tg_digest::setup_logging(false);
/// ```
pub fn setup_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).try_init()
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        registry.with(fmt_layer).try_init()
    };
}
