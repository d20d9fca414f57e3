use std::future::Future;
use std::time::Instant;

use futures::{StreamExt, TryStreamExt};
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::{collect, summarize};
use crate::ai::TextGenerator;
use crate::core::config::DigestConfig;
use crate::core::models::{ConversationFailure, DigestReport, RunMode};
use crate::errors::DigestError;
use crate::source::{Conversation, MessageSource};

/// How many conversations `--list-chats` shows.
pub const LIST_CONVERSATIONS_LIMIT: usize = 50;

/// Result of a digest run.
#[derive(Debug, Clone, PartialEq)]
pub enum DigestOutcome {
    /// At least one conversation qualified, or the run was interrupted. The
    /// report may hold zero results if every summarization failed.
    Report(DigestReport),
    /// Nothing qualified for summarization.
    NoMessages,
}

/// Select messages and summarize each conversation in turn.
///
/// Conversations are processed strictly one after another in selection order.
/// A failing conversation is reported as a failure and the run moves on.
/// When `shutdown` resolves, the in-flight conversation is dropped and the
/// report is returned with what has been completed so far.
///
/// # Errors
///
/// Returns an error only if the source fails before yielding any conversation.
pub async fn run_digest<F>(
    source: &dyn MessageSource,
    generator: &dyn TextGenerator,
    mode: &RunMode,
    config: &DigestConfig,
    shutdown: F,
) -> Result<DigestOutcome, DigestError>
where
    F: Future<Output = ()>,
{
    let span = info_span!("digest_run", run_id = %Uuid::new_v4(), model = %config.model);
    run_digest_inner(source, generator, mode, config, shutdown)
        .instrument(span)
        .await
}

async fn run_digest_inner<F>(
    source: &dyn MessageSource,
    generator: &dyn TextGenerator,
    mode: &RunMode,
    config: &DigestConfig,
    shutdown: F,
) -> Result<DigestOutcome, DigestError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let selection_started = Instant::now();

    let selection = tokio::select! {
        selection = collect::select(source, mode, config) => selection?,
        () = &mut shutdown => {
            warn!("Interrupted while reading messages");
            return Ok(DigestOutcome::Report(DigestReport {
                results: Vec::new(),
                failures: Vec::new(),
                model: config.model.clone(),
                elapsed: selection_started.elapsed(),
                interrupted: true,
            }));
        }
    };

    if selection.is_empty() {
        info!("No messages found");
        return Ok(DigestOutcome::NoMessages);
    }

    info!(
        "Found {} messages in {} chats",
        selection.total_messages(),
        selection.buckets().len()
    );

    let start = Instant::now();
    let (buckets, mut failures) = selection.into_parts();
    let mut results = Vec::with_capacity(buckets.len());
    let mut interrupted = false;

    for bucket in &buckets {
        let outcome = tokio::select! {
            outcome = summarize::summarize_conversation(generator, config, bucket) => outcome,
            () = &mut shutdown => {
                warn!("Interrupted while summarizing '{}'", bucket.name());
                interrupted = true;
                break;
            }
        };

        match outcome {
            Ok(result) => results.push(result),
            Err(e) => {
                error!("Failed to summarize '{}': {}", bucket.name(), e);
                failures.push(ConversationFailure {
                    conversation_name: bucket.name().to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(DigestOutcome::Report(DigestReport {
        results,
        failures,
        model: config.model.clone(),
        elapsed: start.elapsed(),
        interrupted,
    }))
}

/// The first `limit` conversations, in source order.
///
/// # Errors
///
/// Returns the first error produced by the source.
pub async fn list_conversations(
    source: &dyn MessageSource,
    limit: usize,
) -> Result<Vec<Conversation>, DigestError> {
    source.conversations().take(limit).try_collect().await
}
