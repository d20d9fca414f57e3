use tracing::{debug, info};

use super::chunk::chunk;
use crate::ai::TextGenerator;
use crate::ai::prompt_builder::{build_combine_prompt, build_summary_prompt};
use crate::core::config::DigestConfig;
use crate::core::models::{ConversationBucket, SummaryResult};
use crate::errors::DigestError;

/// Summarize one conversation.
///
/// Every batch gets its own generation call. A single batch's summary is the
/// final result; with several batches one extra call merges the partial
/// summaries, so a conversation split into `k > 1` batches costs `k + 1`
/// calls.
///
/// # Errors
///
/// Returns the first generation error; partial summaries are discarded.
pub async fn summarize_conversation(
    generator: &dyn TextGenerator,
    config: &DigestConfig,
    bucket: &ConversationBucket,
) -> Result<SummaryResult, DigestError> {
    let batches = chunk(bucket, config.char_budget);
    if batches.is_empty() {
        return Err(DigestError::GenerationError(format!(
            "conversation '{}' has no messages to summarize",
            bucket.name()
        )));
    }

    info!(
        "Summarizing '{}': {} messages in {} batches",
        bucket.name(),
        bucket.len(),
        batches.len()
    );

    let mut summaries = Vec::with_capacity(batches.len());
    for (index, batch) in batches.iter().enumerate() {
        debug!(
            "Batch {}/{} of '{}': {} messages, {} chars",
            index + 1,
            batches.len(),
            bucket.name(),
            batch.len(),
            batch.char_len()
        );
        let prompt = build_summary_prompt(bucket.name(), batch.messages(), &config.target_language);
        summaries.push(generator.generate(&config.model, &prompt).await?);
    }

    let summary_text = if summaries.len() == 1 {
        summaries.remove(0)
    } else {
        let prompt = build_combine_prompt(&summaries, &config.target_language);
        generator.generate(&config.model, &prompt).await?
    };

    Ok(SummaryResult {
        conversation_name: bucket.name().to_string(),
        message_count: bucket.len(),
        summary_text,
    })
}
