use crate::core::models::MessageRecord;

/// Max length for the target language (after which we truncate in the prompt)
pub const MAX_LANGUAGE_LEN: usize = 40;

/// Remove control characters and hard-truncate a user-provided value before
/// it is embedded into a prompt.
#[must_use]
pub fn sanitize_prompt_value(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control())
        .take(MAX_LANGUAGE_LEN)
        .collect::<String>()
        .trim()
        .to_string()
}

/// One prompt line per message: `"- sender: body"` or `"- body"`.
#[must_use]
pub fn format_message_line(message: &MessageRecord) -> String {
    format!("- {}", message.formatted())
}

/// The conversation header followed by every message of a batch.
#[must_use]
pub fn format_messages_for_llm(conversation_name: &str, messages: &[MessageRecord]) -> String {
    let mut lines = Vec::with_capacity(messages.len() + 2);
    lines.push(format!("Chat: {conversation_name}"));
    lines.push("Messages:".to_string());
    lines.extend(messages.iter().map(format_message_line));
    lines.join("\n")
}

/// Prompt condensing a single batch into a few bullet points.
#[must_use]
pub fn build_summary_prompt(
    conversation_name: &str,
    messages: &[MessageRecord],
    target_language: &str,
) -> String {
    let language = sanitize_prompt_value(target_language);
    let text = format_messages_for_llm(conversation_name, messages);
    format!(
        "Summarize the following Telegram chat messages in {language}.\n\
         Be concise and focus on key points, action items, and important information.\n\
         Use bullet points. Keep the summary short (3-5 bullet points max).\n\
         \n\
         {text}\n\
         \n\
         Summary:"
    )
}

/// Prompt merging the partial summaries of several batches, in batch order.
#[must_use]
pub fn build_combine_prompt(partial_summaries: &[String], target_language: &str) -> String {
    let language = sanitize_prompt_value(target_language);
    let combined = partial_summaries.join("\n\n");
    format!(
        "Combine these summaries into one concise summary in {language}:\n\
         \n\
         {combined}\n\
         \n\
         Final summary:"
    )
}
