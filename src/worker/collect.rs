use futures::StreamExt;
use tracing::{debug, info, warn};

use crate::core::config::DigestConfig;
use crate::core::models::{MessageRecord, RunMode, Selection};
use crate::errors::DigestError;
use crate::source::{Conversation, MessageSource, UNKNOWN_CONVERSATION};

/// Case-insensitive substring match of a conversation name against a filter.
#[must_use]
pub fn matches_name_filter(name: &str, filter: &str) -> bool {
    name.to_lowercase().contains(&filter.to_lowercase())
}

/// Drain the source into per-conversation buckets, honoring the run limits.
///
/// Conversations are visited in source order until either
/// `config.max_conversations` have been visited or the message limit is
/// reached. In unread mode the message limit is `config.max_messages`; in
/// recent mode it is the smaller of the requested count and
/// `config.max_messages`. Only messages with text are accepted and counted.
///
/// # Errors
///
/// Fails only when the source errors before producing any conversation.
/// Later failures, of the listing or of one conversation's history, are
/// recorded in the returned [`Selection`] and the affected entry is skipped.
pub async fn select(
    source: &dyn MessageSource,
    mode: &RunMode,
    config: &DigestConfig,
) -> Result<Selection, DigestError> {
    let message_limit = match mode {
        RunMode::Unread => config.max_messages,
        RunMode::Recent { limit, .. } => (*limit).min(config.max_messages),
    };

    let mut selection = Selection::default();
    let mut total_messages = 0usize;
    let mut produced_any = false;
    let mut conversations = source.conversations();

    while let Some(item) = conversations.next().await {
        let conversation = match item {
            Ok(conversation) => conversation,
            Err(e) if !produced_any => return Err(e),
            Err(e) => {
                if limits_reached(&selection, config, total_messages, message_limit) {
                    break;
                }
                warn!("Skipping unreadable conversation entry: {}", e);
                selection.mark_visited();
                selection.record_failure(UNKNOWN_CONVERSATION, e.to_string());
                continue;
            }
        };
        produced_any = true;

        if limits_reached(&selection, config, total_messages, message_limit) {
            break;
        }

        let name = conversation.display_name();
        let remaining = message_limit - total_messages;
        let fetch_limit = match mode {
            RunMode::Unread => {
                if conversation.unread_count == 0 {
                    continue;
                }
                (conversation.unread_count as usize)
                    .min(config.unread_cap)
                    .min(remaining)
            }
            RunMode::Recent { name_filter, .. } => {
                if let Some(filter) = name_filter
                    && !matches_name_filter(&name, filter)
                {
                    continue;
                }
                remaining
            }
        };

        selection.mark_visited();
        match fetch_records(source, &conversation, fetch_limit, remaining).await {
            Ok(records) => {
                debug!("Accepted {} messages from '{}'", records.len(), name);
                total_messages += records.len();
                if selection.append(&name, records) {
                    warn!(
                        "Conversation name '{}' is shared by several chats; merging their messages",
                        name
                    );
                }
            }
            Err(e) => {
                warn!("Failed to read messages from '{}': {}", name, e);
                selection.record_failure(&name, e.to_string());
            }
        }
    }

    info!(
        "Selected {} messages in {} conversations ({} visited)",
        selection.total_messages(),
        selection.buckets().len(),
        selection.conversations_visited()
    );
    Ok(selection)
}

fn limits_reached(
    selection: &Selection,
    config: &DigestConfig,
    total_messages: usize,
    message_limit: usize,
) -> bool {
    selection.conversations_visited() >= config.max_conversations
        || total_messages >= message_limit
}

/// Read up to `fetch_limit` messages and keep at most `accept_limit` text
/// messages. A failure part-way discards what was read so far.
async fn fetch_records(
    source: &dyn MessageSource,
    conversation: &Conversation,
    fetch_limit: usize,
    accept_limit: usize,
) -> Result<Vec<MessageRecord>, DigestError> {
    let mut records = Vec::new();
    let mut messages = source.messages(conversation, fetch_limit).take(fetch_limit);

    while let Some(message) = messages.next().await {
        if let Some(record) = message?.into_record() {
            records.push(record);
            if records.len() >= accept_limit {
                break;
            }
        }
    }

    Ok(records)
}
