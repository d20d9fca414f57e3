use crate::core::models::{Batch, ConversationBucket, MessageRecord};

/// Split a bucket into batches that fit the model context.
#[must_use]
pub fn chunk(bucket: &ConversationBucket, char_budget: usize) -> Vec<Batch<'_>> {
    chunk_messages(bucket.messages(), char_budget)
}

/// Greedy left-to-right partition over the formatted message lengths.
///
/// A batch is closed when the next message would push it past
/// `char_budget`, unless the batch is still empty: an oversized message
/// always forms a batch of its own. Concatenating the returned batches gives
/// back `messages` unchanged; an empty input gives no batches.
#[must_use]
pub fn chunk_messages(messages: &[MessageRecord], char_budget: usize) -> Vec<Batch<'_>> {
    let mut batches = Vec::new();
    let mut start = 0;
    let mut current_size = 0;

    for (index, message) in messages.iter().enumerate() {
        let size = message.formatted_len();
        if current_size + size > char_budget && index > start {
            batches.push(Batch::new(&messages[start..index]));
            start = index;
            current_size = 0;
        }
        current_size += size;
    }

    if start < messages.len() {
        batches.push(Batch::new(&messages[start..]));
    }

    batches
}
