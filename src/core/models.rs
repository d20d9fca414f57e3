use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Display name of a conversation. Used both as the grouping key and as the
/// target of the name filter.
pub type ConversationName = String;

/// A normalized text message. Records without text never get constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageRecord {
    sender: String,
    body: String,
    timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Returns `None` when `body` is empty.
    #[must_use]
    pub fn new(sender: impl Into<String>, body: impl Into<String>, timestamp: DateTime<Utc>) -> Option<Self> {
        let body = body.into();
        if body.is_empty() {
            return None;
        }
        Some(Self {
            sender: sender.into(),
            body,
            timestamp,
        })
    }

    #[must_use]
    pub fn sender(&self) -> &str {
        &self.sender
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// `"sender: body"`, or just `"body"` for an anonymous sender.
    #[must_use]
    pub fn formatted(&self) -> String {
        if self.sender.is_empty() {
            self.body.clone()
        } else {
            format!("{}: {}", self.sender, self.body)
        }
    }

    /// Length of [`Self::formatted`] in characters.
    #[must_use]
    pub fn formatted_len(&self) -> usize {
        let body_len = self.body.chars().count();
        if self.sender.is_empty() {
            body_len
        } else {
            self.sender.chars().count() + 2 + body_len
        }
    }
}

/// Messages of one conversation in source-delivery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationBucket {
    name: ConversationName,
    messages: Vec<MessageRecord>,
}

impl ConversationBucket {
    #[must_use]
    pub fn new(name: impl Into<ConversationName>, messages: Vec<MessageRecord>) -> Self {
        Self {
            name: name.into(),
            messages,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn messages(&self) -> &[MessageRecord] {
        &self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub(crate) fn extend(&mut self, records: Vec<MessageRecord>) {
        self.messages.extend(records);
    }
}

/// A contiguous run of a bucket's messages that fits the character budget
/// (or a single oversized message).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    messages: &'a [MessageRecord],
}

impl<'a> Batch<'a> {
    pub(crate) fn new(messages: &'a [MessageRecord]) -> Self {
        Self { messages }
    }

    #[must_use]
    pub fn messages(&self) -> &'a [MessageRecord] {
        self.messages
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Sum of the formatted lengths of every message in the batch.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.messages.iter().map(MessageRecord::formatted_len).sum()
    }
}

/// Final digest for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResult {
    pub conversation_name: ConversationName,
    pub message_count: usize,
    pub summary_text: String,
}

/// A conversation that was dropped from the run, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationFailure {
    pub conversation_name: ConversationName,
    pub reason: String,
}

/// Which conversations the selector drains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Conversations with at least one unread message.
    Unread,
    /// The last `limit` messages, optionally restricted to conversations
    /// whose name contains `name_filter` (case-insensitive).
    Recent {
        limit: usize,
        name_filter: Option<String>,
    },
}

/// Output of the selector: buckets in the order their conversations were
/// first delivered by the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    buckets: Vec<ConversationBucket>,
    failures: Vec<ConversationFailure>,
    conversations_visited: usize,
}

impl Selection {
    #[must_use]
    pub fn buckets(&self) -> &[ConversationBucket] {
        &self.buckets
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<ConversationBucket>, Vec<ConversationFailure>) {
        (self.buckets, self.failures)
    }

    #[must_use]
    pub fn failures(&self) -> &[ConversationFailure] {
        &self.failures
    }

    #[must_use]
    pub fn conversations_visited(&self) -> usize {
        self.conversations_visited
    }

    #[must_use]
    pub fn total_messages(&self) -> usize {
        self.buckets.iter().map(ConversationBucket::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ConversationBucket> {
        self.buckets.iter().find(|b| b.name() == name)
    }

    pub(crate) fn mark_visited(&mut self) {
        self.conversations_visited += 1;
    }

    /// Append accepted records under `name`. Two conversations sharing a
    /// display name end up in one bucket, positioned where the name first
    /// appeared.
    pub(crate) fn append(&mut self, name: &str, records: Vec<MessageRecord>) -> bool {
        if records.is_empty() {
            return false;
        }
        if let Some(bucket) = self.buckets.iter_mut().find(|b| b.name() == name) {
            bucket.extend(records);
            return true;
        }
        self.buckets.push(ConversationBucket::new(name, records));
        false
    }

    pub(crate) fn record_failure(&mut self, name: &str, reason: String) {
        self.failures.push(ConversationFailure {
            conversation_name: name.to_string(),
            reason,
        });
    }
}

/// Everything the reporter needs to render a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DigestReport {
    pub results: Vec<SummaryResult>,
    pub failures: Vec<ConversationFailure>,
    pub model: String,
    pub elapsed: Duration,
    pub interrupted: bool,
}

impl DigestReport {
    #[must_use]
    pub fn total_messages(&self) -> usize {
        self.results.iter().map(|r| r.message_count).sum()
    }
}
