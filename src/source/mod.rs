//! Message source abstraction
//!
//! The selector only sees conversations and messages through [`MessageSource`];
//! how they are fetched (network client, local snapshot) is up to the adapter.

pub mod export;

use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::core::models::MessageRecord;
use crate::errors::DigestError;

pub use export::ExportSource;

/// Name used for conversations that expose neither a title nor a first name.
pub const UNKNOWN_CONVERSATION: &str = "Unknown";

/// A chat, group or channel as listed by the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub unread_count: u32,
}

impl Conversation {
    /// First non-empty of title, first name, then `"Unknown"`.
    #[must_use]
    pub fn display_name(&self) -> String {
        first_non_empty([self.title.as_deref(), self.first_name.as_deref()])
            .unwrap_or(UNKNOWN_CONVERSATION)
            .to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl Sender {
    /// First non-empty of display name and handle, else an empty string.
    #[must_use]
    pub fn display_name(&self) -> &str {
        first_non_empty([self.first_name.as_deref(), self.username.as_deref()]).unwrap_or("")
    }
}

/// A raw message. Media-only and service messages carry no `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, rename = "from")]
    pub sender: Option<Sender>,
    pub date: DateTime<Utc>,
}

impl SourceMessage {
    /// Normalize into a [`MessageRecord`]; `None` for messages without text.
    #[must_use]
    pub fn into_record(self) -> Option<MessageRecord> {
        let sender = self
            .sender
            .as_ref()
            .map(Sender::display_name)
            .unwrap_or_default()
            .to_string();
        MessageRecord::new(sender, self.text?, self.date)
    }
}

/// Read-only view of a messaging account.
///
/// Both streams are finite and are consumed at most once.
pub trait MessageSource: Send + Sync {
    /// Conversations in the order the account lists them.
    fn conversations(&self) -> BoxStream<'_, Result<Conversation, DigestError>>;

    /// Up to `limit` messages of `conversation`, in the adapter's delivery order.
    fn messages<'a>(
        &'a self,
        conversation: &'a Conversation,
        limit: usize,
    ) -> BoxStream<'a, Result<SourceMessage, DigestError>>;
}

fn first_non_empty<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates.into_iter().flatten().find(|s| !s.is_empty())
}
