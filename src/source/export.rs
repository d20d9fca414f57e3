//! Message source backed by a JSON snapshot of the account
//!
//! Snapshot layout:
//!
//! ```json
//! { "chats": [ { "id": 1, "title": "Work", "unread_count": 2,
//!                "messages": [ { "text": "hi", "from": { "first_name": "Ann" },
//!                                "date": "2024-05-01T10:00:00Z" } ] } ] }
//! ```
//!
//! Messages are stored newest first, the same order a history request returns.

use std::path::Path;

use futures::StreamExt;
use futures::stream::{self, BoxStream};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Conversation, MessageSource, SourceMessage};
use crate::errors::DigestError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub chats: Vec<ExportedChat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedChat {
    #[serde(flatten)]
    pub conversation: Conversation,
    #[serde(default)]
    pub messages: Vec<SourceMessage>,
}

pub struct ExportSource {
    snapshot: Snapshot,
}

impl ExportSource {
    #[must_use]
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from disk.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the file does not exist, `SourceError` when it
    /// cannot be read and `ParseError` when it is not a valid snapshot.
    pub async fn open(path: &Path) -> Result<Self, DigestError> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Err(DigestError::ConfigError(format!(
                "account snapshot not found at {}. Export your chats there or set TG_DIGEST_EXPORT",
                path.display()
            )));
        }

        let raw = tokio::fs::read_to_string(path).await?;
        let snapshot: Snapshot = serde_json::from_str(&raw)?;
        info!(
            "Loaded snapshot {} with {} conversations",
            path.display(),
            snapshot.chats.len()
        );
        Ok(Self::from_snapshot(snapshot))
    }
}

impl MessageSource for ExportSource {
    fn conversations(&self) -> BoxStream<'_, Result<Conversation, DigestError>> {
        stream::iter(
            self.snapshot
                .chats
                .iter()
                .map(|chat| Ok(chat.conversation.clone())),
        )
        .boxed()
    }

    fn messages<'a>(
        &'a self,
        conversation: &'a Conversation,
        limit: usize,
    ) -> BoxStream<'a, Result<SourceMessage, DigestError>> {
        let Some(chat) = self
            .snapshot
            .chats
            .iter()
            .find(|chat| chat.conversation.id == conversation.id)
        else {
            return stream::once(async move {
                Err(DigestError::SourceError(format!(
                    "conversation {} not found in snapshot",
                    conversation.id
                )))
            })
            .boxed();
        };

        debug!(
            "Reading up to {} messages from conversation {}",
            limit, conversation.id
        );
        stream::iter(chat.messages.iter().take(limit).cloned().map(Ok)).boxed()
    }
}
