#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tg_digest::ai::TextGenerator;
use tg_digest::core::models::MessageRecord;
use tg_digest::errors::DigestError;
use tg_digest::source::export::{ExportedChat, Snapshot};
use tg_digest::source::{Conversation, ExportSource, MessageSource, Sender, SourceMessage};

pub fn record(sender: &str, body: &str) -> MessageRecord {
    MessageRecord::new(sender, body, Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()).unwrap()
}

/// An anonymous record whose formatted length is exactly `len`.
pub fn sized_record(len: usize) -> MessageRecord {
    record("", &"x".repeat(len))
}

pub fn text_message(sender: &str, text: &str) -> SourceMessage {
    SourceMessage {
        text: Some(text.to_string()),
        sender: Some(Sender {
            first_name: Some(sender.to_string()),
            username: None,
        }),
        date: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

pub fn media_message() -> SourceMessage {
    SourceMessage {
        text: None,
        sender: None,
        date: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
    }
}

pub fn chat(id: i64, title: &str, unread_count: u32, messages: Vec<SourceMessage>) -> ExportedChat {
    ExportedChat {
        conversation: Conversation {
            id,
            title: Some(title.to_string()),
            first_name: None,
            unread_count,
        },
        messages,
    }
}

/// `count` text messages named `"{prefix} {n}"`.
pub fn texts(prefix: &str, count: usize) -> Vec<SourceMessage> {
    (0..count)
        .map(|n| text_message("Ann", &format!("{prefix} {n}")))
        .collect()
}

pub fn source(chats: Vec<ExportedChat>) -> ExportSource {
    ExportSource::from_snapshot(Snapshot { chats })
}

/// Generator that records every prompt and answers `"summary #n"` for the
/// n-th call. Prompts containing `fail_on` fail instead.
#[derive(Default)]
pub struct FakeGenerator {
    prompts: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(needle: &str) -> Self {
        Self {
            prompts: Mutex::new(Vec::new()),
            fail_on: Some(needle.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, _model: &str, prompt: &str) -> Result<String, DigestError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };
        if let Some(needle) = &self.fail_on
            && prompt.contains(needle.as_str())
        {
            return Err(DigestError::BackendUnavailable("connection refused".to_string()));
        }
        Ok(format!("summary #{call}"))
    }
}

/// Wraps an [`ExportSource`] and injects failures.
pub struct FaultySource {
    pub inner: ExportSource,
    /// Fail the conversation listing before anything is produced.
    pub fail_listing: bool,
    /// Yield a listing error after this many conversations, then carry on.
    pub fail_listing_after: Option<usize>,
    /// Fail history reads of this conversation after one message.
    pub fail_history_of: Option<i64>,
}

impl MessageSource for FaultySource {
    fn conversations(&self) -> BoxStream<'_, Result<Conversation, DigestError>> {
        if self.fail_listing {
            return stream::once(async {
                Err(DigestError::SourceError("session expired".to_string()))
            })
            .boxed();
        }
        if let Some(after) = self.fail_listing_after {
            return self
                .inner
                .conversations()
                .enumerate()
                .flat_map(move |(index, item)| {
                    let items = if index == after {
                        vec![
                            Err(DigestError::SourceError("dialog list interrupted".to_string())),
                            item,
                        ]
                    } else {
                        vec![item]
                    };
                    stream::iter(items)
                })
                .boxed();
        }
        self.inner.conversations()
    }

    fn messages<'a>(
        &'a self,
        conversation: &'a Conversation,
        limit: usize,
    ) -> BoxStream<'a, Result<SourceMessage, DigestError>> {
        if self.fail_history_of == Some(conversation.id) {
            return self
                .inner
                .messages(conversation, 1)
                .chain(stream::once(async {
                    Err(DigestError::SourceError("history unavailable".to_string()))
                }))
                .boxed();
        }
        self.inner.messages(conversation, limit)
    }
}
