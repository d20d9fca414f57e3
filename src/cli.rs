use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::core::config::DigestOverrides;
use crate::core::models::RunMode;

const EXAMPLES: &str = "\
Examples:
  tg-digest --unread                     Summarize unread (top 5 chats)
  tg-digest --unread --max-chats 20      Summarize more chats
  tg-digest --last 100                   Summarize last 100 messages
  tg-digest --chat \"Work\" --last 50      Summarize specific chat
  tg-digest --unread --model mistral     Use different model
  tg-digest --list-chats                 List available chats";

/// Summarize Telegram messages using a local LLM.
#[derive(Debug, Parser)]
#[command(name = "tg-digest", version, about, after_help = EXAMPLES)]
#[command(group(
    ArgGroup::new("mode")
        .required(true)
        .args(["unread", "last", "list_chats"]),
))]
pub struct Cli {
    /// Summarize unread messages
    #[arg(long)]
    pub unread: bool,

    /// Summarize the last N messages
    #[arg(long, value_name = "N", value_parser = parse_positive)]
    pub last: Option<usize>,

    /// Filter by chat name (partial match, case-insensitive)
    #[arg(long, value_name = "NAME", requires = "last")]
    pub chat: Option<String>,

    /// List available chats and exit
    #[arg(long)]
    pub list_chats: bool,

    /// Ollama model to use [env: OLLAMA_MODEL, default: llama3.2]
    #[arg(long)]
    pub model: Option<String>,

    /// Max number of chats to process [default: 5]
    #[arg(long, value_name = "N")]
    pub max_chats: Option<usize>,

    /// Max total messages to summarize [default: 100]
    #[arg(long, value_name = "N")]
    pub max_messages: Option<usize>,

    /// Character budget per model request [default: 6000]
    #[arg(long, value_name = "CHARS", value_parser = parse_positive)]
    pub char_budget: Option<usize>,

    /// Language of the summaries [default: Russian]
    #[arg(long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Account snapshot to read messages from
    #[arg(long, value_name = "PATH", env = "TG_DIGEST_EXPORT")]
    pub export: Option<PathBuf>,

    /// Ollama server URL
    #[arg(long, value_name = "URL")]
    pub ollama_host: Option<String>,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// `None` for `--list-chats`, which does not summarize anything.
    #[must_use]
    pub fn run_mode(&self) -> Option<RunMode> {
        if self.unread {
            Some(RunMode::Unread)
        } else {
            self.last.map(|limit| RunMode::Recent {
                limit,
                name_filter: self.chat.clone(),
            })
        }
    }

    #[must_use]
    pub fn overrides(&self) -> DigestOverrides {
        DigestOverrides {
            model: self.model.clone(),
            char_budget: self.char_budget,
            max_conversations: self.max_chats,
            max_messages: self.max_messages,
            target_language: self.language.clone(),
        }
    }
}

fn parse_positive(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(value) => Ok(value),
        Err(e) => Err(e.to_string()),
    }
}
