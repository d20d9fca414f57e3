use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::errors::DigestError;

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.2";
pub const DEFAULT_LANGUAGE: &str = "Russian";
/// Safe limit for most local models (~1500 tokens).
pub const DEFAULT_CHAR_BUDGET: usize = 6000;
pub const DEFAULT_MAX_CONVERSATIONS: usize = 5;
pub const DEFAULT_MAX_MESSAGES: usize = 100;
/// Per-conversation retrieval ceiling in unread mode.
pub const DEFAULT_UNREAD_CAP: usize = 50;

const CONFIG_DIR_NAME: &str = "tg-digest";
const EXPORT_FILE_NAME: &str = "export.json";

/// Directory holding the `.env` file and the account snapshot.
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_DIR_NAME)
}

/// Load `.env` files: the per-user one first, then the working directory.
/// Values already present in the process environment are never overridden.
pub fn load_dotenv() {
    let _ = dotenvy::from_path(config_dir().join(".env"));
    let _ = dotenvy::dotenv();
}

/// Environment-derived settings. CLI overrides are applied on top when
/// building a [`DigestConfig`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub ollama_host: String,
    pub ollama_model: String,
    pub ollama_timeout: Option<Duration>,
    pub export_path: PathBuf,
    pub target_language: String,
    pub char_budget: usize,
    pub max_conversations: usize,
    pub max_messages: usize,
    pub unread_cap: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            ollama_model: DEFAULT_MODEL.to_string(),
            ollama_timeout: None,
            export_path: config_dir().join(EXPORT_FILE_NAME),
            target_language: DEFAULT_LANGUAGE.to_string(),
            char_budget: DEFAULT_CHAR_BUDGET,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            max_messages: DEFAULT_MAX_MESSAGES,
            unread_cap: DEFAULT_UNREAD_CAP,
        }
    }
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` when a numeric variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, DigestError> {
        let defaults = Self::default();
        let ollama_host = non_empty_var("OLLAMA_HOST")
            .map_or(defaults.ollama_host, |host| normalize_base_url(&host));
        warn_if_remote(&ollama_host);

        Ok(Self {
            ollama_host,
            ollama_model: non_empty_var("OLLAMA_MODEL").unwrap_or(defaults.ollama_model),
            ollama_timeout: parse_var::<u64>("OLLAMA_TIMEOUT_SECS")?.map(Duration::from_secs),
            export_path: non_empty_var("TG_DIGEST_EXPORT")
                .map_or(defaults.export_path, PathBuf::from),
            target_language: non_empty_var("TG_DIGEST_LANGUAGE")
                .unwrap_or(defaults.target_language),
            char_budget: parse_var("TG_DIGEST_CHAR_BUDGET")?.unwrap_or(defaults.char_budget),
            max_conversations: parse_var("TG_DIGEST_MAX_CHATS")?
                .unwrap_or(defaults.max_conversations),
            max_messages: parse_var("TG_DIGEST_MAX_MESSAGES")?.unwrap_or(defaults.max_messages),
            unread_cap: parse_var("TG_DIGEST_UNREAD_CAP")?.unwrap_or(defaults.unread_cap),
        })
    }

    /// The Ollama host for this run: `override_host` normalized when given,
    /// otherwise the environment value. Non-local hosts are warned about.
    #[must_use]
    pub fn resolve_ollama_host(&self, override_host: Option<&str>) -> String {
        match override_host {
            Some(host) => {
                let host = normalize_base_url(host);
                warn_if_remote(&host);
                host
            }
            None => self.ollama_host.clone(),
        }
    }

    /// Build the run configuration, letting explicit overrides win over the
    /// environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the resulting configuration is invalid.
    pub fn digest_config(&self, overrides: &DigestOverrides) -> Result<DigestConfig, DigestError> {
        let config = DigestConfig {
            model: overrides
                .model
                .clone()
                .unwrap_or_else(|| self.ollama_model.clone()),
            char_budget: overrides.char_budget.unwrap_or(self.char_budget),
            max_conversations: overrides
                .max_conversations
                .unwrap_or(self.max_conversations),
            max_messages: overrides.max_messages.unwrap_or(self.max_messages),
            target_language: overrides
                .target_language
                .clone()
                .unwrap_or_else(|| self.target_language.clone()),
            unread_cap: self.unread_cap,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Optional per-run overrides, usually coming from the command line.
#[derive(Debug, Clone, Default)]
pub struct DigestOverrides {
    pub model: Option<String>,
    pub char_budget: Option<usize>,
    pub max_conversations: Option<usize>,
    pub max_messages: Option<usize>,
    pub target_language: Option<String>,
}

/// Explicit configuration handed to the selector and the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestConfig {
    pub model: String,
    pub char_budget: usize,
    pub max_conversations: usize,
    pub max_messages: usize,
    pub target_language: String,
    pub unread_cap: usize,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            char_budget: DEFAULT_CHAR_BUDGET,
            max_conversations: DEFAULT_MAX_CONVERSATIONS,
            max_messages: DEFAULT_MAX_MESSAGES,
            target_language: DEFAULT_LANGUAGE.to_string(),
            unread_cap: DEFAULT_UNREAD_CAP,
        }
    }
}

impl DigestConfig {
    /// # Errors
    ///
    /// Returns `ConfigError` for a zero character budget, a zero unread cap,
    /// or a blank model name.
    pub fn validate(&self) -> Result<(), DigestError> {
        if self.char_budget == 0 {
            return Err(DigestError::ConfigError(
                "character budget must be greater than zero".to_string(),
            ));
        }
        if self.unread_cap == 0 {
            return Err(DigestError::ConfigError(
                "unread cap must be greater than zero".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(DigestError::ConfigError("model name is empty".to_string()));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, DigestError>
where
    T::Err: std::fmt::Display,
{
    non_empty_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| DigestError::ConfigError(format!("{name}: {e}")))
        })
        .transpose()
}

/// Strip trailing slashes and an OpenAI-compatible `/v1` suffix.
#[must_use]
pub fn normalize_base_url(url: &str) -> String {
    let mut url = url.trim().trim_end_matches('/').to_string();
    if url.ends_with("/v1") {
        url.truncate(url.len() - 3);
    }
    url
}

fn warn_if_remote(host: &str) {
    if !is_local_url(host) {
        warn!(
            "Ollama host points to non-local address '{}'; messages will leave this machine",
            host
        );
    }
}

#[must_use]
pub fn is_local_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => match parsed.host() {
            Some(url::Host::Domain(d)) => d == "localhost",
            Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
            Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
            None => true,
        },
        Err(_) => true,
    }
}
