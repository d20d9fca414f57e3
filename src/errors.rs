use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Generation backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Failed to generate text: {0}")]
    GenerationError(String),

    #[error("Failed to read messages: {0}")]
    SourceError(String),

    #[error("Failed to parse data: {0}")]
    ParseError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            DigestError::BackendUnavailable(error.to_string())
        } else {
            DigestError::HttpError(error.to_string())
        }
    }
}

impl From<serde_json::Error> for DigestError {
    fn from(error: serde_json::Error) -> Self {
        DigestError::ParseError(error.to_string())
    }
}

impl From<std::io::Error> for DigestError {
    fn from(error: std::io::Error) -> Self {
        DigestError::SourceError(error.to_string())
    }
}
