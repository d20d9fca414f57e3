use std::error::Error;
use tg_digest::errors::DigestError;

#[test]
fn test_digest_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = DigestError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_digest_error_display() {
    let error = DigestError::ConfigError("snapshot missing".to_string());
    assert_eq!(format!("{error}"), "Configuration error: snapshot missing");

    let error = DigestError::BackendUnavailable("connection refused".to_string());
    assert_eq!(
        format!("{error}"),
        "Generation backend unavailable: connection refused"
    );

    let error = DigestError::GenerationError("status 500".to_string());
    assert_eq!(format!("{error}"), "Failed to generate text: status 500");

    let error = DigestError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );
}

#[test]
fn test_digest_error_from_serde_json() {
    let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let digest_err: DigestError = err.into();
    assert!(matches!(digest_err, DigestError::ParseError(_)));
}

#[test]
fn test_digest_error_from_io() {
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    let digest_err: DigestError = err.into();
    match digest_err {
        DigestError::SourceError(msg) => assert!(msg.contains("gone")),
        other => panic!("Unexpected error type: {other:?}"),
    }
}

#[test]
fn test_digest_error_converts_into_anyhow() {
    let err: anyhow::Error = DigestError::SourceError("history".to_string()).into();
    assert_eq!(err.to_string(), "Failed to read messages: history");
    assert!(err.downcast_ref::<DigestError>().is_some());
}

#[tokio::test]
async fn test_digest_error_from_reqwest_connect_failure() {
    let err = reqwest::get("http://127.0.0.1:1/api/tags").await.unwrap_err();
    let digest_err: DigestError = err.into();
    assert!(matches!(digest_err, DigestError::BackendUnavailable(_)));
}
