use tg_digest::setup_logging;

#[test]
fn test_logging_setup_is_idempotent() {
    let result = std::panic::catch_unwind(|| {
        setup_logging(false);
        setup_logging(true);
    });

    assert!(result.is_ok(), "setup_logging should not panic when called twice");
}
