//! Integration tests for initialising the logger.
use v2g::log::{init, is_logger_initialised};

/// The logger can be initialised once only
#[test]
fn test_init() {
    unsafe { std::env::remove_var("V2G_LOG_LEVEL") };

    assert!(!is_logger_initialised());
    init(Some("off")).unwrap();
    assert!(is_logger_initialised());

    // Second time will fail because the logging is already initialised
    assert_eq!(
        init(Some("off")).unwrap_err().to_string(),
        "Logger already initialised"
    );
}
