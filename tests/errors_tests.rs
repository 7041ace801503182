use std::error::Error;
use printbot::errors::BotError;

#[test]
fn test_bot_error_implements_error_trait() {
    fn assert_error<T: Error>(_: &T) {}

    let error = BotError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_bot_error_display() {
    let error = BotError::ApiError("API failed".to_string());
    assert_eq!(format!("{error}"), "Failed to access Slack API: API failed");

    let error = BotError::OpenAIError("Model unavailable".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to access OpenAI API: Model unavailable"
    );

    let error = BotError::PrinterError("offline".to_string());
    assert_eq!(format!("{error}"), "Printer error: offline");

    // General errors carry their message verbatim
    let error = BotError::GeneralError("'x' is not a valid language".to_string());
    assert_eq!(format!("{error}"), "'x' is not a valid language");
}

#[test]
fn test_bot_error_from_conversions() {
    let err = anyhow::anyhow!("test error");
    let bot_err: BotError = err.into();
    match bot_err {
        BotError::GeneralError(msg) => assert!(msg.contains("test error")),
        _ => panic!("Unexpected error type"),
    }

    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(BotError::from(io), BotError::IoError(_)));

    // Compile-time check that the reqwest conversion exists
    #[allow(unused)]
    #[allow(clippy::items_after_statements)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> BotError {
        BotError::from(err)
    }
}
