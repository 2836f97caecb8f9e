use std::error::Error;
use sauerpod::errors::SauerError;

#[test]
fn test_sauer_error_implements_error_trait() {
    fn assert_error<T: Error + Send + Sync + 'static>(_: &T) {}

    let error = SauerError::ParseError("test error".to_string());
    assert_error(&error);
}

#[test]
fn test_sauer_error_display() {
    let error = SauerError::TelegramError("Bad Request".to_string());
    assert_eq!(format!("{error}"), "Failed to access Telegram API: Bad Request");

    let error = SauerError::HttpError("Connection error".to_string());
    assert_eq!(
        format!("{error}"),
        "Failed to send HTTP request: Connection error"
    );

    let error = SauerError::UnknownChatId("42".to_string());
    assert_eq!(format!("{error}"), "Chat id '42' not allowed.");

    let error = SauerError::ConfigError("STORAGE_BUCKET_NAME is not set".to_string());
    assert_eq!(
        format!("{error}"),
        "Missing configuration: STORAGE_BUCKET_NAME is not set"
    );
}

#[test]
fn test_sauer_error_from_conversions() {
    let err = anyhow::anyhow!("test error");
    let sauer_err: SauerError = err.into();
    match sauer_err {
        SauerError::GeneralError(msg) => assert!(msg.contains("test error")),
        other => panic!("Unexpected error type: {other:?}"),
    }

    let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    assert!(matches!(SauerError::from(err), SauerError::ParseError(_)));

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
    assert!(matches!(SauerError::from(err), SauerError::IoError(_)));

    #[allow(unused)]
    fn _check_reqwest_conversion(err: reqwest::Error) -> SauerError {
        SauerError::from(err)
    }
}

#[test]
fn test_error_message_escapes_html() {
    let error = SauerError::DownloadError("<bad> & worse".to_string());
    assert_eq!(
        sauerpod::steps::error_message(&error),
        "⚠️ Error:\nFailed to download video: &lt;bad&gt; &amp; worse"
    );
}
