//! Response builders for the webhook endpoint.

use serde_json::{Value, json};

/// Returns a 200 OK response carrying `{"message": message}`.
///
/// Telegram retries any webhook delivery answered with another status, so
/// rejections and failures are reported through the body only.
#[must_use]
pub fn ok_message(message: &str) -> Value {
    json!({
        "statusCode": 200,
        "body": json!({ "message": message }).to_string()
    })
}
