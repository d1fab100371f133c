//! HTTP status and transport error classification shared by the
//! provider adapters.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

use crate::ports::AIError;

/// Maps a `reqwest` send failure to an `AIError`.
pub(crate) fn map_send_error(error: reqwest::Error, timeout: Duration) -> AIError {
    if error.is_timeout() {
        AIError::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else if error.is_connect() {
        AIError::transport(format!("connection failed: {}", error))
    } else {
        AIError::transport(error.to_string())
    }
}

/// Classifies a non-success response.
pub(crate) fn classify_status(status: StatusCode, headers: &HeaderMap, body: &str) -> AIError {
    match status.as_u16() {
        401 | 403 => AIError::AuthenticationFailed,
        429 => AIError::rate_limited(retry_after(headers, body)),
        400 | 422 => AIError::invalid_request(body.to_string()),
        408 => AIError::transport(format!("server timed out: {}", body)),
        500..=599 => AIError::transport(format!("server error {}: {}", status, body)),
        _ => AIError::transport(format!("unexpected status {}: {}", status, body)),
    }
}

/// Reads the wait hint from the `retry-after` header, falling back to a
/// "try again in Ns" phrase in the error body.
pub(crate) fn retry_after(headers: &HeaderMap, body: &str) -> Option<u32> {
    headers
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<f64>().ok())
        .map(|secs| secs.ceil().max(0.0) as u32)
        .or_else(|| retry_after_from_body(body))
}

fn retry_after_from_body(body: &str) -> Option<u32> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.get("error")?.get("message")?.as_str()?;
    let rest = &message[message.find("try again in ")? + "try again in ".len()..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn auth_statuses_map_to_authentication_failed() {
        let headers = HeaderMap::new();
        assert_eq!(
            classify_status(StatusCode::UNAUTHORIZED, &headers, ""),
            AIError::AuthenticationFailed
        );
        assert_eq!(
            classify_status(StatusCode::FORBIDDEN, &headers, ""),
            AIError::AuthenticationFailed
        );
    }

    #[test]
    fn server_errors_are_transport_failures() {
        let err = classify_status(StatusCode::BAD_GATEWAY, &HeaderMap::new(), "upstream");
        assert!(matches!(err, AIError::Transport(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn bad_request_is_not_retryable() {
        let err = classify_status(StatusCode::BAD_REQUEST, &HeaderMap::new(), "bad model");
        assert_eq!(err, AIError::invalid_request("bad model"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn retry_after_header_wins() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from_static("7"));
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, &headers, "");
        assert_eq!(err.retry_after_secs(), Some(7));
    }

    #[test]
    fn retry_after_falls_back_to_message() {
        let body = r#"{"error":{"message":"Rate limit exceeded. Please try again in 30 seconds."}}"#;
        assert_eq!(retry_after(&HeaderMap::new(), body), Some(30));
    }

    #[test]
    fn retry_after_absent_when_nothing_says_so() {
        let body = r#"{"error":{"message":"Something went wrong"}}"#;
        assert_eq!(retry_after(&HeaderMap::new(), body), None);
    }
}
