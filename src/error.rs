//! Error types for portrait generation.

use std::time::Duration;

/// Longest API error body kept in an error message.
const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Errors that can occur while preparing or running a generation attempt.
#[derive(Debug, thiserror::Error)]
pub enum DiyaError {
    /// API key missing or rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit or quota exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Server hint from the `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Input file is not one of the accepted image types.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// The call succeeded but no part of the response carried image data.
    #[error("No image data found in the API response.")]
    NoImage,

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (reading a photo, saving the portrait).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DiyaError {
    /// Returns true if this error is likely transient.
    ///
    /// Attempts are never retried automatically; the session logs this with
    /// each failure.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Network(_))
    }

    /// Returns the server's retry hint, if it sent one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for portrait generation operations.
pub type Result<T> = std::result::Result<T, DiyaError>;

/// Redacts anything that looks like a Google API key and truncates long bodies.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(MAX_ERROR_MESSAGE_LEN));
    let mut rest = text;

    // Google API keys are 39 chars starting with "AIza".
    while let Some(idx) = rest.find("AIza") {
        out.push_str(&rest[..idx]);
        let key_len = rest[idx..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len() - idx);
        out.push_str("[REDACTED]");
        rest = &rest[idx + key_len..];
    }
    out.push_str(rest);

    let trimmed = out.trim();
    if trimmed.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let cut: String = trimmed.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        format!("{cut}...")
    } else {
        trimmed.to_string()
    }
}

/// Reads a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};

    #[test]
    fn test_is_retryable() {
        assert!(DiyaError::RateLimited { retry_after: None }.is_retryable());

        assert!(!DiyaError::Auth("bad key".into()).is_retryable());
        assert!(!DiyaError::ContentBlocked("unsafe".into()).is_retryable());
        assert!(!DiyaError::NoImage.is_retryable());
        assert!(!DiyaError::Decode("bad base64".into()).is_retryable());
    }

    #[test]
    fn test_retry_after() {
        let rate_limited = DiyaError::RateLimited {
            retry_after: Some(Duration::from_secs(60)),
        };
        assert_eq!(rate_limited.retry_after(), Some(Duration::from_secs(60)));

        let rate_limited_no_hint = DiyaError::RateLimited { retry_after: None };
        assert_eq!(rate_limited_no_hint.retry_after(), None);

        assert_eq!(DiyaError::Auth("bad".into()).retry_after(), None);
        assert_eq!(DiyaError::NoImage.retry_after(), None);
    }

    #[test]
    fn test_error_display() {
        let err = DiyaError::Api {
            status: 500,
            message: "Internal".into(),
        };
        assert_eq!(err.to_string(), "API error: 500 - Internal");

        assert_eq!(
            DiyaError::NoImage.to_string(),
            "No image data found in the API response."
        );
    }

    #[test]
    fn test_sanitize_redacts_api_key() {
        let key = format!("AIza{}", "x".repeat(35));
        let msg = format!("API key not valid: {key}. Please pass a valid key.");
        let clean = sanitize_error_message(&msg);
        assert!(!clean.contains(&key));
        assert_eq!(
            clean,
            "API key not valid: [REDACTED]. Please pass a valid key."
        );
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "e".repeat(MAX_ERROR_MESSAGE_LEN + 50);
        let clean = sanitize_error_message(&long);
        assert_eq!(clean.len(), MAX_ERROR_MESSAGE_LEN + 3);
        assert!(clean.ends_with("..."));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("30"));
        assert_eq!(parse_retry_after(&headers), Some(30));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));
        assert_eq!(parse_retry_after(&headers), None);
    }
}
