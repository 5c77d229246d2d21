//! Tokenview error types

/// Tokenview error types
#[derive(Debug, thiserror::Error)]
pub enum TokenviewError {
    /// The service rejected the request and returned an `{error}` payload.
    ///
    /// The message is surfaced verbatim, so `Display` is the message
    /// itself with no prefix.
    #[error("{0}")]
    TokenizationFailed(String),

    // Transport-level errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // View/session errors
    #[error("view session closed")]
    SessionClosed,
}

/// Result type alias for tokenview operations
pub type Result<T> = std::result::Result<T, TokenviewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenization_failed_displays_verbatim() {
        let err = TokenviewError::TokenizationFailed("unknown tokenizer".into());
        assert_eq!(err.to_string(), "unknown tokenizer");
    }

    #[test]
    fn http_error_has_prefix() {
        let err = TokenviewError::Http("connection refused".into());
        assert_eq!(err.to_string(), "HTTP error: connection refused");
    }
}
