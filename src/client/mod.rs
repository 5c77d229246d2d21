//! HTTP client for the remote tokenization service.
//!
//! The service exposes a single `POST /tokenize` endpoint. The request
//! body is `{ "text": ..., "tokenizer_name": ... }`; a successful
//! response is an ordered array of `[id, [start, end]]` pairs, and an
//! application-level failure is `{ "error": "..." }` with HTTP 200.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::telemetry;
use crate::traits::TokenizeBackend;
use crate::types::Token;
use crate::{Result, TokenviewError};

/// Default base URL for the hosted tokenization service.
pub const DEFAULT_BASE_URL: &str = "https://calderajs--tokenizer-fastapi-app.modal.run";

/// Client for the remote tokenization service.
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Clone)]
pub struct TokenizerClient {
    http: Client,
    base_url: String,
}

impl TokenizerClient {
    /// Create a client against the default hosted service.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a client with a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // No request timeout: a hung request is surfaced only through
        // the view's loading flag, never auto-failed.
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Tokenize `text` with the named tokenizer.
    ///
    /// # Arguments
    /// * `text` - Text to tokenize
    /// * `tokenizer` - Full tokenizer ID (e.g., `meta-llama/Llama-2-7b-chat-hf`)
    pub async fn tokenize(&self, text: &str, tokenizer: &str) -> Result<Vec<Token>> {
        let started = std::time::Instant::now();
        let result = self.tokenize_inner(text, tokenizer).await;
        record_request(started, result.is_ok());
        result
    }

    async fn tokenize_inner(&self, text: &str, tokenizer: &str) -> Result<Vec<Token>> {
        let url = format!("{}/tokenize", self.base_url);
        debug!(tokenizer, chars = text.chars().count(), "dispatching tokenize request");

        let response = self
            .http
            .post(&url)
            .json(&TokenizeRequest {
                text,
                tokenizer_name: tokenizer,
            })
            .send()
            .await
            .map_err(|e| TokenviewError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TokenviewError::Api {
                status: status.as_u16(),
                message: format!("tokenizer service error: {status}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| TokenviewError::Http(e.to_string()))?;

        parse_response(&body)
    }
}

impl Default for TokenizerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenizeBackend for TokenizerClient {
    fn name(&self) -> &str {
        "remote"
    }

    async fn tokenize(&self, text: &str, tokenizer: &str) -> Result<Vec<Token>> {
        TokenizerClient::tokenize(self, text, tokenizer).await
    }
}

#[derive(Serialize)]
struct TokenizeRequest<'a> {
    text: &'a str,
    tokenizer_name: &'a str,
}

/// Accept both response shapes the service produces.
///
/// Success is a bare array of `[id, [start, end]]` pairs; application
/// errors arrive as `{ "error": "..." }` on an otherwise-OK response.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawResponse {
    Tokens(Vec<Token>),
    Error { error: String },
}

/// Record request outcome metrics (counter + histogram).
fn record_request(start: std::time::Instant, ok: bool) {
    let status = if ok { "ok" } else { "error" };
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(telemetry::REQUESTS_TOTAL,
        "backend" => "remote",
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS,
        "backend" => "remote",
    )
    .record(elapsed);
}

/// Parse a response body, mapping `{error}` payloads to
/// [`TokenviewError::TokenizationFailed`] verbatim.
fn parse_response(body: &str) -> Result<Vec<Token>> {
    let payload: RawResponse = serde_json::from_str(body)?;
    match payload {
        RawResponse::Tokens(tokens) => Ok(tokens),
        RawResponse::Error { error } => Err(TokenviewError::TokenizationFailed(error)),
    }
}
