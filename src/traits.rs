//! Core TokenizeBackend trait

use async_trait::async_trait;

use crate::types::Token;
use crate::Result;

/// Backend that turns text into tokens.
///
/// The view session talks to the remote service only through this
/// trait, so tests can substitute an in-process mock and the HTTP
/// client stays swappable.
#[async_trait]
pub trait TokenizeBackend: Send + Sync {
    /// Backend name for logging and metrics labels.
    fn name(&self) -> &str;

    /// Tokenize `text` with the named tokenizer.
    ///
    /// Returns the ordered token sequence on success. A service-level
    /// `{error}` payload surfaces as
    /// [`TokenviewError::TokenizationFailed`](crate::TokenviewError::TokenizationFailed)
    /// with the message verbatim.
    async fn tokenize(&self, text: &str, tokenizer: &str) -> Result<Vec<Token>>;
}
