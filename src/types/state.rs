//! View state types: results, render snapshots, and display modes.

use serde::{Deserialize, Serialize};

use super::Token;

/// Outcome of the most recent tokenization request.
///
/// Mutually exclusive: either a token sequence or a service/transport
/// error message, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultState {
    /// Ordered token sequence from a successful request.
    Tokens(Vec<Token>),
    /// Error message, displayed verbatim.
    Error(String),
}

impl ResultState {
    /// Number of tokens; zero for an error result.
    pub fn token_count(&self) -> usize {
        match self {
            ResultState::Tokens(tokens) => tokens.len(),
            ResultState::Error(_) => 0,
        }
    }

    /// Error message, if this is an error result.
    pub fn error(&self) -> Option<&str> {
        match self {
            ResultState::Tokens(_) => None,
            ResultState::Error(message) => Some(message),
        }
    }
}

impl Default for ResultState {
    fn default() -> Self {
        ResultState::Tokens(Vec::new())
    }
}

/// How fetched results are rendered.
///
/// Switching mode re-renders already-fetched results; it never triggers
/// a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Colored spans positioned inline over the tokenized text.
    #[default]
    Text,
    /// Bracketed list of numeric token ids, ignoring the text.
    TokenIds,
}

/// Renderable snapshot of the last completed request.
///
/// `tokenized_text` is the text captured when that request was
/// dispatched. Spans in `results` index into it and only it; the live
/// input text may have diverged while the request was in flight.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderState {
    /// The text the spans in `results` were computed against.
    pub tokenized_text: String,
    /// Tokens or an error message.
    pub results: ResultState,
    /// Current display mode.
    pub mode: DisplayMode,
}

impl RenderState {
    /// Number of tokens in the current results (0 on error).
    pub fn token_count(&self) -> usize {
        self.results.token_count()
    }
}

/// Full view snapshot published to observers on every change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewerState {
    /// Live editable text, mutated on every keystroke.
    pub text: String,
    /// Live editable tokenizer identifier.
    pub tokenizer: String,
    /// Set when a request is dispatched and cleared when any outcome
    /// arrives, even if another request is still in flight. Dims the UI
    /// only; input and further dispatches are never blocked.
    pub loading: bool,
    /// Last completed request, ready to render.
    pub render: RenderState,
}

impl ViewerState {
    /// Character count of the live input, in code points.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}
