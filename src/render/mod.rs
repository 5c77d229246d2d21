//! Offset-based rendering of token sequences onto their source text.
//!
//! Token spans are measured in Unicode code points, so slicing goes
//! through a char-to-byte offset mapping instead of byte indexing. A
//! span can therefore never split a multi-byte character.

use crate::types::{DisplayMode, RenderState, ResultState, Token};

/// Fixed ordered palette; span color is `index % PALETTE.len()`.
pub const PALETTE: [&str; 5] = [
    "rgba(107,64,216,.3)",
    "rgba(104,222,122,.4)",
    "rgba(244,172,54,.4)",
    "rgba(239,65,70,.4)",
    "rgba(39,181,234,.4)",
];

/// Color for the token at `index`.
pub fn color_for(index: usize) -> &'static str {
    PALETTE[index % PALETTE.len()]
}

/// One colored span of tokenized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSpan {
    /// Substring of the tokenized text covered by the token.
    pub text: String,
    /// Background color from [`PALETTE`].
    pub color: &'static str,
}

/// Rendered form of a [`RenderState`], ready to paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// Text mode: colored spans in token order.
    Spans(Vec<RenderedSpan>),
    /// Token-ids mode: the bracketed id list, e.g. `[1, 2]`.
    TokenIds(String),
    /// Error message, displayed verbatim above the input.
    Error(String),
}

/// Render a snapshot according to its display mode.
pub fn render(state: &RenderState) -> Rendered {
    match &state.results {
        ResultState::Error(message) => Rendered::Error(message.clone()),
        ResultState::Tokens(tokens) => match state.mode {
            DisplayMode::Text => Rendered::Spans(text_spans(&state.tokenized_text, tokens)),
            DisplayMode::TokenIds => Rendered::TokenIds(token_id_list(tokens)),
        },
    }
}

/// Build colored spans for every token against the tokenized text.
pub fn text_spans(tokenized_text: &str, tokens: &[Token]) -> Vec<RenderedSpan> {
    tokens
        .iter()
        .enumerate()
        .map(|(index, token)| RenderedSpan {
            text: slice_code_points(tokenized_text, token.start, token.end).to_string(),
            color: color_for(index),
        })
        .collect()
}

/// Format the bracketed token-id list, e.g. `[1, 2]`.
pub fn token_id_list(tokens: &[Token]) -> String {
    let ids: Vec<String> = tokens.iter().map(|t| t.id.to_string()).collect();
    format!("[{}]", ids.join(", "))
}

/// Slice `[start, end)` of `text` measured in code points.
///
/// Out-of-range offsets clamp to the end of the text; an inverted span
/// yields the empty string.
pub fn slice_code_points(text: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let byte_start = byte_offset(text, start);
    let byte_end = byte_offset(text, end);
    &text[byte_start..byte_end]
}

/// Byte offset of the `chars`-th code point, clamped to `text.len()`.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(offset, _)| offset)
}
