//! Token types for tokenization results.

use serde::{Deserialize, Serialize};

/// A single token returned by the tokenization service.
///
/// Offsets are measured in Unicode code points of the text that was
/// tokenized, not bytes. On the wire a token is the tuple
/// `[id, [start, end]]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "TokenWire", into = "TokenWire")]
pub struct Token {
    /// Token ID in the vocabulary.
    pub id: u32,
    /// Start code-point offset in the tokenized text.
    pub start: usize,
    /// End code-point offset in the tokenized text (exclusive).
    pub end: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(id: u32, start: usize, end: usize) -> Self {
        Self { id, start, end }
    }

    /// Length of this token's span in code points.
    pub fn char_len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Wire form: `[id, [start, end]]`.
#[derive(Serialize, Deserialize)]
struct TokenWire(u32, (usize, usize));

impl From<TokenWire> for Token {
    fn from(wire: TokenWire) -> Self {
        Token {
            id: wire.0,
            start: wire.1.0,
            end: wire.1.1,
        }
    }
}

impl From<Token> for TokenWire {
    fn from(token: Token) -> Self {
        TokenWire(token.id, (token.start, token.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_new() {
        let token = Token::new(42, 0, 5);
        assert_eq!(token.id, 42);
        assert_eq!(token.start, 0);
        assert_eq!(token.end, 5);
    }

    #[test]
    fn token_char_len() {
        let token = Token::new(1, 10, 14);
        assert_eq!(token.char_len(), 4);
    }

    #[test]
    fn char_len_saturates_on_inverted_span() {
        let token = Token::new(1, 5, 3);
        assert_eq!(token.char_len(), 0);
    }

    #[test]
    fn deserializes_from_tuple_form() {
        let token: Token = serde_json::from_str("[7, [2, 5]]").unwrap();
        assert_eq!(token, Token::new(7, 2, 5));
    }

    #[test]
    fn serializes_to_tuple_form() {
        let json = serde_json::to_string(&Token::new(7, 2, 5)).unwrap();
        assert_eq!(json, "[7,[2,5]]");
    }

    #[test]
    fn deserializes_sequence() {
        let tokens: Vec<Token> = serde_json::from_str("[[1,[0,1]],[2,[1,3]]]").unwrap();
        assert_eq!(tokens, vec![Token::new(1, 0, 1), Token::new(2, 1, 3)]);
    }
}
