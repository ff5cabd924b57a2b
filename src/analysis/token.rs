//! Token types for text analysis.
//!
//! A [`Token`] is the unit that flows through the analysis pipeline: the
//! tokenizer produces them, token filters rewrite or drop them, and the
//! analyzer collects the survivors into a normalized token sequence.

use serde::{Deserialize, Serialize};

/// A token represents a single unit of text after tokenization.
///
/// # Examples
///
/// ```
/// use mayday::analysis::token::Token;
///
/// let token = Token::new("water", 0);
/// assert_eq!(token.text, "water");
/// assert_eq!(token.position, 0);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the original token stream (0-based)
    pub position: usize,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
        }
    }

    /// Return a copy of this token with different text.
    pub fn with_text<S: Into<String>>(mut self, text: S) -> Self {
        self.text = text.into();
        self
    }
}

/// A stream of tokens produced by a tokenizer or filter.
pub type TokenStream = Box<dyn Iterator<Item = Token>>;
