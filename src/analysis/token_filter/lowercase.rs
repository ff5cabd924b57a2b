//! Lowercase filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Filter that lowercases and trims token text.
///
/// # Examples
///
/// ```
/// use mayday::analysis::token::Token;
/// use mayday::analysis::token_filter::{Filter, LowercaseFilter};
///
/// let filter = LowercaseFilter::new();
/// let tokens = vec![Token::new("Flood", 0), Token::new("WARNING", 1)];
///
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
/// assert_eq!(result[0].text, "flood");
/// assert_eq!(result[1].text, "warning");
/// ```
#[derive(Clone, Debug, Default)]
pub struct LowercaseFilter;

impl LowercaseFilter {
    /// Create a new lowercase filter.
    pub fn new() -> Self {
        LowercaseFilter
    }
}

impl Filter for LowercaseFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered: Vec<_> = tokens
            .map(|token| {
                let lowered = token.text.trim().to_lowercase();
                token.with_text(lowered)
            })
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lowercase"
    }
}
