//! Stop filter implementation.
//!
//! Removes common English words that carry no signal for category triage.
//! The comparison is made on the lowercased form of the token, so the filter
//! behaves identically whether it runs before or after lowercasing.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
///
/// Mirrors the common English function-word inventory used by NLTK-style
/// stop lists.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from",
    "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "me",
    "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once", "only",
    "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she", "should",
    "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them", "themselves",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your", "yours", "yourself", "yourselves",
];

static DEFAULT_STOP_SET: LazyLock<Arc<HashSet<String>>> = LazyLock::new(|| {
    Arc::new(
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect(),
    )
});

/// Filter that removes stop words from the token stream.
///
/// # Examples
///
/// ```
/// use mayday::analysis::token::Token;
/// use mayday::analysis::token_filter::{Filter, StopFilter};
///
/// let filter = StopFilter::new();
/// let tokens = vec![
///     Token::new("we", 0),
///     Token::new("need", 1),
///     Token::new("water", 2),
/// ];
///
/// let result: Vec<_> = filter.filter(Box::new(tokens.into_iter())).unwrap().collect();
///
/// // "we" is removed as a stop word
/// assert_eq!(result.len(), 2);
/// assert_eq!(result[0].text, "need");
/// assert_eq!(result[1].text, "water");
/// ```
#[derive(Clone, Debug)]
pub struct StopFilter {
    /// The set of stop words (lowercased).
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a stop filter with the default English stop words.
    pub fn new() -> Self {
        StopFilter {
            stop_words: Arc::clone(&DEFAULT_STOP_SET),
        }
    }

    /// Create a stop filter with a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words: HashSet<String> =
            words.into_iter().map(|w| w.into().to_lowercase()).collect();
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Check whether a word is a stop word.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(&word.to_lowercase())
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = Arc::clone(&self.stop_words);
        let filtered: Vec<_> = tokens
            .filter(|token| !stop_words.contains(&token.text.to_lowercase()))
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
