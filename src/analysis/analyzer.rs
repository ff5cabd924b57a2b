//! Analyzers that combine a tokenizer with a chain of token filters.
//!
//! [`MessageAnalyzer`] is the normalizer used by both training and
//! inference. The two sides must share one analyzer configuration: a model
//! trained against one normalization and queried through another silently
//! degrades, so the analyzer is constructed in exactly one place.

use std::sync::Arc;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::token_filter::{Filter, LemmaFilter, LowercaseFilter, StopFilter};
use crate::analysis::tokenizer::{Tokenizer, UnicodeWordTokenizer};
use crate::error::Result;

/// Trait for text analyzers.
pub trait Analyzer: Send + Sync {
    /// Analyze the text and return a token stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;

    /// Normalize text into a cleaned token sequence.
    ///
    /// Tokens keep their order of first appearance in the input; the
    /// function never reorders. Empty or stopword-only input yields an
    /// empty sequence, not an error.
    fn normalize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.analyze(text)?.map(|token| token.text).collect())
    }
}

/// A configurable analyzer that combines a tokenizer with a chain of filters.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Get the names of the filters in pipeline order.
    pub fn filter_names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("tokenizer", &self.tokenizer.name())
            .field("filters", &self.filter_names())
            .finish()
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut tokens = self.tokenizer.tokenize(text)?;
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

/// The message normalizer shared by training and inference.
///
/// Pipeline: Unicode word tokenization, lowercase + trim, English stop word
/// removal, lemmatization.
///
/// # Examples
///
/// ```
/// use mayday::analysis::analyzer::{Analyzer, MessageAnalyzer};
///
/// let analyzer = MessageAnalyzer::new();
/// let tokens = analyzer.normalize("We need WATER and medical supplies!").unwrap();
///
/// assert_eq!(tokens, vec!["need", "water", "medical", "supply"]);
/// ```
#[derive(Clone, Debug)]
pub struct MessageAnalyzer {
    inner: PipelineAnalyzer,
}

impl MessageAnalyzer {
    /// Create a new message analyzer with the default English pipeline.
    pub fn new() -> Self {
        let tokenizer = Arc::new(UnicodeWordTokenizer::new());
        let inner = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::new()))
            .add_filter(Arc::new(LemmaFilter::new()));

        Self { inner }
    }
}

impl Default for MessageAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for MessageAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &'static str {
        "message"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_analyzer_pipeline() {
        let analyzer = MessageAnalyzer::new();

        let tokens: Vec<Token> = analyzer
            .analyze("The floods destroyed our houses")
            .unwrap()
            .collect();

        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["flood", "destroyed", "house"]);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let analyzer = MessageAnalyzer::new();
        let tokens = analyzer.normalize("water food water shelter").unwrap();
        assert_eq!(tokens, vec!["water", "food", "water", "shelter"]);
    }

    #[test]
    fn test_normalize_empty_input() {
        let analyzer = MessageAnalyzer::new();
        assert!(analyzer.normalize("").unwrap().is_empty());
        assert!(analyzer.normalize("the a an is").unwrap().is_empty());
    }

    #[test]
    fn test_normalize_deterministic() {
        let analyzer = MessageAnalyzer::new();
        let a = analyzer.normalize("People need medical supplies now").unwrap();
        let b = analyzer.normalize("People need medical supplies now").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_analyzer_name() {
        assert_eq!(MessageAnalyzer::new().name(), "message");
    }
}
