//! Text analysis pipeline for message normalization.
//!
//! Raw message text flows through a tokenizer and a chain of token filters
//! to become the cleaned token sequence consumed by the feature extractor:
//!
//! ```text
//! "We need WATER!" -> tokenize -> lowercase -> stop -> lemma -> ["need", "water"]
//! ```
//!
//! The same [`analyzer::MessageAnalyzer`] instance is used when fitting the
//! vectorizer and when answering inference queries, which is what keeps the
//! two feature spaces identical.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, MessageAnalyzer, PipelineAnalyzer};
pub use token::{Token, TokenStream};
