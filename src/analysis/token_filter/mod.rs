//! Token filters applied after tokenization.
//!
//! Filters are chained by the analyzer in a fixed order: lowercase/trim,
//! stop word removal, then lemmatization. Each filter consumes a token
//! stream and produces a new one.

pub mod lemma;
pub mod lowercase;
pub mod stop;

pub use lemma::LemmaFilter;
pub use lowercase::LowercaseFilter;
pub use stop::StopFilter;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Filter the token stream, producing a new token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter.
    fn name(&self) -> &'static str;
}
