//! Lemmatization token filter.
//!
//! Reduces surviving tokens to a dictionary root form using an irregular
//! noun table plus English plural suffix rules. The mapping is fixed at
//! compile time, so the filter is deterministic across runs and processes.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Irregular English noun forms that suffix rules cannot handle.
const IRREGULAR_FORMS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("wives", "wife"),
    ("women", "woman"),
    ("lives", "life"),
    ("knives", "knife"),
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("shelves", "shelf"),
];

static IRREGULAR_TABLE: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| IRREGULAR_FORMS.iter().copied().collect());

/// Trait for lemmatization algorithms.
pub trait Lemmatizer: Send + Sync {
    /// Reduce a word to its dictionary root form.
    fn lemma(&self, word: &str) -> String;

    /// Get the name of this lemmatizer.
    fn name(&self) -> &'static str;
}

/// Rule-based English lemmatizer.
///
/// Looks the word up in the irregular table first, then applies plural
/// suffix rules, longest suffix first. Words already in root form pass
/// through unchanged.
#[derive(Clone, Debug, Default)]
pub struct EnglishLemmatizer;

impl EnglishLemmatizer {
    /// Create a new English lemmatizer.
    pub fn new() -> Self {
        EnglishLemmatizer
    }
}

impl Lemmatizer for EnglishLemmatizer {
    fn lemma(&self, word: &str) -> String {
        if let Some(root) = IRREGULAR_TABLE.get(word) {
            return (*root).to_string();
        }

        if word.len() <= 3 {
            return word.to_string();
        }

        // "supplies" -> "supply", "families" -> "family"
        if let Some(stem) = word.strip_suffix("ies") {
            if stem.len() >= 2 {
                return format!("{stem}y");
            }
        }

        // "glasses" -> "glass", "boxes" -> "box", "churches" -> "church"
        if let Some(stem) = word.strip_suffix("es") {
            if stem.ends_with("ss")
                || stem.ends_with('x')
                || stem.ends_with('z')
                || stem.ends_with("ch")
                || stem.ends_with("sh")
            {
                return stem.to_string();
            }
        }

        // "floods" -> "flood"; keep "glass", "bus", "crisis" intact
        if let Some(stem) = word.strip_suffix('s') {
            if !stem.ends_with('s') && !stem.ends_with('u') && !stem.ends_with('i') {
                return stem.to_string();
            }
        }

        word.to_string()
    }

    fn name(&self) -> &'static str {
        "english"
    }
}

/// Filter that applies lemmatization to tokens.
pub struct LemmaFilter {
    /// The lemmatizer to use.
    lemmatizer: Box<dyn Lemmatizer>,
}

impl std::fmt::Debug for LemmaFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LemmaFilter")
            .field("lemmatizer", &self.lemmatizer.name())
            .finish()
    }
}

impl LemmaFilter {
    /// Create a new lemma filter with the English lemmatizer.
    pub fn new() -> Self {
        LemmaFilter {
            lemmatizer: Box::new(EnglishLemmatizer::new()),
        }
    }

    /// Create a lemma filter with a custom lemmatizer.
    pub fn with_lemmatizer(lemmatizer: Box<dyn Lemmatizer>) -> Self {
        LemmaFilter { lemmatizer }
    }
}

impl Default for LemmaFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for LemmaFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let filtered: Vec<_> = tokens
            .map(|token| {
                let root = self.lemmatizer.lemma(&token.text);
                token.with_text(root)
            })
            .collect();

        Ok(Box::new(filtered.into_iter()))
    }

    fn name(&self) -> &'static str {
        "lemma"
    }
}
