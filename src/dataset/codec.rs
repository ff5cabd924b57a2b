//! Packed category string codec.
//!
//! Category labels arrive as one packed string per row:
//!
//! ```text
//! related-1;request-0;offer-1
//! ```
//!
//! Every row carries the same label names in the same order. The
//! vocabulary is derived once from a representative row and every other
//! row is decoded against it; any divergence in token count or name
//! ordering is a data format error.
//!
//! Values are parsed as integers and passed through uncoerced. The raw
//! corpus contains a handful of `2` values for the `related` label, and the
//! codec deliberately does not clip them to the {0,1} range.

use serde::{Deserialize, Serialize};

use crate::error::{MaydayError, Result};

/// The fixed, ordered sequence of unique label names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelVocabulary {
    names: Vec<String>,
}

impl LabelVocabulary {
    /// Create a vocabulary from an ordered list of names.
    ///
    /// Fails if any name repeats or the list is empty.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(MaydayError::data_format("label vocabulary is empty"));
        }
        let mut seen = ahash::AHashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(MaydayError::data_format(format!(
                    "duplicate label name '{name}' in vocabulary"
                )));
            }
        }
        Ok(LabelVocabulary { names })
    }

    /// Number of labels in the vocabulary.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the vocabulary is empty. Never true for a constructed value.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The ordered label names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate over the label names in vocabulary order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }
}

/// Encoder/decoder for the packed category string format.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryCodec;

impl CategoryCodec {
    /// Derive the label vocabulary from one representative packed string.
    ///
    /// Used once per ETL run, on the first row that carries categories.
    pub fn derive_vocabulary(packed: &str) -> Result<LabelVocabulary> {
        let names = packed
            .split(';')
            .map(|token| Ok(Self::split_token(token)?.0.to_string()))
            .collect::<Result<Vec<_>>>()?;
        LabelVocabulary::new(names)
    }

    /// Decode a packed string into a label vector aligned with `vocabulary`.
    ///
    /// Fails if the token count differs from the vocabulary length, if a
    /// name does not match the vocabulary entry at its position, or if a
    /// value does not parse as an integer.
    pub fn decode(packed: &str, vocabulary: &LabelVocabulary) -> Result<Vec<u8>> {
        let tokens: Vec<&str> = packed.split(';').collect();
        if tokens.len() != vocabulary.len() {
            return Err(MaydayError::data_format(format!(
                "expected {} category tokens, found {}",
                vocabulary.len(),
                tokens.len()
            )));
        }

        let mut labels = Vec::with_capacity(tokens.len());
        for (token, expected) in tokens.iter().zip(vocabulary.iter()) {
            let (name, value) = Self::split_token(token)?;
            if name != expected {
                return Err(MaydayError::data_format(format!(
                    "category name '{name}' does not match vocabulary entry '{expected}'"
                )));
            }
            let value: u8 = value.parse().map_err(|_| {
                MaydayError::data_format(format!(
                    "category value '{value}' for '{name}' is not an integer"
                ))
            })?;
            labels.push(value);
        }

        Ok(labels)
    }

    /// Encode a label vector back into the packed string format.
    ///
    /// Fails if the vector length differs from the vocabulary length.
    pub fn encode(labels: &[u8], vocabulary: &LabelVocabulary) -> Result<String> {
        if labels.len() != vocabulary.len() {
            return Err(MaydayError::data_format(format!(
                "expected {} label values, found {}",
                vocabulary.len(),
                labels.len()
            )));
        }

        Ok(labels
            .iter()
            .zip(vocabulary.iter())
            .map(|(value, name)| format!("{name}-{value}"))
            .collect::<Vec<_>>()
            .join(";"))
    }

    /// Split a `"<name>-<value>"` token on the **last** `-`.
    ///
    /// Splitting on the last dash keeps hyphenated label names such as
    /// `aid-related` intact.
    fn split_token(token: &str) -> Result<(&str, &str)> {
        match token.rsplit_once('-') {
            Some((name, value)) if !name.is_empty() => Ok((name, value)),
            _ => Err(MaydayError::data_format(format!(
                "malformed category token '{token}'"
            ))),
        }
    }
}
