//! Inference over a loaded model artifact.
//!
//! The service owns an immutable [`ModelArtifact`] and the same
//! [`MessageAnalyzer`] configuration training used. It never mutates
//! state after construction, so one instance can serve unbounded
//! concurrent callers behind an `Arc` without locking.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::{Analyzer, MessageAnalyzer};
use crate::error::Result;
use crate::model::artifact::ModelArtifact;

/// A single-query prediction: every label name mapped to 0 or 1, in
/// vocabulary order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    labels: Vec<(String, u8)>,
}

impl Prediction {
    /// The (label, value) pairs in vocabulary order.
    pub fn labels(&self) -> &[(String, u8)] {
        &self.labels
    }

    /// The predicted value for one label name, if present.
    pub fn get(&self, label: &str) -> Option<u8> {
        self.labels
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| *value)
    }

    /// Names of the labels predicted positive.
    pub fn positive_labels(&self) -> Vec<&str> {
        self.labels
            .iter()
            .filter(|(_, value)| *value == 1)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// Number of labels in the prediction.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Whether the prediction carries no labels. Never true for a
    /// prediction produced by the service.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Stateless prediction service over one immutable artifact.
#[derive(Debug)]
pub struct InferenceService {
    analyzer: MessageAnalyzer,
    artifact: ModelArtifact,
}

impl InferenceService {
    /// Load an artifact from disk and build a service around it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::from_artifact(ModelArtifact::load(path)?))
    }

    /// Build a service from an artifact already in memory.
    pub fn from_artifact(artifact: ModelArtifact) -> Self {
        InferenceService {
            analyzer: MessageAnalyzer::new(),
            artifact,
        }
    }

    /// Classify one query string against every label.
    ///
    /// The query flows through the same normalizer and the frozen
    /// vectorizer captured at training time. An empty query is valid:
    /// it produces an all-zero feature vector and each forest falls back
    /// to its learned majority class. Forest outputs are binarized at
    /// this surface (any non-zero class maps to 1), so every returned
    /// value is 0 or 1 even when the raw labels carried pass-through
    /// values outside that range.
    pub fn predict(&self, query: &str) -> Result<Prediction> {
        let tokens = self.analyzer.normalize(query)?;
        let features = self.artifact.vectorizer.transform_document(&tokens);
        let raw = self.artifact.model.predict_row(&features);

        let labels = self
            .artifact
            .label_vocabulary
            .iter()
            .zip(raw.iter())
            .map(|(name, &value)| (name.to_string(), u8::from(value != 0)))
            .collect();

        Ok(Prediction { labels })
    }

    /// The artifact backing this service.
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }
}
