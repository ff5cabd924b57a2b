//! Aggregate statistics over a cleaned dataset.
//!
//! Computes the figures the response dashboard plots: message counts by
//! genre, positive counts per label, and the distribution of message
//! lengths in words. All output collections are deterministically
//! ordered so repeated runs serialize identically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::dataset::store::CleanedDataset;
use crate::error::{MaydayError, Result};

/// Positive count for one label.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    /// Number of records where this label is exactly 1.
    pub count: usize,
}

/// One bucket of the message word-length histogram.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistogramBucket {
    /// Inclusive lower bound in words.
    pub lower: usize,
    /// Exclusive upper bound in words.
    pub upper: usize,
    pub count: usize,
}

/// Summary statistics for a cleaned dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetStats {
    /// Total number of cleaned records.
    pub n_records: usize,
    /// Number of labels in the vocabulary.
    pub n_labels: usize,
    /// Record counts per genre, sorted by genre name.
    pub genre_counts: BTreeMap<String, usize>,
    /// Positive counts per label, in vocabulary order.
    pub label_counts: Vec<LabelCount>,
    /// Histogram of message lengths in whitespace-separated words.
    pub word_count_histogram: Vec<HistogramBucket>,
    /// Mean message length in words.
    pub mean_word_count: f64,
}

const HISTOGRAM_BUCKET_WIDTH: usize = 10;
const HISTOGRAM_MAX_BUCKETS: usize = 20;

impl DatasetStats {
    /// Compute statistics over `dataset`. Fails on an empty dataset.
    pub fn compute(dataset: &CleanedDataset) -> Result<Self> {
        if dataset.records.is_empty() {
            return Err(MaydayError::insufficient_data(
                "cannot compute statistics over an empty dataset",
            ));
        }

        let mut genre_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut positives = vec![0usize; dataset.vocabulary.len()];
        let mut word_counts = Vec::with_capacity(dataset.records.len());

        for record in &dataset.records {
            *genre_counts.entry(record.genre.clone()).or_insert(0) += 1;
            for (slot, &value) in positives.iter_mut().zip(record.labels.iter()) {
                if value == 1 {
                    *slot += 1;
                }
            }
            word_counts.push(record.message.split_whitespace().count());
        }

        let label_counts = dataset
            .vocabulary
            .iter()
            .zip(positives)
            .map(|(label, count)| LabelCount {
                label: label.to_string(),
                count,
            })
            .collect();

        let total_words: usize = word_counts.iter().sum();
        let mean_word_count = total_words as f64 / word_counts.len() as f64;

        Ok(DatasetStats {
            n_records: dataset.records.len(),
            n_labels: dataset.vocabulary.len(),
            genre_counts,
            label_counts,
            word_count_histogram: histogram(&word_counts),
            mean_word_count,
        })
    }
}

/// Fixed-width histogram of word counts. The last bucket is open-ended
/// when the longest message would exceed the bucket cap.
fn histogram(word_counts: &[usize]) -> Vec<HistogramBucket> {
    let max = word_counts.iter().copied().max().unwrap_or(0);
    let n_buckets = (max / HISTOGRAM_BUCKET_WIDTH + 1).min(HISTOGRAM_MAX_BUCKETS);

    let mut buckets: Vec<HistogramBucket> = (0..n_buckets)
        .map(|i| HistogramBucket {
            lower: i * HISTOGRAM_BUCKET_WIDTH,
            upper: (i + 1) * HISTOGRAM_BUCKET_WIDTH,
            count: 0,
        })
        .collect();

    for &words in word_counts {
        let index = (words / HISTOGRAM_BUCKET_WIDTH).min(n_buckets - 1);
        buckets[index].count += 1;
    }

    if let Some(last) = buckets.last_mut() {
        if max >= last.upper {
            last.upper = max + 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::CleanedRecord;
    use crate::dataset::codec::CategoryCodec;

    fn dataset() -> CleanedDataset {
        let vocabulary =
            CategoryCodec::derive_vocabulary("related-1;water-0;food-0").unwrap();
        let record = |id: i64, message: &str, genre: &str, labels: Vec<u8>| CleanedRecord {
            id,
            message: message.to_string(),
            original: None,
            genre: genre.to_string(),
            labels,
        };
        CleanedDataset {
            vocabulary,
            records: vec![
                record(1, "we need water now", "direct", vec![1, 1, 0]),
                record(2, "food shortage reported", "news", vec![1, 0, 1]),
                record(3, "all clear", "news", vec![0, 0, 0]),
                record(4, "send water and food", "social", vec![2, 1, 1]),
            ],
        }
    }

    #[test]
    fn test_genre_counts_sorted() {
        let stats = DatasetStats::compute(&dataset()).unwrap();
        let genres: Vec<(&str, usize)> = stats
            .genre_counts
            .iter()
            .map(|(g, &c)| (g.as_str(), c))
            .collect();
        assert_eq!(genres, vec![("direct", 1), ("news", 2), ("social", 1)]);
    }

    #[test]
    fn test_label_counts_only_exact_ones() {
        let stats = DatasetStats::compute(&dataset()).unwrap();
        // record 4 carries a pass-through 2 for "related"; it is not a positive
        assert_eq!(stats.label_counts[0].label, "related");
        assert_eq!(stats.label_counts[0].count, 2);
        assert_eq!(stats.label_counts[1].count, 2);
        assert_eq!(stats.label_counts[2].count, 2);
    }

    #[test]
    fn test_word_count_histogram() {
        let stats = DatasetStats::compute(&dataset()).unwrap();
        assert_eq!(stats.n_records, 4);
        // all four messages are under ten words
        assert_eq!(stats.word_count_histogram.len(), 1);
        assert_eq!(stats.word_count_histogram[0].count, 4);
        let expected_mean = (4 + 3 + 2 + 4) as f64 / 4.0;
        assert!((stats.mean_word_count - expected_mean).abs() < 1e-9);
    }

    #[test]
    fn test_empty_dataset_fails() {
        let mut data = dataset();
        data.records.clear();
        let err = DatasetStats::compute(&data).unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }
}
