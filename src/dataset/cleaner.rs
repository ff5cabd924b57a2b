//! Merge and clean raw message/category records.
//!
//! The cleaner outer-joins the two raw record sets on `id`, decodes every
//! packed category string against the derived vocabulary, and removes
//! duplicate rows by full-row equality. Row and duplicate counts are
//! logged but never enforced.

use ahash::{AHashMap, AHashSet};
use log::{info, warn};

use crate::dataset::codec::{CategoryCodec, LabelVocabulary};
use crate::dataset::{CleanedRecord, MergedRecord, RawCategoryRecord, RawMessage};
use crate::error::{MaydayError, Result};

/// What to do with a row that cannot be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MalformedRowPolicy {
    /// Abort the run on the first malformed row.
    #[default]
    Abort,
    /// Skip the row and log a warning.
    SkipAndLog,
}

/// Counters describing one cleaning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Rows in the merged input.
    pub input_rows: usize,
    /// Rows skipped as malformed (only under [`MalformedRowPolicy::SkipAndLog`]).
    pub malformed_rows: usize,
    /// Full-row duplicates removed.
    pub duplicate_rows: usize,
    /// Rows in the cleaned output.
    pub output_rows: usize,
}

/// The result of a cleaning run.
#[derive(Clone, Debug)]
pub struct CleanOutcome {
    /// Deduplicated cleaned records, in first-appearance order.
    pub records: Vec<CleanedRecord>,
    /// Label vocabulary derived from the first categorized row.
    pub vocabulary: LabelVocabulary,
    /// Row counters for the run.
    pub report: CleanReport,
}

/// Merges raw record sets and produces the cleaned dataset.
#[derive(Clone, Copy, Debug, Default)]
pub struct DataCleaner {
    policy: MalformedRowPolicy,
}

impl DataCleaner {
    /// Create a cleaner that aborts on the first malformed row.
    pub fn new() -> Self {
        DataCleaner {
            policy: MalformedRowPolicy::Abort,
        }
    }

    /// Set the malformed-row policy.
    pub fn with_policy(mut self, policy: MalformedRowPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Outer join of messages and categories on `id`.
    ///
    /// Message-side rows come first in input order; category rows with no
    /// matching message follow, also in input order. Rows present on only
    /// one side keep `None` for the other side's fields.
    pub fn merge(
        &self,
        messages: Vec<RawMessage>,
        categories: Vec<RawCategoryRecord>,
    ) -> Vec<MergedRecord> {
        let mut by_id: AHashMap<i64, String> = AHashMap::with_capacity(categories.len());
        let mut category_order: Vec<i64> = Vec::with_capacity(categories.len());
        for record in categories {
            if by_id.insert(record.id, record.categories).is_none() {
                category_order.push(record.id);
            }
        }

        let mut matched: AHashSet<i64> = AHashSet::with_capacity(messages.len());
        let mut merged: Vec<MergedRecord> = messages
            .into_iter()
            .map(|m| {
                matched.insert(m.id);
                MergedRecord {
                    id: m.id,
                    categories: by_id.get(&m.id).cloned(),
                    message: Some(m.message),
                    original: m.original,
                    genre: Some(m.genre),
                }
            })
            .collect();

        for id in category_order {
            if !matched.contains(&id) {
                merged.push(MergedRecord {
                    id,
                    message: None,
                    original: None,
                    genre: None,
                    categories: by_id.get(&id).cloned(),
                });
            }
        }

        merged
    }

    /// Decode categories, drop the packed field, and deduplicate.
    ///
    /// The label vocabulary is derived from the first row that carries a
    /// packed string; every subsequent row must match it exactly.
    pub fn clean(&self, merged: Vec<MergedRecord>) -> Result<CleanOutcome> {
        if merged.is_empty() {
            return Err(MaydayError::insufficient_data(
                "merged dataset contains no rows",
            ));
        }

        let vocabulary = merged
            .iter()
            .find_map(|row| row.categories.as_deref())
            .ok_or_else(|| MaydayError::data_format("no row carries a packed category string"))
            .and_then(CategoryCodec::derive_vocabulary)?;

        let input_rows = merged.len();
        let mut malformed_rows = 0usize;
        let mut cleaned: Vec<CleanedRecord> = Vec::with_capacity(input_rows);

        for row in merged {
            match Self::decode_row(row, &vocabulary) {
                Ok(record) => cleaned.push(record),
                Err(e) => match self.policy {
                    MalformedRowPolicy::Abort => return Err(e),
                    MalformedRowPolicy::SkipAndLog => {
                        warn!("skipping malformed row: {e}");
                        malformed_rows += 1;
                    }
                },
            }
        }

        let before_dedup = cleaned.len();
        let records = Self::deduplicate(cleaned);
        let report = CleanReport {
            input_rows,
            malformed_rows,
            duplicate_rows: before_dedup - records.len(),
            output_rows: records.len(),
        };

        info!(
            "cleaned dataset: {} rows in, {} malformed, {} duplicates removed, {} rows out",
            report.input_rows, report.malformed_rows, report.duplicate_rows, report.output_rows
        );

        if records.is_empty() {
            return Err(MaydayError::insufficient_data(
                "cleaned dataset contains no rows",
            ));
        }

        Ok(CleanOutcome {
            records,
            vocabulary,
            report,
        })
    }

    /// Remove duplicate rows by full-row equality, keeping first occurrences.
    ///
    /// Rows that differ in any field, including a single label bit, are
    /// both retained.
    pub fn deduplicate(records: Vec<CleanedRecord>) -> Vec<CleanedRecord> {
        let mut seen: AHashSet<CleanedRecord> = AHashSet::with_capacity(records.len());
        records
            .into_iter()
            .filter(|record| seen.insert(record.clone()))
            .collect()
    }

    fn decode_row(row: MergedRecord, vocabulary: &LabelVocabulary) -> Result<CleanedRecord> {
        let id = row.id;
        let attach_row = |e: MaydayError| match e {
            MaydayError::DataFormat { message, .. } => MaydayError::data_format_at(id, message),
            other => other,
        };

        let packed = row
            .categories
            .ok_or_else(|| MaydayError::data_format_at(id, "row has no category string"))?;
        let message = row
            .message
            .ok_or_else(|| MaydayError::data_format_at(id, "row has no message"))?;
        let labels = CategoryCodec::decode(&packed, vocabulary).map_err(attach_row)?;

        Ok(CleanedRecord {
            id,
            message,
            original: row.original,
            genre: row.genre.unwrap_or_default(),
            labels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: i64, text: &str) -> RawMessage {
        RawMessage {
            id,
            message: text.to_string(),
            original: None,
            genre: "direct".to_string(),
        }
    }

    fn category(id: i64, packed: &str) -> RawCategoryRecord {
        RawCategoryRecord {
            id,
            categories: packed.to_string(),
        }
    }

    #[test]
    fn test_merge_outer_join() {
        let cleaner = DataCleaner::new();
        let merged = cleaner.merge(
            vec![message(1, "need water"), message(2, "fire downtown")],
            vec![category(2, "related-1;fire-1"), category(3, "related-0;fire-0")],
        );

        assert_eq!(merged.len(), 3);
        // message-only row keeps None categories
        assert_eq!(merged[0].id, 1);
        assert!(merged[0].categories.is_none());
        // matched row has both sides
        assert_eq!(merged[1].id, 2);
        assert_eq!(merged[1].categories.as_deref(), Some("related-1;fire-1"));
        // category-only row keeps None message fields
        assert_eq!(merged[2].id, 3);
        assert!(merged[2].message.is_none());
    }

    #[test]
    fn test_clean_decodes_rows() {
        let cleaner = DataCleaner::new();
        let merged = cleaner.merge(
            vec![message(1, "need water"), message(2, "all fine")],
            vec![
                category(1, "related-1;request-1"),
                category(2, "related-0;request-0"),
            ],
        );

        let outcome = cleaner.clean(merged).unwrap();
        assert_eq!(outcome.vocabulary.names(), &["related", "request"]);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.records[0].labels, vec![1, 1]);
        assert_eq!(outcome.records[1].labels, vec![0, 0]);
    }

    #[test]
    fn test_clean_removes_exact_duplicates() {
        let cleaner = DataCleaner::new();
        // two byte-identical rows after merge
        let merged = cleaner.merge(
            vec![message(1, "need water"), message(1, "need water")],
            vec![category(1, "related-1;request-1")],
        );

        let outcome = cleaner.clean(merged).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.duplicate_rows, 1);
    }

    #[test]
    fn test_dedup_keeps_rows_differing_by_one_label_bit() {
        let base = CleanedRecord {
            id: 5,
            message: "need water".to_string(),
            original: None,
            genre: "direct".to_string(),
            labels: vec![1, 0],
        };
        let mut flipped = base.clone();
        flipped.labels = vec![1, 1];

        let deduped = DataCleaner::deduplicate(vec![base.clone(), flipped.clone()]);
        assert_eq!(deduped, vec![base, flipped]);
    }

    #[test]
    fn test_dedup_idempotent() {
        let records = vec![
            CleanedRecord {
                id: 1,
                message: "a".to_string(),
                original: None,
                genre: "direct".to_string(),
                labels: vec![1],
            },
            CleanedRecord {
                id: 1,
                message: "a".to_string(),
                original: None,
                genre: "direct".to_string(),
                labels: vec![1],
            },
            CleanedRecord {
                id: 2,
                message: "b".to_string(),
                original: None,
                genre: "news".to_string(),
                labels: vec![0],
            },
        ];

        let once = DataCleaner::deduplicate(records);
        let twice = DataCleaner::deduplicate(once.clone());
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_clean_abort_on_malformed_row() {
        let cleaner = DataCleaner::new();
        let merged = cleaner.merge(
            vec![message(1, "fine"), message(2, "truncated")],
            vec![
                category(1, "related-1;request-0"),
                category(2, "related-1"), // one token short
            ],
        );

        let err = cleaner.clean(merged).unwrap_err();
        match err {
            MaydayError::DataFormat { row, .. } => assert_eq!(row, Some(2)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_clean_skip_and_log_policy() {
        let cleaner = DataCleaner::new().with_policy(MalformedRowPolicy::SkipAndLog);
        let merged = cleaner.merge(
            vec![message(1, "fine"), message(2, "truncated")],
            vec![
                category(1, "related-1;request-0"),
                category(2, "related-1"),
            ],
        );

        let outcome = cleaner.clean(merged).unwrap();
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.malformed_rows, 1);
    }

    #[test]
    fn test_clean_empty_input() {
        let cleaner = DataCleaner::new();
        let err = cleaner.clean(Vec::new()).unwrap_err();
        assert!(matches!(err, MaydayError::InsufficientData(_)));
    }
}
