//! Dataset records and the ETL that produces the cleaned training table.
//!
//! Two raw record sets (messages and packed category strings) are joined on
//! their `id` key, category strings are decoded into fixed-length binary
//! label vectors, and exact duplicate rows are dropped. The result is the
//! cleaned dataset every downstream stage (training, statistics, the
//! dashboard) reads.

pub mod cleaner;
pub mod codec;
pub mod store;

pub use cleaner::{CleanOutcome, CleanReport, DataCleaner, MalformedRowPolicy};
pub use codec::{CategoryCodec, LabelVocabulary};
pub use store::CleanedDataset;

use serde::{Deserialize, Serialize};

/// A raw message record, as read from the messages input file.
///
/// Identity is the `id` field; the join with category records happens on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Message identifier shared with the category record set.
    pub id: i64,
    /// The (translated) message text.
    pub message: String,
    /// The message in its original language, when different.
    #[serde(default)]
    pub original: Option<String>,
    /// Source channel of the message (e.g. "direct", "news", "social").
    pub genre: String,
}

/// A raw category record: one packed category string per message id.
///
/// The packed format is `"name-value;name-value;..."` with the same label
/// name ordering on every row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawCategoryRecord {
    /// Message identifier shared with the message record set.
    pub id: i64,
    /// Semicolon-separated `"<name>-<value>"` tokens.
    pub categories: String,
}

/// One row of the outer join of messages and categories.
///
/// Rows present on only one side keep `None` for the other side's fields.
#[derive(Clone, Debug, PartialEq)]
pub struct MergedRecord {
    pub id: i64,
    pub message: Option<String>,
    pub original: Option<String>,
    pub genre: Option<String>,
    pub categories: Option<String>,
}

/// A cleaned record: message fields plus the decoded binary label vector.
///
/// `labels` has exactly one entry per [`LabelVocabulary`] name, in
/// vocabulary order. Equality and hashing cover every field, so
/// deduplication only collapses true full-row repeats.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub id: i64,
    pub message: String,
    #[serde(default)]
    pub original: Option<String>,
    pub genre: String,
    /// Binary label vector aligned with the label vocabulary.
    pub labels: Vec<u8>,
}
