//! Flat-file persistence for raw and cleaned record sets.
//!
//! Raw inputs and the cleaned dataset are line-oriented JSON files: one
//! JSON object per line, with the cleaned dataset carrying a header line
//! that records the label vocabulary. Saving uses replace semantics: a
//! rerun truncates and rewrites the file, there is no incremental merge.
//! A CSV export of the cleaned table is written alongside for spreadsheet
//! consumers.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::codec::LabelVocabulary;
use crate::dataset::{CleanedRecord, RawCategoryRecord, RawMessage};
use crate::error::{MaydayError, Result};

/// The persisted cleaned dataset: vocabulary plus deduplicated records.
#[derive(Clone, Debug, PartialEq)]
pub struct CleanedDataset {
    /// Label vocabulary shared by every record's label vector.
    pub vocabulary: LabelVocabulary,
    /// Cleaned records in first-appearance order.
    pub records: Vec<CleanedRecord>,
}

/// Header line written at the top of a cleaned dataset file.
#[derive(Serialize, Deserialize)]
struct DatasetHeader {
    label_vocabulary: LabelVocabulary,
}

/// Load raw messages from a JSON-lines file.
pub fn load_messages<P: AsRef<Path>>(path: P) -> Result<Vec<RawMessage>> {
    load_lines(path.as_ref())
}

/// Load raw category records from a JSON-lines file.
pub fn load_categories<P: AsRef<Path>>(path: P) -> Result<Vec<RawCategoryRecord>> {
    load_lines(path.as_ref())
}

fn load_lines<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut records = Vec::new();
    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            MaydayError::data_format(format!(
                "{}:{}: {e}",
                path.display(),
                line_num + 1
            ))
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Save the cleaned dataset, replacing any previous file at `path`.
pub fn save_cleaned<P: AsRef<Path>>(dataset: &CleanedDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let header = DatasetHeader {
        label_vocabulary: dataset.vocabulary.clone(),
    };
    serde_json::to_writer(&mut writer, &header)?;
    writer.write_all(b"\n")?;

    for record in &dataset.records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    info!(
        "saved cleaned dataset: {} records to {}",
        dataset.records.len(),
        path.display()
    );
    Ok(())
}

/// Load a cleaned dataset written by [`save_cleaned`].
pub fn load_cleaned<P: AsRef<Path>>(path: P) -> Result<CleanedDataset> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines
        .next()
        .ok_or_else(|| MaydayError::data_format(format!("{}: empty dataset file", path.display())))??;
    let header: DatasetHeader = serde_json::from_str(&header_line).map_err(|e| {
        MaydayError::data_format(format!("{}: bad dataset header: {e}", path.display()))
    })?;

    let vocabulary = header.label_vocabulary;
    let mut records = Vec::new();
    for (line_num, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: CleanedRecord = serde_json::from_str(&line).map_err(|e| {
            MaydayError::data_format(format!("{}:{}: {e}", path.display(), line_num + 2))
        })?;
        if record.labels.len() != vocabulary.len() {
            return Err(MaydayError::data_format_at(
                record.id,
                format!(
                    "label vector length {} does not match vocabulary length {}",
                    record.labels.len(),
                    vocabulary.len()
                ),
            ));
        }
        records.push(record);
    }

    Ok(CleanedDataset {
        vocabulary,
        records,
    })
}

/// Export the cleaned dataset as a CSV flat file.
///
/// Columns: `id,message,original,genre` followed by one column per label.
pub fn export_csv<P: AsRef<Path>>(dataset: &CleanedDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let mut header = vec![
        "id".to_string(),
        "message".to_string(),
        "original".to_string(),
        "genre".to_string(),
    ];
    header.extend(dataset.vocabulary.iter().map(csv_escape));
    writeln!(writer, "{}", header.join(","))?;

    for record in &dataset.records {
        let mut row = vec![
            record.id.to_string(),
            csv_escape(&record.message),
            csv_escape(record.original.as_deref().unwrap_or("")),
            csv_escape(&record.genre),
        ];
        row.extend(record.labels.iter().map(|v| v.to_string()));
        writeln!(writer, "{}", row.join(","))?;
    }
    writer.flush()?;

    Ok(())
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
