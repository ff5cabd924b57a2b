//! Versioned, checksummed model artifact.
//!
//! Layout on disk: 4 magic bytes, a little-endian format version, the
//! CRC32 of the payload, the payload length, then the bincode payload.
//! Any mismatch in magic, version, length, or checksum is an
//! `ArtifactVersion` error; the loader never attempts partial
//! reconstruction.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dataset::codec::LabelVocabulary;
use crate::error::{MaydayError, Result};
use crate::features::TfidfVectorizer;
use crate::model::multioutput::MultiOutputForest;
use crate::model::trainer::HyperParams;

const MAGIC: [u8; 4] = *b"MAYD";

/// Current artifact format version. Bump on any payload layout change.
pub const FORMAT_VERSION: u32 = 1;

/// Everything needed to reproduce inference without retraining.
///
/// Immutable after creation; safe to share read-only across any number
/// of concurrent inference callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// When the training run finished.
    pub trained_at: DateTime<Utc>,
    /// Identifier of the training run that produced this artifact.
    pub run_id: Uuid,
    /// Frozen vocabulary and IDF weights.
    pub vectorizer: TfidfVectorizer,
    /// Ordered label names.
    pub label_vocabulary: LabelVocabulary,
    /// One fitted forest per label.
    pub model: MultiOutputForest,
    /// Hyperparameters selected by the grid search.
    pub hyper_params: HyperParams,
}

impl ModelArtifact {
    /// Bundle a training run's outputs into an artifact.
    pub fn new(
        vectorizer: TfidfVectorizer,
        label_vocabulary: LabelVocabulary,
        model: MultiOutputForest,
        hyper_params: HyperParams,
    ) -> Self {
        ModelArtifact {
            trained_at: Utc::now(),
            run_id: Uuid::new_v4(),
            vectorizer,
            label_vocabulary,
            model,
            hyper_params,
        }
    }

    /// Serialize and write the artifact to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let payload = bincode::serialize(self)
            .map_err(|e| MaydayError::other(format!("artifact serialization failed: {e}")))?;
        let checksum = crc32fast::hash(&payload);

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(&MAGIC)?;
        writer.write_u32::<LittleEndian>(FORMAT_VERSION)?;
        writer.write_u32::<LittleEndian>(checksum)?;
        writer.write_u64::<LittleEndian>(payload.len() as u64)?;
        writer.write_all(&payload)?;
        writer.flush()?;

        info!(
            "saved model artifact (run {}, {} bytes) to {}",
            self.run_id,
            payload.len(),
            path.display()
        );
        Ok(())
    }

    /// Load and verify an artifact from `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);

        let mut magic = [0u8; 4];
        reader.read_exact(&mut magic).map_err(|_| {
            MaydayError::artifact_version("file is too short to be a model artifact")
        })?;
        if magic != MAGIC {
            return Err(MaydayError::artifact_version(
                "file is not a mayday model artifact",
            ));
        }

        let version = reader.read_u32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(MaydayError::artifact_version(format!(
                "unsupported artifact format version {version}, expected {FORMAT_VERSION}"
            )));
        }

        let checksum = reader.read_u32::<LittleEndian>()?;
        let length = reader.read_u64::<LittleEndian>()? as usize;

        let mut payload = vec![0u8; length];
        reader.read_exact(&mut payload).map_err(|_| {
            MaydayError::artifact_version("artifact payload is truncated")
        })?;

        if crc32fast::hash(&payload) != checksum {
            return Err(MaydayError::artifact_version(
                "artifact payload is corrupt (checksum mismatch)",
            ));
        }

        bincode::deserialize(&payload).map_err(|e| {
            MaydayError::artifact_version(format!("artifact payload failed to decode: {e}"))
        })
    }
}
