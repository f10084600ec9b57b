//! Error types for yomail.

use thiserror::Error;

/// Result type alias for yomail operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type covering construction, model loading, and (behind
/// the `train` feature) training. Extraction-time failures that are part
/// of ordinary operation — empty input, no body detected, low confidence —
/// live in [`crate::model::ExtractionError`] instead and surface through
/// [`crate::ExtractionResult`] rather than this type; see spec §6/§7.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error while reading a model file or training data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to load or parse a CRFsuite model artifact.
    #[error("failed to load CRF model: {0}")]
    ModelLoad(String),

    /// An extraction-time failure propagated past a call site that chose
    /// `?` over the safe `extract_safe`/`extract_with_metadata` entry
    /// points.
    #[error(transparent)]
    Extraction(#[from] crate::model::ExtractionError),

    /// CRFsuite trainer setup or optimization failed.
    #[cfg(feature = "train")]
    #[error("training error: {0}")]
    ModelTrain(String),

    /// Training JSONL was malformed or inconsistent with its declared
    /// labels.
    #[cfg(feature = "train")]
    #[error("training data error: {0}")]
    TrainingData(String),
}
