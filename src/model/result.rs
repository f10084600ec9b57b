//! Body-assembly output and the top-level extraction result.

use super::Label;
use serde::{Deserialize, Serialize};

/// The outcome of the body assembler (spec §4.8).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledBody {
    /// The joined text of the selected block(s); may be empty.
    pub body_text: String,
    /// Original line indices included in `body_text`, in order.
    pub body_lines: Vec<usize>,
    /// Original index of the first non-blank SIGNATURE line, if any.
    pub signature_index: Option<usize>,
    /// Number of QUOTE-labeled lines included in the body.
    pub inline_quote_count: usize,
    /// `true` iff `body_text` is non-empty.
    pub success: bool,
}

/// The three ways extraction can fail (spec §6/§7). Distinct from the
/// crate's top-level [`crate::Error`], which additionally covers
/// construction/model-loading failures that can never arise mid-extraction.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum ExtractionError {
    /// Empty input, whitespace-only input, or (at the UTF-8 boundary)
    /// non-UTF-8 bytes.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The pipeline produced an empty `AssembledBody`.
    #[error("no body detected: {0}")]
    NoBodyDetected(String),
    /// The CRF sequence probability fell below the configured threshold.
    #[error("low confidence: {message} (confidence {confidence:.3} < threshold {threshold:.3})")]
    LowConfidence {
        message: String,
        confidence: f64,
        threshold: f64,
    },
}

/// Ambient diagnostic fields attached to a successful extraction. Never
/// consulted for control flow — purely for observability (see
/// `log` points in the pipeline stages).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    pub content_line_count: usize,
    pub blank_line_count: usize,
    pub processing_note: Option<&'static str>,
}

/// The result of `extract_with_metadata`: always populated, never panics or
/// propagates an error for expected conditions (spec §6).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractionResult {
    Success {
        body: String,
        confidence: f64,
        signature_detected: bool,
        inline_quotes_included: usize,
        stats: ExtractionStats,
    },
    Failure {
        error: ExtractionError,
    },
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExtractionResult::Success { .. })
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ExtractionResult::Success { body, .. } => Some(body),
            ExtractionResult::Failure { .. } => None,
        }
    }

    pub fn confidence(&self) -> Option<f64> {
        match self {
            ExtractionResult::Success { confidence, .. } => Some(*confidence),
            ExtractionResult::Failure { .. } => None,
        }
    }
}

/// Per-label marginal map, used by `LabeledLine` and `ReconstructedLine`.
pub type Marginals = std::collections::HashMap<Label, f64>;
