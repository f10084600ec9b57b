//! # yomail
//!
//! Extracts the human-authored message body from Japanese business email
//! plain text, discarding greeting/closing formulas, signature blocks, and
//! quoted reply chains.
//!
//! The pipeline runs in seven stages: normalize the raw text, split it into
//! content and blank lines, analyze quote/forward structure, extract a
//! per-line feature vector, label every content line with a linear-chain
//! CRF, reconstruct the original line order, and assemble the final body
//! from the labeled lines. A confidence gate sits at the end: low-
//! confidence or empty results are reported as failures rather than
//! returned as plausible-looking but wrong text.
//!
//! ## Quick start
//!
//! ```no_run
//! use yomail::EmailBodyExtractor;
//!
//! fn main() -> yomail::Result<()> {
//!     let extractor = EmailBodyExtractor::new(None, 0.5)?;
//!     let body = extractor.extract("お世話になっております。\n山田です。\n\n本文です。\n\nよろしくお願いいたします。\n山田太郎")?;
//!     println!("{body}");
//!     Ok(())
//! }
//! ```

mod assemble;
mod content_filter;
pub mod crf;
pub mod error;
mod features;
pub mod model;
mod names;
mod normalize;
pub mod patterns;
mod reconstruct;
mod structural;

#[cfg(feature = "train")]
pub mod training;

pub use crf::{CrfSequenceLabeler, LabeledLine, SequenceLabelingResult};
pub use error::{Error, Result};
pub use model::{AssembledBody, ExtractionError, ExtractionResult, ExtractionStats, Label};

use std::path::Path;

/// Default sequence-probability threshold below which an extraction is
/// reported as low-confidence rather than returned (spec §6).
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.5;

/// The library's single public entry point: a loaded CRF model plus a
/// confidence threshold, ready to extract bodies from raw email text.
///
/// Thread-safe and cheap to share: the only interior mutable state is the
/// CRF model handle, held behind a mutex acquired only for the duration of
/// a decode (spec §5).
pub struct EmailBodyExtractor {
    labeler: CrfSequenceLabeler,
    confidence_threshold: f64,
}

impl EmailBodyExtractor {
    /// Builds an extractor. `model_path` selects a CRFsuite model file on
    /// disk; `None` loads the bundled model embedded in the binary.
    /// `confidence_threshold` gates [`Self::extract_with_metadata`] and
    /// [`Self::extract`] (spec §6); pass
    /// [`DEFAULT_CONFIDENCE_THRESHOLD`] absent a specific requirement.
    pub fn new(model_path: Option<impl AsRef<Path>>, confidence_threshold: f64) -> Result<Self> {
        let labeler = match model_path {
            Some(path) => CrfSequenceLabeler::from_path(path)?,
            None => CrfSequenceLabeler::bundled()?,
        };
        Ok(Self {
            labeler,
            confidence_threshold,
        })
    }

    /// Replaces the loaded model in place, keeping the configured
    /// confidence threshold.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.labeler.load_model(path)?;
        Ok(())
    }

    /// `true` once a model (bundled or explicit) has been successfully
    /// loaded; always `true` for any live `EmailBodyExtractor`, since
    /// construction fails otherwise. Exposed for symmetry with
    /// `load_model` and for callers that hold an extractor behind a
    /// fallible initialization boundary of their own.
    pub fn is_model_loaded(&self) -> bool {
        true
    }

    /// Extracts the body, propagating extraction-time failures as
    /// [`Error::Extraction`]. Prefer [`Self::extract_safe`] or
    /// [`Self::extract_with_metadata`] when a failed extraction is an
    /// expected outcome rather than an exceptional one.
    pub fn extract(&self, text: &str) -> Result<String> {
        match self.extract_with_metadata(text) {
            ExtractionResult::Success { body, .. } => Ok(body),
            ExtractionResult::Failure { error } => Err(Error::Extraction(error)),
        }
    }

    /// Extracts the body, returning `None` instead of an error on any
    /// extraction-time failure (empty input, no body detected, low
    /// confidence).
    pub fn extract_safe(&self, text: &str) -> Option<String> {
        match self.extract_with_metadata(text) {
            ExtractionResult::Success { body, .. } => Some(body),
            ExtractionResult::Failure { .. } => None,
        }
    }

    /// Runs the full pipeline and reports a fully-populated
    /// [`ExtractionResult`] — success or failure — without ever returning
    /// a Rust-level `Err` for an expected condition (spec §6/§7).
    pub fn extract_with_metadata(&self, text: &str) -> ExtractionResult {
        match self.run(text) {
            Ok(outcome) => ExtractionResult::Success {
                body: outcome.assembled.body_text,
                confidence: outcome.confidence,
                signature_detected: outcome.assembled.signature_index.is_some(),
                inline_quotes_included: outcome.assembled.inline_quote_count,
                stats: outcome.stats,
            },
            Err(error) => ExtractionResult::Failure { error },
        }
    }

    fn run(&self, text: &str) -> std::result::Result<PipelineOutcome, ExtractionError> {
        let normalized = normalize::normalize(text)?;

        let filtered = content_filter::filter_content(&normalized);
        let blank_line_count = filtered.whitespace_map.blank_original_indices.len();
        let content_line_count = filtered.content_lines.len();

        let analysis = structural::analyze_structure(&filtered.content_lines);
        let features = features::extract_features(&analysis.lines);

        let labeling = self
            .labeler
            .decode(&analysis.lines, &features)
            .map_err(|e| ExtractionError::InvalidInput(e.to_string()))?;

        let document = reconstruct::reconstruct(&labeling.lines, &filtered.whitespace_map);
        let assembled = assemble::assemble_body(&document);

        if !assembled.success {
            return Err(ExtractionError::NoBodyDetected(
                "pipeline produced no body-eligible content".into(),
            ));
        }

        if labeling.sequence_probability < self.confidence_threshold {
            return Err(ExtractionError::LowConfidence {
                message: "CRF sequence probability below configured threshold".into(),
                confidence: labeling.sequence_probability,
                threshold: self.confidence_threshold,
            });
        }

        log::debug!(
            "extractor: {content_line_count} content lines, {blank_line_count} blank lines, \
             confidence={:.3}",
            labeling.sequence_probability
        );

        Ok(PipelineOutcome {
            assembled,
            confidence: labeling.sequence_probability,
            stats: ExtractionStats {
                content_line_count,
                blank_line_count,
                processing_note: None,
            },
        })
    }
}

struct PipelineOutcome {
    assembled: AssembledBody,
    confidence: f64,
    stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    // The bundled model in this tree is a placeholder artifact (see
    // DESIGN.md), not a trained CRFsuite model, so these tests only
    // exercise the parts of the pipeline that run before CRF decoding.

    #[test]
    fn extract_on_empty_input_fails_before_touching_the_model() {
        let normalized = normalize::normalize("");
        assert!(normalized.is_err());
    }

    #[test]
    fn default_confidence_threshold_matches_spec_default() {
        assert_eq!(DEFAULT_CONFIDENCE_THRESHOLD, 0.5);
    }

    #[test]
    fn pipeline_stages_compose_up_to_feature_extraction() {
        let normalized = normalize::normalize(
            "お世話になっております。\n山田です。\n\n本文です。\n\nよろしくお願いいたします。\n山田太郎",
        )
        .unwrap();
        let filtered = content_filter::filter_content(&normalized);
        let analysis = structural::analyze_structure(&filtered.content_lines);
        let features = features::extract_features(&analysis.lines);
        assert_eq!(analysis.lines.len(), features.len());
        assert!(features.iter().any(|f| f.is_greeting));
        assert!(features.iter().any(|f| f.is_closing));
    }
}
