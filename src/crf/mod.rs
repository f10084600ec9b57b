//! The CRF sequence labeler (spec §4.6): Viterbi decode plus the two
//! deterministic post-processing passes that repair forbidden label
//! transitions and unify bracketed blocks.
//!
//! Optimizer training is delegated to the CRFsuite library (spec §1); this
//! module only wraps the loaded artifact's decode/marginal/probability
//! surface. See [`train`] for the training-side interface (spec §6).

mod postprocess;
#[cfg(feature = "train")]
pub mod train;

pub use postprocess::{repair_forbidden_transitions, unify_bracket_blocks};

use crate::error::ExtractionError;
use crate::model::{AnnotatedLine, Label, Marginals};
use crate::features::LineFeatures;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Bundled model artifact, loaded when no explicit `model_path` is given to
/// [`EmailBodyExtractor::new`](crate::EmailBodyExtractor::new).
const BUNDLED_MODEL: &[u8] = include_bytes!("../../assets/bundled.crfsuite");

/// A `ContentLine` (by way of `AnnotatedLine`) after CRF assignment: the
/// chosen label, its marginal probability, and the full per-label marginal
/// map.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledLine {
    pub annotated: AnnotatedLine,
    pub label: Label,
    pub confidence: f64,
    pub marginals: Marginals,
}

/// The decoded sequence plus its joint Viterbi probability.
///
/// `sequence_probability` is reported pre-repair: running the two
/// post-processing passes (spec §4.6) never changes it, only individual
/// line labels.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceLabelingResult {
    pub lines: Vec<LabeledLine>,
    pub sequence_probability: f64,
}

impl SequenceLabelingResult {
    fn empty() -> Self {
        Self {
            lines: Vec::new(),
            sequence_probability: 0.0,
        }
    }
}

/// Wraps a loaded CRFsuite model and exposes sequence labeling over
/// `LineFeatures`.
///
/// Per spec §5: the tagger handle is the only shared mutable resource. It
/// is held behind a mutex acquired only for the duration of a Viterbi
/// decode; everything else about the labeler is immutable after
/// construction except [`CrfSequenceLabeler::load_model`].
pub struct CrfSequenceLabeler {
    model: Mutex<crfsuite::Model>,
    model_path: Option<PathBuf>,
}

impl CrfSequenceLabeler {
    /// Loads the bundled model.
    pub fn bundled() -> Result<Self, ExtractionError> {
        let model = crfsuite::Model::from_memory(BUNDLED_MODEL)
            .map_err(|e| ExtractionError::InvalidInput(format!("bundled model load failed: {e}")))?;
        Ok(Self {
            model: Mutex::new(model),
            model_path: None,
        })
    }

    /// Loads a model from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ExtractionError> {
        let path = path.as_ref();
        let model = crfsuite::Model::from_file(path)
            .map_err(|e| ExtractionError::InvalidInput(format!("model load failed: {e}")))?;
        log::debug!("crf: loaded model from {}", path.display());
        Ok(Self {
            model: Mutex::new(model),
            model_path: Some(path.to_path_buf()),
        })
    }

    /// Reloads the labeler's model from a new path, replacing the current
    /// one. This is the one mutation the labeler supports after
    /// construction (spec §5).
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<(), ExtractionError> {
        let path = path.as_ref();
        let model = crfsuite::Model::from_file(path)
            .map_err(|e| ExtractionError::InvalidInput(format!("model load failed: {e}")))?;
        *self.model.lock().unwrap() = model;
        self.model_path = Some(path.to_path_buf());
        log::debug!("crf: reloaded model from {}", path.display());
        Ok(())
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.model_path.as_deref()
    }

    /// Decodes a content-line sequence and its feature vectors into labels,
    /// applying both post-processing passes (spec §4.6) before returning.
    ///
    /// Empty input (`lines.is_empty()`) returns an empty result with
    /// `sequence_probability = 0.0` per spec's empty-sequence contract.
    pub fn decode(
        &self,
        lines: &[AnnotatedLine],
        features: &[LineFeatures],
    ) -> Result<SequenceLabelingResult, ExtractionError> {
        debug_assert_eq!(lines.len(), features.len());
        if lines.is_empty() {
            return Ok(SequenceLabelingResult::empty());
        }

        let xseq: Vec<Vec<crfsuite::Attribute>> = features
            .iter()
            .enumerate()
            .map(|(i, f)| build_attributes(f, i, features.len()))
            .collect();

        let model = self.model.lock().unwrap();
        let mut tagger = model
            .tagger()
            .map_err(|e| ExtractionError::InvalidInput(format!("tagger init failed: {e}")))?;

        let tags = tagger
            .tag(&xseq)
            .map_err(|e| ExtractionError::InvalidInput(format!("decode failed: {e}")))?;
        let sequence_probability = tagger
            .probability(&tags)
            .map_err(|e| ExtractionError::InvalidInput(format!("sequence probability failed: {e}")))?;

        let mut labeled = Vec::with_capacity(lines.len());
        for (i, (line, tag)) in lines.iter().zip(tags.iter()).enumerate() {
            let label = Label::from_str(tag)
                .ok_or_else(|| ExtractionError::InvalidInput(format!("unknown CRF tag: {tag}")))?;

            let mut marginals = Marginals::new();
            for candidate in Label::ALL {
                let p = tagger
                    .marginal(candidate.as_str(), i)
                    .map_err(|e| ExtractionError::InvalidInput(format!("marginal failed: {e}")))?;
                marginals.insert(candidate, p);
            }
            let confidence = *marginals.get(&label).unwrap_or(&0.0);

            labeled.push(LabeledLine {
                annotated: line.clone(),
                label,
                confidence,
                marginals,
            });
        }
        drop(tagger);
        drop(model);

        repair_forbidden_transitions(&mut labeled);
        unify_bracket_blocks(&mut labeled, features);

        log::trace!(
            "crf: decoded {} lines, sequence_probability={:.4}",
            labeled.len(),
            sequence_probability
        );

        Ok(SequenceLabelingResult {
            lines: labeled,
            sequence_probability,
        })
    }
}

fn pos_bucket(position_normalized: f64) -> &'static str {
    match position_normalized {
        p if p < 0.1 => "start",
        p if p < 0.35 => "early",
        p if p < 0.65 => "middle",
        p if p < 0.9 => "late",
        _ => "end",
    }
}

fn char_type(ascii_letter_ratio: f64) -> &'static str {
    if ascii_letter_ratio >= 0.7 {
        "ascii_heavy"
    } else if ascii_letter_ratio <= 0.3 {
        "japanese_heavy"
    } else {
        "mixed"
    }
}

/// Converts one content line's feature vector into the CRFsuite attribute
/// set: every numeric/boolean field from `LineFeatures` plus the
/// CRF-only derived categoricals (spec §4.5): BOS/EOS markers, pos_bucket,
/// quote_depth_cat, char_type, bracket_cat.
pub(crate) fn build_attributes(
    features: &LineFeatures,
    index: usize,
    total: usize,
) -> Vec<crfsuite::Attribute> {
    let b = |v: bool| if v { 1.0 } else { 0.0 };
    let mut attrs = vec![
        crfsuite::Attribute::new("position_normalized", features.position_normalized),
        crfsuite::Attribute::new("position_reverse", features.position_reverse),
        crfsuite::Attribute::new("lines_from_start", features.lines_from_start as f64),
        crfsuite::Attribute::new("lines_from_end", features.lines_from_end as f64),
        crfsuite::Attribute::new("position_rel_first_quote", features.position_rel_first_quote),
        crfsuite::Attribute::new("position_rel_last_quote", features.position_rel_last_quote),
        crfsuite::Attribute::new("line_length", features.line_length as f64),
        crfsuite::Attribute::new("kanji_ratio", features.kanji_ratio),
        crfsuite::Attribute::new("hiragana_ratio", features.hiragana_ratio),
        crfsuite::Attribute::new("katakana_ratio", features.katakana_ratio),
        crfsuite::Attribute::new("ascii_letter_ratio", features.ascii_letter_ratio),
        crfsuite::Attribute::new("digit_ratio", features.digit_ratio),
        crfsuite::Attribute::new("symbol_ratio", features.symbol_ratio),
        crfsuite::Attribute::new("leading_whitespace", features.leading_whitespace as f64),
        crfsuite::Attribute::new("trailing_whitespace", features.trailing_whitespace as f64),
        crfsuite::Attribute::new("blank_lines_before", features.blank_lines_before as f64),
        crfsuite::Attribute::new("blank_lines_after", features.blank_lines_after as f64),
        crfsuite::Attribute::new("quote_depth", features.quote_depth as f64),
        crfsuite::Attribute::new("is_forward_reply_header", b(features.is_forward_reply_header)),
        crfsuite::Attribute::new("preceded_by_delimiter", b(features.preceded_by_delimiter)),
        crfsuite::Attribute::new("is_delimiter", b(features.is_delimiter)),
        crfsuite::Attribute::new("is_greeting", b(features.is_greeting)),
        crfsuite::Attribute::new("is_closing", b(features.is_closing)),
        crfsuite::Attribute::new("has_contact_info", b(features.has_contact_info)),
        crfsuite::Attribute::new("has_company_pattern", b(features.has_company_pattern)),
        crfsuite::Attribute::new("has_position_pattern", b(features.has_position_pattern)),
        crfsuite::Attribute::new("has_name_pattern", b(features.has_name_pattern)),
        crfsuite::Attribute::new("is_visual_separator", b(features.is_visual_separator)),
        crfsuite::Attribute::new("has_meta_discussion", b(features.has_meta_discussion)),
        crfsuite::Attribute::new("is_inside_quotation_marks", b(features.is_inside_quotation_marks)),
        crfsuite::Attribute::new("window_greeting_count", features.window_greeting_count as f64),
        crfsuite::Attribute::new("window_closing_count", features.window_closing_count as f64),
        crfsuite::Attribute::new("window_contact_count", features.window_contact_count as f64),
        crfsuite::Attribute::new("window_quoted_count", features.window_quoted_count as f64),
        crfsuite::Attribute::new("window_separator_count", features.window_separator_count as f64),
        crfsuite::Attribute::new("in_bracketed_section", b(features.in_bracketed_section)),
        crfsuite::Attribute::new(
            "bracket_has_signature_patterns",
            b(features.bracket_has_signature_patterns),
        ),
        crfsuite::Attribute::new(
            format!("pos_bucket={}", pos_bucket(features.position_normalized)),
            1.0,
        ),
        crfsuite::Attribute::new(
            format!(
                "quote_depth_cat={}",
                if features.quote_depth > 0 { "quoted" } else { "unquoted" }
            ),
            1.0,
        ),
        crfsuite::Attribute::new(
            format!("char_type={}", char_type(features.ascii_letter_ratio)),
            1.0,
        ),
        crfsuite::Attribute::new(
            format!(
                "bracket_cat={}",
                if features.in_bracketed_section { "bracketed" } else { "unbracketed" }
            ),
            1.0,
        ),
    ];

    if index == 0 {
        attrs.push(crfsuite::Attribute::new("BOS", 1.0));
    }
    if index == total - 1 {
        attrs.push(crfsuite::Attribute::new("EOS", 1.0));
    }

    attrs
}
