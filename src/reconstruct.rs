//! The reconstructor (spec §4.7): re-interleaves blank lines dropped by the
//! content filter back into the labeled content-line sequence, in original
//! document order, so the body assembler can reason about contiguous runs.

use crate::crf::LabeledLine;
use crate::model::{ReconstructedDocument, ReconstructedLine, WhitespaceMap};

/// Builds the full original-order document from the CRF's labeled content
/// lines and the whitespace map recorded by the content filter.
///
/// Each blank line inherits the label, confidence, and marginal
/// probabilities of the nearest preceding non-blank line; a blank with no
/// preceding content line (i.e. the document opens with blank lines) gets
/// `None` for all three.
pub fn reconstruct(labeled: &[LabeledLine], whitespace_map: &WhitespaceMap) -> ReconstructedDocument {
    let mut lines = Vec::with_capacity(whitespace_map.original_line_count);
    let mut content_iter = whitespace_map.content_indices.iter().zip(labeled.iter()).peekable();
    let mut last_seen: Option<&LabeledLine> = None;

    for original_index in 0..whitespace_map.original_line_count {
        if whitespace_map.is_blank_at(original_index) {
            lines.push(ReconstructedLine {
                original_index,
                text: String::new(),
                is_blank: true,
                label: last_seen.map(|l| l.label),
                confidence: last_seen.map(|l| l.confidence),
                probabilities: last_seen.map(|l| l.marginals.clone()),
            });
            continue;
        }

        let (&content_index, labeled_line) = content_iter
            .next()
            .expect("content_indices and blank_original_indices partition original_line_count");
        debug_assert_eq!(content_index, original_index);

        lines.push(ReconstructedLine {
            original_index,
            text: labeled_line.annotated.text().to_string(),
            is_blank: false,
            label: Some(labeled_line.label),
            confidence: Some(labeled_line.confidence),
            probabilities: Some(labeled_line.marginals.clone()),
        });
        last_seen = Some(labeled_line);
    }

    log::trace!("reconstructor: rebuilt {} original-order lines", lines.len());

    ReconstructedDocument { lines }
}
