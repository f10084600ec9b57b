//! The two deterministic post-processing passes run after Viterbi decoding
//! (spec §4.6): forbidden-transition repair and bracket-block unification.
//! Neither pass touches `sequence_probability` — only individual line
//! labels and their reported confidence.

use super::LabeledLine;
use crate::features::LineFeatures;
use crate::model::{Label, Marginals};

/// Repairs two forbidden patterns the CRF's transition weights don't fully
/// rule out in practice: a CLOSING line appearing after a SIGNATURE line
/// has already started, and a CLOSING label landing on a delimiter line.
/// Each repaired line falls back to its highest-marginal label other than
/// CLOSING.
pub fn repair_forbidden_transitions(lines: &mut [LabeledLine]) {
    let mut signature_seen = false;

    for line in lines.iter_mut() {
        let forbidden = line.label == Label::Closing
            && (signature_seen || line.annotated.is_delimiter);

        if forbidden {
            let fallback = best_label_excluding(&line.marginals, Label::Closing);
            log::debug!(
                "postprocess: repairing forbidden CLOSING at original_index={} -> {fallback:?}",
                line.annotated.original_index()
            );
            line.confidence = *line.marginals.get(&fallback).unwrap_or(&line.confidence);
            line.label = fallback;
        }

        if line.label == Label::Signature {
            signature_seen = true;
        }
    }
}

fn best_label_excluding(marginals: &Marginals, exclude: Label) -> Label {
    Label::ALL
        .into_iter()
        .filter(|&label| label != exclude)
        .max_by(|a, b| {
            let pa = marginals.get(a).copied().unwrap_or(0.0);
            let pb = marginals.get(b).copied().unwrap_or(0.0);
            pa.partial_cmp(&pb).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(Label::Other)
}

/// Relabels a matched bracket block (spec §9 Open Question (a) resolution:
/// innermost-pair matching, already computed by the feature extractor) to
/// BODY or SIGNATURE by majority vote over its interior, when the block has
/// at least two interior lines and one label strictly exceeds half of them.
/// The relabel applies to the entire block, boundary delimiter lines
/// included, not just the interior the vote was computed over.
pub fn unify_bracket_blocks(lines: &mut [LabeledLine], features: &[LineFeatures]) {
    let n = lines.len();
    debug_assert_eq!(n, features.len());
    let mut i = 0;

    while i < n {
        if !features[i].in_bracketed_section {
            i += 1;
            continue;
        }

        let start = i;
        let mut end = i;
        while end + 1 < n && features[end + 1].in_bracketed_section {
            end += 1;
        }

        if end > start + 1 {
            let interior_start = start + 1;
            let interior_end = end - 1;
            let total = interior_end - interior_start + 1;

            if total >= 2 {
                let body_count = lines[interior_start..=interior_end]
                    .iter()
                    .filter(|l| l.label == Label::Body)
                    .count();
                let signature_count = lines[interior_start..=interior_end]
                    .iter()
                    .filter(|l| l.label == Label::Signature)
                    .count();

                let majority = if signature_count * 2 > total {
                    Some(Label::Signature)
                } else if body_count * 2 > total {
                    Some(Label::Body)
                } else {
                    None
                };

                if let Some(target) = majority {
                    log::debug!(
                        "postprocess: unifying bracket block [{start}, {end}] -> {target:?}"
                    );
                    for line in &mut lines[start..=end] {
                        line.confidence = *line.marginals.get(&target).unwrap_or(&line.confidence);
                        line.label = target;
                    }
                }
            }
        }

        i = end + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotatedLine, ContentLine};

    fn labeled(original_index: usize, label: Label, is_delimiter: bool) -> LabeledLine {
        let mut marginals = Marginals::new();
        for l in Label::ALL {
            marginals.insert(l, if l == label { 0.8 } else { 0.04 });
        }
        LabeledLine {
            annotated: AnnotatedLine {
                content: ContentLine {
                    original_index,
                    text: "line".into(),
                    blank_lines_before: 0,
                    blank_lines_after: 0,
                },
                quote_depth: 0,
                is_forward_reply_header: false,
                is_delimiter,
                preceded_by_delimiter: false,
            },
            label,
            confidence: 0.8,
            marginals,
        }
    }

    #[test]
    fn closing_after_signature_is_repaired() {
        let mut lines = vec![
            labeled(0, Label::Body, false),
            labeled(1, Label::Signature, false),
            labeled(2, Label::Closing, false),
        ];
        repair_forbidden_transitions(&mut lines);
        assert_ne!(lines[2].label, Label::Closing);
    }

    #[test]
    fn closing_before_signature_is_untouched() {
        let mut lines = vec![labeled(0, Label::Closing, false), labeled(1, Label::Signature, false)];
        repair_forbidden_transitions(&mut lines);
        assert_eq!(lines[0].label, Label::Closing);
    }

    #[test]
    fn closing_on_delimiter_line_is_repaired() {
        let mut lines = vec![labeled(0, Label::Closing, true)];
        repair_forbidden_transitions(&mut lines);
        assert_ne!(lines[0].label, Label::Closing);
    }

    fn feature_with_bracket(in_bracketed_section: bool) -> LineFeatures {
        LineFeatures {
            position_normalized: 0.0,
            position_reverse: 0.0,
            lines_from_start: 0,
            lines_from_end: 0,
            position_rel_first_quote: 0.0,
            position_rel_last_quote: 0.0,
            line_length: 0,
            kanji_ratio: 0.0,
            hiragana_ratio: 0.0,
            katakana_ratio: 0.0,
            ascii_letter_ratio: 0.0,
            digit_ratio: 0.0,
            symbol_ratio: 0.0,
            leading_whitespace: 0,
            trailing_whitespace: 0,
            blank_lines_before: 0,
            blank_lines_after: 0,
            quote_depth: 0,
            is_forward_reply_header: false,
            preceded_by_delimiter: false,
            is_delimiter: false,
            is_greeting: false,
            is_closing: false,
            has_contact_info: false,
            has_company_pattern: false,
            has_position_pattern: false,
            has_name_pattern: false,
            is_visual_separator: false,
            has_meta_discussion: false,
            is_inside_quotation_marks: false,
            window_greeting_count: 0,
            window_closing_count: 0,
            window_contact_count: 0,
            window_quoted_count: 0,
            window_separator_count: 0,
            in_bracketed_section,
            bracket_has_signature_patterns: false,
        }
    }

    #[test]
    fn bracket_block_majority_relabels_interior() {
        let mut lines = vec![
            labeled(0, Label::Other, true),
            labeled(1, Label::Signature, false),
            labeled(2, Label::Signature, false),
            labeled(3, Label::Body, false),
            labeled(4, Label::Other, true),
        ];
        let features: Vec<LineFeatures> = (0..5).map(|_| feature_with_bracket(true)).collect();
        unify_bracket_blocks(&mut lines, &features);
        // the boundary delimiter lines are relabeled along with the interior.
        assert_eq!(lines[0].label, Label::Signature);
        assert_eq!(lines[1].label, Label::Signature);
        assert_eq!(lines[2].label, Label::Signature);
        assert_eq!(lines[3].label, Label::Signature);
        assert_eq!(lines[4].label, Label::Signature);
    }

    #[test]
    fn bracket_block_with_single_interior_line_is_untouched() {
        let mut lines = vec![
            labeled(0, Label::Other, true),
            labeled(1, Label::Body, false),
            labeled(2, Label::Other, true),
        ];
        let features: Vec<LineFeatures> = (0..3).map(|_| feature_with_bracket(true)).collect();
        unify_bracket_blocks(&mut lines, &features);
        assert_eq!(lines[1].label, Label::Body);
    }

    #[test]
    fn no_bracket_blocks_leaves_labels_untouched() {
        let mut lines = vec![labeled(0, Label::Body, false), labeled(1, Label::Closing, false)];
        let features: Vec<LineFeatures> = (0..2).map(|_| feature_with_bracket(false)).collect();
        unify_bracket_blocks(&mut lines, &features);
        assert_eq!(lines[0].label, Label::Body);
        assert_eq!(lines[1].label, Label::Closing);
    }
}
