//! Line-level representations shared by the content filter, structural
//! analyzer, feature extractor, CRF labeler, and reconstructor stages.

use super::{Label, Marginals};

/// The output of the normalizer: an ordered sequence of normalized lines.
///
/// Invariants (see spec §3 / §8): every whitespace-only line has been
/// reduced to `""`; no `\r` remains; neologdn-equivalent transforms + NFKC
/// have been applied; delimiter runs are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    lines: Vec<String>,
}

impl NormalizedEmail {
    pub(crate) fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// The normalized lines, in original order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Re-joins the lines with `\n`, the inverse of the normalizer's line
    /// split. Used for idempotence checks (spec §8 round-trips).
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// One non-empty (after trim) line from a `NormalizedEmail`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentLine {
    /// Index into the original `NormalizedEmail::lines()`.
    pub original_index: usize,
    /// The normalized line text (not trimmed).
    pub text: String,
    /// Count of adjacent blank normalized lines immediately preceding this
    /// one in the original document.
    pub blank_lines_before: usize,
    /// Count of adjacent blank normalized lines immediately following this
    /// one (trailing blanks at end-of-document count here for the last
    /// content line).
    pub blank_lines_after: usize,
}

impl ContentLine {
    /// The line's text with leading/trailing ASCII+fullwidth whitespace
    /// trimmed — the form pattern predicates and quote-depth counting work
    /// against.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}

/// Maps content-line indices back to original line positions so the
/// reconstructor can interleave blanks back in.
///
/// Invariant: `content_indices` and `blank_original_indices` partition
/// `0..original_line_count`; `content_indices` is strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitespaceMap {
    /// `content_indices[i]` is the original index of the i-th content line.
    pub content_indices: Vec<usize>,
    /// The set of original indices that are blank lines.
    pub blank_original_indices: Vec<usize>,
    pub original_line_count: usize,
}

impl WhitespaceMap {
    pub fn is_blank_at(&self, original_index: usize) -> bool {
        self.blank_original_indices.binary_search(&original_index).is_ok()
    }
}

/// A `ContentLine` enriched with structural facts (quote depth, delimiter
/// status, forward/reply header detection) computed by the structural
/// analyzer (spec §4.4) purely from content lines — blanks never reach
/// this stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub content: ContentLine,
    /// Count of leading quote markers (`>`, `｜`, `|`) on the trimmed text.
    pub quote_depth: usize,
    pub is_forward_reply_header: bool,
    pub is_delimiter: bool,
    /// True iff the previous content line (not blank) was a delimiter.
    pub preceded_by_delimiter: bool,
}

impl AnnotatedLine {
    pub fn original_index(&self) -> usize {
        self.content.original_index
    }

    pub fn text(&self) -> &str {
        &self.content.text
    }

    pub fn is_quoted(&self) -> bool {
        self.quote_depth > 0
    }
}

/// One line of the reconstructed document: either an original content line
/// carrying its CRF label, or a blank line inheriting the label of the
/// nearest preceding non-blank content line (spec §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedLine {
    pub original_index: usize,
    pub text: String,
    pub is_blank: bool,
    pub label: Option<Label>,
    pub confidence: Option<f64>,
    pub probabilities: Option<Marginals>,
}

/// The full reconstructed document in original line order, ready for body
/// assembly (spec §4.8).
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedDocument {
    pub lines: Vec<ReconstructedLine>,
}

impl ReconstructedDocument {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn get(&self, original_index: usize) -> Option<&ReconstructedLine> {
        self.lines.get(original_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_email_joins_with_newline() {
        let email = NormalizedEmail::new(vec!["a".into(), "".into(), "b".into()]);
        assert_eq!(email.joined(), "a\n\nb");
        assert_eq!(email.len(), 3);
    }

    #[test]
    fn whitespace_map_binary_search_hits_known_blanks() {
        let map = WhitespaceMap {
            content_indices: vec![0, 2, 4],
            blank_original_indices: vec![1, 3],
            original_line_count: 5,
        };
        assert!(map.is_blank_at(1));
        assert!(map.is_blank_at(3));
        assert!(!map.is_blank_at(0));
    }
}
