//! The content filter (spec §4.3): splits normalized lines into content
//! lines and blank positions, preserving enough information to reconstruct
//! the original document later.

use crate::model::{ContentLine, NormalizedEmail, WhitespaceMap};

/// The output of the content filter: content lines plus the whitespace map
/// needed to reinsert blanks after labeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredContent {
    pub content_lines: Vec<ContentLine>,
    pub whitespace_map: WhitespaceMap,
}

/// Splits `email` into content lines (non-empty after trim) and blank
/// positions.
///
/// Invariant (spec §4.3): for two adjacent content lines with no blanks
/// between them, the first has `blank_lines_after == 0` and the second has
/// `blank_lines_before == 0`. Trailing blanks at end-of-document are
/// attributed to the last content line's `blank_lines_after`.
pub fn filter_content(email: &NormalizedEmail) -> FilteredContent {
    let lines = email.lines();
    let mut content_lines: Vec<ContentLine> = Vec::new();
    let mut content_indices: Vec<usize> = Vec::new();
    let mut blank_original_indices: Vec<usize> = Vec::new();

    let mut pending_blanks = 0usize;

    for (original_index, line) in lines.iter().enumerate() {
        if line.trim().is_empty() {
            blank_original_indices.push(original_index);
            pending_blanks += 1;
            continue;
        }

        if let Some(last) = content_lines.last_mut() {
            last.blank_lines_after = pending_blanks;
        }

        content_lines.push(ContentLine {
            original_index,
            text: line.clone(),
            blank_lines_before: pending_blanks,
            blank_lines_after: 0,
        });
        content_indices.push(original_index);
        pending_blanks = 0;
    }

    // Trailing blanks at end-of-document belong to the last content line.
    if let Some(last) = content_lines.last_mut() {
        last.blank_lines_after = pending_blanks;
    }

    log::trace!(
        "content_filter: {} content lines, {} blank lines",
        content_lines.len(),
        blank_original_indices.len()
    );

    FilteredContent {
        content_lines,
        whitespace_map: WhitespaceMap {
            content_indices,
            blank_original_indices,
            original_line_count: lines.len(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(lines: &[&str]) -> NormalizedEmail {
        NormalizedEmail::new(lines.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn separates_content_from_blank_lines() {
        let email = normalized(&["greeting", "", "body", "closing"]);
        let filtered = filter_content(&email);
        assert_eq!(filtered.content_lines.len(), 3);
        assert_eq!(filtered.whitespace_map.blank_original_indices, vec![1]);
    }

    #[test]
    fn adjacent_content_lines_have_zero_blanks_between() {
        let email = normalized(&["a", "b"]);
        let filtered = filter_content(&email);
        assert_eq!(filtered.content_lines[0].blank_lines_after, 0);
        assert_eq!(filtered.content_lines[1].blank_lines_before, 0);
    }

    #[test]
    fn counts_blank_lines_before_and_after() {
        let email = normalized(&["", "", "a", "", "", "", "b"]);
        let filtered = filter_content(&email);
        assert_eq!(filtered.content_lines[0].blank_lines_before, 2);
        assert_eq!(filtered.content_lines[0].blank_lines_after, 3);
        assert_eq!(filtered.content_lines[1].blank_lines_before, 0);
    }

    #[test]
    fn trailing_blanks_attributed_to_last_content_line() {
        let email = normalized(&["a", "b", "", ""]);
        let filtered = filter_content(&email);
        assert_eq!(filtered.content_lines[1].blank_lines_after, 2);
    }

    #[test]
    fn all_blank_document_yields_no_content_lines() {
        let email = normalized(&["", "", ""]);
        let filtered = filter_content(&email);
        assert!(filtered.content_lines.is_empty());
        assert_eq!(filtered.whitespace_map.blank_original_indices.len(), 3);
    }

    #[test]
    fn whitespace_map_partitions_original_line_count() {
        let email = normalized(&["a", "", "b", "", "c"]);
        let filtered = filter_content(&email);
        let map = &filtered.whitespace_map;
        let mut all_indices: Vec<usize> = map.content_indices.clone();
        all_indices.extend(&map.blank_original_indices);
        all_indices.sort_unstable();
        assert_eq!(all_indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(map.original_line_count, 5);
    }

    #[test]
    fn content_indices_strictly_increasing() {
        let email = normalized(&["a", "", "b", "c", "", "d"]);
        let filtered = filter_content(&email);
        let indices = &filtered.whitespace_map.content_indices;
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }
}
