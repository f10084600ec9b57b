//! The structural analyzer (spec §4.4): quote depth, forward/reply headers,
//! and delimiter flags computed purely from content lines. Blanks never
//! reach this stage — they were filtered out upstream.

use crate::model::{AnnotatedLine, ContentLine};
use crate::patterns::{is_forward_reply_header, is_separator_line};

/// Leading quote markers counted toward `quote_depth`.
const QUOTE_MARKERS: &[char] = &['>', '｜', '|'];

/// The structural facts computed over a full run of content lines, plus the
/// per-line annotations themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralAnalysis {
    pub lines: Vec<AnnotatedLine>,
    pub has_quotes: bool,
    pub has_forward_reply: bool,
    pub first_quoted_index: Option<usize>,
    pub last_quoted_index: Option<usize>,
}

/// Counts consecutive leading quote markers on a trimmed line, allowing a
/// single space between markers (e.g. `"> > text"` has depth 2).
fn quote_depth(trimmed: &str) -> usize {
    let mut depth = 0;
    let mut chars = trimmed.chars().peekable();

    loop {
        match chars.peek() {
            Some(c) if QUOTE_MARKERS.contains(c) => {
                depth += 1;
                chars.next();
                if chars.peek() == Some(&' ') {
                    chars.next();
                }
            }
            _ => break,
        }
    }

    depth
}

/// Runs the structural analyzer over a content-line sequence.
pub fn analyze_structure(content_lines: &[ContentLine]) -> StructuralAnalysis {
    let mut lines = Vec::with_capacity(content_lines.len());
    let mut preceded_by_delimiter = false;
    let mut first_quoted_index = None;
    let mut last_quoted_index = None;

    for (content_index, content) in content_lines.iter().enumerate() {
        let trimmed = content.text.trim_start_matches(|c: char| c == ' ' || c == '\t');
        let depth = quote_depth(trimmed);
        let is_delimiter = is_separator_line(content.trimmed());
        let is_forward_reply = is_forward_reply_header(content.trimmed());

        if depth > 0 {
            first_quoted_index.get_or_insert(content_index);
            last_quoted_index = Some(content_index);
        }

        lines.push(AnnotatedLine {
            content: content.clone(),
            quote_depth: depth,
            is_forward_reply_header: is_forward_reply,
            is_delimiter,
            preceded_by_delimiter,
        });

        preceded_by_delimiter = is_delimiter;
    }

    let has_quotes = first_quoted_index.is_some();
    let has_forward_reply = lines.iter().any(|l| l.is_forward_reply_header);

    log::trace!(
        "structural_analyzer: {} lines, has_quotes={has_quotes}, has_forward_reply={has_forward_reply}",
        lines.len()
    );

    StructuralAnalysis {
        lines,
        has_quotes,
        has_forward_reply,
        first_quoted_index,
        last_quoted_index,
    }
}
