//! The feature extractor (spec §4.5): ~37 per-content-line features feeding
//! the CRF. Numeric features use content-line indices (`i` in `0..N`), not
//! original line indices.

use crate::model::AnnotatedLine;
use crate::patterns;

/// ±2 content-line window used by the contextual-window features.
const WINDOW_RADIUS: usize = 2;

/// Maximum content-line distance between two visual-separator lines for
/// them to be considered a matched bracket pair (spec §4.5, §9 Open
/// Question (a)).
const MAX_BRACKET_SPAN: usize = 15;

/// The full per-content-line feature vector (spec §4.5).
#[derive(Debug, Clone, PartialEq)]
pub struct LineFeatures {
    // Positional (6)
    pub position_normalized: f64,
    pub position_reverse: f64,
    pub lines_from_start: usize,
    pub lines_from_end: usize,
    pub position_rel_first_quote: f64,
    pub position_rel_last_quote: f64,

    // Content (9)
    pub line_length: usize,
    pub kanji_ratio: f64,
    pub hiragana_ratio: f64,
    pub katakana_ratio: f64,
    pub ascii_letter_ratio: f64,
    pub digit_ratio: f64,
    pub symbol_ratio: f64,
    pub leading_whitespace: usize,
    pub trailing_whitespace: usize,

    // Whitespace context (2)
    pub blank_lines_before: usize,
    pub blank_lines_after: usize,

    // Structural (4)
    pub quote_depth: usize,
    pub is_forward_reply_header: bool,
    pub preceded_by_delimiter: bool,
    pub is_delimiter: bool,

    // Pattern flags (9)
    pub is_greeting: bool,
    pub is_closing: bool,
    pub has_contact_info: bool,
    pub has_company_pattern: bool,
    pub has_position_pattern: bool,
    pub has_name_pattern: bool,
    pub is_visual_separator: bool,
    pub has_meta_discussion: bool,
    pub is_inside_quotation_marks: bool,

    // Contextual window (5)
    pub window_greeting_count: usize,
    pub window_closing_count: usize,
    pub window_contact_count: usize,
    pub window_quoted_count: usize,
    pub window_separator_count: usize,

    // Bracket block (2)
    pub in_bracketed_section: bool,
    pub bracket_has_signature_patterns: bool,
}

/// Per-line flags computed once and reused across positional/window/bracket
/// feature computation, to avoid recomputing regex matches per window.
struct LineFlags {
    is_greeting: bool,
    is_closing: bool,
    has_contact_info: bool,
    is_quoted: bool,
    is_separator: bool,
    has_signature_pattern: bool,
}

fn compute_flags(line: &AnnotatedLine) -> LineFlags {
    let text = line.text();
    let has_company = patterns::is_company_line(text);
    let has_position = patterns::is_position_line(text);
    let has_name =
        patterns::is_name_line(text) || patterns::contains_known_name(text);
    let has_contact_info = patterns::is_contact_info_line(text);
    LineFlags {
        is_greeting: patterns::is_greeting_line(text),
        is_closing: patterns::is_closing_line(text),
        has_contact_info,
        is_quoted: line.is_quoted(),
        is_separator: line.is_delimiter,
        has_signature_pattern: has_contact_info || has_company || has_position || has_name,
    }
}

/// Finds matched bracket pairs (content-line index bounds, inclusive),
/// preferring the innermost (smallest-gap) matches first and leaving
/// separators with no partner within `MAX_BRACKET_SPAN` unmatched — the
/// resolution of spec §9 Open Question (a).
fn find_bracket_blocks(is_separator: &[bool]) -> Vec<(usize, usize)> {
    let sep_positions: Vec<usize> = is_separator
        .iter()
        .enumerate()
        .filter_map(|(i, &sep)| sep.then_some(i))
        .collect();

    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
    for a in 0..sep_positions.len() {
        for b in (a + 1)..sep_positions.len() {
            let gap = sep_positions[b] - sep_positions[a];
            if gap <= MAX_BRACKET_SPAN {
                candidates.push((gap, a, b));
            }
        }
    }
    candidates.sort_by_key(|&(gap, a, _)| (gap, a));

    let mut used = vec![false; sep_positions.len()];
    let mut blocks = Vec::new();
    for (_, a, b) in candidates {
        if !used[a] && !used[b] {
            used[a] = true;
            used[b] = true;
            blocks.push((sep_positions[a], sep_positions[b]));
        }
    }
    blocks.sort_by_key(|&(s, _)| s);
    blocks
}

fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

fn is_kanji(c: char) -> bool {
    matches!(c as u32, 0x4E00..=0x9FFF | 0x3400..=0x4DBF)
}

fn is_hiragana(c: char) -> bool {
    matches!(c as u32, 0x3041..=0x309F)
}

fn is_katakana(c: char) -> bool {
    matches!(c as u32, 0x30A0..=0x30FF)
}

/// Extracts the feature vector for every content line.
pub fn extract_features(lines: &[AnnotatedLine]) -> Vec<LineFeatures> {
    let n = lines.len();
    let denom = (n.saturating_sub(1)).max(1) as f64;

    let flags: Vec<LineFlags> = lines.iter().map(compute_flags).collect();
    let is_separator: Vec<bool> = flags.iter().map(|f| f.is_separator).collect();
    let bracket_blocks = find_bracket_blocks(&is_separator);

    let first_quoted = flags.iter().position(|f| f.is_quoted);
    let last_quoted = flags.iter().rposition(|f| f.is_quoted);

    let mut in_bracket = vec![false; n];
    let mut bracket_has_signature = vec![false; n];
    for &(start, end) in &bracket_blocks {
        let has_sig = (start..=end).any(|i| flags[i].has_signature_pattern);
        for i in start..=end {
            in_bracket[i] = true;
            bracket_has_signature[i] = has_sig;
        }
    }

    (0..n)
        .map(|i| {
            let line = &lines[i];
            let text = line.text();
            let chars: Vec<char> = text.chars().collect();
            let non_ws_chars: Vec<char> =
                chars.iter().copied().filter(|c| !c.is_whitespace()).collect();
            let non_ws_total = non_ws_chars.len();

            let kanji = non_ws_chars.iter().filter(|&&c| is_kanji(c)).count();
            let hiragana = non_ws_chars.iter().filter(|&&c| is_hiragana(c)).count();
            let katakana = non_ws_chars.iter().filter(|&&c| is_katakana(c)).count();
            let ascii_letter = non_ws_chars.iter().filter(|c| c.is_ascii_alphabetic()).count();
            let digit = non_ws_chars.iter().filter(|c| c.is_ascii_digit()).count();
            let symbol = non_ws_chars
                .iter()
                .filter(|&&c| {
                    !is_kanji(c)
                        && !is_hiragana(c)
                        && !is_katakana(c)
                        && !c.is_ascii_alphabetic()
                        && !c.is_ascii_digit()
                        && !c.is_alphanumeric()
                })
                .count();

            let leading_whitespace =
                chars.iter().take_while(|c| c.is_whitespace()).count();
            let trailing_whitespace =
                chars.iter().rev().take_while(|c| c.is_whitespace()).count();

            let window_start = i.saturating_sub(WINDOW_RADIUS);
            let window_end = (i + WINDOW_RADIUS).min(n.saturating_sub(1));
            let window = &flags[window_start..=window_end];

            LineFeatures {
                position_normalized: i as f64 / denom,
                position_reverse: 1.0 - (i as f64 / denom),
                lines_from_start: i,
                lines_from_end: n - 1 - i,
                position_rel_first_quote: first_quoted
                    .map(|fq| (i as f64 - fq as f64) / denom)
                    .unwrap_or(0.0),
                position_rel_last_quote: last_quoted
                    .map(|lq| (i as f64 - lq as f64) / denom)
                    .unwrap_or(0.0),

                line_length: chars.len(),
                kanji_ratio: ratio(kanji, non_ws_total),
                hiragana_ratio: ratio(hiragana, non_ws_total),
                katakana_ratio: ratio(katakana, non_ws_total),
                ascii_letter_ratio: ratio(ascii_letter, non_ws_total),
                digit_ratio: ratio(digit, non_ws_total),
                symbol_ratio: ratio(symbol, non_ws_total),
                leading_whitespace,
                trailing_whitespace,

                blank_lines_before: line.content.blank_lines_before,
                blank_lines_after: line.content.blank_lines_after,

                quote_depth: line.quote_depth,
                is_forward_reply_header: line.is_forward_reply_header,
                preceded_by_delimiter: line.preceded_by_delimiter,
                is_delimiter: line.is_delimiter,

                is_greeting: flags[i].is_greeting,
                is_closing: flags[i].is_closing,
                has_contact_info: flags[i].has_contact_info,
                has_company_pattern: patterns::is_company_line(text),
                has_position_pattern: patterns::is_position_line(text),
                has_name_pattern: patterns::is_name_line(text)
                    || patterns::contains_known_name(text),
                is_visual_separator: flags[i].is_separator,
                has_meta_discussion: patterns::has_meta_discussion(text),
                is_inside_quotation_marks: patterns::is_inside_quotation_marks(text),

                window_greeting_count: window.iter().filter(|f| f.is_greeting).count(),
                window_closing_count: window.iter().filter(|f| f.is_closing).count(),
                window_contact_count: window.iter().filter(|f| f.has_contact_info).count(),
                window_quoted_count: window.iter().filter(|f| f.is_quoted).count(),
                window_separator_count: window.iter().filter(|f| f.is_separator).count(),

                in_bracketed_section: in_bracket[i],
                bracket_has_signature_patterns: bracket_has_signature[i],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_filter::filter_content;
    use crate::model::NormalizedEmail;
    use crate::structural::analyze_structure;

    fn features_for(lines: &[&str]) -> Vec<LineFeatures> {
        let email = NormalizedEmail::new(lines.iter().map(|s| s.to_string()).collect());
        let filtered = filter_content(&email);
        let analysis = analyze_structure(&filtered.content_lines);
        extract_features(&analysis.lines)
    }

    #[test]
    fn positional_features_span_zero_to_one() {
        let features = features_for(&["a", "b", "c"]);
        assert_eq!(features[0].position_normalized, 0.0);
        assert_eq!(features[2].position_normalized, 1.0);
        assert_eq!(features[0].position_reverse, 1.0);
        assert_eq!(features[2].lines_from_end, 0);
    }

    #[test]
    fn single_content_line_does_not_divide_by_zero() {
        let features = features_for(&["only line"]);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].position_normalized, 0.0);
    }

    #[test]
    fn content_ratios_sum_at_most_one() {
        let features = features_for(&["お世話になっております123abc！"]);
        let f = &features[0];
        let total = f.kanji_ratio
            + f.hiragana_ratio
            + f.katakana_ratio
            + f.ascii_letter_ratio
            + f.digit_ratio
            + f.symbol_ratio;
        assert!(total <= 1.0001);
        assert!(f.hiragana_ratio > 0.0);
        assert!(f.digit_ratio > 0.0);
        assert!(f.ascii_letter_ratio > 0.0);
    }

    #[test]
    fn pattern_flags_reflect_pattern_library() {
        let features = features_for(&["お世話になっております。"]);
        assert!(features[0].is_greeting);
        assert!(!features[0].is_closing);
    }

    #[test]
    fn window_counts_include_current_line_and_neighbors() {
        let features = features_for(&[
            "お世話になっております。",
            "資料を送ります。",
            "よろしくお願いいたします。",
        ]);
        // Window for the middle line (radius 2, only 3 lines total) covers
        // the whole document.
        assert_eq!(features[1].window_greeting_count, 1);
        assert_eq!(features[1].window_closing_count, 1);
    }

    #[test]
    fn windowed_counts_unaffected_by_content_outside_radius() {
        let lines = vec![
            "greeting お世話になっております。",
            "filler 1",
            "filler 2",
            "filler 3",
            "closing よろしくお願いいたします。",
        ];
        let features = features_for(&lines);
        // Line index 2 ("filler 2") has window [0,4]... radius 2 covers the
        // whole 5-line doc, so instead check a line whose window excludes
        // the far end: index 0's window is [0,2], excluding the closing line.
        assert_eq!(features[0].window_closing_count, 0);
    }

    #[test]
    fn bracket_block_detected_for_matched_separator_pair() {
        let features = features_for(&["body", "★---★", "【添付ファイルについて】", "★---★", "closing"]);
        assert!(features[1].in_bracketed_section);
        assert!(features[2].in_bracketed_section);
        assert!(features[3].in_bracketed_section);
        assert!(!features[0].in_bracketed_section);
        assert!(!features[4].in_bracketed_section);
    }

    #[test]
    fn unmatched_separator_beyond_span_is_not_bracketed() {
        let mut lines = vec!["---".to_string()];
        for i in 0..20 {
            lines.push(format!("filler {i}"));
        }
        lines.push("---".to_string());
        let refs: Vec<&str> = lines.iter().map(|s| s.as_str()).collect();
        let features = features_for(&refs);
        assert!(!features[0].in_bracketed_section);
        assert!(!features[features.len() - 1].in_bracketed_section);
    }

    #[test]
    fn bracket_signature_patterns_detected_inside_block() {
        let features = features_for(&[
            "---",
            "株式会社テスト",
            "TEL: 03-1234-5678",
            "---",
        ]);
        assert!(features[1].bracket_has_signature_patterns);
        assert!(features[2].bracket_has_signature_patterns);
    }
}
