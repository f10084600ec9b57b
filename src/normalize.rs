//! The normalizer (spec §4.2): makes downstream pattern matching tractable.
//!
//! Operations, in order: line-ending unification, a neologdn-equivalent
//! Japanese-aware transform, Unicode NFKC, zero-width stripping,
//! whitespace-only-line collapsing, and verbatim restoration of delimiter
//! runs that the transform would otherwise shorten or re-shape.

use crate::error::ExtractionError;
use crate::model::NormalizedEmail;
use crate::patterns::is_separator_line;
use unicode_normalization::UnicodeNormalization;

/// Characters considered zero-width and stripped unconditionally
/// (U+200B–U+200D, U+FEFF, U+2060).
fn is_zero_width(c: char) -> bool {
    matches!(c, '\u{200B}'..='\u{200D}' | '\u{FEFF}' | '\u{2060}')
}

/// The three tilde-like glyphs neologdn-equivalent normalization folds to a
/// single canonical `~`. Unlike fullwidth ASCII / halfwidth katakana, these
/// are not Unicode-compatibility-equivalent to each other, so NFKC alone
/// would leave a wave dash (U+301C) and a fullwidth tilde (U+FF5E) as two
/// different characters.
fn is_tilde_variant(c: char) -> bool {
    matches!(c, '\u{301C}' | '\u{FF5E}' | '~')
}

/// Japanese-aware transform applied before NFKC: collapses runs of the
/// prolonged-sound mark (`ー`) to one, and folds tilde variants to `~`.
/// Width normalization (fullwidth ASCII ↔ halfwidth, halfwidth katakana ↔
/// fullwidth) is left to the subsequent NFKC pass, which already handles
/// those via Unicode compatibility decomposition.
fn neologdn_equivalent(line: &str) -> String {
    let mut result = String::with_capacity(line.len());
    let mut prev_was_prolonged_mark = false;
    for c in line.chars() {
        if c == 'ー' {
            if prev_was_prolonged_mark {
                continue;
            }
            prev_was_prolonged_mark = true;
            result.push(c);
            continue;
        }
        prev_was_prolonged_mark = false;

        if is_tilde_variant(c) {
            result.push('~');
        } else {
            result.push(c);
        }
    }
    result
}

/// Runs the full normalization pipeline over raw email text.
///
/// # Errors
/// Returns [`ExtractionError::InvalidInput`] when `text` is empty or
/// contains no non-whitespace character.
pub fn normalize(text: &str) -> Result<NormalizedEmail, ExtractionError> {
    if text.trim().is_empty() {
        return Err(ExtractionError::InvalidInput(
            "input is empty or contains no non-whitespace character".into(),
        ));
    }

    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let lines = unified
        .split('\n')
        .map(|raw_line| {
            // Preserve delimiter runs verbatim: check the separator
            // predicate before any width/shape transform would touch it.
            if is_separator_line(raw_line) {
                return raw_line.to_string();
            }

            let transformed: String = neologdn_equivalent(raw_line).nfkc().collect();
            let stripped: String = transformed.chars().filter(|&c| !is_zero_width(c)).collect();

            if stripped.trim().is_empty() {
                String::new()
            } else {
                stripped
            }
        })
        .collect();

    log::trace!("normalize: produced {} lines", unified.matches('\n').count() + 1);

    Ok(NormalizedEmail::new(lines))
}
