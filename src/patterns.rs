//! Pattern library: independent predicates over a single normalized line.
//!
//! All patterns match against *normalized* text (spec §4.2 has already run),
//! so width variants and half-width katakana need not be enumerated here.
//! Every regex is compiled once, at first use, via `LazyLock` — callers must
//! never pay per-line compilation cost (spec §4.1).
//!
//! Changes to these patterns are model-breaking (spec §9): feature quality
//! for the CRF depends on them, so a reimplementation must ship the same
//! pattern semantics or retrain.

use crate::names::contains_known_name as names_contains_known_name;
use regex::Regex;
use std::sync::LazyLock;

/// Delimiter glyphs a separator line may repeat (spec §3 NormalizedEmail
/// invariant, §4.1 `is_separator_line`).
pub const DELIMITER_GLYPHS: &[char] =
    &['-', '─', '━', '=', '＝', '_', '*', '★', '☆'];

/// A small curated set of discourse markers feeding `has_meta_discussion`
/// (spec §4.5, §9 Open Question (b)). Kept here, not hardcoded in the
/// feature extractor, so it can be extended without touching feature-vector
/// layout.
pub const META_DISCUSSION_MARKERS: &[&str] =
    &["例えば", "以下の", "サンプル", "参考まで", "参考に", "下記の", "添付の"];

static RE_GREETING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(お世話になっております|お世話になります|いつもお世話|拝啓|前略|お疲れ様です|お疲れさまです|ご無沙汰しております|初めてご連絡|突然のご連絡失礼)",
    )
    .unwrap()
});

static RE_CLOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(よろしくお願いいたします|よろしくお願い致します|よろしくお願いします|申し上げます|^以上[、,]|敬具|草々|ご確認(?:の)?(?:ほど)?よろしく|お手数(?:ですが|をおかけ)|何卒)",
    )
    .unwrap()
});

static RE_TEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(TEL|電話)[:：]?\s*[\d０-９\-‐―ー 　]{6,}").unwrap()
});

static RE_FAX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(FAX|ファックス)[:：]?\s*[\d０-９\-‐―ー 　]{6,}").unwrap());

static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://|www\.)[^\s]+").unwrap());

static RE_POSTAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"〒\s*\d{3}-?\d{4}").unwrap());

static RE_COMPANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(株式会社|有限会社|合同会社|\(株\)|\(有\))").unwrap()
});

static RE_POSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(部長|課長|係長|マネージャー|代表取締役|取締役|代表|担当|主任|室長|次長|本部長)").unwrap()
});

static RE_NAME_STRUCTURAL: LazyLock<Regex> = LazyLock::new(|| {
    // Two short kanji/katakana runs separated by a single space, e.g. "山田 太郎".
    Regex::new(r"^[\p{Han}ァ-ヶー]{1,4}[ 　][\p{Han}ァ-ヶー]{1,4}$").unwrap()
});

static RE_FORWARD_REPLY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^-{3,}\s*Original\ Message\s*-{3,}$
        | ^-{3,}\s*Forwarded\ message\s*-{3,}$
        | ^On\ .+\ wrote:$
        | ^\d{4}年\d{1,2}月\d{1,2}日.*\d{1,2}:\d{2}.*(wrote:|さんは書きました)$
        | ^差出人[:：]
        | ^転送[:：]?$
        | ^返信[:：]?$
        ",
    )
    .unwrap()
});

static RE_INSIDE_QUOTATION_MARKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[「『].*[」』]$").unwrap());

/// True iff the line contains a formula that opens a Japanese business
/// email (spec §4.1).
pub fn is_greeting_line(line: &str) -> bool {
    RE_GREETING.is_match(line)
}

/// True iff the line contains a formula that closes a Japanese business
/// email (spec §4.1).
pub fn is_closing_line(line: &str) -> bool {
    RE_CLOSING.is_match(line)
}

/// True iff the trimmed line consists of ≥3 repetitions of one delimiter
/// glyph, optionally with a decorative terminator (e.g. `★---★`).
pub fn is_separator_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }
    let chars: Vec<char> = trimmed.chars().collect();

    // Pure run: every char the same delimiter glyph, at least 3 of them.
    if chars.len() >= 3
        && DELIMITER_GLYPHS.contains(&chars[0])
        && chars.iter().all(|&c| c == chars[0])
    {
        return true;
    }

    // Decorated run: one leading and one trailing glyph bracketing a run of
    // ≥3 of a (possibly different) delimiter glyph, e.g. `★---★`.
    if chars.len() >= 5 {
        let first = chars[0];
        let last = *chars.last().unwrap();
        if DELIMITER_GLYPHS.contains(&first) && first == last {
            let inner = &chars[1..chars.len() - 1];
            if inner.len() >= 3 && DELIMITER_GLYPHS.contains(&inner[0]) && inner.iter().all(|&c| c == inner[0])
            {
                return true;
            }
        }
    }

    false
}

/// True iff the line contains phone, fax, email, URL, or postal-code shaped
/// contact information.
pub fn is_contact_info_line(line: &str) -> bool {
    RE_TEL.is_match(line)
        || RE_FAX.is_match(line)
        || RE_EMAIL.is_match(line)
        || RE_URL.is_match(line)
        || RE_POSTAL.is_match(line)
}

/// True iff the line names a company via a common suffix.
pub fn is_company_line(line: &str) -> bool {
    RE_COMPANY.is_match(line)
}

/// True iff the line contains a job title / position marker.
pub fn is_position_line(line: &str) -> bool {
    RE_POSITION.is_match(line)
}

/// True iff the trimmed line has the structural shape of a Japanese
/// surname + given name (two short runs separated by a single space).
pub fn is_name_line(line: &str) -> bool {
    RE_NAME_STRUCTURAL.is_match(line.trim())
}

/// True iff the line contains any bundled known surname as a substring.
pub fn contains_known_name(line: &str) -> bool {
    names_contains_known_name(line)
}

/// True iff the line is a forward/reply thread header
/// (`-----Original Message-----`, `On ... wrote:`, `差出人:`, etc.).
pub fn is_forward_reply_header(line: &str) -> bool {
    RE_FORWARD_REPLY_HEADER.is_match(line.trim())
}

/// True iff the line begins and ends with a matching Japanese quotation
/// bracket (`「...」` or `『...』`).
pub fn is_inside_quotation_marks(line: &str) -> bool {
    RE_INSIDE_QUOTATION_MARKS.is_match(line.trim())
}

/// True iff the line contains one of the curated discourse markers that
/// signal meta-discussion about attachments/examples rather than message
/// content proper.
pub fn has_meta_discussion(line: &str) -> bool {
    META_DISCUSSION_MARKERS.iter().any(|marker| line.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_formulas_match() {
        assert!(is_greeting_line("お世話になっております。"));
        assert!(is_greeting_line("いつもお世話になっております、山田です。"));
        assert!(!is_greeting_line("資料を添付いたします。"));
    }

    #[test]
    fn closing_formulas_match() {
        assert!(is_closing_line("よろしくお願いいたします。"));
        assert!(is_closing_line("以上、ご確認のほどよろしくお願いします。"));
        assert!(!is_closing_line("資料を添付いたします。"));
    }

    #[test]
    fn separator_requires_three_repeats_of_same_glyph() {
        assert!(is_separator_line("---"));
        assert!(is_separator_line("=================="));
        assert!(!is_separator_line("--"));
        assert!(!is_separator_line("-=-"));
    }

    #[test]
    fn separator_allows_decorative_terminator() {
        assert!(is_separator_line("★---★"));
        assert!(is_separator_line("☆━━━━☆"));
    }

    #[test]
    fn contact_info_detects_tel_email_url_postal() {
        assert!(is_contact_info_line("TEL: 03-1234-5678"));
        assert!(is_contact_info_line("info@example.co.jp宛にご連絡ください"));
        assert!(is_contact_info_line("https://example.com/path"));
        assert!(is_contact_info_line("〒100-0001"));
        assert!(!is_contact_info_line("資料を添付いたします"));
    }

    #[test]
    fn company_and_position_patterns() {
        assert!(is_company_line("株式会社テスト"));
        assert!(is_company_line("(株)テスト"));
        assert!(is_position_line("営業部長"));
        assert!(!is_company_line("資料を添付いたします"));
    }

    #[test]
    fn name_structural_pattern_matches_space_separated_kanji() {
        assert!(is_name_line("山田 太郎"));
        assert!(!is_name_line("資料を添付いたします"));
    }

    #[test]
    fn known_surname_substring_detection() {
        assert!(contains_known_name("山田太郎"));
        assert!(!contains_known_name("ありがとうございます"));
    }

    #[test]
    fn forward_reply_headers_detected() {
        assert!(is_forward_reply_header("-----Original Message-----"));
        assert!(is_forward_reply_header(
            "---------- Forwarded message ----------"
        ));
        assert!(is_forward_reply_header("差出人: 山田太郎"));
        assert!(!is_forward_reply_header("資料を添付いたします"));
    }

    #[test]
    fn inside_quotation_marks_requires_matching_brackets() {
        assert!(is_inside_quotation_marks("「了解しました」"));
        assert!(is_inside_quotation_marks("『資料』"));
        assert!(!is_inside_quotation_marks("「了解しました"));
    }

    #[test]
    fn meta_discussion_markers_detected() {
        assert!(has_meta_discussion("例えば、以下のようにご対応ください"));
        assert!(!has_meta_discussion("資料を添付いたします"));
    }
}
