//! Bundled Japanese surname list backing [`crate::patterns::contains_known_name`].
//!
//! A small curated set of common surnames, enough to push `has_name_pattern`
//! (spec §4.5) toward a useful signal without trying to be an exhaustive
//! name dictionary — that job belongs to a real morphological dictionary,
//! which is explicitly out of scope (spec §1).

/// Common Japanese surnames.
pub const KNOWN_SURNAMES: &[&str] = &[
    "佐藤", "鈴木", "高橋", "田中", "渡辺", "伊藤", "山本", "中村", "小林", "加藤",
    "吉田", "山田", "佐々木", "山口", "松本", "井上", "木村", "林", "清水", "山崎",
    "池田", "橋本", "阿部", "石川", "中島", "前田", "藤田", "小川", "岡田", "後藤",
    "長谷川", "村上", "近藤", "石井", "斎藤", "坂本", "遠藤", "青木", "藤井", "西村",
    "福田", "太田", "三浦", "岡本", "松田", "中川", "中野", "原田", "小野", "田村",
    "竹内", "金子", "和田", "中山", "石田", "上田", "森", "柴田", "酒井", "工藤",
];

/// Returns `true` if `text` contains a bundled surname as a substring.
///
/// Substring containment (not whole-token matching) because the input has
/// no tokenizer: this is a deliberately cheap heuristic feature, one signal
/// among ~37 (spec §4.5), not a name-extraction system in its own right.
pub fn contains_known_name(text: &str) -> bool {
    KNOWN_SURNAMES.iter().any(|surname| text.contains(surname))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_known_surname_in_signature_line() {
        assert!(contains_known_name("山田太郎"));
        assert!(contains_known_name("鈴木 一郎"));
    }

    #[test]
    fn rejects_line_without_known_surname() {
        assert!(!contains_known_name("資料を添付いたします"));
    }
}
