//! Keyword vocabulary for optical filters.
//!
//! Keys are matched case-insensitively as whole words, in table order; the
//! first hit wins, so longer and more specific keys come first.

use lazy_static::lazy_static;
use regex::Regex;

/// Returned when no keyword matches.
pub const UNKNOWN_FILTER: &str = "Broadband/Unknown";

pub static FILTER_KEYWORDS: &[(&str, &str)] = &[
    ("lxtrme", "L-eXtreme"),
    ("lxtreme", "L-eXtreme"),
    ("lextreme", "L-eXtreme"),
    ("l-extreme", "L-eXtreme"),
    ("lenhance", "L-eNhance"),
    ("l-enhance", "L-eNhance"),
    ("lultimate", "L-Ultimate"),
    ("l-ultimate", "L-Ultimate"),
    ("l-pro", "L-Pro"),
    ("lpro", "L-Pro"),
    ("uvir", "UV/IR Cut"),
    ("uv/ir", "UV/IR Cut"),
    ("irblock", "UV/IR Cut"),
    ("irblocked", "UV/IR Cut"),
    ("ir-block", "UV/IR Cut"),
    ("ir filter", "UV/IR Cut"),
    ("halpha", "Ha"),
    ("ha", "Ha"),
    ("h", "Ha"),
    ("oxygen", "OIII"),
    ("oiii", "OIII"),
    ("o3", "OIII"),
    ("o", "OIII"),
    ("sulphur", "SII"),
    ("sulfur", "SII"),
    ("sii", "SII"),
    ("s2", "SII"),
    ("s", "SII"),
    ("r", "Red"),
    ("g", "Green"),
    ("b", "Blue"),
    ("l", "Luminance"),
    ("cls", "CLS"),
];

lazy_static! {
    static ref WORD_PATTERNS: Vec<(Regex, &'static str)> = FILTER_KEYWORDS
        .iter()
        .map(|(key, name)| {
            let pattern = format!(r"(?i)\b{}\b", regex::escape(key));
            (Regex::new(&pattern).expect("filter keyword pattern"), *name)
        })
        .collect();

    static ref DELIMITED_PATTERNS: Vec<(Regex, &'static str)> = FILTER_KEYWORDS
        .iter()
        .map(|(key, name)| {
            let pattern = format!(r"(?i)[_\-]{}[_\-]", regex::escape(key));
            (Regex::new(&pattern).expect("filter token pattern"), *name)
        })
        .collect();
}

/// Canonical filter name for free text such as a folder name, or
/// [`UNKNOWN_FILTER`].
pub fn classify(text: &str) -> &'static str {
    WORD_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN_FILTER)
}

/// Filter keyword appearing as a `_`/`-` delimited token inside a filename.
pub fn find_delimited(file_name: &str) -> Option<&'static str> {
    DELIMITED_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(file_name))
        .map(|(_, name)| *name)
}

/// Exact (case-insensitive) vocabulary key lookup.
pub fn lookup_keyword(token: &str) -> Option<&'static str> {
    let lower = token.to_lowercase();
    FILTER_KEYWORDS
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, name)| *name)
}

pub fn is_canonical(name: &str) -> bool {
    FILTER_KEYWORDS.iter().any(|(_, canonical)| *canonical == name)
}

/// Like [`classify`], with the sentinel mapped to `None`.
pub fn resolve(text: &str) -> Option<&'static str> {
    match classify(text) {
        UNKNOWN_FILTER => None,
        name => Some(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_narrowband() {
        assert_eq!(classify("M42 Halpha night"), "Ha");
        assert_eq!(classify("session oiii"), "OIII");
        assert_eq!(classify("SII 2024"), "SII");
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("randomtext"), UNKNOWN_FILTER);
        assert_eq!(resolve("randomtext"), None);
    }

    #[test]
    fn test_classify_respects_word_boundaries() {
        // "h" must not match inside "backyard"
        assert_eq!(classify("2024-02-07 Backyard"), UNKNOWN_FILTER);
        assert_eq!(classify("2024-02-07 Backyard UVIR"), "UV/IR Cut");
    }

    #[test]
    fn test_classify_first_key_wins() {
        assert_eq!(classify("2024-02-07 Backyard L-Extreme"), "L-eXtreme");
        assert_eq!(classify("L-Pro"), "L-Pro");
    }

    #[test]
    fn test_single_letter_channels() {
        assert_eq!(classify("R"), "Red");
        assert_eq!(classify("g"), "Green");
        assert_eq!(classify("B"), "Blue");
        assert_eq!(classify("L"), "Luminance");
    }

    #[test]
    fn test_find_delimited() {
        assert_eq!(
            find_delimited("Light_M42_123deg_Bin1_PlayerOne_UVIR_gain456_001.fits"),
            Some("UV/IR Cut")
        );
        assert_eq!(find_delimited("Light_M42-oiii-001.fits"), Some("OIII"));
        assert_eq!(find_delimited("Light_M42_001.fits"), None);
    }

    #[test]
    fn test_lookup_and_canonical() {
        assert_eq!(lookup_keyword("OIII"), Some("OIII"));
        assert_eq!(lookup_keyword("Ha"), Some("Ha"));
        assert_eq!(lookup_keyword("294MC"), None);
        assert!(is_canonical("UV/IR Cut"));
        assert!(!is_canonical("uvir"));
    }
}
