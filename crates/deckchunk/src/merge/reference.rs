use regex::Regex;
use std::sync::LazyLock;

/// Prefix used when none is given and none can be inferred.
pub const DEFAULT_PREFIX: &str = "IT_XX";

static PAGE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)P").expect("static page pattern"));

static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d+)\b").expect("static number pattern"));

static LOCAL_SEQUENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_(\d+)$").expect("static sequence pattern"));

static PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(IT_[A-Z]+)_").expect("static prefix pattern"));

/// Extracts the page number a `reference` points at.
///
/// The first `<N>P` token wins (`"12P"`, `"Doc v1 12P"`,
/// `"5P (see 3P)"`). Failing that, the first standalone number is read as the
/// page (`"7"`, `"페이지 12"`). Digits glued to letters or underscores, as in
/// `"v1"` or `"CHUNK1_002"`, are never a page.
pub fn page_number(reference: &str) -> Option<u32> {
    let caps = PAGE_TOKEN
        .captures(reference)
        .or_else(|| BARE_NUMBER.captures(reference))?;
    caps[1].parse().ok()
}

/// Extracts the trailing sequence number of a chunk-local identifier, e.g.
/// `15` from `"CHUNK2_015"`.
pub fn local_sequence(id: &str) -> Option<u32> {
    LOCAL_SEQUENCE
        .captures(id)
        .and_then(|caps| caps[1].parse().ok())
}

/// Infers the document prefix (`IT_<LETTERS>`) from a test case identifier.
pub fn infer_prefix(id: &str) -> Option<&str> {
    PREFIX.captures(id).and_then(|caps| caps.get(1)).map(|m| m.as_str())
}

/// The part of a merged identifier before its `_<N>` sequence, e.g. `"PROJ"`
/// from `"PROJ_007"`.
pub fn sequence_prefix(id: &str) -> Option<&str> {
    LOCAL_SEQUENCE
        .find(id)
        .map(|m| &id[..m.start()])
        .filter(|prefix| !prefix.is_empty())
}

/// The merged identifier for 1-based position `k`: `<prefix>_<k:03>`.
pub fn global_id(prefix: &str, k: usize) -> String {
    format!("{prefix}_{k:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_page_token() {
        assert_eq!(page_number("12P"), Some(12));
        assert_eq!(page_number("Doc v1 12P"), Some(12));
        assert_eq!(page_number("5P (참조: 3P)"), Some(5));
        assert_eq!(page_number("2P (참조: CHUNK1_002)"), Some(2));
    }

    #[test]
    fn falls_back_to_first_standalone_number() {
        assert_eq!(page_number(" 7 "), Some(7));
        assert_eq!(page_number("페이지 12"), Some(12));
        assert_eq!(page_number("see [11-1]"), Some(11));
        assert_eq!(page_number("Doc v1"), None);
        assert_eq!(page_number("overview (see IT_OP_003)"), None);
        assert_eq!(page_number(""), None);
    }

    #[test]
    fn overflowing_page_is_unresolvable() {
        assert_eq!(page_number("99999999999P"), None);
    }

    #[test]
    fn reads_local_sequence() {
        assert_eq!(local_sequence("CHUNK2_015"), Some(15));
        assert_eq!(local_sequence("IT_OP_C3_007"), Some(7));
        assert_eq!(local_sequence("free-form"), None);
    }

    #[test]
    fn infers_prefix() {
        assert_eq!(infer_prefix("IT_OP_001"), Some("IT_OP"));
        assert_eq!(infer_prefix("IT_LOGIN_C2_004"), Some("IT_LOGIN"));
        assert_eq!(infer_prefix("CHUNK1_001"), None);
    }

    #[test]
    fn strips_sequence_from_merged_ids() {
        assert_eq!(sequence_prefix("PROJ_007"), Some("PROJ"));
        assert_eq!(sequence_prefix("IT_OP_001"), Some("IT_OP"));
        assert_eq!(sequence_prefix("_001"), None);
        assert_eq!(sequence_prefix("free-form"), None);
    }

    #[test]
    fn pads_global_ids() {
        assert_eq!(global_id("IT_OP", 7), "IT_OP_007");
        assert_eq!(global_id("IT_OP", 1234), "IT_OP_1234");
    }
}
