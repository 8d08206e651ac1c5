//! Unit tests for [`qnamaker_client::mask_key`].
//!
//! Ensures endpoint keys are masked for safe logging: first 7 chars + `***` + last 4 chars.
//! Keys of length ≤ 11 are fully masked as `***` to avoid leaking any segment.

use qnamaker_client::mask_key;

/// **Test: Short or empty keys are fully masked.**
///
/// **Expected:** Any key of length ≤ 11 returns `"***"` (no prefix/suffix shown).
#[test]
fn mask_key_short_returns_all_star() {
    assert_eq!(mask_key(""), "***");
    assert_eq!(mask_key("a"), "***");
    assert_eq!(mask_key("abcdef12"), "***");
    assert_eq!(mask_key("abcdef12345"), "***");
}

/// **Test: Long keys show first 7 and last 4 characters.**
#[test]
fn mask_key_long_shows_head_and_tail() {
    assert_eq!(mask_key("abcdefghijkl"), "abcdefg***ijkl");
    assert_eq!(mask_key("0123456789abcdefghij"), "0123456***ghij");
}

/// **Test: Typical endpoint key (GUID) format.**
///
/// **Expected:** Masked string keeps 7 leading and 4 trailing chars, total length 14.
#[test]
fn mask_key_typical_endpoint_key() {
    let key = "4a1c2e7d-90b3-4f6a-8c21-5d3e9b7f0a12";
    let masked = mask_key(key);
    assert!(masked.starts_with("4a1c2e7"));
    assert!(masked.ends_with("0a12"));
    assert_eq!(masked.len(), 7 + 3 + 4);
}

/// **Test: Non-ASCII keys are masked by character, not byte.**
#[test]
fn mask_key_non_ascii() {
    assert_eq!(mask_key("ключключключ"), "ключклю***ключ");
}
