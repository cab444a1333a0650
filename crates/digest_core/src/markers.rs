//! Region markers shared by the segmenter, the example parser and the rewriter.
//!
//! All markers are case-insensitive and tolerate extra attributes on the tag.

use std::sync::LazyLock;

use regex::Regex;

/// Opening `<strong ...>` whose class list holds the whole token `example`
/// (`example-io` does not count).
pub(crate) const EXAMPLE_OPEN_TAG: &str =
    r#"(?i)<strong\s[^>]*\bclass\s*=\s*["'](?:[^"']*\s)?example(?:\s[^"']*)?["'][^>]*>"#;

pub(crate) static EXAMPLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EXAMPLE_OPEN_TAG).expect("example tag regex"));

/// Full `Example N:` heading; group 1 is the ordinal.
pub(crate) static EXAMPLE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"{EXAMPLE_OPEN_TAG}\s*Example\s*(\d+)\s*:\s*</strong>"
    ))
    .expect("example marker regex")
});

pub(crate) static CONSTRAINTS_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong(?:\s[^>]*)?>\s*Constraints\s*:\s*</strong>")
        .expect("constraints marker regex")
});

/// `Follow up:`, `Follow-up:` and `Follow Up:` are one marker.
pub(crate) static FOLLOW_UP_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong(?:\s[^>]*)?>\s*Follow[\s-]*up\s*:\s*</strong>")
        .expect("follow-up marker regex")
});

pub(crate) static PARAGRAPH_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</p\s*>").expect("paragraph end regex"));

/// Image tag; group 1 is the `src` value.
pub(crate) static IMAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\s[^>]*?\bsrc\s*=\s*["']([^"']+)["'][^>]*>"#).expect("image regex")
});

/// Preformatted block; group 1 is the inner HTML.
pub(crate) static PRE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<pre(?:\s[^>]*)?>(.*?)</pre\s*>").expect("pre block regex")
});

/// List item; group 1 is the inner HTML.
pub(crate) static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li\s*>").expect("list item regex")
});

/// Byte offset of the first match of `re` in `haystack` at or after `from`.
pub(crate) fn find_from(re: &Regex, haystack: &str, from: usize) -> Option<usize> {
    re.find_at(haystack, from).map(|m| m.start())
}
