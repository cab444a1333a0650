use std::sync::LazyLock;

use digest_logging::digest_debug;
use regex::Regex;

use crate::markers::LIST_ITEM;
use crate::rewrite::to_plain_text;
use crate::segment::constraints_region;

static LINE_BREAK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p\s*>|</div\s*>").expect("line break regex"));

static LEADING_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^&(?:[A-Za-z]+|#[0-9]+|#x[0-9A-Fa-f]+);").expect("entity regex"));

/// Constraint strings in source order. Empty when the body has no constraints section.
pub fn extract_constraints(html: &str) -> Vec<String> {
    match constraints_region(html) {
        Some(region) => parse_constraints(region),
        None => Vec::new(),
    }
}

/// Reads `<li>` items; without any, splits the free text into lines.
pub fn parse_constraints(region: &str) -> Vec<String> {
    let items: Vec<String> = LIST_ITEM
        .captures_iter(region)
        .filter_map(|caps| caps.get(1))
        .map(|item| to_plain_text(item.as_str()))
        .filter(|item| !item.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }

    digest_debug!("constraints: no list items, splitting free text");
    let text = to_plain_text(&LINE_BREAK_TAG.replace_all(region, "\n"));
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !LEADING_ENTITY.is_match(line))
        .map(ToOwned::to_owned)
        .collect()
}
