//! Splits a problem body into description, example, constraint and follow-up regions.
//!
//! Regions are borrowed slices of the raw HTML; rewriting happens in the
//! consumers so each can pick its own output mode.

use crate::markers::{
    find_from, CONSTRAINTS_MARKER, EXAMPLE_MARKER, EXAMPLE_TAG, FOLLOW_UP_MARKER, PARAGRAPH_END,
};
use crate::rewrite::to_markdown;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExampleRegion<'a> {
    /// Ordinal as written in the `Example N:` marker.
    pub label: Option<u32>,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    pub description: &'a str,
    pub examples: Vec<ExampleRegion<'a>>,
    pub constraints: Option<&'a str>,
    pub follow_up: Option<&'a str>,
}

pub fn segment(html: &str) -> Segments<'_> {
    Segments {
        description: description_region(html),
        examples: example_regions(html),
        constraints: constraints_region(html),
        follow_up: follow_up_region(html),
    }
}

/// Description rendered as markdown; examples and everything after are excluded.
pub fn extract_description(html: &str) -> String {
    to_markdown(description_region(html))
}

/// Everything before the first `Example N:` marker, or the whole body.
pub fn description_region(html: &str) -> &str {
    match EXAMPLE_MARKER.find(html) {
        Some(marker) => html[..marker.start()].trim(),
        None => html,
    }
}

/// Example bodies in source order. Each runs from its marker to the next
/// example tag, the constraints marker, or the end of the body.
pub fn example_regions(html: &str) -> Vec<ExampleRegion<'_>> {
    let mut regions = Vec::new();
    let mut cursor = 0;
    while let Some(caps) = EXAMPLE_MARKER.captures_at(html, cursor) {
        let Some(marker) = caps.get(0) else {
            break;
        };
        let start = marker.end();
        let end = [
            find_from(&EXAMPLE_TAG, html, start),
            find_from(&CONSTRAINTS_MARKER, html, start),
        ]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(html.len());
        let label = caps.get(1).and_then(|m| m.as_str().parse().ok());
        regions.push(ExampleRegion {
            label,
            body: &html[start..end],
        });
        cursor = end.max(start);
    }
    regions
}

/// Text after `Constraints:` up to a follow-up marker, another example, or the end.
pub fn constraints_region(html: &str) -> Option<&str> {
    let marker = CONSTRAINTS_MARKER.find(html)?;
    let start = marker.end();
    let end = [
        find_from(&FOLLOW_UP_MARKER, html, start),
        find_from(&EXAMPLE_TAG, html, start),
    ]
    .into_iter()
    .flatten()
    .min()
    .unwrap_or(html.len());
    Some(&html[start..end])
}

/// Text after `Follow up:` up to the closing paragraph, or the end.
pub fn follow_up_region(html: &str) -> Option<&str> {
    let marker = FOLLOW_UP_MARKER.find(html)?;
    let start = marker.end();
    let end = find_from(&PARAGRAPH_END, html, start).unwrap_or(html.len());
    Some(html[start..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = concat!(
        "<p>Intro.</p>",
        "<p><strong class=\"example\">Example 1:</strong></p><pre>one</pre>",
        "<p><strong class=\"example\">Example 2:</strong></p><pre>two</pre>",
        "<p><strong>Constraints:</strong></p><ul><li>c</li></ul>",
        "<p><strong>Follow up:</strong> faster?</p><p>tail</p>",
    );

    #[test]
    fn splits_all_regions() {
        let segments = segment(BODY);
        assert_eq!(segments.description, "<p>Intro.</p><p>");
        assert_eq!(segments.examples.len(), 2);
        assert_eq!(segments.examples[0].label, Some(1));
        assert_eq!(segments.examples[0].body, "</p><pre>one</pre><p>");
        assert_eq!(segments.examples[1].body, "</p><pre>two</pre><p>");
        assert_eq!(segments.constraints, Some("</p><ul><li>c</li></ul><p>"));
        assert_eq!(segments.follow_up, Some("faster?"));
    }

    #[test]
    fn no_marker_means_whole_body_is_description() {
        let html = "<p>Only <em>text</em>.</p>";
        let segments = segment(html);
        assert_eq!(segments.description, html);
        assert!(segments.examples.is_empty());
        assert_eq!(extract_description(html), "Only *text*.");
    }

    #[test]
    fn missing_follow_up_is_none_and_empty_one_is_some() {
        assert_eq!(follow_up_region("<p>nothing</p>"), None);
        assert_eq!(follow_up_region("<p><strong>Follow up:</strong></p>"), Some(""));
    }

    #[test]
    fn constraints_stop_at_a_later_example() {
        let html = concat!(
            "<strong>Constraints:</strong> a<br>b",
            "<strong class=\"example\">Example 9:</strong> late",
        );
        assert_eq!(constraints_region(html), Some(" a<br>b"));
    }

    #[test]
    fn example_runs_to_end_without_terminator() {
        let html = "<strong class='example'>Example 3:</strong> last one";
        let regions = example_regions(html);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].label, Some(3));
        assert_eq!(regions[0].body, " last one");
    }
}
