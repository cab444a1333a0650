use digest_logging::digest_debug;

use crate::constraints::extract_constraints;
use crate::examples::extract_examples;
use crate::rewrite::{to_markdown, to_plain_text};
use crate::segment::{extract_description, follow_up_region};
use crate::types::{ProblemRecord, ProblemSource};

/// Follow-up text, `None` when the body has no follow-up marker.
pub fn extract_follow_up(html: &str) -> Option<String> {
    follow_up_region(html).map(to_plain_text)
}

/// Runs the full pipeline over one problem page. Never fails; malformed
/// markup degrades into raw or absent fields.
pub fn parse_problem(source: &ProblemSource) -> ProblemRecord {
    let html = source.html_body.as_str();
    let record = ProblemRecord {
        id: source.id,
        slug: source.slug.clone(),
        title: source.title.clone(),
        difficulty: source.difficulty,
        description: extract_description(html),
        examples: extract_examples(html),
        constraints: extract_constraints(html),
        follow_up: extract_follow_up(html),
        topics: source.topics.clone(),
        hints: source.hints.clone(),
        url: source.url.clone(),
        markdown: to_markdown(html),
    };
    digest_debug!(
        "parsed problem {} ({}): {} examples, {} constraints, follow-up: {}",
        record.id,
        record.slug,
        record.examples.len(),
        record.constraints.len(),
        record.follow_up.is_some()
    );
    record
}
