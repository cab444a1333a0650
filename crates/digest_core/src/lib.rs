//! Digest core: pure HTML-to-record pipeline and card presenter.
mod constraints;
mod examples;
mod markers;
mod parse;
mod present;
mod rewrite;
mod segment;
mod types;

pub use constraints::{extract_constraints, parse_constraints};
pub use examples::{extract_examples, labeled_fields};
pub use parse::{extract_follow_up, parse_problem};
pub use present::{
    render_card, render_for_display, truncate_chars, DESCRIPTION_LIMIT, ELLIPSIS,
};
pub use rewrite::{
    to_markdown, to_plain_text, MarkdownRewriter, PlainTextRewriter, RewriteStep, Rewriter,
    MARKDOWN_STEPS, PLAIN_TEXT_STEPS,
};
pub use segment::{
    constraints_region, description_region, example_regions, extract_description,
    follow_up_region, segment, ExampleRegion, Segments,
};
pub use types::{
    parse_problem_id, Difficulty, Example, LabeledFields, ProblemId, ProblemRecord, ProblemSource,
};
