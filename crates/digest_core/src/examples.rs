//! Example parser.
//!
//! Source formatting is inconsistent, so each example region goes through a
//! chain of candidate scopes (the first `<pre>` block, then the whole region).
//! The first scope that yields any labeled field wins; if none does, the
//! region is kept as raw markdown.

use std::sync::LazyLock;

use digest_logging::digest_debug;
use regex::Regex;

use crate::markers::{IMAGE_TAG, PRE_BLOCK};
use crate::rewrite::{to_markdown, to_plain_text};
use crate::segment::{example_regions, ExampleRegion};
use crate::types::{Example, LabeledFields};

/// `<strong>Input:</strong>` and friends; group 1 is the label.
static FIELD_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<strong(?:\s[^>]*)?>\s*(Input|Output|Explanation)\s*:\s*</strong\s*>")
        .expect("field label regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Input,
    Output,
    Explanation,
}

impl Field {
    fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("input") {
            Some(Field::Input)
        } else if label.eq_ignore_ascii_case("output") {
            Some(Field::Output)
        } else if label.eq_ignore_ascii_case("explanation") {
            Some(Field::Explanation)
        } else {
            None
        }
    }
}

type ScopeFn = for<'a> fn(&'a str) -> Option<&'a str>;

/// Candidate scopes, tried in order.
const SCOPES: &[(&str, ScopeFn)] = &[
    ("preformatted", preformatted_scope),
    ("region", whole_region_scope),
];

pub fn extract_examples(html: &str) -> Vec<Example> {
    example_regions(html)
        .into_iter()
        .enumerate()
        .map(|(index, region)| parse_example(index, &region))
        .collect()
}

fn parse_example(index: usize, region: &ExampleRegion<'_>) -> Example {
    let position = u32::try_from(index + 1).unwrap_or(u32::MAX);
    let label = region.label.unwrap_or(position);

    let image = IMAGE_TAG
        .captures(region.body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let stripped = IMAGE_TAG.replace_all(region.body, "");
    let body: &str = &stripped;

    for (name, scope) in SCOPES {
        let Some(scope_html) = scope(body) else {
            continue;
        };
        let fields = labeled_fields(scope_html);
        if let Some(example) = Example::structured(label, fields, image.clone()) {
            digest_debug!("example {label}: fields found in {name} scope");
            return example;
        }
    }

    digest_debug!("example {label}: no labeled fields, keeping raw markdown");
    Example::raw(label, to_markdown(body.trim()), image)
}

fn preformatted_scope(body: &str) -> Option<&str> {
    PRE_BLOCK
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn whole_region_scope(body: &str) -> Option<&str> {
    Some(body)
}

/// Finds the first `Input:`, `Output:` and `Explanation:` labels in `scope`.
/// Each value runs to the next label or the end of the scope; values that
/// are empty after rewriting count as absent.
pub fn labeled_fields(scope: &str) -> LabeledFields {
    let labels: Vec<(Option<Field>, usize, usize)> = FIELD_LABEL
        .captures_iter(scope)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let field = caps.get(1).and_then(|m| Field::from_label(m.as_str()));
            Some((field, whole.start(), whole.end()))
        })
        .collect();

    let mut fields = LabeledFields::default();
    for (i, (field, _, value_start)) in labels.iter().enumerate() {
        let value_end = labels
            .get(i + 1)
            .map(|(_, next_start, _)| *next_start)
            .unwrap_or(scope.len());
        let value = to_plain_text(&scope[*value_start..value_end]);
        if value.is_empty() {
            continue;
        }
        let slot = match field {
            Some(Field::Input) => &mut fields.input,
            Some(Field::Output) => &mut fields.output,
            Some(Field::Explanation) => &mut fields.explanation,
            None => continue,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn labels_split_at_the_next_label() {
        let scope = "\n<strong>Input:</strong> s = &quot;ab&quot;\n<strong>Output:</strong> 2\n<strong>Explanation:</strong> both <strong>a</strong> and b.\n";
        let fields = labeled_fields(scope);
        assert_eq!(fields.input.as_deref(), Some("s = \"ab\""));
        assert_eq!(fields.output.as_deref(), Some("2"));
        assert_eq!(fields.explanation.as_deref(), Some("both a and b."));
    }

    #[test]
    fn empty_values_are_absent() {
        let fields = labeled_fields("<strong>Input:</strong>   <strong>Output:</strong> 1");
        assert_eq!(fields.input, None);
        assert_eq!(fields.output.as_deref(), Some("1"));
    }

    #[test]
    fn first_occurrence_of_a_label_wins() {
        let fields = labeled_fields("<strong>Output:</strong> 1 <strong>Output:</strong> 2");
        assert_eq!(fields.output.as_deref(), Some("1"));
    }

    #[test]
    fn falls_back_to_unstructured_region() {
        let html = concat!(
            "<strong class=\"example\">Example 1:</strong>",
            "<p><strong>Input:</strong> n = 3</p><p><strong>Output:</strong> 5</p>",
        );
        let examples = extract_examples(html);
        assert_eq!(examples.len(), 1);
        assert_eq!(examples[0].input.as_deref(), Some("n = 3"));
        assert_eq!(examples[0].output.as_deref(), Some("5"));
        assert_eq!(examples[0].raw, None);
    }

    #[test]
    fn pre_without_labels_falls_through_to_region() {
        let html = concat!(
            "<strong class=\"example\">Example 1:</strong>",
            "<pre>just a picture caption</pre>",
            "<p><strong>Output:</strong> true</p>",
        );
        let examples = extract_examples(html);
        assert_eq!(examples[0].output.as_deref(), Some("true"));
    }

    #[test]
    fn unlabeled_region_is_raw_markdown() {
        let html = concat!(
            "<strong class=\"example\">Example 4:</strong>",
            "<p>Try <code>x</code> first.</p>",
        );
        let examples = extract_examples(html);
        assert_eq!(examples[0].label, 4);
        assert_eq!(examples[0].raw.as_deref(), Some("Try `x` first."));
        assert!(examples[0].input.is_none());
        assert!(examples[0].output.is_none());
        assert!(examples[0].explanation.is_none());
    }

    #[test]
    fn image_is_lifted_out_of_the_region() {
        let html = concat!(
            "<strong class=\"example\">Example 1:</strong>",
            "<img alt=\"\" src=\"https://img/e1.jpg\" style=\"width: 300px;\" />",
            "<pre><strong>Input:</strong> root = [1]\n<strong>Output:</strong> 1</pre>",
        );
        let examples = extract_examples(html);
        assert_eq!(examples[0].image.as_deref(), Some("https://img/e1.jpg"));
        assert_eq!(examples[0].input.as_deref(), Some("root = [1]"));
    }

    #[test]
    fn out_of_order_labels_are_kept_as_written() {
        let html = concat!(
            "<strong class=\"example\">Example 2:</strong> <p>b</p>",
            "<strong class=\"example\">Example 1:</strong> <p>a</p>",
        );
        let labels: Vec<u32> = extract_examples(html).iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![2, 1]);
    }

    #[test]
    fn unparseable_label_falls_back_to_position() {
        let region = ExampleRegion {
            label: None,
            body: "<p>x</p>",
        };
        assert_eq!(parse_example(2, &region).label, 3);
    }
}
