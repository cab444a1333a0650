//! Presenter: renders a record as a chat card.
//!
//! The card bounds the description on its own; [`render_for_display`] is the
//! hard pass that keeps the whole message under a platform ceiling.

use std::fmt::Write;

use crate::types::{Example, ProblemRecord};

pub const DESCRIPTION_LIMIT: usize = 1000;
pub const ELLIPSIS: &str = "...";

/// Renders the full card. Only the description is bounded here.
pub fn render_card(record: &ProblemRecord) -> String {
    let mut card = String::new();
    let _ = write!(
        card,
        "## {} {}\n\n",
        record.difficulty.icon(),
        record.title
    );
    let _ = writeln!(card, "**Difficulty:** {}", record.difficulty);
    let _ = writeln!(card, "**Topics:** {}", record.topics.join(", "));
    let _ = write!(card, "**URL:** {}\n\n", record.url);

    let description = truncate_chars(&record.description, DESCRIPTION_LIMIT);
    let _ = write!(card, "**Description:**\n{description}\n\n");

    for example in &record.examples {
        push_example(&mut card, example);
    }

    if !record.constraints.is_empty() {
        card.push_str("**Constraints:**\n");
        for constraint in &record.constraints {
            let _ = writeln!(card, "- {constraint}");
        }
        card.push('\n');
    }

    if let Some(follow_up) = &record.follow_up {
        let _ = writeln!(card, "**Follow up:** {follow_up}");
    }

    card
}

fn push_example(card: &mut String, example: &Example) {
    let _ = write!(card, "### {}\n\n", example.title());
    if let Some(image) = &example.image {
        let _ = write!(card, "![image]({image})\n\n");
    }
    let labeled = [
        ("Input", &example.input),
        ("Output", &example.output),
        ("Explanation", &example.explanation),
    ];
    for (label, value) in labeled {
        if let Some(value) = value {
            // Two trailing spaces force a markdown line break.
            let _ = write!(card, "**{label}:** {value}  \n");
        }
    }
    if let Some(raw) = &example.raw {
        let _ = writeln!(card, "{raw}");
    }
    card.push('\n');
}

/// The card cut down to at most `max_len` characters.
pub fn render_for_display(record: &ProblemRecord, max_len: usize) -> String {
    truncate_chars(&render_card(record), max_len)
}

/// Truncates to at most `max_len` characters, ending with `...` when cut.
///
/// Lengths count `char`s, which is what chat platforms limit on.
pub fn truncate_chars(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let marker_len = ELLIPSIS.chars().count();
    if max_len < marker_len {
        return text.chars().take(max_len).collect();
    }
    let mut truncated: String = text.chars().take(max_len - marker_len).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}
