//! Inline rewriter: turns HTML fragments into markdown or plain text.
//!
//! Each mode is a fixed, ordered list of named steps. Entity decoding always
//! runs first; decoded `<` and `>` are shielded as private-use characters so
//! the tag rules that follow cannot mistake escaped text for markup, and are
//! restored only after tag stripping. `&amp;` is decoded last so it cannot
//! manufacture new entities.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::markers::{EXAMPLE_OPEN_TAG, FOLLOW_UP_MARKER, IMAGE_TAG, PRE_BLOCK};

const SHIELDED_LT: char = '\u{E000}';
const SHIELDED_GT: char = '\u{E001}';
/// Prefixes a shield character that was already present in the input.
const SHIELD_ESCAPE: char = '\u{E002}';
const ESCAPED_LT: char = '\u{E003}';
const ESCAPED_GT: char = '\u{E004}';

/// Ordered entity table. `&amp;` must stay last.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&lt;", "\u{E000}"),
    ("&gt;", "\u{E001}"),
    ("&le;", "≤"),
    ("&ge;", "≥"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
    ("&amp;", "&"),
];

static SUPERSCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<sup(?:\s[^>]*)?>(.*?)</sup\s*>").expect("superscript regex")
});

static EXAMPLE_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?s){EXAMPLE_OPEN_TAG}(.*?)</strong\s*>"))
        .expect("example heading regex")
});

static LIST_CONTAINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?ul(?:\s[^>]*)?>").expect("list container regex"));

static LIST_ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)[ \t]*<li(?:\s[^>]*)?>\s*(.*?)\s*</li\s*>").expect("list item regex")
});

static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<code(?:\s[^>]*)?>(.*?)</code\s*>").expect("inline code regex")
});

static BOLD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:strong|b)(?:\s[^>]*)?>(.*?)</(?:strong|b)\s*>").expect("bold regex")
});

static ITALIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:em|i)(?:\s[^>]*)?>(.*?)</(?:em|i)\s*>").expect("italic regex")
});

/// Anything shaped like a tag or a comment. A bare `<` not followed by a
/// letter (`1 <= n`) is left alone.
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][A-Za-z0-9-]*(?:\s[^>]*)?/?>").expect("tag regex")
});

static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").expect("blank run regex"));

/// One named transformation in a rewrite pipeline.
#[derive(Clone, Copy)]
pub struct RewriteStep {
    pub name: &'static str,
    apply: fn(&str) -> String,
}

impl RewriteStep {
    pub fn apply(&self, text: &str) -> String {
        (self.apply)(text)
    }
}

impl std::fmt::Debug for RewriteStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewriteStep").field("name", &self.name).finish()
    }
}

const fn step(name: &'static str, apply: fn(&str) -> String) -> RewriteStep {
    RewriteStep { name, apply }
}

pub const MARKDOWN_STEPS: &[RewriteStep] = &[
    step("decode_entities", decode_entities),
    step("superscript", superscript),
    step("example_heading", example_heading),
    step("follow_up_lead_in", follow_up_lead_in),
    step("images", images),
    step("unordered_lists", unordered_lists),
    step("preformatted_blocks", preformatted_blocks),
    step("inline_code", inline_code),
    step("bold", bold),
    step("italic", italic),
    step("strip_tags", strip_tags),
    step("restore_angle_brackets", restore_angle_brackets),
    step("collapse_blank_lines", collapse_blank_lines),
    step("trim", trim),
];

pub const PLAIN_TEXT_STEPS: &[RewriteStep] = &[
    step("decode_entities", decode_entities),
    step("superscript", superscript),
    step("inline_code", inline_code),
    step("strip_tags", strip_tags),
    step("restore_angle_brackets", restore_angle_brackets),
    step("trim", trim),
];

pub trait Rewriter: Send + Sync {
    fn rewrite(&self, html: &str) -> String;
}

/// Markdown rendering: headings, lists, fences, emphasis and images survive.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRewriter;

impl Rewriter for MarkdownRewriter {
    fn rewrite(&self, html: &str) -> String {
        run_pipeline(MARKDOWN_STEPS, html)
    }
}

/// Plain text: superscripts become `^x`, inline code keeps backticks, every other tag goes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRewriter;

impl Rewriter for PlainTextRewriter {
    fn rewrite(&self, html: &str) -> String {
        run_pipeline(PLAIN_TEXT_STEPS, html)
    }
}

pub fn to_markdown(html: &str) -> String {
    MarkdownRewriter.rewrite(html)
}

pub fn to_plain_text(html: &str) -> String {
    PlainTextRewriter.rewrite(html)
}

fn run_pipeline(steps: &[RewriteStep], html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    steps
        .iter()
        .fold(html.to_string(), |text, step| step.apply(&text))
}

pub(crate) fn decode_entities(text: &str) -> String {
    let text = escape_shields(text);
    if !text.contains('&') {
        return text;
    }
    ENTITIES.iter().fold(text, |acc, (entity, replacement)| {
        acc.replace(entity, replacement)
    })
}

/// Literal shield characters in the input are escaped so that
/// [`restore_angle_brackets`] gives them back unchanged.
fn escape_shields(text: &str) -> String {
    if !text.contains([SHIELDED_LT, SHIELDED_GT, SHIELD_ESCAPE]) {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            SHIELDED_LT => out.extend([SHIELD_ESCAPE, ESCAPED_LT]),
            SHIELDED_GT => out.extend([SHIELD_ESCAPE, ESCAPED_GT]),
            SHIELD_ESCAPE => out.extend([SHIELD_ESCAPE, SHIELD_ESCAPE]),
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn superscript(text: &str) -> String {
    SUPERSCRIPT.replace_all(text, "^${1}").into_owned()
}

pub(crate) fn example_heading(text: &str) -> String {
    EXAMPLE_HEADING
        .replace_all(text, "\n### ${1}\n")
        .into_owned()
}

pub(crate) fn follow_up_lead_in(text: &str) -> String {
    FOLLOW_UP_MARKER
        .replace_all(text, "\n**Follow up:**")
        .into_owned()
}

pub(crate) fn images(text: &str) -> String {
    IMAGE_TAG
        .replace_all(text, "\n![image](${1})\n")
        .into_owned()
}

pub(crate) fn unordered_lists(text: &str) -> String {
    let without_containers = LIST_CONTAINER.replace_all(text, "");
    LIST_ITEM_LINE
        .replace_all(&without_containers, "- ${1}")
        .into_owned()
}

pub(crate) fn preformatted_blocks(text: &str) -> String {
    PRE_BLOCK
        .replace_all(text, |caps: &Captures| {
            format!("\n```\n{}\n```\n", caps[1].trim())
        })
        .into_owned()
}

pub(crate) fn inline_code(text: &str) -> String {
    INLINE_CODE.replace_all(text, "`${1}`").into_owned()
}

pub(crate) fn bold(text: &str) -> String {
    BOLD.replace_all(text, "**${1}**").into_owned()
}

pub(crate) fn italic(text: &str) -> String {
    ITALIC.replace_all(text, "*${1}*").into_owned()
}

pub(crate) fn strip_tags(text: &str) -> String {
    ANY_TAG.replace_all(text, "").into_owned()
}

pub(crate) fn restore_angle_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            SHIELDED_LT => out.push('<'),
            SHIELDED_GT => out.push('>'),
            SHIELD_ESCAPE => match chars.next() {
                Some(ESCAPED_LT) => out.push(SHIELDED_LT),
                Some(ESCAPED_GT) => out.push(SHIELDED_GT),
                Some(SHIELD_ESCAPE) => out.push(SHIELD_ESCAPE),
                Some(other) => out.extend([SHIELD_ESCAPE, other]),
                None => out.push(SHIELD_ESCAPE),
            },
            other => out.push(other),
        }
    }
    out
}

pub(crate) fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

pub(crate) fn trim(text: &str) -> String {
    text.trim().to_string()
}
