use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use digest_core::ProblemRecord;
use digest_logging::digest_info;
use sha2::{Digest, Sha256};

use crate::persist::{ensure_dir, write_atomically, PersistError};

const MAX_STEM_CHARS: usize = 80;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Writes the record's markdown, headed by a frontmatter block, into `dir`.
/// The file name depends only on the title and URL, so re-exports overwrite.
pub fn export_markdown(dir: &Path, record: &ProblemRecord) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let target = dir.join(export_filename(&record.title, &record.url));
    let document = format!("{}{}\n", frontmatter(record), record.markdown.trim_end());
    write_atomically(&target, &document)?;
    digest_info!("exported problem {} to {}", record.id, target.display());
    Ok(target)
}

pub fn frontmatter(record: &ProblemRecord) -> String {
    let mut out = String::from("---\n");
    let _ = writeln!(out, "id: {}", record.id);
    let _ = writeln!(out, "slug: {}", record.slug);
    let _ = writeln!(out, "title: {}", yaml_scalar(&record.title));
    let _ = writeln!(out, "difficulty: {}", record.difficulty);
    let _ = writeln!(out, "url: {}", record.url);
    let topics: Vec<String> = record.topics.iter().map(|t| yaml_scalar(t)).collect();
    let _ = writeln!(out, "topics: [{}]", topics.join(", "));
    out.push_str("---\n\n");
    out
}

/// `{sanitized title}--{8 hex chars of sha256(url)}.md`
pub fn export_filename(title: &str, url: &str) -> String {
    format!("{}--{}.md", sanitize_stem(title), short_hash(url))
}

/// Quotes values YAML would otherwise misread.
fn yaml_scalar(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value.contains([':', '#', '[', ']', ',', '"', '\''])
        || value.starts_with([' ', '-', '*', '&', '!', '{', '}'])
        || value.ends_with(' ');
    if needs_quotes {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

fn sanitize_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    for c in title.chars() {
        let mapped = if c.is_alphanumeric() || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if mapped == '_' && stem.ends_with('_') {
            continue;
        }
        stem.push(mapped);
    }
    let stem: String = stem
        .trim_matches('_')
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();
    if stem.is_empty() {
        "untitled".to_string()
    } else {
        stem
    }
}

fn short_hash(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().take(4).fold(String::with_capacity(8), |mut hex, byte| {
        let _ = write!(hex, "{byte:02x}");
        hex
    })
}
