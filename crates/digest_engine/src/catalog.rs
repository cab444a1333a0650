use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use digest_core::{parse_problem_id, ProblemId};
use digest_logging::{digest_debug, digest_warn};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("catalog {path} has no header with `{column}` column")]
    MissingColumn { path: PathBuf, column: &'static str },
}

/// Problem id to URL lookup, loaded from a two-column CSV.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    urls: HashMap<ProblemId, String>,
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|column| CatalogError::MissingColumn {
            path: path.to_path_buf(),
            column,
        })
    }

    /// Parses CSV text with `id` and `url` header columns in any order.
    /// Returns the missing column name when the header lacks one.
    pub fn parse(text: &str) -> Result<Self, &'static str> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header: Vec<String> = lines
            .next()
            .map(split_row)
            .unwrap_or_default()
            .into_iter()
            .map(|cell| cell.to_ascii_lowercase())
            .collect();
        let id_col = header.iter().position(|c| c == "id").ok_or("id")?;
        let url_col = header.iter().position(|c| c == "url").ok_or("url")?;

        let mut urls = HashMap::new();
        for (line_no, line) in lines.enumerate() {
            let row = split_row(line);
            let id = row.get(id_col).and_then(|cell| parse_problem_id(cell));
            let url = row.get(url_col).filter(|cell| !cell.is_empty());
            match (id, url) {
                (Some(id), Some(url)) => {
                    urls.insert(id, url.clone());
                }
                _ => digest_warn!("skipping malformed catalog row {}: {line}", line_no + 2),
            }
        }
        digest_debug!("catalog holds {} problems", urls.len());
        Ok(Self { urls })
    }

    pub fn url_for(&self, id: ProblemId) -> Option<&str> {
        self.urls.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Splits one CSV line. Double-quoted cells may contain commas; `""` inside
/// quotes is a literal quote.
fn split_row(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if quoted && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => quoted = !quoted,
            ',' if !quoted => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_columns_may_come_in_any_order() {
        let catalog = Catalog::parse(
            "url,title,id\nhttps://leetcode.com/problems/two-sum/,Two Sum,1\n\"https://leetcode.com/problems/add-two-numbers/\",\"Add, Two\",2\n",
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.url_for(1), Some("https://leetcode.com/problems/two-sum/"));
        assert_eq!(
            catalog.url_for(2),
            Some("https://leetcode.com/problems/add-two-numbers/")
        );
        assert_eq!(catalog.url_for(3), None);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let catalog = Catalog::parse("id,url\nabc,https://x/problems/a/\n4,\n5,https://x/problems/e/\n")
            .unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.url_for(5), Some("https://x/problems/e/"));
    }

    #[test]
    fn missing_column_is_reported() {
        assert_eq!(Catalog::parse("id,link\n1,x\n").unwrap_err(), "url");
        assert_eq!(Catalog::parse("").unwrap_err(), "id");
    }

    #[test]
    fn quoted_cells_unescape_doubled_quotes() {
        assert_eq!(split_row(r#"1,"say ""hi""", x "#), vec!["1", "say \"hi\"", "x"]);
    }
}
