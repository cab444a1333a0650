use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("directory missing or not usable: {0}")]
    Directory(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Creates `dir` when missing; fails if it exists as something else.
pub fn ensure_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.as_os_str().is_empty() {
        return Ok(());
    }
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::Directory(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::Directory(e.to_string()))?;
    }
    Ok(())
}

/// Replaces `path` with `contents` through a sibling temp file and a rename,
/// so readers never observe a half-written file.
pub fn write_atomically(path: &Path, contents: &str) -> Result<(), PersistError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    ensure_dir(dir)?;

    let mut tmp = if dir.as_os_str().is_empty() {
        NamedTempFile::new_in(".")?
    } else {
        NamedTempFile::new_in(dir)?
    };
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path).map_err(|e| PersistError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/deeper/data.json");
        write_atomically(&target, "{}").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "{}");
    }

    #[test]
    fn replaces_existing_content() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("counter.txt");
        write_atomically(&target, "1").unwrap();
        write_atomically(&target, "2").unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "2");
        let leftovers = fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn rejects_file_in_place_of_directory() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let err = ensure_dir(&blocker).unwrap_err();
        assert!(matches!(err, PersistError::Directory(_)));
    }
}
