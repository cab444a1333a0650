use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use digest_core::{parse_problem_id, ProblemId};
use digest_logging::digest_info;

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum CounterError {
    #[error("could not read counter {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("counter {path} holds {raw:?}, not a problem id")]
    Corrupt { path: PathBuf, raw: String },
    #[error("counter overflowed at {0}")]
    Overflow(ProblemId),
    #[error("could not save counter: {0}")]
    Persist(#[from] PersistError),
}

/// File holding the id of the last posted daily problem.
#[derive(Debug, Clone)]
pub struct DailyCounter {
    path: PathBuf,
}

impl DailyCounter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last posted id; a missing file counts as 0.
    pub fn current(&self) -> Result<ProblemId, CounterError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(source) => {
                return Err(CounterError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        parse_problem_id(&raw).ok_or_else(|| CounterError::Corrupt {
            path: self.path.clone(),
            raw: raw.trim().to_string(),
        })
    }

    /// Moves to the next id, saves it and returns it.
    pub fn advance(&self) -> Result<ProblemId, CounterError> {
        let current = self.current()?;
        let next = current
            .checked_add(1)
            .ok_or(CounterError::Overflow(current))?;
        write_atomically(&self.path, &next.to_string())?;
        digest_info!("daily counter moved from {current} to {next}");
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn advance_increments_and_persists() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("current_problem.txt");
        fs::write(&path, "41\n").unwrap();

        let counter = DailyCounter::new(&path);
        assert_eq!(counter.advance().unwrap(), 42);
        assert_eq!(fs::read_to_string(&path).unwrap(), "42");
        assert_eq!(counter.current().unwrap(), 42);
    }

    #[test]
    fn missing_file_starts_from_zero() {
        let temp = TempDir::new().unwrap();
        let counter = DailyCounter::new(temp.path().join("absent.txt"));
        assert_eq!(counter.current().unwrap(), 0);
        assert_eq!(counter.advance().unwrap(), 1);
    }

    #[test]
    fn garbage_is_reported_not_reset() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("counter.txt");
        fs::write(&path, "seven").unwrap();
        let err = DailyCounter::new(&path).advance().unwrap_err();
        assert!(matches!(err, CounterError::Corrupt { raw, .. } if raw == "seven"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "seven");
    }
}
