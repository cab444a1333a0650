use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use digest_core::{ProblemId, ProblemRecord};
use digest_logging::{digest_error, digest_info, digest_warn};
use serde_json::{Map, Value};

use crate::persist::{write_atomically, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("{path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not encode problems: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("could not save problems: {0}")]
    Persist(#[from] PersistError),
}

/// Id-keyed collection of parsed problems backed by one JSON file.
///
/// Entries that do not decode are kept verbatim under their original key and
/// written back on every save.
#[derive(Debug)]
pub struct ProblemStore {
    path: PathBuf,
    problems: BTreeMap<ProblemId, ProblemRecord>,
    unreadable: BTreeMap<String, Value>,
}

impl ProblemStore {
    /// Loads the store at `path`. A missing file is an empty store; a file
    /// holding a JSON array is converted to the keyed layout and rewritten.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(Self {
                    path,
                    problems: BTreeMap::new(),
                    unreadable: BTreeMap::new(),
                });
            }
            Err(source) => return Err(StoreError::Read { path, source }),
        };
        let value: Value = serde_json::from_str(&text).map_err(|source| StoreError::Malformed {
            path: path.clone(),
            source,
        })?;

        let mut store = Self {
            path,
            problems: BTreeMap::new(),
            unreadable: BTreeMap::new(),
        };
        match value {
            Value::Object(entries) => store.load_keyed(entries),
            Value::Array(entries) => {
                digest_info!("migrating {} problems from list layout", entries.len());
                store.load_list(entries);
                store.save()?;
                digest_info!("migration saved {} problems", store.problems.len());
            }
            other => {
                digest_error!(
                    "unexpected top-level {} in {}; starting empty",
                    json_kind(&other),
                    store.path.display()
                );
            }
        }
        Ok(store)
    }

    fn load_keyed(&mut self, entries: Map<String, Value>) {
        for (key, entry) in entries {
            match serde_json::from_value::<ProblemRecord>(entry.clone()) {
                Ok(record) => {
                    self.problems.insert(record.id, record);
                }
                Err(err) => {
                    digest_warn!("keeping undecodable stored problem {key} as is: {err}");
                    self.unreadable.insert(key, entry);
                }
            }
        }
    }

    fn load_list(&mut self, entries: Vec<Value>) {
        for (index, mut entry) in entries.into_iter().enumerate() {
            let position = index as u64 + 1;
            if let Value::Object(fields) = &mut entry {
                if fields.get("id").is_none_or(Value::is_null) {
                    fields.insert("id".to_string(), Value::from(position));
                }
            }
            match serde_json::from_value::<ProblemRecord>(entry.clone()) {
                Ok(record) => {
                    self.problems.insert(record.id, record);
                }
                Err(err) => {
                    let key = legacy_key(&entry).unwrap_or_else(|| position.to_string());
                    digest_warn!("keeping undecodable listed problem {key} as is: {err}");
                    self.unreadable.insert(key, entry);
                }
            }
        }
    }

    fn save(&self) -> Result<(), StoreError> {
        let mut keyed = Map::new();
        for (key, entry) in &self.unreadable {
            keyed.insert(key.clone(), entry.clone());
        }
        for (id, record) in &self.problems {
            keyed.insert(id.to_string(), serde_json::to_value(record)?);
        }
        let json = serde_json::to_string_pretty(&Value::Object(keyed))?;
        write_atomically(&self.path, &json)?;
        Ok(())
    }

    pub fn get(&self, id: ProblemId) -> Option<&ProblemRecord> {
        self.problems.get(&id)
    }

    /// Inserts or replaces by id and saves. Returns the replaced record.
    pub fn insert(&mut self, record: ProblemRecord) -> Result<Option<ProblemRecord>, StoreError> {
        self.unreadable.remove(&record.id.to_string());
        let previous = self.problems.insert(record.id, record);
        self.save()?;
        Ok(previous)
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = ProblemId> + '_ {
        self.problems.keys().copied()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys of entries kept on disk that could not be decoded.
    pub fn unreadable_keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.unreadable.keys().map(String::as_str)
    }
}

/// Key for an undecodable list entry: its `id` when it is a number or a
/// non-empty string.
fn legacy_key(entry: &Value) -> Option<String> {
    match entry.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
