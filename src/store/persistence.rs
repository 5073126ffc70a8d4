//! Sled-backed persistence for the question and settings domains.

use crate::error::StorageError;
use crate::store::{ensure_unique_ids, sanitize_endpoints, QuizStore, StoredQuestion};
use crate::types::Question;
use serde_json::Value;
use sled::{Db, Tree};
use std::path::Path;
use tracing::debug;

const TREE_QUESTIONS: &str = "questions";
const TREE_SETTINGS: &str = "settings";
const SETTINGS_ENDPOINTS_KEY: &[u8] = b"endpoints";

/// Sled-based implementation of [`QuizStore`]
///
/// Questions live in their own tree keyed by question id; settings live in a second tree
/// under a single key. Trees are created on first open.
#[derive(Clone)]
pub struct SledQuizStore {
    db: Db,
    questions: Tree,
    settings: Tree,
}

impl SledQuizStore {
    /// Open (or create) the store at the given directory.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = sled::open(path.as_ref()).map_err(|e| {
            StorageError::Backend(format!(
                "Failed to open sled database at {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_db(db)
    }

    /// Wrap an already opened database.
    pub fn from_db(db: Db) -> Result<Self, StorageError> {
        let questions = db.open_tree(TREE_QUESTIONS)?;
        let settings = db.open_tree(TREE_SETTINGS)?;
        Ok(Self {
            db,
            questions,
            settings,
        })
    }

    /// Get the underlying sled database (for advanced operations)
    pub fn db(&self) -> &Db {
        &self.db
    }

    /// Flush pending writes and release this handle.
    pub fn close(self) -> Result<(), StorageError> {
        self.flush()
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), StorageError> {
        self.db.flush()?;
        Ok(())
    }

    /// Questions are cleared before the endpoint list is written, so stored questions never
    /// outlive the endpoints they came from. A failed clear leaves both domains as they were.
    fn set_endpoints_after<F>(&self, endpoints: &[String], clear: F) -> Result<Vec<String>, StorageError>
    where
        F: FnOnce() -> Result<(), StorageError>,
    {
        let sanitized = sanitize_endpoints(endpoints);
        let value = serde_json::to_vec(&sanitized).map_err(to_storage_data)?;
        clear()?;
        self.settings.insert(SETTINGS_ENDPOINTS_KEY, value)?;
        self.flush()?;
        debug!(count = sanitized.len(), "questions cleared; endpoints saved");
        Ok(sanitized)
    }

    fn question_keys(&self) -> Result<Vec<sled::IVec>, StorageError> {
        let mut keys = Vec::new();
        for key in self.questions.iter().keys() {
            keys.push(key?);
        }
        Ok(keys)
    }
}

impl QuizStore for SledQuizStore {
    fn get_endpoints(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.settings.get(SETTINGS_ENDPOINTS_KEY)? else {
            return Ok(Vec::new());
        };
        let parsed: Value = serde_json::from_slice(&raw).map_err(to_storage_data)?;
        // Tolerate hand-edited or foreign values: keep only non-blank strings.
        let endpoints = match parsed {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) if !s.trim().is_empty() => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(endpoints)
    }

    fn set_endpoints(&self, endpoints: &[String]) -> Result<Vec<String>, StorageError> {
        self.set_endpoints_after(endpoints, || self.clear_questions())
    }

    fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        ensure_unique_ids(questions)?;

        let mut batch = sled::Batch::default();
        for key in self.question_keys()? {
            batch.remove(key);
        }
        for (position, question) in questions.iter().enumerate() {
            let record = StoredQuestion {
                position: position as u64,
                question: question.clone(),
            };
            batch.insert(question.id.as_bytes(), encode_record(&record)?);
        }

        self.questions.apply_batch(batch)?;
        self.flush()?;
        debug!(count = questions.len(), "question collection replaced");
        Ok(())
    }

    fn mark_read(&self, id: &str) -> Result<bool, StorageError> {
        // Updates in place only while the record is present; a concurrent replace wins.
        let mut failure = None;
        let previous = self.questions.fetch_and_update(id.as_bytes(), |current| {
            failure = None;
            let raw = current?;
            match decode_record(raw).and_then(|mut record| {
                record.question.is_read = true;
                encode_record(&record)
            }) {
                Ok(updated) => Some(updated),
                Err(err) => {
                    failure = Some(err);
                    Some(raw.to_vec())
                }
            }
        })?;
        if let Some(err) = failure {
            return Err(err);
        }
        if previous.is_none() {
            return Ok(false);
        }
        self.flush()?;
        Ok(true)
    }

    fn get_question(&self, id: &str) -> Result<Option<Question>, StorageError> {
        match self.questions.get(id.as_bytes())? {
            Some(raw) => Ok(Some(decode_record(&raw)?.question)),
            None => Ok(None),
        }
    }

    fn get_all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let mut records = Vec::new();
        for item in self.questions.iter().values() {
            records.push(decode_record(&item?)?);
        }
        records.sort_by_key(|r| r.position);
        Ok(records.into_iter().map(|r| r.question).collect())
    }

    fn clear_questions(&self) -> Result<(), StorageError> {
        self.questions.clear()?;
        self.flush()?;
        Ok(())
    }
}

fn encode_record(record: &StoredQuestion) -> Result<Vec<u8>, StorageError> {
    bincode::serialize(record).map_err(|e| {
        StorageError::Serialization(format!("Failed to serialize question record: {}", e))
    })
}

fn decode_record(raw: &[u8]) -> Result<StoredQuestion, StorageError> {
    bincode::deserialize(raw).map_err(|e| {
        StorageError::Serialization(format!("Failed to deserialize question record: {}", e))
    })
}

fn to_storage_data(err: serde_json::Error) -> StorageError {
    StorageError::Serialization(err.to_string())
}
