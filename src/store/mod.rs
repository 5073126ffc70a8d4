//! Question Store
//!
//! Durable persistence for the two independent domains of the application: the question
//! collection (keyed by question id) and the configured source endpoints (a singleton list).
//! Each domain is cleared and replaced on its own; nothing spans both atomically.

pub mod memory;
pub mod persistence;

pub use memory::MemoryQuizStore;
pub use persistence::SledQuizStore;

use crate::error::StorageError;
use crate::types::Question;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Question record as persisted: the canonical question plus its collection position, so
/// insertion order survives key-ordered storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub position: u64,
    pub question: Question,
}

/// Store interface
pub trait QuizStore: Send + Sync {
    /// Configured endpoints, in configured order.
    fn get_endpoints(&self) -> Result<Vec<String>, StorageError>;

    /// Trim and drop empty entries, clear the question domain, then persist the list.
    ///
    /// Returns the endpoints as persisted. Persisted endpoints change only on success. A
    /// failure after the clear leaves the question domain empty, so the next load re-fetches.
    fn set_endpoints(&self, endpoints: &[String]) -> Result<Vec<String>, StorageError>;

    /// Discard the whole question domain and install `questions` in one atomic unit.
    fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError>;

    /// Set the read flag on one question. Returns `false` (and changes nothing) when the id
    /// is unknown.
    fn mark_read(&self, id: &str) -> Result<bool, StorageError>;

    fn get_question(&self, id: &str) -> Result<Option<Question>, StorageError>;

    /// All questions in insertion order.
    fn get_all_questions(&self) -> Result<Vec<Question>, StorageError>;

    fn clear_questions(&self) -> Result<(), StorageError>;
}

/// Trim endpoints and drop the ones left empty. Duplicates are kept.
pub fn sanitize_endpoints<S: AsRef<str>>(endpoints: &[S]) -> Vec<String> {
    endpoints
        .iter()
        .map(|e| e.as_ref().trim())
        .filter(|e| !e.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reject replacement sets that would break id uniqueness.
pub(crate) fn ensure_unique_ids(questions: &[Question]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.id.as_str()) {
            return Err(StorageError::DuplicateQuestionId(q.id.clone()));
        }
    }
    Ok(())
}
