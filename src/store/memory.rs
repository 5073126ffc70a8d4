//! In-memory [`QuizStore`] used as a test double and for ephemeral sessions.

use crate::error::StorageError;
use crate::store::{ensure_unique_ids, sanitize_endpoints, QuizStore};
use crate::types::Question;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
struct MemoryState {
    questions: Vec<Question>,
    endpoints: Vec<String>,
}

/// Non-durable store. Writes can be made to fail on demand to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryQuizStore {
    state: RwLock<MemoryState>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryQuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_questions(questions: Vec<Question>) -> Self {
        let store = Self::default();
        store.state.write().questions = questions;
        store
    }

    /// Make every mutating operation fail with a storage error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every read fail, simulating an unavailable backend.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_write(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("write rejected: quota exceeded".to_string()));
        }
        Ok(())
    }

    fn check_read(&self) -> Result<(), StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("storage unavailable".to_string()));
        }
        Ok(())
    }
}

impl QuizStore for MemoryQuizStore {
    fn get_endpoints(&self) -> Result<Vec<String>, StorageError> {
        self.check_read()?;
        Ok(self.state.read().endpoints.clone())
    }

    fn set_endpoints(&self, endpoints: &[String]) -> Result<Vec<String>, StorageError> {
        self.check_write()?;
        let sanitized = sanitize_endpoints(endpoints);
        let mut state = self.state.write();
        state.endpoints = sanitized.clone();
        state.questions.clear();
        Ok(sanitized)
    }

    fn replace_questions(&self, questions: &[Question]) -> Result<(), StorageError> {
        self.check_write()?;
        ensure_unique_ids(questions)?;
        self.state.write().questions = questions.to_vec();
        Ok(())
    }

    fn mark_read(&self, id: &str) -> Result<bool, StorageError> {
        self.check_write()?;
        let mut state = self.state.write();
        match state.questions.iter_mut().find(|q| q.id == id) {
            Some(question) => {
                question.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn get_question(&self, id: &str) -> Result<Option<Question>, StorageError> {
        self.check_read()?;
        Ok(self.state.read().questions.iter().find(|q| q.id == id).cloned())
    }

    fn get_all_questions(&self) -> Result<Vec<Question>, StorageError> {
        self.check_read()?;
        Ok(self.state.read().questions.clone())
    }

    fn clear_questions(&self) -> Result<(), StorageError> {
        self.check_write()?;
        self.state.write().questions.clear();
        Ok(())
    }
}
