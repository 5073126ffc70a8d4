//! Canonical question entity shared by the store, the session, and the wheel.

use serde::{Deserialize, Serialize};

/// Question identifier. Always derived by the normalizer, never taken raw from a source.
pub type QuestionId = String;

/// A quiz question in its canonical shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "isRead", default)]
    pub is_read: bool,
}

impl Question {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            is_read: false,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Copy of this question with the read flag set.
    pub fn read(&self) -> Self {
        Self {
            is_read: true,
            ..self.clone()
        }
    }
}

/// Indices of the questions still eligible for selection, in collection order.
pub fn unread_indices(questions: &[Question]) -> Vec<usize> {
    questions
        .iter()
        .enumerate()
        .filter(|(_, q)| !q.is_read)
        .map(|(i, _)| i)
        .collect()
}
