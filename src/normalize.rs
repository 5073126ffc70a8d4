//! Normalizer
//!
//! Turns loosely-typed records fetched from question sources into canonical [`Question`]s.
//! Field values are resolved through an explicit, ordered list of candidate keys per target
//! field; identity is derived from a per-run [`RunToken`] so that ids never collide within a
//! run or with a previous run.

use crate::types::Question;
use blake3::Hasher;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static LAST_RUN_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Distinguishes one normalization pass from another.
///
/// Tokens are microsecond timestamps, bumped when needed so that two tokens issued by the
/// same process are always strictly increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunToken(u64);

impl RunToken {
    pub fn next() -> Self {
        let now = Utc::now().timestamp_micros().max(0) as u64;
        let mut last = LAST_RUN_TOKEN.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match LAST_RUN_TOKEN.compare_exchange_weak(
                last,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self(candidate),
                Err(observed) => last = observed,
            }
        }
    }

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How canonical ids are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityScheme {
    /// `{runToken}-{externalId}` or `{runToken}-{position}`. Fresh ids on every run.
    #[default]
    Run,
    /// Hash of title and description, stable across runs. Records without a title fall
    /// back to run-scoped ids.
    Content,
}

/// Ordered candidate keys for each canonical field. The first key present with a non-null
/// value wins.
#[derive(Debug, Clone, Copy)]
pub struct FieldMapping {
    pub id: &'static [&'static str],
    pub title: &'static [&'static str],
    pub description: &'static [&'static str],
    pub is_read: &'static [&'static str],
}

pub const DEFAULT_FIELD_MAPPING: FieldMapping = FieldMapping {
    id: &["id", "_id"],
    title: &["title", "question", "text"],
    description: &["description", "answer", "detail", "explanation"],
    is_read: &["isRead", "is_read"],
};

impl Default for FieldMapping {
    fn default() -> Self {
        DEFAULT_FIELD_MAPPING
    }
}

/// Maps raw source records to canonical questions. Pure: no I/O, no shared state.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    mapping: FieldMapping,
    scheme: IdentityScheme,
}

impl Normalizer {
    pub fn new(mapping: FieldMapping, scheme: IdentityScheme) -> Self {
        Self { mapping, scheme }
    }

    pub fn with_scheme(scheme: IdentityScheme) -> Self {
        Self {
            mapping: DEFAULT_FIELD_MAPPING,
            scheme,
        }
    }

    pub fn scheme(&self) -> IdentityScheme {
        self.scheme
    }

    /// Normalize a raw JSON value. Anything other than an array yields no questions.
    pub fn normalize(&self, raw: &Value, token: RunToken) -> Vec<Question> {
        match raw {
            Value::Array(records) => self.normalize_records(records, token),
            _ => Vec::new(),
        }
    }

    /// Normalize an already-unwrapped record list. Output order and length match the input.
    pub fn normalize_records(&self, records: &[Value], token: RunToken) -> Vec<Question> {
        let mut claimed = HashSet::with_capacity(records.len());
        records
            .iter()
            .enumerate()
            .map(|(index, record)| self.normalize_one(record, index, token, &mut claimed))
            .collect()
    }

    fn normalize_one(
        &self,
        record: &Value,
        index: usize,
        token: RunToken,
        claimed: &mut HashSet<String>,
    ) -> Question {
        let title = lookup(record, self.mapping.title).map(render_text);
        let description = lookup(record, self.mapping.description)
            .map(render_text)
            .unwrap_or_default();

        let derived = match (self.scheme, title.as_deref()) {
            (IdentityScheme::Content, Some(title)) => content_id(title, &description),
            _ => match lookup(record, self.mapping.id) {
                Some(external) => format!("{}-{}", token, render_text(external)),
                None => format!("{}-{}", token, index),
            },
        };
        let id = claim_unique(derived, index, claimed);

        let is_read = lookup(record, self.mapping.is_read)
            .map(is_truthy)
            .unwrap_or(false);

        Question {
            title: title.unwrap_or_else(|| id.clone()),
            id,
            description,
            is_read,
        }
    }
}

/// Normalize with the default field mapping and run-scoped identity.
pub fn normalize_questions(raw: &Value, token: RunToken) -> Vec<Question> {
    Normalizer::default().normalize(raw, token)
}

fn lookup<'a>(record: &'a Value, candidates: &[&str]) -> Option<&'a Value> {
    let object = record.as_object()?;
    candidates
        .iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn render_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn content_id(title: &str, description: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(b"question");
    hasher.update(&(title.len() as u64).to_be_bytes());
    hasher.update(title.as_bytes());
    hasher.update(&(description.len() as u64).to_be_bytes());
    hasher.update(description.as_bytes());
    let digest = hasher.finalize();
    format!("c-{}", hex::encode(&digest.as_bytes()[..12]))
}

// Two sources may both ship `"id": 1`, and an external id may equal another record's
// position. Later claimants get a position suffix.
fn claim_unique(base: String, index: usize, claimed: &mut HashSet<String>) -> String {
    if claimed.insert(base.clone()) {
        return base;
    }
    let mut attempt = 0usize;
    loop {
        let candidate = if attempt == 0 {
            format!("{base}~{index}")
        } else {
            format!("{base}~{index}.{attempt}")
        };
        if claimed.insert(candidate.clone()) {
            return candidate;
        }
        attempt += 1;
    }
}
