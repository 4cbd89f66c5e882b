//! Append-only store of per-student exam histories.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::results::ResultRecord;
use crate::traits::{DocumentStore, RESULTS_COLLECTION};

/// One student's chronological exam history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentHistory {
    pub student_id: String,
    pub records: Vec<ResultRecord>,
}

/// Student id → ordered results. Students keep first-insertion order, which
/// is also the order persisted and the tie order of every ranking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsRepository {
    histories: Vec<StudentHistory>,
}

impl ResultsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record to the end of a student's history.
    pub fn append(&mut self, student_id: &str, record: ResultRecord) {
        match self.histories.iter_mut().find(|h| h.student_id == student_id) {
            Some(history) => history.records.push(record),
            None => self.histories.push(StudentHistory {
                student_id: student_id.to_string(),
                records: vec![record],
            }),
        }
    }

    /// A student's records, oldest first.
    pub fn history(&self, student_id: &str) -> Option<&[ResultRecord]> {
        self.histories
            .iter()
            .find(|h| h.student_id == student_id)
            .map(|h| h.records.as_slice())
    }

    /// All histories in insertion order.
    pub fn histories(&self) -> &[StudentHistory] {
        &self.histories
    }

    /// Student ids in insertion order.
    pub fn students(&self) -> impl Iterator<Item = &str> + '_ {
        self.histories.iter().map(|h| h.student_id.as_str())
    }

    /// Student ids in alphabetical order, for listings.
    pub fn sorted_students(&self) -> Vec<&str> {
        let mut students: Vec<&str> = self.students().collect();
        students.sort_unstable();
        students
    }

    pub fn len(&self) -> usize {
        self.histories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.histories.iter().map(|h| h.records.len()).sum()
    }

    /// Parse the `results` document. Malformed records are skipped with a
    /// warning; a document that is not an object yields an empty repository.
    pub fn from_document(document: &Value) -> Self {
        let mut repo = Self::new();
        let Some(map) = document.as_object() else {
            tracing::warn!("results collection is not an object, ignoring it");
            return repo;
        };

        for (student_id, records) in map {
            let Some(records) = records.as_array() else {
                tracing::warn!("results for {student_id:?} are not a list, ignoring them");
                continue;
            };
            let mut history = StudentHistory {
                student_id: student_id.clone(),
                records: Vec::with_capacity(records.len()),
            };
            for (i, record) in records.iter().enumerate() {
                match serde_json::from_value::<ResultRecord>(record.clone()) {
                    Ok(r) => history.records.push(r),
                    Err(e) => {
                        tracing::warn!("skipping malformed result #{i} for {student_id:?}: {e}")
                    }
                }
            }
            repo.histories.push(history);
        }

        repo
    }

    /// Serialize to the `results` document, preserving student order.
    pub fn to_document(&self) -> Result<Value> {
        let mut map = Map::with_capacity(self.histories.len());
        for history in &self.histories {
            let records = serde_json::to_value(&history.records)
                .with_context(|| format!("failed to serialize results for {}", history.student_id))?;
            map.insert(history.student_id.clone(), records);
        }
        Ok(Value::Object(map))
    }

    /// Load from the store; a missing or unreadable collection is empty.
    pub fn load(store: &dyn DocumentStore) -> Self {
        match store.load(RESULTS_COLLECTION) {
            Ok(Some(document)) => {
                let repo = Self::from_document(&document);
                tracing::debug!(
                    students = repo.len(),
                    records = repo.total_records(),
                    "results loaded"
                );
                repo
            }
            Ok(None) => Self::new(),
            Err(e) => {
                tracing::warn!("failed to load results from {}: {e:#}", store.name());
                Self::new()
            }
        }
    }

    /// Write the whole collection.
    pub fn save(&self, store: &dyn DocumentStore) -> Result<()> {
        let document = self.to_document()?;
        store
            .save(RESULTS_COLLECTION, &document)
            .with_context(|| format!("failed to save results to {}", store.name()))
    }
}
