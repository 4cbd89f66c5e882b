//! The document store seam.
//!
//! The core never touches files directly. Custom questions and result
//! histories are read and written as whole JSON documents through a
//! [`DocumentStore`]; `quizforge-store` provides the file-backed one.

use std::collections::HashMap;
use std::sync::Mutex;

use serde_json::Value;

/// Collection holding teacher-authored questions, keyed by difficulty.
pub const QUESTIONS_COLLECTION: &str = "questions";

/// Collection holding per-student result histories.
pub const RESULTS_COLLECTION: &str = "results";

/// An opaque store of named JSON documents.
pub trait DocumentStore: Send + Sync {
    /// Human-readable store name (e.g. "json").
    fn name(&self) -> &str;

    /// Load a whole collection. `Ok(None)` means it has never been saved.
    fn load(&self, collection: &str) -> anyhow::Result<Option<Value>>;

    /// Replace a whole collection.
    fn save(&self, collection: &str, document: &Value) -> anyhow::Result<()>;
}

/// In-memory store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one collection.
    pub fn with_document(collection: &str, document: Value) -> Self {
        let store = Self::new();
        store
            .documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(collection.to_string(), document);
        store
    }

    /// Snapshot of a stored collection.
    pub fn document(&self, collection: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(collection)
            .cloned()
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn load(&self, collection: &str) -> anyhow::Result<Option<Value>> {
        Ok(self.document(collection))
    }

    fn save(&self, collection: &str, document: &Value) -> anyhow::Result<()> {
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(collection.to_string(), document.clone());
        Ok(())
    }
}
