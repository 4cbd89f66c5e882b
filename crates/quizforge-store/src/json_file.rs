//! JSON-file document store.
//!
//! Each collection lives in `<data_dir>/<collection>.json`. Saves write a
//! sibling temp file and rename it over the target, so a crash mid-write
//! leaves the previous document intact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use quizforge_core::traits::DocumentStore;

/// Stores each collection as a pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// File backing `collection`.
    pub fn path_for(&self, collection: &str) -> Result<PathBuf> {
        let valid = !collection.is_empty()
            && collection
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("invalid collection name: {collection:?}");
        }
        Ok(self.data_dir.join(format!("{collection}.json")))
    }
}

impl DocumentStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn load(&self, collection: &str) -> Result<Option<Value>> {
        let path = self.path_for(collection)?;
        if !path.exists() {
            tracing::debug!("{} does not exist yet", path.display());
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let document = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!("loaded {}", path.display());
        Ok(Some(document))
    }

    fn save(&self, collection: &str, document: &Value) -> Result<()> {
        let path = self.path_for(collection)?;
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("failed to create {}", self.data_dir.display()))?;

        let json = serde_json::to_string_pretty(document)
            .with_context(|| format!("failed to serialize {collection}"))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("failed to replace {}", path.display()))?;

        tracing::debug!("saved {}", path.display());
        Ok(())
    }
}
