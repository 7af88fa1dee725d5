//! Immutable knowledge store with an eagerly built id index.

use crate::error::{AppError, Result};
use crate::knowledge::types::KnowledgeRecord;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Corpus compiled into the binary, used when no `KNOWLEDGE_PATH` is configured.
const BUNDLED_RECORDS: &str = include_str!("../../data/time_records.json");

/// Records in load order plus an id → position index.
///
/// Built once at startup; never mutated afterwards.
#[derive(Debug)]
pub struct KnowledgeStore {
    records: Vec<KnowledgeRecord>,
    index: HashMap<String, usize>,
}

impl KnowledgeStore {
    /// Build a store from records, rejecting duplicate ids.
    pub fn new(records: Vec<KnowledgeRecord>) -> Result<Self> {
        let mut index = HashMap::with_capacity(records.len());

        for (position, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), position).is_some() {
                return Err(AppError::KnowledgeError(format!(
                    "Duplicate record id: {}",
                    record.id
                )));
            }
        }

        Ok(Self { records, index })
    }

    /// Parse a JSON array of records.
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<KnowledgeRecord> = serde_json::from_str(json).map_err(|e| {
            AppError::KnowledgeError(format!("Failed to parse knowledge records: {}", e))
        })?;
        Self::new(records)
    }

    /// Load records from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::KnowledgeError(format!(
                "Failed to read knowledge file {}: {}",
                path.display(),
                e
            ))
        })?;

        let store = Self::from_json(&json)?;
        tracing::info!(
            path = %path.display(),
            records = store.len(),
            "Loaded knowledge records from file"
        );
        Ok(store)
    }

    /// The corpus shipped with the server.
    pub fn bundled() -> Result<Self> {
        let store = Self::from_json(BUNDLED_RECORDS)?;
        tracing::info!(records = store.len(), "Loaded bundled knowledge records");
        Ok(store)
    }

    /// Load from `path` when given, otherwise fall back to the bundled corpus.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::bundled(),
        }
    }

    /// Exact-id lookup.
    pub fn get(&self, id: &str) -> Option<&KnowledgeRecord> {
        self.index.get(id).map(|&position| &self.records[position])
    }

    /// All records in load order.
    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
