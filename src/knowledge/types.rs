//! Type definitions for the knowledge module.

use serde::{Deserialize, Serialize};

/// Category and year attached to every knowledge record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub category: String,
    pub year: i64,
}

/// A static time-knowledge document, retrievable by search or exact id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRecord {
    /// Unique within the store
    pub id: String,
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub url: Option<String>,
    pub metadata: RecordMetadata,
}

impl KnowledgeRecord {
    /// Source url, with an empty string treated as absent.
    pub fn source_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.is_empty())
    }
}

/// Snippet returned by `search`; never carries the full text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: Option<String>,
}

/// Full record payload returned by `fetch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchedRecord {
    pub id: String,
    pub title: String,
    pub text: String,
    pub url: Option<String>,
    pub metadata: RecordMetadata,
}

impl From<&KnowledgeRecord> for FetchedRecord {
    fn from(record: &KnowledgeRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            text: record.text.clone(),
            url: record.source_url().map(str::to_string),
            metadata: record.metadata.clone(),
        }
    }
}
