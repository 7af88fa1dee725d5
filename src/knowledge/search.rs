//! Keyword search over the knowledge store.
//!
//! A query is lowercased and split on whitespace; a record matches when any
//! token occurs as a substring of its searchable surface (title, text,
//! category, year and id). Results keep the store's load order and carry a
//! truncated snippet rather than the full text.
//!
//! An empty or whitespace-only query has no tokens and therefore matches
//! nothing.

use crate::knowledge::store::KnowledgeStore;
use crate::knowledge::types::{KnowledgeRecord, SearchHit};

/// Maximum snippet length, in characters, before the ellipsis marker.
pub const SNIPPET_LENGTH: usize = 200;

/// Appended to snippets that were cut.
pub const ELLIPSIS: &str = "...";

/// Lowercase the query and split it into non-empty tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Lowercased, space-joined text a record is matched against.
pub fn searchable_surface(record: &KnowledgeRecord) -> String {
    [
        record.title.as_str(),
        record.text.as_str(),
        record.metadata.category.as_str(),
        record.metadata.year.to_string().as_str(),
        record.id.as_str(),
    ]
    .join(" ")
    .to_lowercase()
}

/// True if at least one token is a substring of the record's surface.
pub fn matches(record: &KnowledgeRecord, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let surface = searchable_surface(record);
    tokens.iter().any(|token| surface.contains(token.as_str()))
}

/// First `SNIPPET_LENGTH` characters of `text`, plus `ELLIPSIS` if anything was cut.
pub fn snippet(text: &str) -> String {
    match text.char_indices().nth(SNIPPET_LENGTH) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Run a query against the store.
pub fn search(store: &KnowledgeStore, query: &str) -> Vec<SearchHit> {
    let tokens = tokenize(query);

    let hits: Vec<SearchHit> = store
        .records()
        .iter()
        .filter(|record| matches(record, &tokens))
        .map(|record| SearchHit {
            id: record.id.clone(),
            title: record.title.clone(),
            text: snippet(&record.text),
            url: record.source_url().map(str::to_string),
        })
        .collect();

    tracing::debug!(
        tokens = tokens.len(),
        hits = hits.len(),
        "Knowledge search completed"
    );

    hits
}
