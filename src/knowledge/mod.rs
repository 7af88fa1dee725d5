//! Static time-knowledge corpus: loading, exact lookup and keyword search.

pub mod search;
pub mod store;
pub mod types;

pub use search::search;
pub use store::KnowledgeStore;
pub use types::{FetchedRecord, KnowledgeRecord, RecordMetadata, SearchHit};
