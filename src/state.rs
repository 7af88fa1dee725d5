use crate::config::Config;
use crate::error::Result;
use crate::knowledge::KnowledgeStore;
use crate::protocol::Dispatcher;
use crate::tools::{ToolExecutor, ToolRegistry};
use std::sync::Arc;

/// Application state shared across all request handlers.
/// Everything here is built once at startup and only read afterwards.
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ToolRegistry>,
    pub knowledge: Arc<KnowledgeStore>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    /// Initialize application state, loading the knowledge corpus from
    /// `config.knowledge_path` or the bundled data.
    pub fn new(config: Config) -> Result<Self> {
        let knowledge = KnowledgeStore::open(config.knowledge_path.as_deref())?;
        Ok(Self::with_knowledge(config, knowledge))
    }

    /// Build state around an already loaded store.
    pub fn with_knowledge(config: Config, knowledge: KnowledgeStore) -> Self {
        let registry = Arc::new(ToolRegistry::new());
        let knowledge = Arc::new(knowledge);
        let executor = ToolExecutor::new(Arc::clone(&knowledge), config.default_timezone);

        tracing::info!(
            tools = registry.len(),
            records = knowledge.len(),
            default_timezone = config.default_timezone.name(),
            "Application state initialized"
        );

        Self {
            dispatcher: Dispatcher::new(Arc::clone(&registry), executor),
            registry,
            knowledge,
            config: Arc::new(config),
        }
    }
}
