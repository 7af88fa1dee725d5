//! mcp-server-http-time - Model Context Protocol server over HTTP
//!
//! This library exposes the protocol dispatcher, tools and knowledge store
//! behind the HTTP service, enabling integration tests and embedding in other
//! applications.

pub mod config;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod knowledge;
pub mod protocol;
pub mod router;
pub mod state;
pub mod tools;

// Re-export key types for convenience
pub use config::{Config, LogFormat};
pub use error::{AppError, Result, ToolError};
pub use guard::{validate_origin, validate_protocol_version};
pub use knowledge::{KnowledgeRecord, KnowledgeStore};
pub use protocol::{Dispatch, Dispatcher, JsonRpcRequest, JsonRpcResponse};
pub use router::build_router;
pub use state::AppState;
pub use tools::{ToolExecutor, ToolRegistry, ToolResult};
