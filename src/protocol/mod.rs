//! JSON-RPC 2.0 / MCP protocol layer.
//!
//! `types` holds the wire envelopes; `dispatcher` routes a parsed request to
//! the tool registry or executor and shapes the reply.

pub mod dispatcher;
pub mod types;

pub use dispatcher::{negotiate_protocol_version, Dispatch, Dispatcher, Method};
pub use types::{
    ErrorCode, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    FALLBACK_PROTOCOL_VERSION, LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS,
};
