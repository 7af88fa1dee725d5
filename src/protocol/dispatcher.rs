//! Method routing for parsed JSON-RPC requests.
//!
//! The dispatcher is stateless across requests: each call negotiates, routes
//! and shapes a reply without touching anything but the immutable registry
//! and knowledge store.

use crate::protocol::types::{
    InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ServerCapabilities,
    ServerInfo, ToolsCapability, FALLBACK_PROTOCOL_VERSION, LATEST_PROTOCOL_VERSION,
    SUPPORTED_PROTOCOL_VERSIONS,
};
use crate::tools::{ToolDescriptor, ToolExecutor, ToolRegistry, ToolResult};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;

pub const SERVER_NAME: &str = "mcp-server-http-time";

pub const SERVER_INSTRUCTIONS: &str = "This MCP server provides time-related tools including current time, timezone conversion, relative time calculation, and more.";

/// Name reported when a request carries no string `method`.
const UNDEFINED_METHOD: &str = "undefined";

/// JSON-RPC methods understood by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    Initialized,
}

impl Method {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "initialize" => Some(Method::Initialize),
            "tools/list" => Some(Method::ToolsList),
            "tools/call" => Some(Method::ToolsCall),
            "initialized" => Some(Method::Initialized),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::ToolsList => "tools/list",
            Method::ToolsCall => "tools/call",
            Method::Initialized => "initialized",
        }
    }
}

/// Outcome of dispatching one request.
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// A JSON-RPC response (result or error) to send back.
    Reply(JsonRpcResponse),
    /// A notification was accepted; the transport answers with an empty body.
    Acknowledged,
}

#[derive(Serialize)]
struct ToolsListResult<'a> {
    tools: &'a [ToolDescriptor],
}

/// Pick the protocol version to answer `initialize` with.
///
/// Absent or empty requests get the latest version; supported versions are
/// echoed; anything else degrades to the fallback. Never fails.
pub fn negotiate_protocol_version(requested: Option<&Value>) -> String {
    match requested {
        None | Some(Value::Null) => LATEST_PROTOCOL_VERSION.to_string(),
        Some(Value::String(v)) if v.is_empty() => LATEST_PROTOCOL_VERSION.to_string(),
        Some(Value::String(v)) if SUPPORTED_PROTOCOL_VERSIONS.contains(&v.as_str()) => v.clone(),
        Some(_) => FALLBACK_PROTOCOL_VERSION.to_string(),
    }
}

/// Routes requests to the tool registry and executor.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    executor: ToolExecutor,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, executor: ToolExecutor) -> Self {
        Self { registry, executor }
    }

    pub fn dispatch(&self, request: JsonRpcRequest) -> Dispatch {
        let JsonRpcRequest {
            id, method, params, ..
        } = request;

        let Some(parsed) = method.as_deref().and_then(Method::parse) else {
            let method = method.as_deref().unwrap_or(UNDEFINED_METHOD);
            tracing::info!(method = %method, "Method not found");
            metrics::counter!("mcp_requests_total", "method" => "unknown").increment(1);
            return Dispatch::Reply(JsonRpcResponse::failure(
                id,
                JsonRpcError::method_not_found(method),
            ));
        };

        metrics::counter!("mcp_requests_total", "method" => parsed.as_str()).increment(1);
        tracing::debug!(method = parsed.as_str(), "Dispatching request");

        match parsed {
            Method::Initialize => reply(id, &self.initialize(params.as_ref())),
            Method::ToolsList => reply(
                id,
                &ToolsListResult {
                    tools: self.registry.list(),
                },
            ),
            Method::ToolsCall => match self.call_tool(params.as_ref()) {
                Ok(result) => reply(id, &result),
                Err(error) => Dispatch::Reply(JsonRpcResponse::failure(id, error)),
            },
            Method::Initialized => Dispatch::Acknowledged,
        }
    }

    fn initialize(&self, params: Option<&Value>) -> InitializeResult {
        let requested = params.and_then(|p| p.get("protocolVersion"));
        let protocol_version = negotiate_protocol_version(requested);

        tracing::info!(
            requested = ?requested,
            negotiated = %protocol_version,
            "Client initialized"
        );

        InitializeResult {
            protocol_version,
            capabilities: ServerCapabilities {
                tools: ToolsCapability {},
            },
            server_info: ServerInfo {
                name: SERVER_NAME,
                version: env!("CARGO_PKG_VERSION"),
            },
            instructions: SERVER_INSTRUCTIONS,
        }
    }

    /// Unpack `tools/call` params and run the tool.
    ///
    /// Only a malformed call envelope fails here; tool failures are already
    /// folded into the returned `ToolResult`.
    fn call_tool(&self, params: Option<&Value>) -> Result<ToolResult, JsonRpcError> {
        let params = params
            .filter(|p| p.is_object())
            .ok_or_else(|| JsonRpcError::internal("Tool execution error: missing params"))?;

        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| JsonRpcError::internal("Tool execution error: missing tool name"))?;

        let arguments = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };

        Ok(self.executor.execute(name, &arguments))
    }
}

fn reply<T: Serialize>(id: Option<Value>, payload: &T) -> Dispatch {
    let response = match serde_json::to_value(payload) {
        Ok(result) => JsonRpcResponse::success(id, result),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize result");
            JsonRpcResponse::failure(id, JsonRpcError::internal(e.to_string()))
        }
    };
    Dispatch::Reply(response)
}
