use crate::protocol::dispatcher::SERVER_NAME;
use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct ServerCapabilitiesInfo {
    pub tools: bool,
    pub search: bool,
    pub fetch: bool,
}

#[derive(Serialize)]
pub struct ServerInfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub transport: [&'static str; 1],
    pub capabilities: ServerCapabilitiesInfo,
    pub instructions: &'static str,
}

/// GET / - Static server description (not part of JSON-RPC).
pub async fn server_info_handler() -> Json<ServerInfoResponse> {
    Json(ServerInfoResponse {
        name: SERVER_NAME,
        version: env!("CARGO_PKG_VERSION"),
        description: "Time utilities and comprehensive time knowledge MCP server",
        transport: ["http"],
        capabilities: ServerCapabilitiesInfo {
            tools: true,
            search: true,
            fetch: true,
        },
        instructions: "This server provides access to comprehensive time-related knowledge. Use the search tool to find information about historical timekeeping, scientific time standards, calendar systems, time zones, cultural time practices, and modern time synchronization. For current time operations, use the utility tools.",
    })
}

/// GET /sse - Reserved for a streaming transport.
pub async fn sse_handler() -> (StatusCode, &'static str) {
    (StatusCode::NOT_IMPLEMENTED, "SSE endpoint not yet implemented")
}

pub async fn method_not_allowed_handler() -> (StatusCode, &'static str) {
    (StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
