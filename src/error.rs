use crate::protocol::{ErrorCode, JsonRpcError, JsonRpcResponse};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Errors that reject a request before (or outside of) JSON-RPC dispatch.
///
/// Each maps to an HTTP status and a JSON-RPC-shaped body with `id: null`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid origin: {0}")]
    InvalidOrigin(String),

    #[error("Unsupported protocol version: {0}")]
    UnsupportedProtocolVersion(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Knowledge base unavailable: {0}")]
    KnowledgeError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::InvalidOrigin(origin) => {
                tracing::warn!(origin = %origin, "Rejected request from invalid origin");
                (
                    StatusCode::FORBIDDEN,
                    JsonRpcError::new(ErrorCode::InternalError, "Invalid origin"),
                )
            }
            AppError::UnsupportedProtocolVersion(version) => {
                tracing::warn!(version = %version, "Rejected unsupported protocol version");
                (
                    StatusCode::BAD_REQUEST,
                    JsonRpcError::new(
                        ErrorCode::InternalError,
                        format!("Unsupported protocol version: {}", version),
                    ),
                )
            }
            AppError::ParseError(e) => {
                tracing::warn!(error = %e, "JSON parse error");
                (StatusCode::BAD_REQUEST, JsonRpcError::parse_error())
            }
            AppError::InternalError(e) | AppError::KnowledgeError(e) => {
                tracing::error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    JsonRpcError::internal("Internal server error"),
                )
            }
        };

        (status, Json(JsonRpcResponse::failure(None, error))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Domain-level tool failures.
///
/// These never become JSON-RPC errors: they are rendered into a `ToolResult`
/// with `isError: true` and travel back as a normal `result`.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Argument '{0}' must be a string")]
    InvalidArgument(&'static str),

    #[error("Invalid time zone specified: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Local time {time} does not exist in {timezone}")]
    NonexistentLocalTime { time: String, timezone: String },

    #[error("Invalid format string: {0}")]
    InvalidFormat(String),

    #[error("{0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Text shown to the client in `content[0].text`.
    pub fn client_message(&self) -> String {
        match self {
            ToolError::UnknownTool(_) | ToolError::RecordNotFound(_) => self.to_string(),
            _ => format!("Tool execution error: {}", self),
        }
    }
}
