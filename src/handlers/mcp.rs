use crate::error::{AppError, Result};
use crate::protocol::{Dispatch, JsonRpcRequest};
use crate::state::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// POST / - Handle a single JSON-RPC envelope.
///
/// # Flow
/// 1. Parse the body as JSON (400 / -32700 on failure)
/// 2. Extract the envelope; bodies without a string `method` dispatch as unknown methods
/// 3. Dispatch by method
/// 4. 200 with the JSON-RPC response, or 202 with no body for notifications
pub async fn mcp_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Response> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("mcp_request", %request_id);

    span.in_scope(|| -> Result<Response> {
        tracing::debug!(bytes = body.len(), "POST request received");

        let value: Value =
            serde_json::from_slice(&body).map_err(|e| AppError::ParseError(e.to_string()))?;

        if !value.is_object() {
            tracing::debug!("Body is not a request object; batches are not supported");
        }

        match state.dispatcher.dispatch(JsonRpcRequest::from_value(value)) {
            Dispatch::Reply(response) => Ok((StatusCode::OK, Json(response)).into_response()),
            Dispatch::Acknowledged => {
                tracing::debug!("Notification acknowledged");
                Ok(StatusCode::ACCEPTED.into_response())
            }
        }
    })
}
