use crate::error::AppError;
use crate::guard::{boundary_guard, MCP_PROTOCOL_VERSION_HEADER};
use crate::handlers::{
    health_handler, mcp_handler, method_not_allowed_handler, server_info_handler, sse_handler,
};
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{CONTENT_TYPE, ORIGIN},
        HeaderName, Method,
    },
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::any::Any;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};

const MCP_SESSION_ID_HEADER: &str = "mcp-session-id";

/// Permissive CORS: any origin, the MCP headers, `GET, POST, OPTIONS`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(MCP_PROTOCOL_VERSION_HEADER),
            HeaderName::from_static(MCP_SESSION_ID_HEADER),
            ORIGIN,
        ])
}

/// Turn a handler panic into a 500 with a generic JSON-RPC error body.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    AppError::InternalError(detail).into_response()
}

/// Build the HTTP surface around shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    let routes = Router::new()
        .route(
            "/",
            get(server_info_handler)
                .post(mcp_handler)
                .fallback(method_not_allowed_handler),
        )
        .route("/sse", get(sse_handler))
        .route("/health", get(health_handler));

    with_layers(routes, max_body_bytes).with_state(state)
}

/// Layer order, outermost first: trace, CORS (answers every `OPTIONS`),
/// panic catcher, boundary guard, body limit.
fn with_layers(routes: Router<Arc<AppState>>, max_body_bytes: usize) -> Router<Arc<AppState>> {
    routes.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer())
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(middleware::from_fn(boundary_guard))
            .layer(DefaultBodyLimit::max(max_body_bytes)),
    )
}
