//! Request-boundary checks applied before any JSON-RPC dispatch.
//!
//! `Origin` is validated to block DNS-rebinding from browsers; requests
//! without the header (CLI and server-side clients) pass through. A present
//! `MCP-Protocol-Version` header must name a supported version.

use crate::error::AppError;
use crate::protocol::SUPPORTED_PROTOCOL_VERSIONS;
use axum::{
    extract::Request,
    http::header::ORIGIN,
    middleware::Next,
    response::Response,
};
use url::Url;

pub const MCP_PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";

/// Hosts accepted on any port.
const LOCAL_HOSTS: [&str; 3] = ["localhost", "127.0.0.1", "0.0.0.0"];

/// Production hosts; subdomains are accepted too.
const ALLOWED_HOSTS: [&str; 2] = ["mcpcentral.io", "mcp.time.mcpcentral.io"];

/// True if `origin` parses as a URL whose host is local or allow-listed.
pub fn validate_origin(origin: &str) -> bool {
    let Ok(url) = Url::parse(origin) else {
        return false;
    };
    let Some(host) = url.host_str() else {
        return false;
    };

    if LOCAL_HOSTS.contains(&host) {
        return true;
    }

    ALLOWED_HOSTS.iter().any(|allowed| {
        host == *allowed
            || host
                .strip_suffix(*allowed)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

pub fn validate_protocol_version(version: &str) -> bool {
    SUPPORTED_PROTOCOL_VERSIONS.contains(&version)
}

/// Middleware enforcing both checks. `OPTIONS` never gets here: the CORS
/// layer above answers every preflight.
pub async fn boundary_guard(request: Request, next: Next) -> Result<Response, AppError> {
    if let Some(origin) = request.headers().get(ORIGIN) {
        // Non-UTF-8 values fail URL parsing below.
        let origin = origin.to_str().unwrap_or_default();
        if !validate_origin(origin) {
            return Err(AppError::InvalidOrigin(origin.to_string()));
        }
    }

    if let Some(version) = request.headers().get(MCP_PROTOCOL_VERSION_HEADER) {
        let version = version.to_str().unwrap_or_default();
        if !validate_protocol_version(version) {
            return Err(AppError::UnsupportedProtocolVersion(version.to_string()));
        }
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_origins() {
        assert!(validate_origin("https://mcp.time.mcpcentral.io"));
        assert!(validate_origin("https://mcpcentral.io"));
        assert!(validate_origin("https://app.mcpcentral.io:8443"));
    }

    #[test]
    fn test_local_origins_any_port() {
        assert!(validate_origin("http://localhost:5173"));
        assert!(validate_origin("http://127.0.0.1:3000"));
        assert!(validate_origin("http://0.0.0.0"));
        assert!(validate_origin("http://localhost"));
    }

    #[test]
    fn test_foreign_origins_rejected() {
        assert!(!validate_origin("https://evil.example.com"));
        assert!(!validate_origin("https://notmcpcentral.io"));
        assert!(!validate_origin("https://mcpcentral.io.evil.com"));
    }

    #[test]
    fn test_unparseable_origin_rejected() {
        assert!(!validate_origin("not a url"));
        assert!(!validate_origin("null"));
        assert!(!validate_origin(""));
    }

    #[test]
    fn test_protocol_versions() {
        assert!(validate_protocol_version("2025-06-18"));
        assert!(validate_protocol_version("2025-03-26"));
        assert!(validate_protocol_version("2024-11-05"));
        assert!(!validate_protocol_version("2023-01-01"));
        assert!(!validate_protocol_version(""));
    }
}
