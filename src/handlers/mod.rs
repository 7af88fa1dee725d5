pub mod health;
pub mod info;
pub mod mcp;

pub use health::health_handler;
pub use info::{method_not_allowed_handler, server_info_handler, sse_handler};
pub use mcp::mcp_handler;
