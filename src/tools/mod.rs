//! MCP tools: the static catalog, the executor and the date/time helpers it uses.

pub mod executor;
pub mod registry;
pub mod time;

pub use executor::{ToolContent, ToolExecutor, ToolResult};
pub use registry::{ToolDescriptor, ToolName, ToolRegistry};
