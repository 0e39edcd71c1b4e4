// crates/mcp/src/lib.rs
//! MCP server exposing CSV taxonomy tagging tools over stdio.

pub mod handlers;
pub mod protocol;
pub mod server;
pub mod tools;

pub use handlers::ToolHandlers;
