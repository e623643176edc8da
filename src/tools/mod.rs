//! MCP tool definitions and handler

pub mod handler;
pub mod types;

pub use handler::BrowserToolHandler;
