//! Browser Pilot MCP Server
//!
//! A Model Context Protocol server for browser automation with device
//! emulation. Drives a Chromium instance over the DevTools protocol and
//! exposes device-catalog, device-switch, and navigation tools to MCP
//! clients.

pub mod config;
pub mod context;
pub mod devices;
pub mod driver;
pub mod error;
pub mod response;
pub mod tools;

pub use config::Config;
pub use context::Context;
pub use devices::{DeviceCatalog, DeviceDescriptor};
pub use error::{BrowserError, Result};
pub use response::Response;
pub use tools::BrowserToolHandler;
