//! Type definitions for the browser MCP tools

use schemars::JsonSchema;
use serde::Deserialize;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeviceListArgs {
    // No parameters needed
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DeviceSwitchArgs {
    /// Device name to emulate (e.g., "iPhone 13", "Pixel 5")
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateArgs {
    /// The URL to navigate to
    pub url: String,
    /// Device name to emulate (e.g., "iPhone 13", "Pixel 5")
    #[serde(default)]
    pub device: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct NavigateBackArgs {
    // No parameters needed
}
