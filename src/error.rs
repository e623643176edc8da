//! Error types for the browser MCP server

use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Main error type for the browser MCP server
#[derive(Error, Debug)]
pub enum BrowserError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("Operation timeout")]
    OperationTimeout,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<anyhow::Error> for BrowserError {
    fn from(error: anyhow::Error) -> Self {
        BrowserError::InternalError(error.to_string())
    }
}

impl From<BrowserError> for McpError {
    fn from(error: BrowserError) -> Self {
        match &error {
            // Unknown device names are an invalid-params failure, the rest
            // are internal.
            BrowserError::DeviceNotFound(_) => McpError::invalid_params(error.to_string(), None),
            _ => McpError::internal_error(error.to_string(), None),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, BrowserError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BrowserError::DeviceNotFound("iPhone 99".to_string());
        assert_eq!(error.to_string(), "Device not found: iPhone 99");

        let error = BrowserError::NavigationFailed {
            url: "https://example.com".to_string(),
            reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
        };
        assert!(error.to_string().contains("https://example.com"));
        assert!(error.to_string().contains("ERR_NAME_NOT_RESOLVED"));
    }

    #[test]
    fn test_mcp_mapping() {
        let mcp: McpError = BrowserError::DeviceNotFound("Pixel 99".to_string()).into();
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INVALID_PARAMS);

        let mcp: McpError = BrowserError::NoActiveTab.into();
        assert_eq!(mcp.code, rmcp::model::ErrorCode::INTERNAL_ERROR);
    }
}
