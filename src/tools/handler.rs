//! MCP tool handler for browser control
//!
//! Four action tools registered on the rmcp router: device enumeration,
//! device switching, navigation, and history back. Each handler marshals
//! its validated arguments into context operations and accumulates the
//! outcome in a [`Response`].

use rmcp::{
    tool, tool_handler, tool_router, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::*,
    ErrorData as McpError,
    service::RequestContext,
    RoleServer,
};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::types::*;
use crate::context::Context;
use crate::devices::DeviceCatalog;
use crate::driver::BrowserDriver;
use crate::error::BrowserError;
use crate::response::Response;

/// Result of an optional device-switch request.
enum SwitchOutcome {
    NotRequested,
    AlreadyActive,
    Switched { device: String },
}

impl SwitchOutcome {
    fn switched(&self) -> bool {
        matches!(self, SwitchOutcome::Switched { .. })
    }
}

#[derive(Clone)]
pub struct BrowserToolHandler {
    #[allow(dead_code)]
    tool_router: ToolRouter<BrowserToolHandler>,
    context: Arc<Context>,
    catalog: Arc<DeviceCatalog>,
}

impl BrowserToolHandler {
    pub fn new(catalog: Arc<DeviceCatalog>, driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            context: Arc::new(Context::new(driver)),
            catalog,
        }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Resolve an optionally requested device name and switch to it.
    /// Unknown names fail here, before any tab creation or navigation.
    async fn resolve_and_switch(
        &self,
        requested: Option<&str>,
    ) -> Result<SwitchOutcome, BrowserError> {
        let Some(name) = requested else {
            return Ok(SwitchOutcome::NotRequested);
        };
        let device = self
            .catalog
            .find(name)
            .ok_or_else(|| BrowserError::DeviceNotFound(name.to_string()))?;

        if self.context.switch_context(device).await? {
            Ok(SwitchOutcome::Switched {
                device: device.name.clone(),
            })
        } else {
            Ok(SwitchOutcome::AlreadyActive)
        }
    }

    /// Attach the page-state capture if one was requested, then render.
    async fn finish(&self, mut response: Response) -> CallToolResult {
        if response.wants_snapshot() {
            if let Some(tab) = self.context.current_tab().await {
                match tab.snapshot().await {
                    Ok(snapshot) => response.attach_snapshot(snapshot),
                    Err(e) => warn!("Page-state capture failed: {}", e),
                }
            }
        }
        CallToolResult::success(vec![Content::text(response.render())])
    }
}

#[tool_router]
impl BrowserToolHandler {
    #[tool(description = "List all devices available for emulation")]
    pub async fn device_list(
        &self,
        Parameters(_args): Parameters<DeviceListArgs>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Listing {} device profiles", self.catalog.len());

        let mut response = Response::new();
        response.add_result(self.catalog.to_json()?);
        Ok(self.finish(response).await)
    }

    #[tool(description = "Switch the emulated device for tabs opened from now on")]
    pub async fn device_switch(
        &self,
        Parameters(args): Parameters<DeviceSwitchArgs>,
    ) -> Result<CallToolResult, McpError> {
        let mut response = Response::new();
        match self.resolve_and_switch(args.device.as_deref()).await? {
            SwitchOutcome::Switched { device } => {
                // Snippet names the resolved catalog entry, not the raw input.
                response.add_code(format!("context.switch_device(\"{}\")", device));
            }
            SwitchOutcome::NotRequested | SwitchOutcome::AlreadyActive => {
                response.add_code("OK");
            }
        }
        Ok(self.finish(response).await)
    }

    #[tool(description = "Navigate to a URL, optionally switching the emulated device first")]
    pub async fn browser_navigate(
        &self,
        Parameters(args): Parameters<NavigateArgs>,
    ) -> Result<CallToolResult, McpError> {
        debug!("Navigate to {} (device: {:?})", args.url, args.device);

        let mut response = Response::new();
        let outcome = self.resolve_and_switch(args.device.as_deref()).await?;

        // A freshly switched profile must not reuse a tab that still
        // carries the previous emulation state.
        if outcome.switched() && self.context.current_tab().await.is_some() {
            self.context.new_tab().await?;
        }

        let tab = self.context.ensure_tab().await?;
        tab.navigate(&args.url).await?;
        info!("Navigated to {}", args.url);

        response.set_include_snapshot();
        response.add_code(format!("page.goto(\"{}\")", args.url));
        Ok(self.finish(response).await)
    }

    #[tool(description = "Go back to the previous page in the active tab")]
    pub async fn browser_navigate_back(
        &self,
        Parameters(_args): Parameters<NavigateBackArgs>,
    ) -> Result<CallToolResult, McpError> {
        let tab = self
            .context
            .current_tab()
            .await
            .ok_or(BrowserError::NoActiveTab)?;
        tab.go_back().await?;

        let mut response = Response::new();
        response.set_include_snapshot();
        response.add_code("page.go_back()");
        Ok(self.finish(response).await)
    }
}

#[tool_handler]
impl ServerHandler for BrowserToolHandler {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Browser automation MCP server with device emulation. Lists and switches \
                 emulation profiles (viewport, user agent, touch) and drives page navigation \
                 on a Chromium instance. Tools: device_list, device_switch, browser_navigate, \
                 browser_navigate_back. Navigation responses include the resulting page state."
                    .to_string(),
            ),
        }
    }

    async fn initialize(
        &self,
        _request: InitializeRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<InitializeResult, McpError> {
        info!("Browser MCP server initialized with 4 tools");
        Ok(self.get_info())
    }
}
