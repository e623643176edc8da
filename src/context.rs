//! Browser session context
//!
//! Owns the active device-emulation state and zero-or-one current tab.
//! All state transitions go through a single async mutex held across the
//! driver suspension points, so concurrent tool calls against the same
//! context cannot interleave inside one operation.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::devices::DeviceDescriptor;
use crate::driver::{BrowserDriver, TabHandle};
use crate::error::Result;

struct TabEntry {
    handle: Arc<dyn TabHandle>,
    opened_at: DateTime<Utc>,
}

#[derive(Default)]
struct ContextState {
    active_device: Option<String>,
    tab: Option<TabEntry>,
}

pub struct Context {
    driver: Arc<dyn BrowserDriver>,
    created_at: DateTime<Utc>,
    state: Mutex<ContextState>,
}

impl Context {
    pub fn new(driver: Arc<dyn BrowserDriver>) -> Self {
        Self {
            driver,
            created_at: Utc::now(),
            state: Mutex::new(ContextState::default()),
        }
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Apply a device profile. Returns whether a switch actually occurred;
    /// requesting the already-active profile is a no-op and the driver is
    /// not called.
    pub async fn switch_context(&self, device: &DeviceDescriptor) -> Result<bool> {
        let mut state = self.state.lock().await;
        if state.active_device.as_deref() == Some(device.name.as_str()) {
            debug!("Device '{}' already active, no switch", device.name);
            return Ok(false);
        }

        self.driver.set_emulation(device).await?;
        info!(
            "Switched emulation to '{}' ({}x{})",
            device.name, device.viewport.width, device.viewport.height
        );
        state.active_device = Some(device.name.clone());
        Ok(true)
    }

    /// Name of the active device profile, if any.
    pub async fn active_device(&self) -> Option<String> {
        self.state.lock().await.active_device.clone()
    }

    pub async fn current_tab(&self) -> Option<Arc<dyn TabHandle>> {
        self.state.lock().await.tab.as_ref().map(|t| t.handle.clone())
    }

    /// Open a fresh tab under the current emulation state and make it the
    /// current one. Any previous tab is dropped, not closed: it belonged to
    /// the emulation state that was active when it was opened.
    pub async fn new_tab(&self) -> Result<Arc<dyn TabHandle>> {
        let mut state = self.state.lock().await;
        let handle = self.driver.open_tab().await?;

        if let Some(prev) = state.tab.take() {
            debug!("Replacing tab opened at {}", prev.opened_at);
        }
        state.tab = Some(TabEntry {
            handle: handle.clone(),
            opened_at: Utc::now(),
        });
        Ok(handle)
    }

    /// Current tab, or a new one if none exists.
    pub async fn ensure_tab(&self) -> Result<Arc<dyn TabHandle>> {
        {
            let state = self.state.lock().await;
            if let Some(tab) = &state.tab {
                return Ok(tab.handle.clone());
            }
        }
        self.new_tab().await
    }
}
