//! Browser driver seam
//!
//! The context and tool layers only ever talk to these traits. The
//! production implementation in [`cdp`] drives a Chromium instance over the
//! DevTools protocol; tests substitute a recording fake.

use async_trait::async_trait;
use std::sync::Arc;

use crate::devices::DeviceDescriptor;
use crate::error::Result;

pub mod cdp;

pub use cdp::CdpDriver;

/// Captured page state, attached to responses that requested a snapshot.
#[derive(Debug, Clone, Default)]
pub struct PageSnapshot {
    pub url: Option<String>,
    pub title: Option<String>,
}

/// Driver-level operations against the running browser.
///
/// Emulation is sticky: `set_emulation` records the profile and every tab
/// opened afterwards carries it. Already-open tabs are never touched.
#[async_trait]
pub trait BrowserDriver: Send + Sync {
    async fn set_emulation(&self, device: &DeviceDescriptor) -> Result<()>;

    async fn open_tab(&self) -> Result<Arc<dyn TabHandle>>;
}

/// Handle to a single browser page/session.
#[async_trait]
pub trait TabHandle: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    async fn go_back(&self) -> Result<()>;

    async fn snapshot(&self) -> Result<PageSnapshot>;
}
