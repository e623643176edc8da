//! Chromium driver over the DevTools protocol
//!
//! Launches a Chromium instance via `chromiumoxide` and implements the
//! driver seam on top of it. Emulation overrides (metrics, user agent,
//! touch) are per-target in CDP, so the active profile is recorded here and
//! applied to each tab as it is opened; tabs opened earlier keep whatever
//! profile they were born with.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as ChromeConfig};
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetTouchEmulationEnabledParams, SetUserAgentOverrideParams,
};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{BrowserDriver, PageSnapshot, TabHandle};
use crate::config::BrowserConfig;
use crate::devices::DeviceDescriptor;
use crate::error::{BrowserError, Result};

/// Pause after history traversal; the CDP call returns before the
/// renderer has committed the previous document.
const HISTORY_SETTLE: Duration = Duration::from_millis(500);

pub struct CdpDriver {
    browser: Mutex<Browser>,
    emulation: Mutex<Option<DeviceDescriptor>>,
    navigation_timeout: Duration,
    event_loop: JoinHandle<()>,
}

impl CdpDriver {
    /// Launch a Chromium instance as configured.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = ChromeConfig::builder();
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        if !config.headless {
            builder = builder.with_head();
        }
        builder = builder.args(config.launch_args.iter().cloned());

        let chrome_config = builder.build().map_err(BrowserError::LaunchFailed)?;
        let (browser, mut handler) = Browser::launch(chrome_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let event_loop = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("CDP event loop terminated: {}", e);
                    break;
                }
            }
        });

        info!(
            "Browser launched (headless: {}, navigation timeout: {}ms)",
            config.headless, config.navigation_timeout_ms
        );

        Ok(Self {
            browser: Mutex::new(browser),
            emulation: Mutex::new(None),
            navigation_timeout: Duration::from_millis(config.navigation_timeout_ms),
            event_loop,
        })
    }

    /// Close the browser process and stop the event loop.
    pub async fn shutdown(&self) -> Result<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(cdp_err)?;
        let _ = browser.wait().await;
        self.event_loop.abort();
        info!("Browser closed");
        Ok(())
    }
}

#[async_trait]
impl BrowserDriver for CdpDriver {
    async fn set_emulation(&self, device: &DeviceDescriptor) -> Result<()> {
        *self.emulation.lock().await = Some(device.clone());
        Ok(())
    }

    async fn open_tab(&self) -> Result<Arc<dyn TabHandle>> {
        let page = {
            let browser = self.browser.lock().await;
            browser.new_page("about:blank").await.map_err(cdp_err)?
        };

        if let Some(device) = self.emulation.lock().await.clone() {
            apply_emulation(&page, &device).await?;
            debug!("Opened tab with '{}' emulation", device.name);
        } else {
            debug!("Opened tab without emulation");
        }

        Ok(Arc::new(CdpTab {
            page,
            navigation_timeout: self.navigation_timeout,
        }))
    }
}

struct CdpTab {
    page: Page,
    navigation_timeout: Duration,
}

#[async_trait]
impl TabHandle for CdpTab {
    async fn navigate(&self, url: &str) -> Result<()> {
        let load = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, CdpError>(())
        };

        match tokio::time::timeout(self.navigation_timeout, load).await {
            Ok(Ok(())) => {
                debug!("Navigated to {}", url);
                Ok(())
            }
            Ok(Err(e)) => Err(BrowserError::NavigationFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }),
            Err(_) => Err(BrowserError::OperationTimeout),
        }
    }

    async fn go_back(&self) -> Result<()> {
        self.page
            .evaluate("history.back()")
            .await
            .map_err(cdp_err)?;
        tokio::time::sleep(HISTORY_SETTLE).await;
        Ok(())
    }

    async fn snapshot(&self) -> Result<PageSnapshot> {
        let url = self.page.url().await.map_err(cdp_err)?;
        let title = self.page.get_title().await.map_err(cdp_err)?;
        Ok(PageSnapshot { url, title })
    }
}

async fn apply_emulation(page: &Page, device: &DeviceDescriptor) -> Result<()> {
    let metrics = SetDeviceMetricsOverrideParams::builder()
        .width(device.viewport.width as i64)
        .height(device.viewport.height as i64)
        .device_scale_factor(device.device_scale_factor)
        .mobile(device.is_mobile)
        .build()
        .map_err(BrowserError::Driver)?;
    page.execute(metrics).await.map_err(cdp_err)?;

    page.execute(SetUserAgentOverrideParams::new(device.user_agent.clone()))
        .await
        .map_err(cdp_err)?;

    page.execute(SetTouchEmulationEnabledParams::new(device.has_touch))
        .await
        .map_err(cdp_err)?;

    Ok(())
}

fn cdp_err(e: CdpError) -> BrowserError {
    BrowserError::Driver(e.to_string())
}
