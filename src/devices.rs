//! Device emulation catalog
//!
//! Named emulation profiles (viewport, user agent, scale factor, touch)
//! matching the descriptors shipped by mainstream browser-automation
//! drivers. The catalog is constructed once in `main` and injected into the
//! tool handler; tools only ever read it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{BrowserError, Result};

/// A named device emulation profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    pub name: String,
    pub user_agent: String,
    pub viewport: Viewport,
    pub device_scale_factor: f64,
    #[serde(default)]
    pub is_mobile: bool,
    #[serde(default)]
    pub has_touch: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// File format for user-supplied catalog extensions.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    devices: Vec<DeviceDescriptor>,
}

/// Read-only catalog of device profiles, keyed by exact name.
#[derive(Debug, Clone)]
pub struct DeviceCatalog {
    devices: Vec<DeviceDescriptor>,
}

impl DeviceCatalog {
    /// The built-in profile set.
    pub fn builtin() -> Self {
        Self {
            devices: builtin_devices(),
        }
    }

    /// Extend the catalog from a TOML file with `[[devices]]` entries.
    /// An entry whose name collides with an existing profile replaces it.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            BrowserError::InvalidConfig(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let file: CatalogFile = toml::from_str(&content).map_err(|e| {
            BrowserError::InvalidConfig(format!("Invalid device file {}: {}", path.display(), e))
        })?;

        let count = file.devices.len();
        for device in file.devices {
            match self.devices.iter_mut().find(|d| d.name == device.name) {
                Some(existing) => *existing = device,
                None => self.devices.push(device),
            }
        }
        Ok(count)
    }

    /// Exact-name lookup. Absence is reported to callers as
    /// `BrowserError::DeviceNotFound` at the tool layer.
    pub fn find(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.devices.iter().find(|d| d.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.devices.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Serialize the full catalog as pretty JSON for `device_list`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.devices)?)
    }
}

fn builtin_devices() -> Vec<DeviceDescriptor> {
    let phone = |name: &str, ua: &str, width, height, dsf| DeviceDescriptor {
        name: name.to_string(),
        user_agent: ua.to_string(),
        viewport: Viewport { width, height },
        device_scale_factor: dsf,
        is_mobile: true,
        has_touch: true,
    };
    let desktop = |name: &str, ua: &str, dsf| DeviceDescriptor {
        name: name.to_string(),
        user_agent: ua.to_string(),
        viewport: Viewport {
            width: 1280,
            height: 720,
        },
        device_scale_factor: dsf,
        is_mobile: false,
        has_touch: false,
    };

    const IPHONE_15_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPHONE_13_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";
    const IPAD_UA: &str = "Mozilla/5.0 (iPad; CPU OS 15_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1";

    vec![
        phone("iPhone 13", IPHONE_13_UA, 390, 664, 3.0),
        phone("iPhone 13 Pro Max", IPHONE_13_UA, 428, 746, 3.0),
        phone("iPhone 15", IPHONE_15_UA, 393, 659, 3.0),
        phone(
            "iPhone SE",
            "Mozilla/5.0 (iPhone; CPU iPhone OS 15_0 like Mac OS X) \
             AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Mobile/15E148 Safari/604.1",
            320,
            568,
            2.0,
        ),
        phone(
            "Pixel 5",
            "Mozilla/5.0 (Linux; Android 11; Pixel 5) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/90.0.4430.91 Mobile Safari/537.36",
            393,
            851,
            2.75,
        ),
        phone(
            "Pixel 7",
            "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/108.0.5359.127 Mobile Safari/537.36",
            412,
            839,
            2.625,
        ),
        phone(
            "Galaxy S9+",
            "Mozilla/5.0 (Linux; Android 8.0.0; SM-G965U) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/63.0.3239.111 Mobile Safari/537.36",
            320,
            658,
            4.5,
        ),
        phone("iPad (gen 7)", IPAD_UA, 810, 1080, 2.0),
        phone("iPad Mini", IPAD_UA, 768, 1024, 2.0),
        desktop(
            "Desktop Chrome",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/119.0.6045.9 Safari/537.36",
            1.0,
        ),
        desktop(
            "Desktop Edge",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/119.0.6045.9 Safari/537.36 Edg/119.0.2151.44",
            1.0,
        ),
        desktop(
            "Desktop Firefox",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:109.0) \
             Gecko/20100101 Firefox/115.0",
            1.0,
        ),
        desktop(
            "Desktop Safari",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 \
             (KHTML, like Gecko) Version/17.0 Safari/605.1.15",
            2.0,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = DeviceCatalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.len() >= 10);

        let device = catalog.find("iPhone 13").unwrap();
        assert_eq!(device.viewport.width, 390);
        assert!(device.is_mobile);
        assert!(device.has_touch);

        let desktop = catalog.find("Desktop Chrome").unwrap();
        assert!(!desktop.is_mobile);
        assert_eq!(desktop.viewport.width, 1280);
    }

    #[test]
    fn test_lookup_is_exact() {
        let catalog = DeviceCatalog::builtin();
        assert!(catalog.find("iphone 13").is_none());
        assert!(catalog.find("iPhone 99").is_none());
    }

    #[test]
    fn test_to_json() {
        let catalog = DeviceCatalog::builtin();
        let json = catalog.to_json().unwrap();
        assert!(json.contains("\"iPhone 13\""));
        assert!(json.contains("user_agent"));

        // Round-trips as a JSON array of descriptors
        let parsed: Vec<DeviceDescriptor> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), catalog.len());
    }

    #[test]
    fn test_extension_replaces_by_name() {
        let mut catalog = DeviceCatalog::builtin();
        let before = catalog.len();

        let dir = std::env::temp_dir();
        let path = dir.join("browser_pilot_devices_test.toml");
        std::fs::write(
            &path,
            r#"
[[devices]]
name = "iPhone 13"
user_agent = "custom-ua"
viewport = { width = 400, height = 700 }
device_scale_factor = 3.0
is_mobile = true
has_touch = true

[[devices]]
name = "Kiosk 4K"
user_agent = "kiosk-ua"
viewport = { width = 3840, height = 2160 }
device_scale_factor = 1.0
"#,
        )
        .unwrap();

        let loaded = catalog.extend_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, 2);
        assert_eq!(catalog.len(), before + 1);
        assert_eq!(catalog.find("iPhone 13").unwrap().user_agent, "custom-ua");
        let kiosk = catalog.find("Kiosk 4K").unwrap();
        assert!(!kiosk.is_mobile);
        assert_eq!(kiosk.viewport.width, 3840);
    }
}
