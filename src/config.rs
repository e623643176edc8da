//! Configuration management for the browser MCP server

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{BrowserError, Result};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "browser-pilot")]
#[command(about = "A Model Context Protocol server for browser automation with device emulation")]
#[command(version)]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Run the browser with a visible window
    #[arg(long)]
    pub headed: bool,

    /// Path to the Chromium/Chrome executable
    #[arg(long)]
    pub browser_path: Option<PathBuf>,

    /// Navigation timeout in milliseconds
    #[arg(long)]
    pub navigation_timeout: Option<u64>,

    /// TOML file with additional device profiles
    #[arg(long)]
    pub device_file: Option<PathBuf>,

    /// Device profile to activate at startup
    #[arg(long)]
    pub default_device: Option<String>,

    /// Generate default configuration file
    #[arg(long)]
    pub generate_config: bool,

    /// Validate configuration and exit
    #[arg(long)]
    pub validate_config: bool,

    /// Show current configuration and exit
    #[arg(long)]
    pub show_config: bool,
}

/// Main configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub devices: DevicesConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or create default
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                BrowserError::InvalidConfig(format!("Failed to read config file: {}", e))
            })?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| BrowserError::InvalidConfig(format!("Invalid TOML syntax: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Merge command line arguments into configuration
    pub fn merge_args(&mut self, args: &Args) {
        if args.headed {
            self.browser.headless = false;
        }
        if let Some(path) = &args.browser_path {
            self.browser.executable = Some(path.clone());
        }
        if let Some(timeout) = args.navigation_timeout {
            self.browser.navigation_timeout_ms = timeout;
        }
        if let Some(path) = &args.device_file {
            self.devices.catalog_file = Some(path.clone());
        }
        if let Some(device) = &args.default_device {
            self.devices.default_device = Some(device.clone());
        }
        if let Some(level) = &args.log_level {
            self.logging.level = level.clone();
        }
        if let Some(file) = &args.log_file {
            self.logging.file = Some(file.clone());
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.browser.navigation_timeout_ms == 0 {
            return Err(BrowserError::InvalidConfig(
                "browser.navigation_timeout_ms must be > 0".to_string(),
            ));
        }
        match self.logging.level.as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            other => {
                return Err(BrowserError::InvalidConfig(format!(
                    "Unknown logging.level: {}",
                    other
                )));
            }
        }
        Ok(())
    }

    /// Generate TOML configuration string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| BrowserError::InvalidConfig(format!("Failed to serialize config: {}", e)))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct BrowserConfig {
    /// Chromium/Chrome executable; auto-detected when unset.
    pub executable: Option<PathBuf>,
    pub headless: bool,
    pub launch_args: Vec<String>,
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
            launch_args: vec![],
            navigation_timeout_ms: 30_000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct DevicesConfig {
    /// TOML file with additional `[[devices]]` profiles.
    pub catalog_file: Option<PathBuf>,
    /// Profile to activate before the first tool call.
    pub default_device: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_ms, 30_000);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::default();
        config.browser.navigation_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_args() {
        let args = Args::parse_from([
            "browser-pilot",
            "--headed",
            "--navigation-timeout",
            "5000",
            "--default-device",
            "iPhone 13",
        ]);

        let mut config = Config::default();
        config.merge_args(&args);

        assert!(!config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_ms, 5000);
        assert_eq!(config.devices.default_device.as_deref(), Some("iPhone 13"));
        // Untouched fields keep their defaults
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let toml_str = config.to_toml().unwrap();
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[logging]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(
            parsed.browser.navigation_timeout_ms,
            config.browser.navigation_timeout_ms
        );
    }
}
