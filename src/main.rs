//! Browser Pilot MCP Server - Main Entry Point

use clap::Parser;
use rmcp::{transport::stdio, ServiceExt};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use browser_pilot::{
    config::{Args, LoggingConfig},
    driver::CdpDriver,
    BrowserError, BrowserToolHandler, Config, DeviceCatalog,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Handle special flags first
    if args.generate_config {
        let config = Config::default();
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    // Load configuration and merge command line arguments
    let mut config = Config::load(args.config.as_ref())?;
    config.merge_args(&args);

    if args.validate_config {
        config.validate()?;
        println!("Configuration is valid");
        return Ok(());
    }

    if args.show_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    config.validate()?;

    // Initialize logging (stderr or file; stdout carries the protocol)
    init_logging(&config.logging)?;

    info!("Starting Browser Pilot MCP Server v{}", env!("CARGO_PKG_VERSION"));
    debug!("Command line args: {:?}", args);

    // Device catalog: built-in profiles plus optional user extensions
    let mut catalog = DeviceCatalog::builtin();
    if let Some(path) = &config.devices.catalog_file {
        let added = catalog
            .extend_from_file(path)
            .inspect_err(|e| error!("Device file rejected: {}", e))?;
        info!("Loaded {} device profiles from {}", added, path.display());
    }
    info!("Device catalog ready ({} profiles)", catalog.len());
    let catalog = Arc::new(catalog);

    // Launch the browser
    let driver = Arc::new(
        CdpDriver::launch(&config.browser)
            .await
            .inspect_err(|e| error!("Browser launch failed: {}", e))?,
    );

    let handler = BrowserToolHandler::new(catalog.clone(), driver.clone());

    // Activate the startup device profile, if one is configured
    if let Some(name) = &config.devices.default_device {
        let device = catalog
            .find(name)
            .ok_or_else(|| BrowserError::DeviceNotFound(name.clone()))?;
        handler.context().switch_context(device).await?;
        info!("Default device '{}' active", name);
    }

    // Serve over stdio using the rust-sdk standard pattern
    let service = handler.serve(stdio()).await.inspect_err(|e| {
        error!("Serving error: {:?}", e);
    })?;

    info!("Browser Pilot MCP Server started successfully");

    // Wait for the service to complete
    service.waiting().await?;

    info!("Cleaning up resources...");
    if let Err(e) = driver.shutdown().await {
        warn!("Browser shutdown failed: {}", e);
    }

    info!("Browser Pilot MCP Server stopped");
    Ok(())
}

/// Initialize logging system
fn init_logging(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(false)
        .with_line_number(false);

    if let Some(log_file) = &logging.file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;

        subscriber.with_writer(file).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    debug!("Logging initialized with level: {}", logging.level);
    Ok(())
}
