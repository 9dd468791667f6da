pub mod config;
pub mod error;

pub use config::{
    Config, DisplayConfig, LocationAccuracy, LocationConfig, LocationPermission,
    LocationSource, ValidationResult, WeatherConfig, WindUnit,
};
pub use error::{AppError, ConfigError, NetworkError, WeatherServiceError};

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr so they don't interleave with the rendered view
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Nimbus core initialized");
    Ok(())
}
