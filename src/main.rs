mod console;
mod error_mapping;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use nimbus_core::{Config, ConfigError, LocationAccuracy, LocationPermission, LocationSource};
use nimbus_weather::{
    Accuracy, Coordinates, FetchMode, FixedLocationProvider, IpLocationProvider,
    LocationProvider, Permission, WeatherFetchSequence, WeatherProvider, WindUnit,
};
use tokio::sync::mpsc;

use console::{Command, Console, PromptedLocation};

fn accuracy(setting: LocationAccuracy) -> Accuracy {
    match setting {
        LocationAccuracy::Lowest => Accuracy::Lowest,
        LocationAccuracy::Low => Accuracy::Low,
        LocationAccuracy::Balanced => Accuracy::Balanced,
        LocationAccuracy::High => Accuracy::High,
    }
}

fn wind_unit(setting: nimbus_core::WindUnit) -> WindUnit {
    match setting {
        nimbus_core::WindUnit::MetersPerSecond => WindUnit::MetersPerSecond,
        nimbus_core::WindUnit::KilometersPerHour => WindUnit::KilometersPerHour,
    }
}

fn location_provider(config: &Config, console: Arc<Console>) -> Result<Box<dyn LocationProvider>> {
    let location = &config.location;
    // With "ask", the inner provider grants and the prompt decides
    let permission = match location.permission {
        LocationPermission::Denied => Permission::Denied,
        LocationPermission::Granted | LocationPermission::Ask => Permission::Granted,
    };

    let provider: Box<dyn LocationProvider> = match location.source {
        LocationSource::Fixed => {
            let (Some(lat), Some(lon)) = (location.latitude, location.longitude) else {
                anyhow::bail!("location.latitude and location.longitude are required");
            };
            Box::new(FixedLocationProvider::new(
                Coordinates::new(lat, lon),
                permission,
            ))
        }
        LocationSource::Ip => Box::new(
            IpLocationProvider::new(
                location.ip_lookup_url.clone(),
                permission,
                Duration::from_secs(config.weather.request_timeout_secs),
            )
            .context("Failed to create location client")?,
        ),
    };

    if location.permission == LocationPermission::Ask {
        Ok(Box::new(PromptedLocation::new(provider, console)))
    } else {
        Ok(provider)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    nimbus_core::init()?;

    let (config, _) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            if let Some(config_err) = e.downcast_ref::<ConfigError>() {
                eprintln!("{}", config_err.user_message());
            }
            if let Ok(path) = Config::config_path() {
                eprintln!("Config file: {}", path.display());
            }
            return Err(e);
        }
    };

    let (prompts, prompt_rx) = mpsc::unbounded_channel();
    let console = Arc::new(Console::new(prompts));
    let location = location_provider(&config, console.clone())?;
    let weather = WeatherProvider::new(
        config.weather.api_key.clone().unwrap_or_default(),
        config.weather.base_url.clone(),
        Duration::from_secs(config.weather.request_timeout_secs),
    )
    .context("Failed to create weather client")?;

    let sequence =
        WeatherFetchSequence::new(location, weather).with_accuracy(accuracy(config.location.accuracy));

    let style = render::Style {
        wind_unit: wind_unit(config.display.wind_unit),
        themed: config.display.themed,
    };
    let renderer = tokio::spawn(render::run(
        sequence.subscribe(),
        prompt_rx,
        style,
        std::io::stdout(),
    ));

    tracing::info!("Nimbus started");
    sequence.fetch(FetchMode::Initial).await;

    loop {
        match console.read_command().await? {
            Command::Refresh => {
                sequence.fetch(FetchMode::Refresh).await;
            }
            Command::Quit => break,
            Command::Unknown(input) => println!("Unknown command: {} ([Enter] refresh, [q] quit)", input),
        }
    }

    // Dropping the sequence closes the state channel and ends the renderer
    drop(sequence);
    renderer
        .await
        .context("Renderer task failed")?
        .context("Failed to write to the terminal")?;

    tracing::info!("Nimbus stopped");
    Ok(())
}
