use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::theme::{self, Theme};

/// Message surfaced when the user has not granted location access
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Location permission denied. Allow location access to see local weather.";

/// Message surfaced when a failed weather response carries no usable message
pub const GENERIC_FETCH_FAILURE: &str = "Failed to fetch weather data";

/// Geographic coordinates of a single fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Requested accuracy for a single location fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Accuracy {
    Lowest,
    Low,
    #[default]
    Balanced,
    High,
}

impl Accuracy {
    /// Radius within which a fix of this accuracy is expected to fall
    pub fn radius_meters(self) -> f64 {
        match self {
            Self::Lowest => 3000.0,
            Self::Low => 1000.0,
            Self::Balanced => 100.0,
            Self::High => 10.0,
        }
    }
}

/// Outcome of a location permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Current conditions for one location.
///
/// Replaced wholesale on every successful fetch; never partially updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in °C
    pub temperature: f64,
    /// Apparent temperature in °C
    pub feels_like: f64,
    /// Relative humidity in %
    pub humidity: u8,
    /// Wind speed in m/s
    pub wind_speed: f64,
    /// Short categorical label, e.g. "Rain"
    pub condition_main: String,
    /// Free-text description, e.g. "light rain"
    pub condition_description: String,
    pub city_name: String,
    pub country_code: String,
    pub observed_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Theme derived from the condition label
    pub fn theme(&self) -> Theme {
        theme::theme(&self.condition_main)
    }

    /// "City, CC", falling back to whichever part is present
    pub fn place_label(&self) -> String {
        match (self.city_name.is_empty(), self.country_code.is_empty()) {
            (false, false) => format!("{}, {}", self.city_name, self.country_code),
            (false, true) => self.city_name.clone(),
            (true, false) => self.country_code.clone(),
            (true, true) => "Unknown location".to_string(),
        }
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unavailable: {0}")]
    Unavailable(String),
    #[error("Location request timed out")]
    Timeout,
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Non-success status; `message` is the provider's own text or the generic fallback
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Invalid weather data: {0}")]
    Parse(String),
    #[error("Weather response contained no conditions")]
    MissingConditions,
}

/// Why a fetch ended in `Failed`.
///
/// `Display` is the user-visible reason, surfaced verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{}", PERMISSION_DENIED_MESSAGE)]
    PermissionDenied,
    #[error("{0}")]
    LocationUnavailable(String),
    /// Transport failures, non-2xx responses and unreadable bodies
    #[error("{message}")]
    Network {
        failure: NetworkFailure,
        message: String,
    },
    #[error("{0}")]
    Unknown(String),
}

/// What went wrong talking to the weather provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// No usable response: refused connection, DNS, TLS
    Transport,
    Timeout,
    /// Non-success HTTP status
    Status(u16),
    /// Success status, but the body could not be read or parsed
    InvalidBody,
}

impl FetchError {
    /// HTTP status of a non-success response
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Network {
                failure: NetworkFailure::Status(status),
                ..
            } => Some(*status),
            _ => None,
        }
    }

    /// User-visible reason; never empty
    pub fn reason(&self) -> String {
        let reason = self.to_string();
        if reason.trim().is_empty() {
            GENERIC_FETCH_FAILURE.to_string()
        } else {
            reason
        }
    }
}

impl From<LocationError> for FetchError {
    fn from(e: LocationError) -> Self {
        FetchError::LocationUnavailable(e.to_string())
    }
}

impl From<WeatherError> for FetchError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(err) => {
                let failure = if err.is_timeout() {
                    NetworkFailure::Timeout
                } else if err.is_decode() || err.is_body() {
                    NetworkFailure::InvalidBody
                } else if let Some(status) = err.status() {
                    NetworkFailure::Status(status.as_u16())
                } else {
                    NetworkFailure::Transport
                };
                FetchError::Network {
                    failure,
                    // The request URL carries the API key
                    message: err.without_url().to_string(),
                }
            }
            WeatherError::Api { status, message } => FetchError::Network {
                failure: NetworkFailure::Status(status),
                message,
            },
            e @ WeatherError::Parse(_) => FetchError::Network {
                failure: NetworkFailure::InvalidBody,
                message: e.to_string(),
            },
            e @ WeatherError::MissingConditions => FetchError::Unknown(e.to_string()),
        }
    }
}
