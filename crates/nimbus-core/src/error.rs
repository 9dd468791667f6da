//! Centralized error types for Nimbus.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling throughout the codebase
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for debugging/logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a display-appropriate hint.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherServiceError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    ///
    /// These messages are designed to be actionable and non-technical.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Network(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
        }
    }
}

/// Configuration errors, surfaced at startup through `anyhow`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Weather and location errors as seen by the application.
#[derive(Debug, Error)]
pub enum WeatherServiceError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Service unavailable")]
    ServiceUnavailable,
}

impl WeatherServiceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherServiceError::PermissionDenied => {
                "Allow location access (location.permission) and retry."
            }
            WeatherServiceError::LocationUnavailable(_) => {
                "Could not determine your location. Please try again."
            }
            WeatherServiceError::ApiError(_) => "Weather service error. Please try again.",
            WeatherServiceError::InvalidApiKey => "Weather API key is invalid. Check settings.",
            WeatherServiceError::ServiceUnavailable => {
                "Weather service unavailable. Please try again later."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_non_empty() {
        let errors = vec![
            AppError::from(NetworkError::Timeout),
            AppError::from(NetworkError::InvalidResponse("not json".into())),
            AppError::from(WeatherServiceError::ServiceUnavailable),
            AppError::from(WeatherServiceError::PermissionDenied),
        ];

        for err in errors {
            assert!(!err.user_message().is_empty(), "empty message for {err}");
        }
        assert!(!ConfigError::Invalid("test".into()).user_message().is_empty());
    }

    #[test]
    fn test_app_error_conversion() {
        let weather_err = WeatherServiceError::InvalidApiKey;
        let app_err: AppError = weather_err.into();
        assert!(matches!(
            app_err,
            AppError::Weather(WeatherServiceError::InvalidApiKey)
        ));
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::Weather(WeatherServiceError::InvalidApiKey);
        assert_eq!(
            app_err.user_message(),
            "Weather API key is invalid. Check settings."
        );
    }

    #[test]
    fn test_server_error_message_depends_on_status() {
        let server = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 404,
            message: "missing".into(),
        };
        assert!(server.user_message().contains("later"));
        assert_ne!(server.user_message(), client.user_message());
    }
}
