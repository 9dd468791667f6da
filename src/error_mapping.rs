use nimbus_core::{AppError, NetworkError, WeatherServiceError};
use nimbus_weather::{FetchError, NetworkFailure};

/// Classify a fetch failure for the user-facing hint
pub fn app_error(e: &FetchError) -> AppError {
    match e {
        FetchError::PermissionDenied => AppError::Weather(WeatherServiceError::PermissionDenied),
        FetchError::LocationUnavailable(s) => {
            AppError::Weather(WeatherServiceError::LocationUnavailable(s.clone()))
        }
        FetchError::Network { failure, message } => match failure {
            NetworkFailure::Status(401) => AppError::Weather(WeatherServiceError::InvalidApiKey),
            NetworkFailure::Status(503) => {
                AppError::Weather(WeatherServiceError::ServiceUnavailable)
            }
            NetworkFailure::Status(status) => AppError::Network(NetworkError::ServerError {
                status: *status,
                message: message.clone(),
            }),
            NetworkFailure::Timeout => AppError::Network(NetworkError::Timeout),
            NetworkFailure::InvalidBody => {
                AppError::Network(NetworkError::InvalidResponse(message.clone()))
            }
            NetworkFailure::Transport => {
                AppError::Network(NetworkError::ConnectionFailed(message.clone()))
            }
        },
        FetchError::Unknown(s) => AppError::Weather(WeatherServiceError::ApiError(s.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimbus_weather::WeatherError;

    fn network(failure: NetworkFailure, message: &str) -> FetchError {
        FetchError::Network {
            failure,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_permission_denied_maps_to_weather_error() {
        assert!(matches!(
            app_error(&FetchError::PermissionDenied),
            AppError::Weather(WeatherServiceError::PermissionDenied)
        ));
    }

    #[test]
    fn test_unauthorized_maps_to_invalid_key() {
        let e = network(NetworkFailure::Status(401), "Invalid API key.");
        assert_eq!(
            app_error(&e).user_message(),
            "Weather API key is invalid. Check settings."
        );
    }

    #[test]
    fn test_server_error_keeps_status() {
        let e = network(NetworkFailure::Status(500), "server error");
        assert!(matches!(
            app_error(&e),
            AppError::Network(NetworkError::ServerError { status: 500, .. })
        ));
    }

    #[test]
    fn test_service_unavailable() {
        let e = network(NetworkFailure::Status(503), "busy");
        assert!(matches!(
            app_error(&e),
            AppError::Weather(WeatherServiceError::ServiceUnavailable)
        ));
    }

    #[test]
    fn test_transport_error_is_connection_failure() {
        let e = network(NetworkFailure::Transport, "error sending request");
        assert!(matches!(
            app_error(&e),
            AppError::Network(NetworkError::ConnectionFailed(_))
        ));
    }

    #[test]
    fn test_timeout_is_not_connection_failure() {
        let e = network(NetworkFailure::Timeout, "operation timed out");
        assert_eq!(
            app_error(&e).user_message(),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_malformed_body_is_invalid_response() {
        let e: FetchError = WeatherError::Parse("expected value at line 1".to_string()).into();
        let app = app_error(&e);
        assert!(matches!(
            app,
            AppError::Network(NetworkError::InvalidResponse(_))
        ));
        assert_eq!(
            app.user_message(),
            "Received an unexpected response. Please try again."
        );
    }
}
