//! OpenWeatherMap current-conditions client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::types::{Coordinates, WeatherError, WeatherSnapshot, GENERIC_FETCH_FAILURE};

/// A remote service returning current conditions for a coordinate pair.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// One request, no retries.
    async fn current(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, WeatherError>;
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    weather: Vec<ConditionBody>,
    main: MainBody,
    wind: WindBody,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sys: SysBody,
}

#[derive(Debug, Deserialize)]
struct ConditionBody {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct MainBody {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct WindBody {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct SysBody {
    #[serde(default)]
    country: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl CurrentResponse {
    fn into_snapshot(self, observed_at: DateTime<Utc>) -> Result<WeatherSnapshot, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::MissingConditions)?;

        Ok(WeatherSnapshot {
            temperature: self.main.temp,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            wind_speed: self.wind.speed,
            condition_main: condition.main,
            condition_description: condition.description,
            city_name: self.name,
            country_code: self.sys.country,
            observed_at,
        })
    }
}

/// Provider-supplied message from an error body, or the generic fallback
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| GENERIC_FETCH_FAILURE.to_string())
}

/// Parse a successful response body, stamping it with `observed_at`
pub fn parse_current(body: &str, observed_at: DateTime<Utc>) -> Result<WeatherSnapshot, WeatherError> {
    let response: CurrentResponse =
        serde_json::from_str(body).map_err(|e| WeatherError::Parse(e.to_string()))?;
    response.into_snapshot(observed_at)
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherProvider {
    /// The API key is fixed for the provider's lifetime.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Fetch current conditions in metric units.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch_current(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", coordinates.latitude.to_string()),
                ("lon", coordinates.longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            // An unreadable error body gets the generic message too
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            tracing::warn!("Weather API returned {}: {}", status, message);
            return Err(WeatherError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let snapshot = parse_current(&body, Utc::now())?;
        tracing::info!(
            "Weather fetched: {} - {}°C, {}",
            snapshot.place_label(),
            snapshot.temperature,
            snapshot.condition_main
        );
        Ok(snapshot)
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn current(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch_current(coordinates).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMA: &str = r#"{
        "weather": [{"main": "Rain", "description": "light rain"}],
        "main": {"temp": 18.4, "feels_like": 17.9, "humidity": 80},
        "wind": {"speed": 5},
        "name": "Lima",
        "sys": {"country": "PE"}
    }"#;

    #[test]
    fn test_parse_current() {
        let now = Utc::now();
        let snapshot = parse_current(LIMA, now).unwrap();
        assert_eq!(snapshot.temperature, 18.4);
        assert_eq!(snapshot.feels_like, 17.9);
        assert_eq!(snapshot.humidity, 80);
        assert_eq!(snapshot.wind_speed, 5.0);
        assert_eq!(snapshot.condition_main, "Rain");
        assert_eq!(snapshot.condition_description, "light rain");
        assert_eq!(snapshot.city_name, "Lima");
        assert_eq!(snapshot.country_code, "PE");
        assert_eq!(snapshot.observed_at, now);
    }

    #[test]
    fn test_parse_ignores_extra_fields_and_missing_place() {
        let body = r#"{
            "coord": {"lon": 0, "lat": 0},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "main": {"temp": 27.1, "feels_like": 29.0, "humidity": 70, "pressure": 1012},
            "wind": {"speed": 3.1, "deg": 200},
            "cod": 200
        }"#;
        let snapshot = parse_current(body, Utc::now()).unwrap();
        assert_eq!(snapshot.condition_main, "Clear");
        assert_eq!(snapshot.city_name, "");
        assert_eq!(snapshot.country_code, "");
    }

    #[test]
    fn test_parse_empty_conditions() {
        let body = r#"{
            "weather": [],
            "main": {"temp": 1.0, "feels_like": 1.0, "humidity": 1},
            "wind": {"speed": 0},
            "name": "X",
            "sys": {"country": "Y"}
        }"#;
        assert!(matches!(
            parse_current(body, Utc::now()),
            Err(WeatherError::MissingConditions)
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_current("<html>", Utc::now()),
            Err(WeatherError::Parse(_))
        ));
        assert!(matches!(
            parse_current(r#"{"weather": []}"#, Utc::now()),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn test_error_message_from_body() {
        assert_eq!(error_message(r#"{"cod": 500, "message": "server error"}"#), "server error");
        assert_eq!(
            error_message(r#"{"cod": "401", "message": "Invalid API key."}"#),
            "Invalid API key."
        );
    }

    #[test]
    fn test_error_message_fallback() {
        assert_eq!(error_message("Internal Server Error"), GENERIC_FETCH_FAILURE);
        assert_eq!(error_message(""), GENERIC_FETCH_FAILURE);
        assert_eq!(error_message(r#"{"cod": 500}"#), GENERIC_FETCH_FAILURE);
        assert_eq!(error_message(r#"{"message": ""}"#), GENERIC_FETCH_FAILURE);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let provider =
            WeatherProvider::new("key", "http://localhost:1234/", Duration::from_secs(1)).unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
    }
}
