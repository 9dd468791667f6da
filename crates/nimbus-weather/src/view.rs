//! Render-ready projection of a snapshot.

use chrono::{DateTime, Local};

use crate::theme::{self, Theme};
use crate::types::WeatherSnapshot;
use crate::units::{self, WindUnit};

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub place: String,
    /// Whole °C
    pub temperature: i64,
    /// Whole °C
    pub feels_like: i64,
    pub humidity: u8,
    pub wind: String,
    pub condition: String,
    pub description: String,
    pub description_emoji: &'static str,
    pub theme: Theme,
    pub updated_at: DateTime<Local>,
}

impl WeatherView {
    pub fn new(snapshot: &WeatherSnapshot, wind_unit: WindUnit) -> Self {
        Self {
            place: snapshot.place_label(),
            temperature: units::round_temperature(snapshot.temperature),
            feels_like: units::round_temperature(snapshot.feels_like),
            humidity: snapshot.humidity,
            wind: wind_unit.format(snapshot.wind_speed),
            condition: snapshot.condition_main.clone(),
            description: snapshot.condition_description.clone(),
            description_emoji: theme::description_emoji(&snapshot.condition_description),
            theme: snapshot.theme(),
            updated_at: snapshot.observed_at.with_timezone(&Local),
        }
    }

    /// "Updated 14:05"
    pub fn updated_label(&self) -> String {
        format!("Updated {}", self.updated_at.format("%H:%M"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lima() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 18.4,
            feels_like: 17.9,
            humidity: 80,
            wind_speed: 5.0,
            condition_main: "Rain".to_string(),
            condition_description: "light rain".to_string(),
            city_name: "Lima".to_string(),
            country_code: "PE".to_string(),
            observed_at: Utc::now(),
        }
    }

    #[test]
    fn test_themed_view() {
        let view = WeatherView::new(&lima(), WindUnit::KilometersPerHour);
        assert_eq!(view.place, "Lima, PE");
        assert_eq!(view.temperature, 18);
        assert_eq!(view.feels_like, 18);
        assert_eq!(view.humidity, 80);
        assert_eq!(view.wind, "18 km/h");
        assert_eq!(view.condition, "Rain");
        assert_eq!(view.theme, theme::RAIN);
        assert_eq!(view.description_emoji, "🌧️");
    }

    #[test]
    fn test_plain_view_uses_ms() {
        let view = WeatherView::new(&lima(), WindUnit::MetersPerSecond);
        assert_eq!(view.wind, "5 m/s");
    }

    #[test]
    fn test_updated_label() {
        let view = WeatherView::new(&lima(), WindUnit::MetersPerSecond);
        let label = view.updated_label();
        assert!(label.starts_with("Updated "));
        assert_eq!(label.len(), "Updated 00:00".len());
    }
}
