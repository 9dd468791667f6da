//! Unit conversions at the display boundary.
//!
//! The provider reports metric values (°C, m/s); everything here rounds
//! half-up so that e.g. 2.5 → 3 and -2.5 → -2.

use serde::{Deserialize, Serialize};

/// Metres per second → kilometres per hour
pub const MS_TO_KMH: f64 = 3.6;

fn round_half_up(value: f64) -> i64 {
    // `value - floor` is exact; adding 0.5 first is not
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 { floor + 1.0 } else { floor };
    rounded as i64
}

/// Wind speed in whole km/h
pub fn ms_to_kmh(speed_ms: f64) -> i64 {
    round_half_up(speed_ms * MS_TO_KMH)
}

/// Inverse of [`ms_to_kmh`], exact up to its rounding
pub fn kmh_to_ms(speed_kmh: f64) -> f64 {
    speed_kmh / MS_TO_KMH
}

/// Wind speed in whole m/s
pub fn round_ms(speed_ms: f64) -> i64 {
    round_half_up(speed_ms)
}

/// Temperature in whole degrees
pub fn round_temperature(celsius: f64) -> i64 {
    round_half_up(celsius)
}

/// Wind speed display unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindUnit {
    MetersPerSecond,
    #[default]
    KilometersPerHour,
}

impl WindUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "km/h",
        }
    }

    /// Whole-number speed in this unit
    pub fn convert(self, speed_ms: f64) -> i64 {
        match self {
            Self::MetersPerSecond => round_ms(speed_ms),
            Self::KilometersPerHour => ms_to_kmh(speed_ms),
        }
    }

    pub fn format(self, speed_ms: f64) -> String {
        format!("{} {}", self.convert(speed_ms), self.symbol())
    }
}
