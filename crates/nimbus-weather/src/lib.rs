//! Weather service for Nimbus
//!
//! Reads one location fix, fetches current conditions from OpenWeatherMap,
//! and derives a display theme from the condition.

pub mod types;
pub mod location;
pub mod provider;
pub mod sequence;
pub mod state;
pub mod theme;
pub mod units;
pub mod view;

pub use types::*;
pub use location::{FixedLocationProvider, IpLocationProvider, LocationProvider};
pub use provider::{WeatherProvider, WeatherSource};
pub use sequence::WeatherFetchSequence;
pub use state::{FetchMode, FetchState};
pub use theme::Theme;
pub use units::WindUnit;
pub use view::WeatherView;
