//! `skycheck` - Current weather lookup for a city name or your location
//!
//! This library resolves a free-text place name (or the system's position)
//! to coordinates via the Open-Meteo geocoding API, fetches current
//! conditions from the Open-Meteo forecast API, and classifies them for
//! display.

pub mod api;
pub mod config;
pub mod error;
pub mod geolocation;
pub mod lookup;
pub mod models;

// Re-export core types for public API
pub use api::WeatherApiClient;
pub use config::SkycheckConfig;
pub use error::SkycheckError;
pub use geolocation::{GeolocationSource, IpGeolocationSource, Position};
pub use lookup::{LookupService, LookupSession, LookupState};
pub use models::{CurrentConditions, Observation, Place, TemperatureUnit, WeatherCode};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycheckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
