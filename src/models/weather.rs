//! Current conditions, weather-code classification and temperature display

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Place;

/// Current weather conditions for one coordinate pair
///
/// Mirrors the `current` block of the Open-Meteo forecast response; replaced
/// wholesale per lookup, never merged with prior state.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Air temperature at 2m above ground, in °C
    pub temperature: f64,
    /// WMO weather interpretation code
    pub weather_code: i32,
    /// Observation timestamp as reported by the API (service-local time)
    pub time: String,
}

impl CurrentConditions {
    /// Parse the observation timestamp
    ///
    /// The API reports minutes precision in the location's own timezone.
    /// Returns `None` when the service sent an unexpected format.
    #[must_use]
    pub fn observed_at(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%dT%H:%M").ok()
    }
}

/// Result of one completed lookup: the matched place and its conditions
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Observation {
    pub place: Place,
    pub conditions: CurrentConditions,
}

/// Weather condition classes mapped from WMO codes
///
/// Closed set: one variant per code the widget distinguishes, everything
/// else classifies as `Unknown`.
/// See: <https://open-meteo.com/en/docs#weathervariables>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCode {
    ClearSky,
    MainlyClear,
    PartlyCloudy,
    Overcast,
    Fog,
    RimeFog,
    LightDrizzle,
    Drizzle,
    DenseDrizzle,
    LightRain,
    Rain,
    HeavyRain,
    Unknown,
}

impl WeatherCode {
    /// Classify a WMO weather code by exact match
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::ClearSky,
            1 => Self::MainlyClear,
            2 => Self::PartlyCloudy,
            3 => Self::Overcast,
            45 => Self::Fog,
            48 => Self::RimeFog,
            51 => Self::LightDrizzle,
            53 => Self::Drizzle,
            55 => Self::DenseDrizzle,
            61 => Self::LightRain,
            63 => Self::Rain,
            65 => Self::HeavyRain,
            _ => Self::Unknown,
        }
    }

    /// Get a human-readable description
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::ClearSky => "Clear sky",
            Self::MainlyClear => "Mainly clear",
            Self::PartlyCloudy => "Partly cloudy",
            Self::Overcast => "Overcast",
            Self::Fog => "Fog",
            Self::RimeFog => "Depositing rime fog",
            Self::LightDrizzle => "Light drizzle",
            Self::Drizzle => "Drizzle",
            Self::DenseDrizzle => "Dense drizzle",
            Self::LightRain => "Light rain",
            Self::Rain => "Rain",
            Self::HeavyRain => "Heavy rain",
            Self::Unknown => "Unknown",
        }
    }

    /// Get the display emoji
    #[must_use]
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::ClearSky => "☀️",
            Self::MainlyClear => "🌤️",
            Self::PartlyCloudy => "⛅",
            Self::Overcast => "☁️",
            Self::Fog | Self::RimeFog => "🌫️",
            Self::LightDrizzle | Self::Drizzle => "🌦️",
            Self::DenseDrizzle | Self::LightRain | Self::Rain | Self::HeavyRain => "🌧️",
            Self::Unknown => "❓",
        }
    }
}

/// Temperature unit preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

/// Format a Celsius temperature for display in the requested unit
///
/// Rounds to the nearest whole degree; Fahrenheit converts via
/// `c * 9/5 + 32` before rounding.
#[must_use]
pub fn format_temperature(celsius: f64, unit: TemperatureUnit) -> String {
    match unit {
        TemperatureUnit::Celsius => format!("{}°C", celsius.round()),
        TemperatureUnit::Fahrenheit => format!("{}°F", (celsius * 9.0 / 5.0 + 32.0).round()),
    }
}
