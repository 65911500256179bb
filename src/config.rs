//! Configuration management for `skycheck`
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates all settings after load.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::Result;
use crate::error::SkycheckError;
use crate::models::TemperatureUnit;

/// Root configuration structure for `skycheck`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkycheckConfig {
    /// Weather API endpoints and HTTP settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// System position provider settings
    #[serde(default)]
    pub location: LocationConfig,
    /// Default lookup settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the geocoding API
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
    /// Base URL of the forecast API
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
}

/// System position provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Position provider: "ip" or "none"
    #[serde(default = "default_location_provider")]
    pub provider: String,
    /// Endpoint of the IP geolocation service (ip-api.com shape)
    #[serde(default = "default_ip_endpoint")]
    pub ip_endpoint: String,
}

/// Default lookup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// City looked up when none is given on the command line
    #[serde(default = "default_city")]
    pub city: String,
    /// Temperature unit for display
    #[serde(default)]
    pub unit: TemperatureUnit,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_location_provider() -> String {
    "ip".to_string()
}

fn default_ip_endpoint() -> String {
    // The free tier of ip-api.com is HTTP only
    "http://ip-api.com/json".to_string()
}

fn default_city() -> String {
    "Atlanta".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_weather_timeout(),
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            provider: default_location_provider(),
            ip_endpoint: default_ip_endpoint(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            city: default_city(),
            unit: TemperatureUnit::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl SkycheckConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from the specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if a path is provided or the default location exists
        let config_file = config_path.unwrap_or_else(|| {
            Self::config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Add environment variable overrides with SKYCHECK_ prefix,
        // e.g. SKYCHECK_WEATHER__TIMEOUT_SECONDS=5
        builder = builder.add_source(
            Environment::with_prefix("SKYCHECK")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| SkycheckError::config(format!("failed to build configuration: {e}")))?;

        let config: SkycheckConfig = settings
            .try_deserialize()
            .map_err(|e| SkycheckError::config(format!("failed to deserialize configuration: {e}")))?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycheck").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.weather.geocoding_url.is_empty() || self.weather.forecast_url.is_empty() {
            return Err(SkycheckError::config(
                "weather endpoint URLs must not be empty",
            ));
        }

        if self.weather.timeout_seconds == 0 {
            return Err(SkycheckError::config(
                "weather.timeout_seconds must be greater than zero",
            ));
        }

        match self.location.provider.as_str() {
            "ip" | "none" => {}
            other => {
                return Err(SkycheckError::config(format!(
                    "unknown location provider '{other}' (expected \"ip\" or \"none\")"
                )));
            }
        }

        if self.location.provider == "ip" && self.location.ip_endpoint.is_empty() {
            return Err(SkycheckError::config(
                "location.ip_endpoint must not be empty",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SkycheckConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(
            config.weather.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.weather.forecast_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.defaults.city, "Atlanta");
        assert_eq!(config.defaults.unit, TemperatureUnit::Celsius);
        assert_eq!(config.location.provider, "ip");
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = SkycheckConfig::default();
        config.weather.timeout_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(SkycheckError::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_provider() {
        let mut config = SkycheckConfig::default();
        config.location.provider = "carrier-pigeon".to_string();
        assert!(matches!(
            config.validate(),
            Err(SkycheckError::Config { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_ip_endpoint() {
        let mut config = SkycheckConfig::default();
        config.location.ip_endpoint = String::new();
        assert!(matches!(
            config.validate(),
            Err(SkycheckError::Config { .. })
        ));
    }

    #[test]
    fn test_config_path_points_at_skycheck_dir() {
        if let Some(path) = SkycheckConfig::config_path() {
            assert!(path.ends_with("skycheck/config.toml"));
        }
    }
}
