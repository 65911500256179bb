//! Weather API client for Open-Meteo integration
//!
//! HTTP client functionality for geocoding place names and retrieving
//! current weather conditions from the Open-Meteo API. No API key is
//! required; endpoint base URLs come from configuration.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::config::WeatherConfig;
use crate::error::SkycheckError;
use crate::models::{CurrentConditions, Place};

const USER_AGENT: &str = concat!("skycheck/", env!("CARGO_PKG_VERSION"));

/// Weather API client for Open-Meteo
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    /// HTTP client
    client: Client,
    /// API configuration
    config: WeatherConfig,
}

impl WeatherApiClient {
    /// Create a new weather API client
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds.into());

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, config })
    }

    /// Geocode a place name to its single best-ranked match
    ///
    /// Requests exactly one result; `None` means the service knows no such
    /// place. The name is passed through as typed, empty input included.
    #[instrument(skip(self))]
    pub async fn geocode_city(&self, name: &str) -> Result<Option<Place>> {
        info!("Geocoding location: '{}'", name);

        let url = format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.config.geocoding_url,
            urlencoding::encode(name)
        );

        let response: openmeteo::GeocodingResponse = self.get_json(&url).await?;

        let place = response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Place::from);

        match &place {
            Some(place) => debug!(
                "Geocoded '{}' to {} ({})",
                name,
                place.display_name(),
                place.format_coordinates()
            ),
            None => warn!("No geocoding results for '{}'", name),
        }

        Ok(place)
    }

    /// Reverse geocode coordinates to the nearest named place
    ///
    /// Used only for display text; callers fall back to a generic name when
    /// this returns `None` or fails.
    #[instrument(skip(self))]
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<Option<Place>> {
        debug!(
            "Reverse geocoding coordinates: {:.4}, {:.4}",
            latitude, longitude
        );

        let url = format!(
            "{}/reverse?latitude={}&longitude={}&count=1&language=en&format=json",
            self.config.geocoding_url, latitude, longitude
        );

        let response: openmeteo::GeocodingResponse = self.get_json(&url).await?;

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(Place::from))
    }

    /// Fetch current conditions for a coordinate pair
    ///
    /// The timezone of the reported observation time is resolved by the
    /// remote service (`timezone=auto`).
    #[instrument(skip(self))]
    pub async fn current_conditions(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions> {
        info!(
            "Getting current weather for coordinates: {:.4}, {:.4}",
            latitude, longitude
        );

        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m,weather_code&timezone=auto",
            self.config.forecast_url, latitude, longitude
        );

        let response: openmeteo::ForecastResponse = self.get_json(&url).await?;

        let current = response
            .current
            .ok_or_else(|| SkycheckError::parse("no current weather block in forecast response"))?;

        Ok(current.into())
    }

    /// Issue a GET request and decode the JSON body
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("Open-Meteo API request URL: {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;

        response
            .json::<T>()
            .await
            .map_err(|e| SkycheckError::parse(format!("invalid response body: {e}")))
    }
}

/// Open-Meteo API response structures and conversion utilities
mod openmeteo {
    use serde::Deserialize;

    use crate::models::{CurrentConditions, Place};

    /// Geocoding response from Open-Meteo
    ///
    /// The `results` field is absent entirely when nothing matched.
    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Place {
        fn from(result: GeocodingResult) -> Self {
            Place {
                name: result.name,
                country: result.country.unwrap_or_default(),
                latitude: result.latitude,
                longitude: result.longitude,
            }
        }
    }

    /// Forecast response from Open-Meteo, trimmed to the current block
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
    }

    /// Current weather data from Open-Meteo
    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: f64,
        pub weather_code: i32,
        pub time: String,
    }

    impl From<CurrentData> for CurrentConditions {
        fn from(current: CurrentData) -> Self {
            CurrentConditions {
                temperature: current.temperature,
                weather_code: current.weather_code,
                time: current.time,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::openmeteo::{ForecastResponse, GeocodingResponse};
    use crate::models::{CurrentConditions, Place};

    #[test]
    fn test_parse_geocoding_response() {
        let body = r#"{
            "results": [
                {
                    "id": 4180439,
                    "name": "Atlanta",
                    "latitude": 33.749,
                    "longitude": -84.38798,
                    "country_code": "US",
                    "country": "United States",
                    "admin1": "Georgia"
                }
            ],
            "generationtime_ms": 0.7
        }"#;

        let response: GeocodingResponse = serde_json::from_str(body).unwrap();
        let place: Place = response.results.unwrap().remove(0).into();

        assert_eq!(place.name, "Atlanta");
        assert_eq!(place.country, "United States");
        assert_eq!(place.latitude, 33.749);
    }

    #[test]
    fn test_parse_geocoding_response_without_results() {
        // Open-Meteo omits `results` entirely when nothing matched
        let body = r#"{"generationtime_ms": 0.3}"#;

        let response: GeocodingResponse = serde_json::from_str(body).unwrap();
        assert!(response.results.is_none());
    }

    #[test]
    fn test_parse_geocoding_result_without_country() {
        let body = r#"{"results": [{"name": "Somewhere", "latitude": 1.0, "longitude": 2.0}]}"#;

        let response: GeocodingResponse = serde_json::from_str(body).unwrap();
        let place: Place = response.results.unwrap().remove(0).into();

        assert_eq!(place.country, "");
    }

    #[test]
    fn test_parse_forecast_current_block() {
        let body = r#"{
            "latitude": 33.75,
            "longitude": -84.39,
            "timezone": "America/New_York",
            "current": {
                "time": "2025-06-01T14:30",
                "interval": 900,
                "temperature_2m": 21.6,
                "weather_code": 2
            }
        }"#;

        let response: ForecastResponse = serde_json::from_str(body).unwrap();
        let conditions: CurrentConditions = response.current.unwrap().into();

        assert_eq!(conditions.temperature, 21.6);
        assert_eq!(conditions.weather_code, 2);
        assert_eq!(conditions.time, "2025-06-01T14:30");
    }
}
