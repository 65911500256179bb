//! System position capability
//!
//! The `--here` path needs to know where the machine is. That capability is
//! modelled as a trait so environments without one (tests, `provider =
//! "none"` configs) are represented as `None` and fail fast as unsupported,
//! before any network I/O.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::Result;
use crate::config::LocationConfig;
use crate::error::SkycheckError;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const GENERIC_FAILURE: &str = "Could not get location.";

/// A single geographic position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// A capability that can produce the device's current position
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    /// Obtain one current position, or a `Location` error describing why
    /// the provider could not produce it
    async fn current_position(&self) -> Result<Position>;
}

/// Position source backed by an IP geolocation endpoint
///
/// Carries its own client with a fixed short timeout, independent of the
/// configured weather timeout.
pub struct IpGeolocationSource {
    client: Client,
    endpoint: String,
}

impl IpGeolocationSource {
    /// Create a source querying the given ip-api.com-compatible endpoint
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("skycheck/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

/// Response shape of ip-api.com and compatible services
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    message: Option<String>,
}

#[async_trait]
impl GeolocationSource for IpGeolocationSource {
    async fn current_position(&self) -> Result<Position> {
        debug!("Requesting position from {}", self.endpoint);

        let response = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| SkycheckError::location(format!("{GENERIC_FAILURE} ({e})")))?;

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|_| SkycheckError::location(GENERIC_FAILURE))?;

        if body.status != "success" {
            // Surface the provider's own failure message when it sent one
            return Err(SkycheckError::location(
                body.message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
            ));
        }

        match (body.lat, body.lon) {
            (Some(latitude), Some(longitude)) => {
                info!("Got position: {:.4}, {:.4}", latitude, longitude);
                Ok(Position {
                    latitude,
                    longitude,
                })
            }
            _ => Err(SkycheckError::location(GENERIC_FAILURE)),
        }
    }
}

/// Build the configured position source
///
/// `None` means geolocation is disabled for this environment; the lookup
/// layer turns that into an unsupported error without touching the network.
pub fn from_config(config: &LocationConfig) -> Result<Option<Box<dyn GeolocationSource>>> {
    match config.provider.as_str() {
        "ip" => Ok(Some(Box::new(IpGeolocationSource::new(
            config.ip_endpoint.clone(),
        )?))),
        "none" => Ok(None),
        other => Err(SkycheckError::config(format!(
            "unknown location provider '{other}' (expected \"ip\" or \"none\")"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ip_api_success() {
        let body = r#"{"status": "success", "country": "United Kingdom", "lat": 51.5074, "lon": -0.1278, "query": "81.2.69.160"}"#;
        let response: IpApiResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.status, "success");
        assert_eq!(response.lat, Some(51.5074));
        assert_eq!(response.lon, Some(-0.1278));
    }

    #[test]
    fn test_parse_ip_api_failure() {
        let body = r#"{"status": "fail", "message": "private range", "query": "127.0.0.1"}"#;
        let response: IpApiResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.status, "fail");
        assert_eq!(response.message.as_deref(), Some("private range"));
        assert!(response.lat.is_none());
    }

    #[test]
    fn test_from_config_provider_selection() {
        let mut config = LocationConfig::default();

        config.provider = "ip".to_string();
        assert!(from_config(&config).unwrap().is_some());

        config.provider = "none".to_string();
        assert!(from_config(&config).unwrap().is_none());

        config.provider = "gps".to_string();
        assert!(matches!(
            from_config(&config),
            Err(SkycheckError::Config { .. })
        ));
    }
}
