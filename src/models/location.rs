//! Place model for geocoded locations

use serde::{Deserialize, Serialize};

/// A geocoded place
///
/// Produced by forward or reverse geocoding; each lookup replaces it
/// wholesale, there is no identity beyond "most recent match".
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Place name (city, town, etc.)
    pub name: String,
    /// Country name; empty when the geocoder did not report one
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Place {
    /// Create a new place
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    /// Display label, e.g. "Atlanta, United States"
    #[must_use]
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }

    /// Format the coordinates as a string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
