//! Data models for the skycheck library
//!
//! Core domain models organized by concern:
//! - Location: geocoded places
//! - Weather: current conditions, code classification, temperature display

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::Place;
pub use weather::{CurrentConditions, Observation, TemperatureUnit, WeatherCode, format_temperature};
