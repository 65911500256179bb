//! Error types and handling for `skycheck`

use thiserror::Error;

/// Main error type for the `skycheck` library
#[derive(Error, Debug)]
pub enum SkycheckError {
    /// Geocoding returned no match for the requested name
    #[error("City not found.")]
    NotFound,

    /// No geolocation capability is available in this environment
    #[error("Geolocation is not supported.")]
    Unsupported,

    /// HTTP transport failure (connect, timeout, non-success status)
    #[error("Network error: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    /// Malformed or unexpected response payload
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The position provider failed to produce a position
    #[error("{message}")]
    Location { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkycheckError {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new location error carrying the underlying provider message
    pub fn location<S: Into<String>>(message: S) -> Self {
        Self::Location {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the single user-facing message for this error
    ///
    /// Every failure collapses to one displayable string; nothing structured
    /// crosses the presentation boundary.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycheckError::NotFound => "City not found.".to_string(),
            SkycheckError::Unsupported => "Geolocation is not supported.".to_string(),
            SkycheckError::Network { .. } => {
                "Unable to reach the weather service. Please check your internet connection."
                    .to_string()
            }
            SkycheckError::Parse { .. } => {
                "Received invalid data from the weather service.".to_string()
            }
            SkycheckError::Location { message } => message.clone(),
            SkycheckError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkycheckError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let parse_err = SkycheckError::parse("truncated body");
        assert!(matches!(parse_err, SkycheckError::Parse { .. }));

        let location_err = SkycheckError::location("permission denied");
        assert!(matches!(location_err, SkycheckError::Location { .. }));

        let config_err = SkycheckError::config("bad endpoint");
        assert!(matches!(config_err, SkycheckError::Config { .. }));
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(SkycheckError::NotFound.user_message(), "City not found.");
        assert_eq!(
            SkycheckError::Unsupported.user_message(),
            "Geolocation is not supported."
        );

        // Location errors surface the provider's own message
        let location_err = SkycheckError::location("Could not get location.");
        assert_eq!(location_err.user_message(), "Could not get location.");

        let parse_err = SkycheckError::parse("test");
        assert!(parse_err.user_message().contains("invalid data"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: SkycheckError = io_err.into();
        assert!(matches!(err, SkycheckError::Io { .. }));
    }
}
