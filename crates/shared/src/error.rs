//! Error types for provider lookups and configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Location not found: {0}")]
    NotFound(String),

    #[error("Provider error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty city name")]
    EmptyQuery,
}

impl LookupError {
    /// Inline message shown in place of the weather card.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => "Error fetching weather data".to_string(),
            Self::NotFound(_) => "Location not found or over ocean".to_string(),
            Self::Api { status: 401, .. } => "Weather service rejected the API key".to_string(),
            Self::Api { message, .. } => format!("Weather service error: {}", message),
            Self::Parse(_) => "Unexpected response from the weather service".to_string(),
            Self::EmptyQuery => "Please enter a city".to_string(),
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
