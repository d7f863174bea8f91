use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::models::TemperatureUnit;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_FORECAST_LEN: usize = 8;

pub const ENV_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_UNITS: &str = "PINPOINT_UNITS";

/// Zoom and gesture tuning for [`crate::MapViewport`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale change per zoom button press.
    pub zoom_step: f64,
    /// Scale change per wheel notch.
    pub wheel_step: f64,
    /// Pointer travel (px) below which a press is still a click.
    pub drag_threshold: f64,
    /// Screen distance (px) from the pin that counts as grabbing it.
    pub pin_hit_radius: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_scale: 1.0,
            max_scale: 5.0,
            zoom_step: 0.5,
            wheel_step: 0.25,
            drag_threshold: 3.0,
            pin_hit_radius: 14.0,
        }
    }
}

impl ViewportConfig {
    /// Repair values that would break the viewport math.
    pub fn validated(self) -> Self {
        let defaults = Self::default();
        let positive = |v: f64, fallback: f64| if v.is_finite() && v > 0.0 { v } else { fallback };

        let min_scale = positive(self.min_scale, defaults.min_scale);
        let max_scale = positive(self.max_scale, defaults.max_scale);
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };

        Self {
            min_scale,
            max_scale,
            zoom_step: positive(self.zoom_step, defaults.zoom_step),
            wheel_step: positive(self.wheel_step, defaults.wheel_step),
            drag_threshold: self.drag_threshold.max(0.0),
            pin_hit_radius: self.pin_hit_radius.max(0.0),
        }
    }
}

/// Where and how to reach the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub units: TemperatureUnit,
    pub forecast_len: usize,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: TemperatureUnit::default(),
            forecast_len: DEFAULT_FORECAST_LEN,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_units(mut self, units: TemperatureUnit) -> Self {
        self.units = units;
        self
    }

    /// Read `OPENWEATHER_API_KEY`, `OPENWEATHER_BASE_URL` and `PINPOINT_UNITS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(ENV_API_KEY)
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar(ENV_API_KEY))?;

        let mut config = Self::new(api_key.trim());

        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|u| !u.trim().is_empty()) {
            config = config.with_base_url(base_url.trim());
        }

        if let Some(units) = lookup(ENV_UNITS) {
            let parsed = TemperatureUnit::from_provider_units(&units).ok_or(ConfigError::Invalid {
                key: ENV_UNITS,
                value: units.clone(),
            })?;
            config = config.with_units(parsed);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_viewport_defaults() {
        let c = ViewportConfig::default();
        assert_eq!(c.min_scale, 1.0);
        assert_eq!(c.max_scale, 5.0);
        assert_eq!(c.zoom_step, 0.5);
    }

    #[test]
    fn test_validated_swaps_inverted_bounds() {
        let c = ViewportConfig {
            min_scale: 4.0,
            max_scale: 2.0,
            ..ViewportConfig::default()
        }
        .validated();
        assert_eq!(c.min_scale, 2.0);
        assert_eq!(c.max_scale, 4.0);
    }

    #[test]
    fn test_validated_replaces_bad_steps() {
        let c = ViewportConfig {
            zoom_step: 0.0,
            wheel_step: f64::NAN,
            drag_threshold: -1.0,
            ..ViewportConfig::default()
        }
        .validated();
        assert_eq!(c.zoom_step, 0.5);
        assert_eq!(c.wheel_step, 0.25);
        assert_eq!(c.drag_threshold, 0.0);
    }

    #[test]
    fn test_viewport_config_partial_json() {
        let c: ViewportConfig = serde_json::from_str(r#"{"max_scale": 8.0}"#).unwrap();
        assert_eq!(c.max_scale, 8.0);
        assert_eq!(c.min_scale, 1.0);
    }

    #[test]
    fn test_from_lookup_requires_api_key() {
        let err = ProviderConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_API_KEY));

        let err = ProviderConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_API_KEY));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let c = ProviderConfig::from_lookup(lookup_from(&[(ENV_API_KEY, "abc")])).unwrap();
        assert_eq!(c.api_key, "abc");
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert_eq!(c.units, TemperatureUnit::Celsius);
        assert_eq!(c.forecast_len, 8);
    }

    #[test]
    fn test_from_lookup_overrides() {
        let c = ProviderConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "abc"),
            (ENV_BASE_URL, "http://localhost:9000/"),
            (ENV_UNITS, "imperial"),
        ]))
        .unwrap();
        assert_eq!(c.base_url, "http://localhost:9000");
        assert_eq!(c.units, TemperatureUnit::Fahrenheit);
    }

    #[test]
    fn test_from_lookup_rejects_unknown_units() {
        let err = ProviderConfig::from_lookup(lookup_from(&[
            (ENV_API_KEY, "abc"),
            (ENV_UNITS, "kelvin"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: ENV_UNITS, .. }));
    }
}
