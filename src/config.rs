//! Configuration management for the vaderkollen crate
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::VaderkollenError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VaderkollenConfig {
    /// Upstream endpoint URLs
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    /// Geocoding settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Upstream endpoint URLs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Base URL of the forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    /// Base URL of the geocoding endpoint
    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,
}

/// Geocoding settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Display language requested from the geocoder
    #[serde(default = "default_language")]
    pub language: String,
    /// Result-count cap per query (5-10)
    #[serde(default = "default_max_results")]
    pub max_results: u32,
}

/// HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds
    #[serde(default = "default_http_timeout")]
    pub timeout_seconds: u64,
    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// How long to wait for a device-location fix, in seconds
    #[serde(default = "default_geolocation_timeout")]
    pub geolocation_timeout_seconds: u64,
    /// Place used when device location fails or times out
    #[serde(default)]
    pub fallback_place: FallbackPlace,
}

/// The configured fallback place
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

// Default value functions
fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_max_results() -> u32 {
    5
}

fn default_http_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("Vaderkollen/{}", env!("CARGO_PKG_VERSION"))
}

fn default_geolocation_timeout() -> u64 {
    8
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            max_results: default_max_results(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_http_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            geolocation_timeout_seconds: default_geolocation_timeout(),
            fallback_place: FallbackPlace::default(),
        }
    }
}

impl Default for FallbackPlace {
    fn default() -> Self {
        Self {
            name: "Stockholm".to_string(),
            latitude: 59.3293,
            longitude: 18.0686,
        }
    }
}

impl VaderkollenConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specific path, falling back to
    /// `config.toml` in the working directory
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with VADERKOLLEN_ prefix,
        // e.g. VADERKOLLEN_GEOCODING__LANGUAGE=sv
        builder = builder.add_source(Environment::with_prefix("VADERKOLLEN").separator("__"));

        let config: Self = builder
            .build()
            .with_context(|| "Failed to build configuration")?
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(1..=10).contains(&self.geocoding.max_results) {
            return Err(VaderkollenError::config(format!(
                "geocoding.max_results must be between 1 and 10, got {}",
                self.geocoding.max_results
            ))
            .into());
        }
        if self.http.timeout_seconds == 0 {
            return Err(VaderkollenError::config("http.timeout_seconds must be positive").into());
        }
        if !self.defaults.fallback_place.latitude.is_finite()
            || !self.defaults.fallback_place.longitude.is_finite()
        {
            return Err(
                VaderkollenError::config("defaults.fallback_place coordinates are invalid").into(),
            );
        }
        Ok(())
    }
}
