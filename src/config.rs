//! Configuration management for the `Skycast` application
//!
//! Handles loading configuration from an optional TOML file and
//! environment variables, and validates all settings. Provider credentials
//! additionally fall back to the plain environment variables
//! `WEATHER_API_KEY` and `ADDRESS_API_KEY` (or `GOOGLE_GEOCODING_API_KEY`).

use crate::SkycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the `Skycast` application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding provider configuration
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Geocoding provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Provider id; only "google" is supported
    #[serde(default = "default_geocoding_provider")]
    pub provider: String,
    /// Geocoding API key
    pub api_key: Option<String>,
    /// Base URL for the geocoding API; must be HTTPS
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout")]
    pub timeout_seconds: u32,
}

/// Weather provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Weather API key
    pub api_key: Option<String>,
    /// Current-conditions endpoint of the weather API
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry TTL in minutes
    #[serde(default = "default_cache_ttl_minutes")]
    pub ttl_minutes: u64,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_geocoding_provider() -> String {
    "google".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

fn default_geocoding_timeout() -> u32 {
    5
}

fn default_weather_base_url() -> String {
    "https://api.weatherapi.com/v1/current.json".to_string()
}

fn default_cache_ttl_minutes() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: default_geocoding_provider(),
            api_key: None,
            base_url: default_geocoding_base_url(),
            timeout_seconds: default_geocoding_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_cache_ttl_minutes(),
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

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            weather: WeatherConfig::default(),
            cache: CacheConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from a specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::config_file_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_WEATHER__API_KEY
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_credentials();
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// The default configuration file path
    #[must_use]
    pub fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skycast").join("config.toml"))
    }

    /// Fall back to the plain credential environment variables
    fn apply_env_credentials(&mut self) {
        if self.weather.api_key.is_none() {
            self.weather.api_key = env::var("WEATHER_API_KEY").ok();
        }
        if self.geocoding.api_key.is_none() {
            self.geocoding.api_key = env::var("ADDRESS_API_KEY")
                .or_else(|_| env::var("GOOGLE_GEOCODING_API_KEY"))
                .ok();
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.geocoding.provider.is_empty() {
            self.geocoding.provider = default_geocoding_provider();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.geocoding.timeout_seconds == 0 {
            self.geocoding.timeout_seconds = default_geocoding_timeout();
        }
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.cache.ttl_minutes == 0 {
            self.cache.ttl_minutes = default_cache_ttl_minutes();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_api_keys()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate API keys and credentials
    fn validate_api_keys(&self) -> Result<()> {
        if let Some(api_key) = &self.weather.api_key {
            if api_key.is_empty() {
                return Err(SkycastError::config(
                    "Weather API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        if let Some(api_key) = &self.geocoding.api_key {
            if api_key.is_empty() {
                return Err(SkycastError::config(
                    "Geocoding API key cannot be empty if provided. Either remove it or provide a valid key.",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoding.timeout_seconds > 300 {
            return Err(
                SkycastError::config("Geocoding timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.cache.ttl_minutes > 24 * 60 {
            return Err(SkycastError::config("Cache TTL cannot exceed 1440 minutes (1 day)").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        // The geocoding provider is queried over HTTPS only
        if !self.geocoding.base_url.starts_with("https://") {
            return Err(
                SkycastError::config("Geocoding base URL must be a valid HTTPS URL").into(),
            );
        }

        if !self.weather.base_url.starts_with("http://")
            && !self.weather.base_url.starts_with("https://")
        {
            return Err(
                SkycastError::config("Weather base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }
}
