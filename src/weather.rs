//! Current-conditions lookup against the WeatherAPI.com endpoint
//!
//! The fetcher never lets a provider fault escape: transport errors,
//! malformed bodies and missing credentials all come back as
//! [`WeatherResult::Invalid`] with a human-readable message.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use crate::config::WeatherConfig;
use crate::models::{ConditionInfo, LocationInfo, WeatherResult};

/// Message used when the credential is not configured
const MISSING_API_KEY: &str = "Missing WEATHER_API_KEY";

/// Message used for any non-success HTTP status. The response body is
/// discarded: a denied key and a server error read the same here.
const NO_LOCATION_FOUND: &str = "No location found";

/// Client for the weather provider's current-conditions endpoint
#[derive(Debug, Clone)]
pub struct WeatherFetcher {
    http: Client,
    config: WeatherConfig,
}

impl WeatherFetcher {
    #[must_use]
    pub fn new(config: WeatherConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Fetch current conditions for a coordinate pair.
    ///
    /// Without a configured credential no network access is attempted.
    pub async fn by_coordinates(&self, latitude: f64, longitude: f64) -> WeatherResult {
        let api_key = match &self.config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => {
                return WeatherResult::Invalid {
                    error: MISSING_API_KEY.to_string(),
                };
            }
        };

        match self.fetch_current(&api_key, latitude, longitude).await {
            Ok(result) => result,
            Err(e) => {
                debug!("Weather provider fault: {e:#}");
                WeatherResult::Invalid {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn fetch_current(
        &self,
        api_key: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherResult> {
        let query = format!("{latitude},{longitude}");

        let response = self
            .http
            .get(&self.config.base_url)
            .query(&[("key", api_key), ("q", query.as_str())])
            .send()
            .await
            .context("Failed to send request to the weather provider")?;

        if !response.status().is_success() {
            return Ok(WeatherResult::Invalid {
                error: NO_LOCATION_FOUND.to_string(),
            });
        }

        let parsed: weatherapi::CurrentResponse = response
            .json()
            .await
            .context("Failed to parse weather provider response")?;

        debug!(
            "Current conditions at {}: {}",
            parsed.location.name, parsed.current.condition.text
        );

        Ok(WeatherResult::Current {
            location: LocationInfo {
                name: parsed.location.name,
                region: parsed.location.region,
                country: parsed.location.country,
                latitude: parsed.location.lat,
                longitude: parsed.location.lon,
            },
            condition: ConditionInfo {
                text: parsed.current.condition.text,
                icon_path: parsed.current.condition.icon,
                celsius: parsed.current.temp_c,
                fahrenheit: parsed.current.temp_f,
            },
        })
    }
}

/// WeatherAPI.com response structures
mod weatherapi {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub location: WaLocation,
        pub current: WaCurrent,
    }

    #[derive(Debug, Deserialize)]
    pub struct WaLocation {
        pub name: String,
        pub region: String,
        pub country: String,
        pub lat: f64,
        pub lon: f64,
    }

    #[derive(Debug, Deserialize)]
    pub struct WaCurrent {
        pub temp_c: f64,
        pub temp_f: f64,
        pub condition: WaCondition,
    }

    #[derive(Debug, Deserialize)]
    pub struct WaCondition {
        pub text: String,
        pub icon: Option<String>,
    }
}
