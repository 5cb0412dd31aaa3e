//! Address geocoding: resolve a free-text address to coordinates
//!
//! The provider is an opaque collaborator behind [`GeocodeProvider`]; the
//! resolver maps its candidates and faults into a [`GeocodingResult`].
//! No provider fault propagates past [`GeocodingResolver::lookup`].

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::SkycastError;
use crate::config::GeocodingConfig;
use crate::models::GeocodingResult;

/// Message used when the provider returns nothing usable for an address
const ADDRESS_NOT_FOUND: &str = "Address not found or invalid.";

/// One geocoding match as reported by the provider.
///
/// Coordinates are optional because a provider may return a match without
/// a usable position; zero is a valid coordinate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Provider-supplied detail explaining a degraded match, if any
    pub error_detail: Option<String>,
}

/// Abstraction over geocoding providers
#[async_trait]
pub trait GeocodeProvider: Send + Sync + Debug {
    /// Search the provider for matches of an address fragment.
    /// Ordered best-first; an empty list means no match.
    async fn search(&self, address: &str) -> Result<Vec<Candidate>>;
}

/// Google Geocoding API client
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    /// Create a client from configuration.
    ///
    /// Fails when the configured provider is not `google` or the
    /// credential is missing, so misconfiguration surfaces at startup
    /// instead of on the first lookup.
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        if config.provider != "google" {
            return Err(SkycastError::config(format!(
                "Unknown geocoding provider '{}'. Supported providers: google.",
                config.provider
            ))
            .into());
        }

        let api_key = match &config.api_key {
            Some(key) if !key.is_empty() => key.clone(),
            _ => return Err(SkycastError::config("Missing ADDRESS_API_KEY").into()),
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("skycast/", env!("CARGO_PKG_VERSION")))
            .build()
            .with_context(|| "Failed to create HTTP client")?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl GeocodeProvider for GoogleGeocoder {
    async fn search(&self, address: &str) -> Result<Vec<Candidate>> {
        let url = format!(
            "{}?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            self.api_key
        );

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send geocoding request")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Geocoding request failed with status {status}");
        }

        let parsed: google::GeocodeResponse = response
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        if parsed.results.is_empty() {
            // An API-level error (denied key, quota, ...) carries its own
            // message and no results; surface it as a provider fault.
            if let Some(message) = parsed.error_message {
                bail!(message);
            }
            return Ok(Vec::new());
        }

        let error_detail = parsed.error_message;
        let candidates = parsed
            .results
            .into_iter()
            .map(|hit| Candidate {
                latitude: hit.geometry.location.lat,
                longitude: hit.geometry.location.lng,
                error_detail: error_detail.clone(),
            })
            .collect();

        Ok(candidates)
    }
}

/// Google Geocoding API response structures
mod google {
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodeResponse {
        #[serde(default)]
        pub results: Vec<GeocodeHit>,
        pub error_message: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodeHit {
        pub geometry: Geometry,
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: GeoPoint,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeoPoint {
        pub lat: Option<f64>,
        pub lng: Option<f64>,
    }
}

/// Service resolving raw addresses through a [`GeocodeProvider`]
#[derive(Debug, Clone)]
pub struct GeocodingResolver {
    provider: Arc<dyn GeocodeProvider>,
}

impl GeocodingResolver {
    #[must_use]
    pub fn new(provider: Arc<dyn GeocodeProvider>) -> Self {
        Self { provider }
    }

    /// Resolve a raw address to coordinates.
    ///
    /// The first candidate wins. Callers hand in the raw address; cache-key
    /// normalization happens upstream.
    pub async fn lookup(&self, address: &str) -> GeocodingResult {
        debug!("Geocoding address: {}", address);

        let candidates = match self.provider.search(address).await {
            Ok(candidates) => candidates,
            Err(e) => {
                debug!("Geocoding provider fault: {e:#}");
                return GeocodingResult::Invalid {
                    error: e.to_string(),
                };
            }
        };

        let Some(candidate) = candidates.into_iter().next() else {
            return GeocodingResult::Invalid {
                error: ADDRESS_NOT_FOUND.to_string(),
            };
        };

        match (candidate.latitude, candidate.longitude) {
            (Some(latitude), Some(longitude)) => {
                debug!("Resolved to ({latitude}, {longitude})");
                GeocodingResult::Resolved {
                    latitude,
                    longitude,
                }
            }
            _ => GeocodingResult::Invalid {
                error: candidate
                    .error_detail
                    .unwrap_or_else(|| ADDRESS_NOT_FOUND.to_string()),
            },
        }
    }
}
