//! Search orchestration: cache-check, geocode, cache-check, fetch
//!
//! The pipeline is linear. An invalid geocoding result terminates the
//! search before any weather cache key is derived or any weather request
//! is made.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::cache::MemoryCache;
use crate::geocoding::GeocodingResolver;
use crate::models::{CacheHitFlags, GeocodingResult, SearchOutcome, WeatherReport, WeatherResult};
use crate::weather::WeatherFetcher;

/// Canonical cache-key fragment for a free-text address: lowercased,
/// trimmed, internal whitespace runs collapsed to a single underscore.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

fn geocoding_cache_key(address: &str) -> String {
    format!("geocoding:{}", normalize_address(address))
}

fn weather_cache_key(latitude: f64, longitude: f64) -> String {
    format!("weather:{latitude}_{longitude}")
}

/// Two-stage address→weather lookup over a shared cache
pub struct SearchService {
    cache: Arc<MemoryCache>,
    resolver: GeocodingResolver,
    fetcher: WeatherFetcher,
    ttl: Duration,
}

impl SearchService {
    #[must_use]
    pub fn new(
        cache: Arc<MemoryCache>,
        resolver: GeocodingResolver,
        fetcher: WeatherFetcher,
        ttl: Duration,
    ) -> Self {
        Self {
            cache,
            resolver,
            fetcher,
            ttl,
        }
    }

    /// Run a search for a raw, non-blank address.
    ///
    /// Cache-hit flags reflect existence checks taken BEFORE each stage's
    /// fetch-or-compute call: the call itself populates the cache, so
    /// checking afterwards would always report a hit.
    #[tracing::instrument(name = "search", level = "info", skip(self))]
    pub async fn search(&self, address: &str) -> SearchOutcome {
        let geocoding_key = geocoding_cache_key(address);
        let geocoding_hit = self.cache.exists(&geocoding_key).await;
        debug!(key = %geocoding_key, hit = geocoding_hit, "geocoding stage");

        let resolver = &self.resolver;
        let geocoding = self
            .cache
            .fetch_or_compute(&geocoding_key, self.ttl, || async move {
                Ok(resolver.lookup(address).await)
            })
            .await;

        let (latitude, longitude) = match geocoding {
            Ok(GeocodingResult::Resolved {
                latitude,
                longitude,
            }) => (latitude, longitude),
            Ok(GeocodingResult::Invalid { error }) => {
                info!("Geocoding failed: {error}");
                return SearchOutcome::GeocodingFailure { error };
            }
            Err(e) => {
                return SearchOutcome::GeocodingFailure {
                    error: e.to_string(),
                };
            }
        };

        let weather_key = weather_cache_key(latitude, longitude);
        let weather_hit = self.cache.exists(&weather_key).await;
        debug!(key = %weather_key, hit = weather_hit, "weather stage");

        let fetcher = &self.fetcher;
        let weather = self
            .cache
            .fetch_or_compute(&weather_key, self.ttl, || async move {
                Ok(fetcher.by_coordinates(latitude, longitude).await)
            })
            .await;

        match weather {
            Ok(WeatherResult::Current {
                location,
                condition,
            }) => {
                info!("Search succeeded for {}", location.name);
                SearchOutcome::Success(WeatherReport {
                    location,
                    condition,
                    cache_hits: CacheHitFlags {
                        geocoding: geocoding_hit,
                        weather: weather_hit,
                    },
                })
            }
            Ok(WeatherResult::Invalid { error }) => {
                info!("Weather fetch failed: {error}");
                SearchOutcome::WeatherFailure { error }
            }
            Err(e) => SearchOutcome::WeatherFailure {
                error: e.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Teaneck, NJ", "teaneck,_nj")]
    #[case("  Teaneck   NJ ", "teaneck_nj")]
    #[case("TEANECK NJ", "teaneck_nj")]
    #[case("teaneck\tnew\n jersey", "teaneck_new_jersey")]
    #[case("teaneck", "teaneck")]
    fn test_normalize_address(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_address(input), expected);
    }

    #[rstest]
    #[case("Teaneck NJ", "  teaneck   nj ")]
    #[case("1600 Amphitheatre Parkway", "1600  AMPHITHEATRE  PARKWAY")]
    fn test_equivalent_addresses_share_a_cache_key(#[case] a: &str, #[case] b: &str) {
        assert_eq!(geocoding_cache_key(a), geocoding_cache_key(b));
    }

    #[test]
    fn test_cache_key_formats() {
        assert_eq!(geocoding_cache_key("Teaneck, NJ"), "geocoding:teaneck,_nj");
        assert_eq!(
            weather_cache_key(40.8845222, -74.00798209999999),
            "weather:40.8845222_-74.00798209999999"
        );
    }
}
