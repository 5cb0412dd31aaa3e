//! End-to-end pipeline tests for the search orchestrator
//!
//! Providers are wiremock servers; call-count expectations verify which
//! stages actually went out over the network.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use skycast::{
    Candidate, GeocodeProvider, GeocodingConfig, GeocodingResolver, GoogleGeocoder, MemoryCache,
    SearchOutcome, SearchService, WeatherConfig, WeatherFetcher, WeatherPresenter,
};

const TTL: Duration = Duration::from_secs(30 * 60);

const TEANECK_LAT: f64 = 40.8845222;
const TEANECK_LON: f64 = -74.00798209999999;

fn google_geocoder(server: &MockServer) -> GoogleGeocoder {
    GoogleGeocoder::new(&GeocodingConfig {
        api_key: Some("test_google_key".to_string()),
        base_url: format!("{}/maps/api/geocode/json", server.uri()),
        ..GeocodingConfig::default()
    })
    .unwrap()
}

fn weather_fetcher(server: &MockServer, api_key: Option<&str>) -> WeatherFetcher {
    WeatherFetcher::new(WeatherConfig {
        api_key: api_key.map(str::to_string),
        base_url: format!("{}/v1/current.json", server.uri()),
    })
}

async fn mount_geocode_success(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/maps/api/geocode/json"))
        .and(query_param("address", "Teaneck, NJ"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "OK",
            "results": [
                {"geometry": {"location": {"lat": TEANECK_LAT, "lng": TEANECK_LON}}}
            ]
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_weather_success(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/v1/current.json"))
        .and(query_param("key", "test_weather_key"))
        .and(query_param("q", "40.8845222,-74.00798209999999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "location": {
                "name": "Teaneck",
                "region": "New Jersey",
                "country": "United States of America",
                "lat": 40.898,
                "lon": -74.016
            },
            "current": {
                "temp_c": 22.0,
                "temp_f": 71.6,
                "condition": {
                    "text": "Partly cloudy",
                    "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png"
                }
            }
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Provider stub that reports no usable match with a fixed detail message.
#[derive(Debug)]
struct NoResultsProvider;

#[async_trait]
impl GeocodeProvider for NoResultsProvider {
    async fn search(&self, _address: &str) -> anyhow::Result<Vec<Candidate>> {
        Ok(vec![Candidate {
            latitude: None,
            longitude: None,
            error_detail: Some("No results found for the given address".to_string()),
        }])
    }
}

#[tokio::test]
async fn geocoding_failure_short_circuits_the_weather_stage() {
    let weather_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;

    let service = SearchService::new(
        Arc::new(MemoryCache::new()),
        GeocodingResolver::new(Arc::new(NoResultsProvider)),
        weather_fetcher(&weather_server, Some("test_weather_key")),
        TTL,
    );

    let outcome = service.search("Invalid Address 123456").await;

    assert_eq!(
        outcome,
        SearchOutcome::GeocodingFailure {
            error: "No results found for the given address".to_string(),
        }
    );
    // dropping the server verifies the weather endpoint was never called
}

#[tokio::test]
async fn missing_weather_credential_fails_without_any_outbound_call() {
    let geocode_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_geocode_success(&geocode_server, 1).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&weather_server)
        .await;

    let service = SearchService::new(
        Arc::new(MemoryCache::new()),
        GeocodingResolver::new(Arc::new(google_geocoder(&geocode_server))),
        weather_fetcher(&weather_server, None),
        TTL,
    );

    let outcome = service.search("Teaneck, NJ").await;

    assert_eq!(
        outcome,
        SearchOutcome::WeatherFailure {
            error: "Missing WEATHER_API_KEY".to_string(),
        }
    );
}

#[tokio::test]
async fn successful_search_renders_the_expected_view() {
    let geocode_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_geocode_success(&geocode_server, 1).await;
    mount_weather_success(&weather_server, 1).await;

    let service = SearchService::new(
        Arc::new(MemoryCache::new()),
        GeocodingResolver::new(Arc::new(google_geocoder(&geocode_server))),
        weather_fetcher(&weather_server, Some("test_weather_key")),
        TTL,
    );

    let outcome = service.search("Teaneck, NJ").await;

    let SearchOutcome::Success(report) = outcome else {
        panic!("expected success, got {outcome:?}");
    };
    assert!(!report.cache_hits.geocoding);
    assert!(!report.cache_hits.weather);

    let presenter = WeatherPresenter::new(&report);
    assert_eq!(
        presenter.headline(),
        "Weather for Teaneck, New Jersey, United States of America"
    );
    assert_eq!(presenter.temperature_line(), "Temperatures: 22.0°C / 71.6°F");
    assert_eq!(presenter.condition_line(), "Conditions: Partly cloudy");
    assert_eq!(
        presenter.icon_url().as_deref(),
        Some("https://cdn.weatherapi.com/weather/64x64/day/116.png")
    );
    assert!(presenter.cache_notice().is_none());
}

#[tokio::test]
async fn repeating_a_search_within_the_ttl_serves_both_stages_from_memory() {
    let geocode_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    // one provider call per stage despite two searches
    mount_geocode_success(&geocode_server, 1).await;
    mount_weather_success(&weather_server, 1).await;

    let service = SearchService::new(
        Arc::new(MemoryCache::new()),
        GeocodingResolver::new(Arc::new(google_geocoder(&geocode_server))),
        weather_fetcher(&weather_server, Some("test_weather_key")),
        TTL,
    );

    let first = service.search("Teaneck, NJ").await;
    // an equivalent spelling normalizes to the same cache key
    let second = service.search("  teaneck,   nj ").await;

    let SearchOutcome::Success(first) = first else {
        panic!("expected success");
    };
    let SearchOutcome::Success(second) = second else {
        panic!("expected success");
    };

    assert!(!first.cache_hits.any_hit());
    assert!(second.cache_hits.geocoding);
    assert!(second.cache_hits.weather);
    assert_eq!(second.location, first.location);
    assert_eq!(second.condition, first.condition);

    let presenter = WeatherPresenter::new(&second);
    assert_eq!(
        presenter.cache_notice().as_deref(),
        Some("Retrieved geocoding and weather data from memory")
    );
}

#[tokio::test]
async fn expired_entries_are_fetched_again() {
    let geocode_server = MockServer::start().await;
    let weather_server = MockServer::start().await;
    mount_geocode_success(&geocode_server, 2).await;
    mount_weather_success(&weather_server, 2).await;

    let service = SearchService::new(
        Arc::new(MemoryCache::new()),
        GeocodingResolver::new(Arc::new(google_geocoder(&geocode_server))),
        weather_fetcher(&weather_server, Some("test_weather_key")),
        Duration::from_millis(50),
    );

    service.search("Teaneck, NJ").await;
    tokio::time::sleep(Duration::from_millis(80)).await;
    let second = service.search("Teaneck, NJ").await;

    let SearchOutcome::Success(report) = second else {
        panic!("expected success");
    };
    assert!(!report.cache_hits.geocoding);
    assert!(!report.cache_hits.weather);
}
