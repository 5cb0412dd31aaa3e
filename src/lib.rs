//! `Skycast` - current weather for a free-text address
//!
//! This library resolves an address to coordinates through a geocoding
//! provider, fetches current conditions for those coordinates, and caches
//! both stages with a per-entry time-to-live. A failure in the geocoding
//! stage short-circuits the weather stage.

pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod models;
pub mod presenter;
pub mod search;
pub mod weather;

// Re-export core types for public API
pub use cache::MemoryCache;
pub use config::{AppConfig, CacheConfig, GeocodingConfig, LoggingConfig, WeatherConfig};
pub use error::SkycastError;
pub use geocoding::{Candidate, GeocodeProvider, GeocodingResolver, GoogleGeocoder};
pub use models::{
    CacheHitFlags, ConditionInfo, GeocodingResult, LocationInfo, SearchOutcome, WeatherReport,
    WeatherResult,
};
pub use presenter::WeatherPresenter;
pub use search::SearchService;
pub use weather::WeatherFetcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
