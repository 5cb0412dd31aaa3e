//! Current-conditions model and the success payload of a search

use serde::{Deserialize, Serialize};

use super::location::LocationInfo;
use super::outcome::CacheHitFlags;

/// Current weather condition at a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionInfo {
    /// Human-readable condition description, e.g. "Partly cloudy"
    pub text: String,
    /// Protocol-relative icon path supplied by the provider, if any
    pub icon_path: Option<String>,
    /// Temperature in degrees Celsius
    pub celsius: f64,
    /// Temperature in degrees Fahrenheit
    pub fahrenheit: f64,
}

/// Everything a successful search produces for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: LocationInfo,
    pub condition: ConditionInfo,
    /// Which stages were served from a live cache entry
    pub cache_hits: CacheHitFlags,
}
