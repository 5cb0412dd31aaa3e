//! Stage results and the terminal outcome of a search
//!
//! Both stage results are tagged enums: the success variant carries the
//! data, the invalid variant carries a human-readable message. A valid
//! result therefore cannot lack coordinates or conditions. Stage results
//! are serializable because they are stored in the cache as computed,
//! including invalid ones.

use serde::{Deserialize, Serialize};

use super::location::LocationInfo;
use super::weather::{ConditionInfo, WeatherReport};

/// Result of resolving an address to coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodingResult {
    /// The address resolved to a coordinate pair
    Resolved { latitude: f64, longitude: f64 },
    /// The address could not be resolved
    Invalid { error: String },
}

impl GeocodingResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// Coordinates of a resolved address, `None` when invalid
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match self {
            Self::Resolved {
                latitude,
                longitude,
            } => Some((*latitude, *longitude)),
            Self::Invalid { .. } => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Resolved { .. } => None,
            Self::Invalid { error } => Some(error),
        }
    }
}

/// Result of fetching current conditions for a coordinate pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WeatherResult {
    /// Current conditions at the resolved location
    Current {
        location: LocationInfo,
        condition: ConditionInfo,
    },
    /// Conditions could not be fetched
    Invalid { error: String },
}

impl WeatherResult {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Current { .. })
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Current { .. } => None,
            Self::Invalid { error } => Some(error),
        }
    }
}

/// Which stages found a live cache entry before fetching.
///
/// Observational metadata only; recorded before each stage's fetch so the
/// fetch populating the cache cannot turn a miss into a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheHitFlags {
    pub geocoding: bool,
    pub weather: bool,
}

impl CacheHitFlags {
    #[must_use]
    pub fn any_hit(&self) -> bool {
        self.geocoding || self.weather
    }
}

/// Terminal state of a search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// The geocoding stage failed; the weather stage never ran
    GeocodingFailure { error: String },
    /// Geocoding succeeded but the weather stage failed
    WeatherFailure { error: String },
    /// Both stages succeeded
    Success(WeatherReport),
}

impl SearchOutcome {
    /// The failing stage's message, `None` on success
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::GeocodingFailure { error } | Self::WeatherFailure { error } => Some(error),
            Self::Success(_) => None,
        }
    }
}
