//! Location model for the place a weather lookup resolved to

use serde::{Deserialize, Serialize};

/// Place metadata as reported by the weather provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    /// Place name (city or town)
    pub name: String,
    /// Administrative region (state, province, ...)
    pub region: String,
    /// Country name
    pub country: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}
