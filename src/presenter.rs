//! View-facing rendering of a successful search
//!
//! Consumes the orchestrator's output contract; the strings here are what
//! the front-end shows verbatim.

use crate::models::WeatherReport;

/// Renders a [`WeatherReport`] into user-visible text
#[derive(Debug)]
pub struct WeatherPresenter<'a> {
    report: &'a WeatherReport,
}

impl<'a> WeatherPresenter<'a> {
    #[must_use]
    pub fn new(report: &'a WeatherReport) -> Self {
        Self { report }
    }

    /// "Teaneck, New Jersey, United States of America"
    #[must_use]
    pub fn full_location_name(&self) -> String {
        let location = &self.report.location;
        format!("{}, {}, {}", location.name, location.region, location.country)
    }

    #[must_use]
    pub fn headline(&self) -> String {
        format!("Weather for {}", self.full_location_name())
    }

    #[must_use]
    pub fn temperature_line(&self) -> String {
        let condition = &self.report.condition;
        format!(
            "Temperatures: {:.1}°C / {:.1}°F",
            condition.celsius, condition.fahrenheit
        )
    }

    #[must_use]
    pub fn condition_line(&self) -> String {
        format!("Conditions: {}", self.report.condition.text)
    }

    /// Absolute icon URL. Provider icon paths are protocol-relative;
    /// absent or empty paths render no URL.
    #[must_use]
    pub fn icon_url(&self) -> Option<String> {
        self.report
            .condition
            .icon_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("https:{path}"))
    }

    /// Notice shown when any stage was served from the cache
    #[must_use]
    pub fn cache_notice(&self) -> Option<String> {
        let hits = &self.report.cache_hits;
        if !hits.any_hit() {
            return None;
        }

        let mut sources = Vec::new();
        if hits.geocoding {
            sources.push("geocoding");
        }
        if hits.weather {
            sources.push("weather data");
        }
        Some(format!("Retrieved {} from memory", sources.join(" and ")))
    }
}
