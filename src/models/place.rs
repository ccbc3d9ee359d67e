//! Place model for resolved geographic locations

use serde::{Deserialize, Serialize};

/// A resolved, named geographic point returned by geocoding
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Place name (city, town, etc.)
    pub name: String,
    /// Country name or code
    pub country: Option<String>,
    /// First-level administrative region (state, län, canton)
    pub admin_region: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// Population, when the geocoder knows it; used for relevance ranking
    pub population: Option<u64>,
}

impl Place {
    /// Create a new place
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: None,
            admin_region: None,
            latitude,
            longitude,
            population: None,
        }
    }

    /// Create a place from bare coordinates, e.g. a device-location fix
    /// that carries no human-readable name.
    #[must_use]
    pub fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::new(format!("{latitude:.4}, {longitude:.4}"), latitude, longitude)
    }

    /// Display label, e.g. "Visby, Sweden"
    #[must_use]
    pub fn label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.name, country),
            None => self.name.clone(),
        }
    }

    /// Whether both coordinates are present and finite
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}
