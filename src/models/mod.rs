//! Data models for the vaderkollen crate
//!
//! This module contains the core domain models organized by concern:
//! - Place: resolved geographic locations from geocoding
//! - Reading: per-provider weather readings and the aggregation result
//! - Forecast: daily forecast series and the 5-day outlook window
//! - View: the explicit view-state value for consumers

pub mod forecast;
pub mod place;
pub mod reading;
pub mod view;

// Re-export all public types for convenient access
pub use forecast::{DailyForecast, DailyForecastEntry, OutlookDay, OUTLOOK_DAYS};
pub use place::Place;
pub use reading::{AggregationResult, Provider, ProviderReading};
pub use view::ViewState;
