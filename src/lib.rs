//! Väderkollen - compare current conditions across forecast models
//!
//! This library resolves free-text place names into coordinates, fetches
//! current weather and a multi-day forecast from several numerical
//! forecast models, and deterministically ranks the providers into a
//! winner and the remaining candidates.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod geolocation;
pub mod models;
pub mod ranking;
pub mod session;

// Re-export core types for public API
pub use aggregator::{Aggregator, FetchStrategy};
pub use config::VaderkollenConfig;
pub use error::VaderkollenError;
pub use geocoding::LocationResolver;
pub use geolocation::GeolocationSource;
pub use models::{
    AggregationResult, DailyForecast, DailyForecastEntry, OutlookDay, Place, Provider,
    ProviderReading, ViewState,
};
pub use session::SearchSession;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, VaderkollenError>;
