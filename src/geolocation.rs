//! Device geolocation with a bounded wait
//!
//! A device fix is optional: it only seeds the aggregator with a starting
//! [`Place`]. The wait is bounded, and on error or expiry the configured
//! fallback place is used so the flow can proceed to a manual search.

use crate::models::Place;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// A source of device coordinates, e.g. a platform location service
#[async_trait]
pub trait GeolocationSource: Send + Sync {
    /// Produce a (latitude, longitude) fix
    async fn locate(&self) -> anyhow::Result<(f64, f64)>;
}

/// Wait at most `wait` for a fix from `source`; on success the place is
/// named by its coordinates, otherwise `fallback` is returned unchanged.
pub async fn locate_or_default<S: GeolocationSource + ?Sized>(
    source: &S,
    wait: Duration,
    fallback: Place,
) -> Place {
    match tokio::time::timeout(wait, source.locate()).await {
        Ok(Ok((latitude, longitude))) if latitude.is_finite() && longitude.is_finite() => {
            debug!("Device fix at ({latitude:.4}, {longitude:.4})");
            Place::from_coordinates(latitude, longitude)
        }
        Ok(Ok(_)) => {
            debug!("Device fix was non-finite, using fallback place");
            fallback
        }
        Ok(Err(e)) => {
            debug!("Device location failed: {e}, using fallback place");
            fallback
        }
        Err(_) => {
            debug!("Device location timed out after {wait:?}, using fallback place");
            fallback
        }
    }
}
