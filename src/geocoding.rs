//! Location Resolver
//!
//! Resolves free-text place names into ranked [`Place`] candidates via the
//! Open-Meteo geocoding API (no API key required). Failures never surface
//! as errors here: the caller treats an empty list as "no suggestions".

use crate::config::VaderkollenConfig;
use crate::models::Place;
use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

/// Queries shorter than this never hit the network
pub const MIN_QUERY_CHARS: usize = 2;

/// Geocoding response from the upstream service
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: Option<String>,
    admin1: Option<String>,
    population: Option<u64>,
}

impl From<GeocodingResult> for Place {
    fn from(result: GeocodingResult) -> Self {
        Place {
            name: result.name,
            country: result.country,
            admin_region: result.admin1,
            latitude: result.latitude,
            longitude: result.longitude,
            population: result.population,
        }
    }
}

/// Service for resolving free-text place names
pub struct LocationResolver;

impl LocationResolver {
    /// Resolve free text into candidate places, best match first.
    ///
    /// Returns an empty list for queries under [`MIN_QUERY_CHARS`]
    /// characters and on any network or parse failure.
    #[instrument(skip(client, config))]
    pub async fn resolve(
        client: &Client,
        config: &VaderkollenConfig,
        free_text: &str,
    ) -> Vec<Place> {
        let query = free_text.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            debug!("Query too short, skipping geocoding call");
            return Vec::new();
        }

        match Self::search(client, config, query).await {
            Ok(places) => {
                debug!("Geocoding returned {} candidates", places.len());
                places
            }
            Err(e) => {
                warn!("Geocoding failed for {query:?}: {e:#}");
                Vec::new()
            }
        }
    }

    async fn search(
        client: &Client,
        config: &VaderkollenConfig,
        query: &str,
    ) -> Result<Vec<Place>> {
        let url = format!(
            "{}?name={}&count={}&language={}&format=json",
            config.endpoints.geocoding_url,
            urlencoding::encode(query),
            config.geocoding.max_results,
            config.geocoding.language,
        );

        let response = client.get(&url).send().await?.error_for_status()?;
        let body: GeocodingResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse geocoding response")?;

        let mut places: Vec<Place> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(Place::from)
            .collect();
        rank_by_population(&mut places);
        Ok(places)
    }
}

/// Prefer major cities over same-named minor locales: stable sort by
/// descending population, so candidates without a population figure keep
/// their upstream relative order at the bottom.
fn rank_by_population(places: &mut [Place]) {
    places.sort_by(|a, b| b.population.unwrap_or(0).cmp(&a.population.unwrap_or(0)));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn place(name: &str, population: Option<u64>) -> Place {
        let mut place = Place::new(name, 59.0, 18.0);
        place.population = population;
        place
    }

    #[test]
    fn test_population_ranking_prefers_major_cities() {
        let mut places = vec![
            place("Stockholm (small)", Some(1_200)),
            place("Stockholm", Some(975_000)),
            place("Stockholm (mid)", Some(40_000)),
        ];
        rank_by_population(&mut places);
        assert_eq!(places[0].name, "Stockholm");
        assert_eq!(places[2].name, "Stockholm (small)");
    }

    #[test]
    fn test_population_ranking_is_stable_without_data() {
        let mut places = vec![place("First", None), place("Second", None)];
        rank_by_population(&mut places);
        assert_eq!(places[0].name, "First");
        assert_eq!(places[1].name, "Second");
    }

    #[tokio::test]
    async fn test_short_query_short_circuits() {
        // Never touches the network, so an unroutable endpoint is fine
        let mut config = VaderkollenConfig::default();
        config.endpoints.geocoding_url = "http://127.0.0.1:1/v1/search".to_string();
        let client = Client::new();

        assert!(LocationResolver::resolve(&client, &config, "a").await.is_empty());
        assert!(LocationResolver::resolve(&client, &config, "  x  ").await.is_empty());
        assert!(LocationResolver::resolve(&client, &config, "").await.is_empty());
    }
}
