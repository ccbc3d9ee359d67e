//! Provider Aggregator
//!
//! Given a resolved place, fetches current conditions and a multi-day
//! forecast from several named forecast models, normalizes them into
//! provider readings, and ranks them into an [`AggregationResult`].
//!
//! Fetching is an explicit ordered list of strategies tried in sequence,
//! stopping at the first one that yields at least one valid reading:
//!
//! 1. one combined multi-model call,
//! 2. one call per model, issued concurrently with an all-settle join,
//! 3. a single call for the endpoint's default blend.
//!
//! A transient multi-model failure therefore never aborts the flow while
//! basic data is still obtainable; only exhausting every strategy yields
//! the terminal unavailable error.

pub mod open_meteo;

use crate::config::VaderkollenConfig;
use crate::error::VaderkollenError;
use crate::models::{AggregationResult, Place, ProviderReading};
use crate::ranking;
use anyhow::Context;
use async_trait::async_trait;
use open_meteo::{FieldMap, ForecastResponse, ModelSpec, DEFAULT_MODEL, MODELS};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// One way of obtaining provider readings for a place
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetch and normalize readings. An `Err` or an empty/all-invalid
    /// result hands over to the next strategy in the list.
    async fn fetch(
        &self,
        client: &Client,
        config: &VaderkollenConfig,
        place: &Place,
    ) -> anyhow::Result<Vec<ProviderReading>>;
}

/// One combined call requesting every catalogue model at once;
/// response fields are model-suffixed
pub struct MultiModelStrategy;

#[async_trait]
impl FetchStrategy for MultiModelStrategy {
    fn name(&self) -> &'static str {
        "multi-model"
    }

    async fn fetch(
        &self,
        client: &Client,
        config: &VaderkollenConfig,
        place: &Place,
    ) -> anyhow::Result<Vec<ProviderReading>> {
        let models: Vec<&str> = MODELS.iter().map(|spec| spec.id).collect();
        let url = open_meteo::forecast_url(
            &config.endpoints.forecast_url,
            place.latitude,
            place.longitude,
            &models,
            true,
        );

        let response = client.get(&url).send().await?.error_for_status()?;
        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse multi-model forecast response")?;

        let readings = MODELS
            .iter()
            .filter_map(|spec| {
                let map = FieldMap::for_model(Some(spec.id));
                let reading = open_meteo::extract_reading(&body, spec.provider(), &map);
                if reading.is_none() {
                    debug!("Model {} missing from combined response", spec.id);
                }
                reading
            })
            .collect();
        Ok(readings)
    }
}

/// One request per catalogue model, issued concurrently. Every request
/// settles independently; failed ones only drop their own provider.
/// Daily data is requested solely for the donor model (the catalogue's
/// first entry) to keep the fan-out light; the winner borrows it later
/// when needed.
pub struct PerModelStrategy;

impl PerModelStrategy {
    async fn fetch_model(
        client: &Client,
        config: &VaderkollenConfig,
        place: &Place,
        spec: &ModelSpec,
        include_daily: bool,
    ) -> anyhow::Result<ProviderReading> {
        let url = open_meteo::forecast_url(
            &config.endpoints.forecast_url,
            place.latitude,
            place.longitude,
            &[spec.id],
            include_daily,
        );

        let response = client.get(&url).send().await?.error_for_status()?;
        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| format!("Failed to parse forecast response for model {}", spec.id))?;

        // Single-model responses come back with unsuffixed field names
        open_meteo::extract_reading(&body, spec.provider(), &FieldMap::for_model(None))
            .ok_or_else(|| anyhow::anyhow!("model {} returned no usable reading", spec.id))
    }
}

#[async_trait]
impl FetchStrategy for PerModelStrategy {
    fn name(&self) -> &'static str {
        "per-model"
    }

    async fn fetch(
        &self,
        client: &Client,
        config: &VaderkollenConfig,
        place: &Place,
    ) -> anyhow::Result<Vec<ProviderReading>> {
        let requests = MODELS.iter().enumerate().map(|(index, spec)| {
            let include_daily = index == 0;
            Self::fetch_model(client, config, place, spec, include_daily)
        });

        let settled = futures::future::join_all(requests).await;
        let readings = settled
            .into_iter()
            .zip(MODELS)
            .filter_map(|(result, spec)| match result {
                Ok(reading) => Some(reading),
                Err(e) => {
                    debug!("Model {} request failed: {e:#}", spec.id);
                    None
                }
            })
            .collect();
        Ok(readings)
    }
}

/// Fallback: a single plain call for the endpoint's best-available blend,
/// surfaced as exactly one provider
pub struct DefaultModelStrategy;

#[async_trait]
impl FetchStrategy for DefaultModelStrategy {
    fn name(&self) -> &'static str {
        "default-model"
    }

    async fn fetch(
        &self,
        client: &Client,
        config: &VaderkollenConfig,
        place: &Place,
    ) -> anyhow::Result<Vec<ProviderReading>> {
        let url = open_meteo::forecast_url(
            &config.endpoints.forecast_url,
            place.latitude,
            place.longitude,
            &[],
            true,
        );

        let response = client.get(&url).send().await?.error_for_status()?;
        let body: ForecastResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse default forecast response")?;

        let reading =
            open_meteo::extract_reading(&body, DEFAULT_MODEL.provider(), &FieldMap::for_model(None));
        Ok(reading.into_iter().collect())
    }
}

/// The aggregation service: owns the HTTP client and configuration
pub struct Aggregator {
    client: Client,
    config: VaderkollenConfig,
}

impl Aggregator {
    /// Create a new aggregator with its own HTTP client
    pub fn new(config: VaderkollenConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .user_agent(config.http.user_agent.clone())
            .build()?;
        Ok(Self { client, config })
    }

    /// Shared HTTP client, also used by the location resolver
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    #[must_use]
    pub fn config(&self) -> &VaderkollenConfig {
        &self.config
    }

    /// Aggregate with the standard strategy list
    pub async fn aggregate(&self, place: &Place) -> crate::Result<AggregationResult> {
        let strategies: [&dyn FetchStrategy; 3] =
            [&MultiModelStrategy, &PerModelStrategy, &DefaultModelStrategy];
        self.aggregate_with(place, &strategies).await
    }

    /// Aggregate with an explicit strategy list, tried in order until one
    /// produces a rankable set of readings
    #[instrument(skip(self, strategies), fields(place = %place.label()))]
    pub async fn aggregate_with(
        &self,
        place: &Place,
        strategies: &[&dyn FetchStrategy],
    ) -> crate::Result<AggregationResult> {
        if !place.has_coordinates() {
            return Err(VaderkollenError::validation(
                "place has no usable coordinates",
            ));
        }

        for strategy in strategies {
            match strategy.fetch(&self.client, &self.config, place).await {
                Ok(readings) => match ranking::rank(readings) {
                    Some((mut winner, losers)) => {
                        backfill_daily(&mut winner, &losers);
                        info!(
                            "Strategy {} ranked {} providers, winner {}",
                            strategy.name(),
                            losers.len() + 1,
                            winner.provider.name
                        );
                        return Ok(AggregationResult {
                            place: place.clone(),
                            winner,
                            losers,
                        });
                    }
                    None => warn!("Strategy {} produced no valid readings", strategy.name()),
                },
                Err(e) => warn!("Strategy {} failed: {e:#}", strategy.name()),
            }
        }

        Err(VaderkollenError::unavailable(
            "every fetch strategy failed or returned unusable data",
        ))
    }
}

/// Borrow a daily forecast for a winner that lacks one, without touching
/// its current-conditions fields. Losers are already in ranked order, so
/// the best-ranked donor wins.
fn backfill_daily(winner: &mut ProviderReading, losers: &[ProviderReading]) {
    if winner.has_daily_forecast() {
        return;
    }
    if let Some(donor) = losers.iter().find(|r| r.has_daily_forecast()) {
        debug!("Borrowing daily forecast from {}", donor.provider.name);
        winner.daily = donor.daily.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyForecast, Provider};
    use chrono::NaiveDate;

    fn reading(id: &str, condition_code: u16, temperature_c: f64) -> ProviderReading {
        ProviderReading {
            provider: Provider::new(id, id.to_uppercase()),
            temperature_c,
            condition_code,
            wind_speed_ms: None,
            precipitation_mm: None,
            daily: None,
        }
    }

    fn daily() -> DailyForecast {
        let start = NaiveDate::from_ymd_opt(2026, 8, 24).unwrap();
        DailyForecast {
            dates: (0..7u64).map(|i| start + chrono::Days::new(i)).collect(),
            temperature_max: vec![20.0; 7],
            temperature_min: vec![10.0; 7],
            condition_code: vec![1; 7],
        }
    }

    fn place() -> Place {
        Place::new("Visby", 57.6409, 18.2960)
    }

    struct FailingStrategy;

    #[async_trait]
    impl FetchStrategy for FailingStrategy {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn fetch(
            &self,
            _client: &Client,
            _config: &VaderkollenConfig,
            _place: &Place,
        ) -> anyhow::Result<Vec<ProviderReading>> {
            anyhow::bail!("connection refused")
        }
    }

    struct ScriptedStrategy(Vec<ProviderReading>);

    #[async_trait]
    impl FetchStrategy for ScriptedStrategy {
        fn name(&self) -> &'static str {
            "scripted"
        }
        async fn fetch(
            &self,
            _client: &Client,
            _config: &VaderkollenConfig,
            _place: &Place,
        ) -> anyhow::Result<Vec<ProviderReading>> {
            Ok(self.0.clone())
        }
    }

    fn aggregator() -> Aggregator {
        Aggregator::new(VaderkollenConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_fallback_after_primary_failure() {
        let fallback = ScriptedStrategy(vec![reading("best_match", 1, 16.0)]);
        let strategies: [&dyn FetchStrategy; 2] = [&FailingStrategy, &fallback];

        let result = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap();

        // Exactly one reading, sourced from the fallback path
        assert_eq!(result.winner.provider.id, "best_match");
        assert!(result.losers.is_empty());
    }

    #[tokio::test]
    async fn test_all_strategies_exhausted_is_terminal() {
        let strategies: [&dyn FetchStrategy; 2] = [&FailingStrategy, &FailingStrategy];
        let err = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap_err();

        assert!(matches!(err, VaderkollenError::Unavailable { .. }));
        assert!(err.user_message().contains("try the search again"));
    }

    #[tokio::test]
    async fn test_all_invalid_readings_fall_through() {
        // A strategy whose every reading fails the NaN filter must not
        // short-circuit a later, healthy strategy
        let invalid = ScriptedStrategy(vec![reading("a", 0, f64::NAN)]);
        let healthy = ScriptedStrategy(vec![reading("b", 3, 12.0)]);
        let strategies: [&dyn FetchStrategy; 2] = [&invalid, &healthy];

        let result = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap();
        assert_eq!(result.winner.provider.id, "b");
    }

    #[tokio::test]
    async fn test_all_invalid_everywhere_is_terminal() {
        let invalid = ScriptedStrategy(vec![reading("a", 0, f64::NAN)]);
        let strategies: [&dyn FetchStrategy; 1] = [&invalid];

        let err = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap_err();
        assert!(matches!(err, VaderkollenError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_coordinates_rejected() {
        let bad = Place::new("Nowhere", f64::NAN, 18.0);
        let strategies: [&dyn FetchStrategy; 0] = [];
        let err = aggregator()
            .aggregate_with(&bad, &strategies)
            .await
            .unwrap_err();
        assert!(matches!(err, VaderkollenError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_winner_borrows_daily_from_donor() {
        // Winner (clear, warm) has no daily series; a loser does
        let mut donor = reading("donor", 3, 10.0);
        donor.daily = Some(daily());
        let winner = reading("winner", 0, 20.0);

        let scripted = ScriptedStrategy(vec![donor, winner]);
        let strategies: [&dyn FetchStrategy; 1] = [&scripted];

        let result = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap();

        assert_eq!(result.winner.provider.id, "winner");
        // Borrowed forecast, untouched current conditions
        assert!(result.winner.has_daily_forecast());
        assert_eq!(result.winner.temperature_c, 20.0);
        assert_eq!(result.winner.condition_code, 0);
    }

    #[tokio::test]
    async fn test_winner_keeps_own_daily_when_present() {
        let mut winner = reading("winner", 0, 20.0);
        let mut own = daily();
        own.temperature_max[0] = 99.0;
        winner.daily = Some(own.clone());

        let mut donor = reading("donor", 3, 10.0);
        donor.daily = Some(daily());

        let scripted = ScriptedStrategy(vec![winner, donor]);
        let strategies: [&dyn FetchStrategy; 1] = [&scripted];

        let result = aggregator()
            .aggregate_with(&place(), &strategies)
            .await
            .unwrap();
        assert_eq!(result.winner.daily, Some(own));
    }
}
