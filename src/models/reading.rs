//! Per-provider weather readings and the aggregation result

use super::forecast::DailyForecast;
use super::place::Place;
use serde::{Deserialize, Serialize};

/// A named weather data source (forecast model) in the comparison
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Provider {
    /// Stable identifier, e.g. the upstream model id
    pub id: String,
    /// Human-readable name, e.g. "MET Norway (YR)"
    pub name: String,
}

impl Provider {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One provider's normalized current conditions, plus its daily forecast
/// when the upstream returned one
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderReading {
    pub provider: Provider,
    /// Current temperature in Celsius; surfaced readings are always finite
    pub temperature_c: f64,
    /// Current condition code
    pub condition_code: u16,
    /// Current wind speed in m/s
    pub wind_speed_ms: Option<f64>,
    /// Current precipitation in mm
    pub precipitation_mm: Option<f64>,
    /// Daily forecast series, absent for providers that did not return one
    pub daily: Option<DailyForecast>,
}

impl ProviderReading {
    /// A reading is only usable when its temperature is a finite number.
    /// Missing condition codes are rejected earlier, during normalization.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.temperature_c.is_finite()
    }

    /// Whether this reading carries a populated daily forecast
    #[must_use]
    pub fn has_daily_forecast(&self) -> bool {
        self.daily.as_ref().is_some_and(DailyForecast::is_populated)
    }
}

/// The outcome of one aggregation pass: exactly one winner, the remaining
/// providers in ranked order. Transient, rebuilt on every search.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregationResult {
    pub place: Place,
    pub winner: ProviderReading,
    pub losers: Vec<ProviderReading>,
}

impl AggregationResult {
    /// All readings in ranked order, winner first
    pub fn readings(&self) -> impl Iterator<Item = &ProviderReading> {
        std::iter::once(&self.winner).chain(self.losers.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(temperature_c: f64) -> ProviderReading {
        ProviderReading {
            provider: Provider::new("test", "Test"),
            temperature_c,
            condition_code: 0,
            wind_speed_ms: None,
            precipitation_mm: None,
            daily: None,
        }
    }

    #[test]
    fn test_nan_reading_is_invalid() {
        assert!(!reading(f64::NAN).is_valid());
        assert!(!reading(f64::INFINITY).is_valid());
        assert!(reading(18.5).is_valid());
    }

    #[test]
    fn test_readings_iterates_winner_first() {
        let result = AggregationResult {
            place: Place::new("Visby", 57.6409, 18.2960),
            winner: reading(20.0),
            losers: vec![reading(15.0), reading(10.0)],
        };
        let temps: Vec<f64> = result.readings().map(|r| r.temperature_c).collect();
        assert_eq!(temps, vec![20.0, 15.0, 10.0]);
    }
}
