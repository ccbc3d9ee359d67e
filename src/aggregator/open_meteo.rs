//! Open-Meteo wire structures and field-name resolution
//!
//! The forecast endpoint suffixes every field with the model id when
//! several models are requested in one call (`temperature_2m_gfs_seamless`)
//! and leaves them plain otherwise. A [`FieldMap`] resolves the exact keys
//! for one model once per request instead of scanning keys by prefix.

use crate::models::{DailyForecast, Provider, ProviderReading};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// A forecast model surfaced as one provider in the comparison
#[derive(Debug, Clone, Copy)]
pub struct ModelSpec {
    /// Upstream model id, as passed in the `models` query parameter
    pub id: &'static str,
    /// Display name
    pub label: &'static str,
}

impl ModelSpec {
    #[must_use]
    pub fn provider(&self) -> Provider {
        Provider::new(self.id, self.label)
    }
}

/// The fixed provider catalogue requested from the multi-model call.
/// The first entry doubles as the daily-forecast donor on the
/// one-request-per-model path.
pub const MODELS: &[ModelSpec] = &[
    ModelSpec {
        id: "metno_seamless",
        label: "MET Norway (YR)",
    },
    ModelSpec {
        id: "icon_seamless",
        label: "DWD ICON",
    },
    ModelSpec {
        id: "gfs_seamless",
        label: "NOAA GFS",
    },
    ModelSpec {
        id: "ecmwf_ifs025",
        label: "ECMWF IFS",
    },
];

/// The endpoint's best-available blend, used by the fallback call
pub const DEFAULT_MODEL: ModelSpec = ModelSpec {
    id: "best_match",
    label: "Open-Meteo Blend",
};

/// Exact response keys for one requested model
#[derive(Debug, Clone)]
pub struct FieldMap {
    pub temperature: String,
    pub condition_code: String,
    pub wind_speed: String,
    pub precipitation: String,
    pub daily_condition_code: String,
    pub daily_temperature_max: String,
    pub daily_temperature_min: String,
}

impl FieldMap {
    /// Resolve the keys for `model`; `None` means an unsuffixed response
    /// (single-model or default call).
    #[must_use]
    pub fn for_model(model: Option<&str>) -> Self {
        let key = |base: &str| match model {
            Some(id) => format!("{base}_{id}"),
            None => base.to_string(),
        };
        Self {
            temperature: key("temperature_2m"),
            condition_code: key("weather_code"),
            wind_speed: key("wind_speed_10m"),
            precipitation: key("precipitation"),
            daily_condition_code: key("weather_code"),
            daily_temperature_max: key("temperature_2m_max"),
            daily_temperature_min: key("temperature_2m_min"),
        }
    }
}

/// Forecast response from the Open-Meteo API
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub current: Option<CurrentBlock>,
    pub daily: Option<DailyBlock>,
}

/// Flat current-conditions fields, possibly model-suffixed
#[derive(Debug, Default, Deserialize)]
pub struct CurrentBlock {
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl CurrentBlock {
    /// A finite numeric field; `null`, absent, or non-numeric yields `None`
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields
            .get(key)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
    }

    /// An integer condition-code field
    #[must_use]
    pub fn code(&self, key: &str) -> Option<u16> {
        self.fields
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|v| u16::try_from(v).ok())
    }
}

/// Parallel daily arrays, possibly model-suffixed
#[derive(Debug, Default, Deserialize)]
pub struct DailyBlock {
    #[serde(flatten)]
    fields: HashMap<String, Value>,
}

impl DailyBlock {
    /// The shared date axis from the `time` array
    #[must_use]
    pub fn dates(&self) -> Option<Vec<NaiveDate>> {
        let raw = self.fields.get("time")?.as_array()?;
        raw.iter()
            .map(|v| {
                v.as_str()
                    .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            })
            .collect()
    }

    /// A per-day numeric array; individual days may be `null`
    #[must_use]
    pub fn numbers(&self, key: &str) -> Option<Vec<Option<f64>>> {
        let raw = self.fields.get(key)?.as_array()?;
        Some(
            raw.iter()
                .map(|v| v.as_f64().filter(|n| n.is_finite()))
                .collect(),
        )
    }

    /// A per-day condition-code array
    #[must_use]
    pub fn codes(&self, key: &str) -> Option<Vec<Option<u16>>> {
        let raw = self.fields.get(key)?.as_array()?;
        Some(
            raw.iter()
                .map(|v| v.as_u64().and_then(|n| u16::try_from(n).ok()))
                .collect(),
        )
    }
}

/// Build the forecast request URL for a set of models. An empty `models`
/// slice requests the endpoint's default blend with unsuffixed fields.
#[must_use]
pub fn forecast_url(
    base: &str,
    latitude: f64,
    longitude: f64,
    models: &[&str],
    include_daily: bool,
) -> String {
    let mut url = format!(
        "{base}?latitude={latitude:.4}&longitude={longitude:.4}\
         &current=temperature_2m,weather_code,wind_speed_10m,precipitation"
    );
    if include_daily {
        url.push_str("&daily=weather_code,temperature_2m_max,temperature_2m_min");
    }
    url.push_str("&timezone=auto&forecast_days=7&wind_speed_unit=ms");
    if !models.is_empty() {
        url.push_str("&models=");
        url.push_str(&models.join(","));
    }
    url
}

/// Normalize one provider's slice of the response into a reading.
/// Returns `None` when the temperature or condition code is missing,
/// non-numeric, or non-finite; such providers drop out of the comparison.
#[must_use]
pub fn extract_reading(
    response: &ForecastResponse,
    provider: Provider,
    map: &FieldMap,
) -> Option<ProviderReading> {
    let current = response.current.as_ref()?;
    let temperature_c = current.number(&map.temperature)?;
    let condition_code = current.code(&map.condition_code)?;
    let daily = response.daily.as_ref().and_then(|d| extract_daily(d, map));

    Some(ProviderReading {
        provider,
        temperature_c,
        condition_code,
        wind_speed_ms: current.number(&map.wind_speed),
        precipitation_mm: current.number(&map.precipitation),
        daily,
    })
}

/// Assemble a daily forecast from the aligned prefix of the parallel
/// arrays, stopping at the first day any of them lacks. Compacting holes
/// away instead would shift later days down an index, and the outlook
/// window skips index 0 on the premise that it is today.
#[must_use]
pub fn extract_daily(daily: &DailyBlock, map: &FieldMap) -> Option<DailyForecast> {
    let dates = daily.dates()?;
    let maxes = daily.numbers(&map.daily_temperature_max)?;
    let mins = daily.numbers(&map.daily_temperature_min)?;
    let codes = daily.codes(&map.daily_condition_code)?;

    let mut forecast = DailyForecast::default();
    for (index, date) in dates.iter().enumerate() {
        let (Some(max), Some(min), Some(code)) = (
            maxes.get(index).copied().flatten(),
            mins.get(index).copied().flatten(),
            codes.get(index).copied().flatten(),
        ) else {
            break;
        };
        forecast.dates.push(*date);
        forecast.temperature_max.push(max);
        forecast.temperature_min.push(min);
        forecast.condition_code.push(code);
    }

    forecast.is_populated().then_some(forecast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(body: Value) -> ForecastResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_field_map_suffixing() {
        let map = FieldMap::for_model(Some("gfs_seamless"));
        assert_eq!(map.temperature, "temperature_2m_gfs_seamless");
        assert_eq!(map.condition_code, "weather_code_gfs_seamless");

        let plain = FieldMap::for_model(None);
        assert_eq!(plain.temperature, "temperature_2m");
        assert_eq!(plain.daily_temperature_max, "temperature_2m_max");
    }

    #[test]
    fn test_extract_reading_from_suffixed_response() {
        let response = parse(json!({
            "current": {
                "time": "2026-08-24T12:00",
                "temperature_2m_metno_seamless": 17.3,
                "weather_code_metno_seamless": 2,
                "wind_speed_10m_metno_seamless": 4.1,
                "precipitation_metno_seamless": 0.0
            }
        }));
        let map = FieldMap::for_model(Some("metno_seamless"));
        let reading = extract_reading(&response, MODELS[0].provider(), &map).unwrap();

        assert_eq!(reading.temperature_c, 17.3);
        assert_eq!(reading.condition_code, 2);
        assert_eq!(reading.wind_speed_ms, Some(4.1));
        assert!(reading.daily.is_none());
    }

    #[test]
    fn test_extract_reading_rejects_null_temperature() {
        let response = parse(json!({
            "current": { "temperature_2m": null, "weather_code": 0 }
        }));
        let map = FieldMap::for_model(None);
        assert!(extract_reading(&response, DEFAULT_MODEL.provider(), &map).is_none());
    }

    #[test]
    fn test_extract_reading_rejects_missing_code() {
        let response = parse(json!({
            "current": { "temperature_2m": 21.0 }
        }));
        let map = FieldMap::for_model(None);
        assert!(extract_reading(&response, DEFAULT_MODEL.provider(), &map).is_none());
    }

    #[test]
    fn test_extract_daily_truncates_at_first_gap() {
        let response = parse(json!({
            "current": { "temperature_2m": 21.0, "weather_code": 0 },
            "daily": {
                "time": ["2026-08-24", "2026-08-25", "2026-08-26"],
                "temperature_2m_max": [20.0, null, 22.0],
                "temperature_2m_min": [10.0, 11.0, 12.0],
                "weather_code": [0, 1, 2]
            }
        }));
        let map = FieldMap::for_model(None);
        let reading = extract_reading(&response, DEFAULT_MODEL.provider(), &map).unwrap();
        let daily = reading.daily.unwrap();

        // Days after a hole stay out so indices keep matching the date
        // axis, index 0 = today
        assert_eq!(daily.dates.len(), 1);
        assert_eq!(daily.temperature_max, vec![20.0]);
        assert_eq!(daily.condition_code, vec![0]);
    }

    #[test]
    fn test_extract_daily_with_null_today_yields_no_series() {
        // A null today must not shift tomorrow into index 0, where the
        // outlook window would skip it; the provider simply has no daily
        // series and the winner borrows one from a donor instead.
        let response = parse(json!({
            "current": { "temperature_2m": 21.0, "weather_code": 0 },
            "daily": {
                "time": ["2026-08-24", "2026-08-25", "2026-08-26"],
                "temperature_2m_max": [null, 21.0, 22.0],
                "temperature_2m_min": [10.0, 11.0, 12.0],
                "weather_code": [0, 1, 2]
            }
        }));
        let map = FieldMap::for_model(None);
        let reading = extract_reading(&response, DEFAULT_MODEL.provider(), &map).unwrap();
        assert!(reading.daily.is_none());
    }

    #[test]
    fn test_forecast_url_shapes() {
        let combined = forecast_url(
            "https://api.example/v1/forecast",
            57.6409,
            18.296,
            &["metno_seamless", "gfs_seamless"],
            true,
        );
        assert!(combined.contains("latitude=57.6409"));
        assert!(combined.contains("&daily=weather_code"));
        assert!(combined.ends_with("&models=metno_seamless,gfs_seamless"));

        let fallback = forecast_url("https://api.example/v1/forecast", 57.6409, 18.296, &[], false);
        assert!(!fallback.contains("models="));
        assert!(!fallback.contains("&daily="));
    }
}
