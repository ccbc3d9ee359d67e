//! Daily forecast series and the user-facing 5-day outlook window

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How many days the outlook shows, starting tomorrow
pub const OUTLOOK_DAYS: usize = 5;

/// A provider's daily forecast as parallel arrays keyed by date,
/// mirroring the upstream wire layout
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct DailyForecast {
    /// Forecast dates, ascending, index 0 is today
    pub dates: Vec<NaiveDate>,
    /// Daily maximum temperature in Celsius
    pub temperature_max: Vec<f64>,
    /// Daily minimum temperature in Celsius
    pub temperature_min: Vec<f64>,
    /// Daily condition code
    pub condition_code: Vec<u16>,
}

/// One day of a daily forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub condition_code: u16,
}

/// An outlook entry paired with its weekday label
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutlookDay {
    /// Short weekday name derived from the entry's date, e.g. "Mon"
    pub weekday: String,
    pub entry: DailyForecastEntry,
}

impl DailyForecast {
    /// Whether the series carries any usable days
    #[must_use]
    pub fn is_populated(&self) -> bool {
        !self.dates.is_empty()
    }

    /// Get the entry at `index`, when every parallel array covers it
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<DailyForecastEntry> {
        Some(DailyForecastEntry {
            date: *self.dates.get(index)?,
            temperature_max: *self.temperature_max.get(index)?,
            temperature_min: *self.temperature_min.get(index)?,
            condition_code: *self.condition_code.get(index)?,
        })
    }

    /// The user-facing outlook: skips index 0 (today) and exposes indices
    /// 1 through [`OUTLOOK_DAYS`] in original order, each paired with a
    /// weekday label. Shorter series yield whatever is available past today.
    #[must_use]
    pub fn outlook(&self) -> Vec<OutlookDay> {
        (1..=OUTLOOK_DAYS)
            .filter_map(|index| self.entry(index))
            .map(|entry| OutlookDay {
                weekday: entry.date.format("%a").to_string(),
                entry,
            })
            .collect()
    }
}
