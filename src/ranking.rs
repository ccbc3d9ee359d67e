//! Deterministic provider ranking
//!
//! Condition codes follow the WMO interpretation scheme the forecast
//! endpoint uses. Each code maps to an ordinal "niceness" bucket; providers
//! are ranked by ascending bucket, then by descending temperature.

use crate::models::ProviderReading;
use std::cmp::Ordering;

/// Map a condition code to its niceness bucket, 0 = nicest.
///
/// Canonical table: clear (0), mainly/partly clear (1-2), overcast (3),
/// haze and fog (4-48), drizzle and rain (49-67), snow and showers
/// (68-94), thunderstorm (95+).
#[must_use]
pub fn condition_bucket(code: u16) -> u8 {
    match code {
        0 => 0,
        1..=2 => 1,
        3 => 2,
        4..=48 => 3,
        49..=67 => 4,
        68..=94 => 5,
        _ => 6,
    }
}

/// Human-readable condition description
#[must_use]
pub fn condition_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        4..=48 => "Fog",
        49..=57 => "Drizzle",
        58..=67 => "Rain",
        68..=79 => "Snow",
        80..=94 => "Showers",
        _ => "Thunderstorm",
    }
}

/// Compare two readings by the ranking rule: ascending bucket, then
/// descending temperature within an equal bucket.
#[must_use]
pub fn compare(a: &ProviderReading, b: &ProviderReading) -> Ordering {
    condition_bucket(a.condition_code)
        .cmp(&condition_bucket(b.condition_code))
        .then_with(|| {
            b.temperature_c
                .partial_cmp(&a.temperature_c)
                .unwrap_or(Ordering::Equal)
        })
}

/// Filter out invalid readings, rank the rest, and split off the winner.
/// Returns `None` when no valid reading remains.
#[must_use]
pub fn rank(mut readings: Vec<ProviderReading>) -> Option<(ProviderReading, Vec<ProviderReading>)> {
    readings.retain(ProviderReading::is_valid);
    readings.sort_by(compare);

    let mut ranked = readings.into_iter();
    let winner = ranked.next()?;
    Some((winner, ranked.collect()))
}
