//! Explicit view state for consumers of the aggregation flow
//!
//! A single tagged value replaces the ad hoc loading/error/result flag
//! combinations a presentation layer would otherwise juggle.

use super::reading::AggregationResult;

/// Where the search flow currently stands
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Nothing searched yet
    #[default]
    Home,
    /// A search is in flight
    Loading,
    /// A completed aggregation, winner first
    Results(AggregationResult),
    /// Terminal failure with a plain-language, retryable message
    Error(String),
}

impl ViewState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }
}
