//! Last-write-wins search session
//!
//! There is exactly one mutable slot in the whole flow: the current view
//! state. A new search supersedes an in-flight one by bumping a
//! generation counter; results arriving for an older generation are
//! disregarded instead of cancelled.

use crate::models::{AggregationResult, ViewState};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Tracks the newest search and holds the current view state
#[derive(Debug, Default)]
pub struct SearchSession {
    generation: AtomicU64,
    state: Mutex<ViewState>,
}

impl SearchSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new search: moves the view to `Loading` and returns the
    /// generation token the eventual result must present.
    pub fn begin_search(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock_state() = ViewState::Loading;
        generation
    }

    /// Land a completed aggregation. Returns `false` when the result
    /// belongs to a superseded search and was dropped.
    pub fn complete(
        &self,
        generation: u64,
        outcome: crate::Result<AggregationResult>,
    ) -> bool {
        if generation != self.generation.load(Ordering::SeqCst) {
            debug!("Dropping result of superseded search (generation {generation})");
            return false;
        }

        *self.lock_state() = match outcome {
            Ok(result) => ViewState::Results(result),
            Err(e) => ViewState::Error(e.user_message()),
        };
        true
    }

    /// Clear back to the home state
    pub fn reset(&self) {
        *self.lock_state() = ViewState::Home;
    }

    /// Snapshot of the current view state
    #[must_use]
    pub fn state(&self) -> ViewState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
