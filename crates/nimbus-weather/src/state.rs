//! Fetch state machine.
//!
//! ```text
//! Idle --(trigger)--> Loading
//! Loading --(error)--> Failed
//! Loading --(success)--> Ready
//! Ready --(refresh)--> Refreshing
//! Refreshing --(error)--> Failed
//! Refreshing --(success)--> Ready
//! Failed --(retry)--> Loading
//! ```
//!
//! At most one of `Loading` / `Refreshing` is active, and while either is,
//! no new fetch may start.

use chrono::{DateTime, Utc};

use crate::types::{FetchError, WeatherSnapshot};

/// What kind of user trigger started a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// First load or retry after a failure
    Initial,
    /// Pull-to-refresh while data is shown
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    /// Refreshing; the previous snapshot stays visible
    Refreshing { previous: WeatherSnapshot },
    Ready {
        snapshot: WeatherSnapshot,
        last_updated: DateTime<Utc>,
    },
    Failed { error: FetchError },
}

impl FetchState {
    /// True while a fetch is in flight
    pub fn is_busy(&self) -> bool {
        matches!(self, FetchState::Loading | FetchState::Refreshing { .. })
    }

    /// In-flight state to enter for a trigger, or `None` if one is already running.
    ///
    /// `Refresh` only yields `Refreshing` when there is data on screen; otherwise
    /// it is a retry and yields `Loading`.
    pub fn begin(&self, mode: FetchMode) -> Option<FetchState> {
        match (self, mode) {
            (FetchState::Loading | FetchState::Refreshing { .. }, _) => None,
            (FetchState::Ready { snapshot, .. }, FetchMode::Refresh) => {
                Some(FetchState::Refreshing {
                    previous: snapshot.clone(),
                })
            }
            _ => Some(FetchState::Loading),
        }
    }

    /// Terminal state of one invocation
    pub fn complete(outcome: Result<WeatherSnapshot, FetchError>) -> FetchState {
        match outcome {
            Ok(snapshot) => FetchState::Ready {
                last_updated: snapshot.observed_at,
                snapshot,
            },
            Err(error) => FetchState::Failed { error },
        }
    }

    /// Snapshot to display, including the one kept during a refresh
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            FetchState::Ready { snapshot, .. } => Some(snapshot),
            FetchState::Refreshing { previous } => Some(previous),
            _ => None,
        }
    }

    /// User-visible failure reason
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            FetchState::Failed { error } => Some(error.reason()),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FetchState::Idle => "idle",
            FetchState::Loading => "loading",
            FetchState::Refreshing { .. } => "refreshing",
            FetchState::Ready { .. } => "ready",
            FetchState::Failed { .. } => "failed",
        }
    }
}
