//! The location → weather retrieval sequence.

use tokio::sync::watch;

use crate::location::LocationProvider;
use crate::provider::WeatherSource;
use crate::state::{FetchMode, FetchState};
use crate::types::{Accuracy, FetchError, Permission, WeatherSnapshot};

/// Runs permission → fix → request → parse, strictly in order, and owns the
/// resulting [`FetchState`].
///
/// Each accepted invocation does exactly one permission check, at most one
/// location read and at most one weather request, and ends in exactly one of
/// `Ready` or `Failed`. Triggers that arrive while a fetch is in flight are
/// rejected without any I/O.
pub struct WeatherFetchSequence<L, W> {
    location: L,
    weather: W,
    accuracy: Accuracy,
    state: watch::Sender<FetchState>,
}

impl<L, W> WeatherFetchSequence<L, W>
where
    L: LocationProvider,
    W: WeatherSource,
{
    pub fn new(location: L, weather: W) -> Self {
        let (state, _) = watch::channel(FetchState::Idle);
        Self {
            location,
            weather,
            accuracy: Accuracy::default(),
            state,
        }
    }

    pub fn with_accuracy(mut self, accuracy: Accuracy) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Current state
    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Receive every state transition
    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    /// Run the sequence once and return the state it settled in.
    ///
    /// If a fetch is already in flight this returns the current (busy) state
    /// immediately. Dropping the returned future mid-flight puts back the
    /// state the fetch started from.
    #[tracing::instrument(skip(self), level = "info")]
    pub async fn fetch(&self, mode: FetchMode) -> FetchState {
        let mut prior = None;
        self.state.send_if_modified(|state| match state.begin(mode) {
            Some(next) => {
                prior = Some(std::mem::replace(state, next));
                true
            }
            None => false,
        });

        let Some(prior) = prior else {
            tracing::debug!("Fetch already in flight, ignoring {:?} trigger", mode);
            return self.state();
        };

        let in_flight = InFlight {
            state: &self.state,
            prior: Some(prior),
        };

        let next = FetchState::complete(self.run().await);
        match &next {
            FetchState::Failed { error } => tracing::warn!("Fetch failed: {}", error.reason()),
            _ => tracing::info!(state = next.label(), "Fetch complete"),
        }
        in_flight.settle(next.clone());
        next
    }

    async fn run(&self) -> Result<WeatherSnapshot, FetchError> {
        if self.location.request_permission().await == Permission::Denied {
            return Err(FetchError::PermissionDenied);
        }

        let coordinates = self.location.current_position(self.accuracy).await?;
        tracing::debug!("Got location: {}", coordinates);

        Ok(self.weather.current(coordinates).await?)
    }
}

/// Holds the busy state for one accepted fetch.
///
/// Settles the channel exactly once: with the fetch outcome, or with the
/// prior state if the fetch is dropped before finishing.
struct InFlight<'a> {
    state: &'a watch::Sender<FetchState>,
    prior: Option<FetchState>,
}

impl InFlight<'_> {
    fn settle(mut self, next: FetchState) {
        self.prior = None;
        self.state.send_replace(next);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(prior) = self.prior.take() {
            tracing::warn!("Fetch cancelled, restoring {} state", prior.label());
            self.state.send_replace(prior);
        }
    }
}
