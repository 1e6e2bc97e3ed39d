//! Display state for the single weather screen.
//!
//! The session owns the query text and what is currently shown. Fetches run
//! as spawned tasks and report back over a channel tagged with the sequence
//! number of their submission; only the most recent submission may update
//! the display, so a slow earlier response can never overwrite a newer one.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    error::FetchError,
    model::WeatherResult,
    provider::{FetchOutcome, WeatherProvider},
};

/// What the result/error panels show. Result and error are never both present.
#[derive(Debug, Default)]
pub enum DisplayState {
    /// Nothing submitted yet.
    #[default]
    Empty,
    Weather(WeatherResult),
    Error(FetchError),
}

impl DisplayState {
    pub fn weather(&self) -> Option<&WeatherResult> {
        match self {
            DisplayState::Weather(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            DisplayState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// How a finished fetch was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Latest submission; the display now reflects it.
    Applied(u64),
    /// Superseded by a newer submission and discarded.
    Stale(u64),
}

type Finished = (u64, FetchOutcome);

#[derive(Debug)]
pub struct Session {
    provider: Arc<dyn WeatherProvider>,
    query: String,
    display: DisplayState,
    latest_seq: u64,
    pending: bool,
    in_flight: usize,
    tx: mpsc::UnboundedSender<Finished>,
    rx: mpsc::UnboundedReceiver<Finished>,
}

impl Session {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            provider,
            query: String::new(),
            display: DisplayState::Empty,
            latest_seq: 0,
            pending: false,
            in_flight: 0,
            tx,
            rx,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// True while the latest submission has not completed.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Start fetching the current query and return its sequence number.
    ///
    /// Does not wait for the response. Must be called within a Tokio runtime.
    pub fn submit(&mut self) -> u64 {
        self.latest_seq += 1;
        self.pending = true;
        self.in_flight += 1;

        let seq = self.latest_seq;
        let provider = Arc::clone(&self.provider);
        let query = self.query.clone();
        let tx = self.tx.clone();

        tracing::debug!(seq, query = %query, "submitting weather request");

        tokio::spawn(async move {
            let fetch = tokio::spawn(async move { provider.current_conditions(&query).await });

            let outcome = match fetch.await {
                Ok(outcome) => outcome,
                Err(err) => Err(FetchError::unexpected(format!(
                    "weather fetch task failed: {err}"
                ))),
            };

            // The session may already be gone; its state is gone with it.
            let _ = tx.send((seq, outcome));
        });

        seq
    }

    /// Wait for the next fetch to finish and apply it.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        if self.in_flight == 0 {
            return None;
        }

        let (seq, outcome) = self.rx.recv().await?;
        self.in_flight -= 1;

        Some(self.apply(seq, outcome))
    }

    /// Submit the current query and wait until that submission is applied.
    pub async fn submit_and_wait(&mut self) -> &DisplayState {
        let seq = self.submit();

        while let Some(completion) = self.next_completion().await {
            if completion == Completion::Applied(seq) {
                break;
            }
        }

        &self.display
    }

    /// Apply a finished fetch. Anything but the latest submission is discarded.
    ///
    /// Only completions received from the session's own channel come through
    /// here, so every applied sequence number was counted in `in_flight`.
    pub(crate) fn apply(&mut self, seq: u64, outcome: FetchOutcome) -> Completion {
        if seq != self.latest_seq {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale weather response");
            return Completion::Stale(seq);
        }

        self.pending = false;
        self.display = match outcome {
            Ok(result) => {
                tracing::debug!(seq, location = %result.location, "weather loaded");
                DisplayState::Weather(result)
            }
            Err(err) => {
                tracing::debug!(seq, kind = %err.kind(), "weather request failed");
                DisplayState::Error(err)
            }
        };

        Completion::Applied(seq)
    }
}
