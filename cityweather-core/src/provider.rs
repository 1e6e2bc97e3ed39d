use crate::{Config, FetchError, WeatherResult, provider::visualcrossing::VisualCrossingProvider};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod visualcrossing;

/// Outcome of one submission: a full result or a classified failure.
pub type FetchOutcome = Result<WeatherResult, FetchError>;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Fetch current conditions for `city`. Exactly one outbound request, no retries.
    async fn current_conditions(&self, city: &str) -> FetchOutcome;
}

/// Construct the Visual Crossing provider with the credential and endpoint from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let provider =
        VisualCrossingProvider::new(config.api_key().to_owned(), config.base_url())?;

    Ok(Arc::new(provider))
}
