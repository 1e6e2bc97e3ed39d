//! Core library for the `cityweather` client.
//!
//! This crate defines:
//! - Configuration & credential handling
//! - The Visual Crossing current-conditions fetcher and its error taxonomy
//! - The display state of the single weather screen
//!
//! It is used by `cityweather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::{FetchError, FetchErrorKind};
pub use model::WeatherResult;
pub use provider::{FetchOutcome, WeatherProvider, provider_from_config};
pub use session::{Completion, DisplayState, Session};
