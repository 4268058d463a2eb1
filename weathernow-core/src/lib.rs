//! Core library for the `weathernow` forecast viewer.
//!
//! This crate defines:
//! - The forecast data model and its normalization into a daily strip
//! - Unit conversions used for display
//! - The weather provider boundary (OpenWeather)
//! - View state, its pure reducer, and the controller that runs effects
//! - Configuration & credentials handling
//!
//! It is used by `weathernow-cli`, but can also be reused by other front-ends.

pub mod app;
pub mod config;
pub mod error;
pub mod geo;
pub mod model;
pub mod normalize;
pub mod provider;
pub mod units;

pub use app::{AppState, Effect, Event, Status, Theme, controller::Controller};
pub use config::Config;
pub use error::{LocateError, LocationError, ProviderError};
pub use geo::{FixedPosition, Geolocator};
pub use model::{Coordinates, DailySummary, Forecast, ForecastSample, ForecastSeries, Location};
pub use normalize::{NormalizedForecast, normalize};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
