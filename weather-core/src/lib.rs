//! Core library for the `weather-dash` terminal dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Resolver (geocoding) and Aggregator (hourly forecast + statistics)
//! - The pipeline tying them together and the dashboard state it feeds
//!
//! It is used by `weather-dash`, but can also be reused by other front ends.

pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod geocode;
mod http;
pub mod model;
pub mod pipeline;

pub use aggregate::HORIZON;
pub use config::Config;
pub use dashboard::{Completion, Dashboard, RunToken, Status};
pub use error::{ErrorKind, PipelineError};
pub use forecast::{ForecastSource, OpenMeteoForecast};
pub use geocode::{Geocoder, OpenWeatherGeocoder};
pub use model::{
    Coordinates, CurrentConditions, DisplayRecord, Forecast, LocationQuery, ResolvedPlace,
    SummaryStats, Units, WeatherReport,
};
pub use pipeline::Pipeline;
