//! Aggregator: hourly forecast from Open-Meteo, reshaped into display records.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    aggregate::{reshape, summarize},
    error::PipelineError,
    http::get_json,
    model::{Coordinates, CurrentConditions, Forecast, Units},
};

const ENDPOINT: &str = "forecast";
const CURRENT_FIELDS: &str = "temperature_2m,wind_speed_10m";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";

#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn forecast(&self, coordinates: Coordinates) -> Result<Forecast, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    base_url: String,
    http: Client,
}

impl OpenMeteoForecast {
    pub fn new(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

/// Parallel hourly arrays as returned by the provider. Any array may be
/// missing and any value may be `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct HourlyUnits {
    temperature_2m: Option<String>,
    wind_speed_10m: Option<String>,
    relative_humidity_2m: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    #[serde(default)]
    time: String,
    temperature_2m: Option<f64>,
    wind_speed_10m: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentBlock>,
    #[serde(default)]
    hourly_units: Option<HourlyUnits>,
    #[serde(default)]
    hourly: HourlySeries,
}

impl ForecastResponse {
    fn into_forecast(self) -> Forecast {
        let records = reshape(&self.hourly);
        let stats = summarize(&records);

        let current = self.current.and_then(|c| match (c.temperature_2m, c.wind_speed_10m) {
            (Some(temperature), Some(wind_speed)) => Some(CurrentConditions {
                time: c.time,
                temperature,
                wind_speed,
            }),
            _ => None,
        });

        let defaults = Units::default();
        let units = match self.hourly_units {
            Some(u) => Units {
                temperature: u.temperature_2m.unwrap_or(defaults.temperature),
                wind_speed: u.wind_speed_10m.unwrap_or(defaults.wind_speed),
                humidity: u.relative_humidity_2m.unwrap_or(defaults.humidity),
            },
            None => defaults,
        };

        Forecast {
            records,
            stats,
            current,
            units,
        }
    }
}

#[async_trait]
impl ForecastSource for OpenMeteoForecast {
    async fn forecast(&self, coordinates: Coordinates) -> Result<Forecast, PipelineError> {
        let url = format!("{}/v1/forecast", self.base_url);
        let latitude = coordinates.latitude.to_string();
        let longitude = coordinates.longitude.to_string();

        let response: ForecastResponse = get_json(
            &self.http,
            ENDPOINT,
            &url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", CURRENT_FIELDS),
                ("hourly", HOURLY_FIELDS),
            ],
        )
        .await?;

        let forecast = response.into_forecast();
        tracing::debug!(records = forecast.records.len(), "aggregated hourly forecast");
        Ok(forecast)
    }
}
