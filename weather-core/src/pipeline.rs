use std::sync::Arc;

use chrono::Utc;

use crate::{
    config::Config,
    error::PipelineError,
    forecast::{ForecastSource, OpenMeteoForecast},
    geocode::{Geocoder, OpenWeatherGeocoder},
    http::build_client,
    model::{LocationQuery, WeatherReport},
};

/// Resolver followed by Aggregator. Cheap to clone; clones share the clients.
#[derive(Debug, Clone)]
pub struct Pipeline {
    geocoder: Arc<dyn Geocoder>,
    forecast: Arc<dyn ForecastSource>,
}

impl Pipeline {
    pub fn new(geocoder: Arc<dyn Geocoder>, forecast: Arc<dyn ForecastSource>) -> Self {
        Self { geocoder, forecast }
    }

    /// Construct the HTTP-backed pipeline. Fails if no geocoding API key is configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        let http = build_client(config.request_timeout())?;

        let geocoder =
            OpenWeatherGeocoder::new(api_key.to_owned(), &config.geocoding.base_url, http.clone());
        let forecast = OpenMeteoForecast::new(&config.forecast.base_url, http);

        Ok(Self::new(Arc::new(geocoder), Arc::new(forecast)))
    }

    /// Resolve `query` and fetch its forecast. The forecast request is only
    /// issued once coordinates are known; any failure aborts the whole run.
    pub async fn run(&self, query: &LocationQuery) -> Result<WeatherReport, PipelineError> {
        let place = self.geocoder.resolve(query).await?;
        let forecast = self.forecast.forecast(place.coordinates).await?;

        Ok(WeatherReport {
            query: query.clone(),
            place,
            forecast,
            fetched_at: Utc::now(),
        })
    }
}
