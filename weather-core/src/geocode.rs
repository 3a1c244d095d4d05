//! Resolver: free-text location to coordinates via the OpenWeather geocoding API.

use std::fmt::Debug;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::PipelineError,
    http::get_json,
    model::{Coordinates, LocationQuery, ResolvedPlace},
};

const ENDPOINT: &str = "geocoding";

#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Return the first match for `query`, or [`PipelineError::NotFound`].
    async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedPlace, PipelineError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherGeocoder {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherGeocoder {
    pub fn new(api_key: String, base_url: impl Into<String>, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeoMatch {
    #[serde(default)]
    name: String,
    lat: f64,
    lon: f64,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[async_trait]
impl Geocoder for OpenWeatherGeocoder {
    async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedPlace, PipelineError> {
        let url = format!("{}/geo/1.0/direct", self.base_url);

        let matches: Vec<GeoMatch> = get_json(
            &self.http,
            ENDPOINT,
            &url,
            &[("q", query.as_str()), ("limit", "1"), ("appid", self.api_key.as_str())],
        )
        .await?;

        let first = first_match(matches, query)?;
        tracing::debug!(
            query = %query,
            lat = first.coordinates.latitude,
            lon = first.coordinates.longitude,
            "resolved location"
        );
        Ok(first)
    }
}

fn first_match(
    matches: Vec<GeoMatch>,
    query: &LocationQuery,
) -> Result<ResolvedPlace, PipelineError> {
    let first = matches
        .into_iter()
        .next()
        .ok_or_else(|| PipelineError::NotFound {
            location: query.to_string(),
        })?;

    let name = if first.name.is_empty() { query.to_string() } else { first.name };

    Ok(ResolvedPlace {
        name,
        state: first.state,
        country: first.country,
        coordinates: Coordinates::new(first.lat, first.lon),
    })
}
