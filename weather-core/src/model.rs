use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// A non-empty, trimmed free-text location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Validate raw user input. Empty or whitespace-only text is rejected
    /// before anything touches the network.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PipelineError::InvalidInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for LocationQuery {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// First geocoding match for a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub name: String,
    pub state: Option<String>,
    pub country: Option<String>,
    pub coordinates: Coordinates,
}

impl ResolvedPlace {
    /// "Name, State, CC" with whatever parts the provider returned.
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One chart-ready hourly point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub hour: String,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
}

/// Summary scalars over the display records. `None` means "no data".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    /// Rounded to 2 decimals.
    pub avg_wind_speed: Option<f64>,
    /// Rounded to 2 decimals.
    pub avg_humidity: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub time: String,
    pub temperature: f64,
    pub wind_speed: f64,
}

/// Unit labels as reported by the forecast provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Units {
    pub temperature: String,
    pub wind_speed: String,
    pub humidity: String,
}

impl Default for Units {
    fn default() -> Self {
        Self {
            temperature: "°C".to_string(),
            wind_speed: "km/h".to_string(),
            humidity: "%".to_string(),
        }
    }
}

/// Records plus statistics for one location, as produced by the Aggregator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub records: Vec<DisplayRecord>,
    pub stats: SummaryStats,
    pub current: Option<CurrentConditions>,
    pub units: Units,
}

/// Everything the dashboard shows for one successful run. Replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub query: LocationQuery,
    pub place: ResolvedPlace,
    pub forecast: Forecast,
    pub fetched_at: DateTime<Utc>,
}
