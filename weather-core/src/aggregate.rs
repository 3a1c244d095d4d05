//! Reshape hourly forecast arrays into display records and summarize them.

use chrono::{DateTime, NaiveDateTime};

use crate::{
    forecast::HourlySeries,
    model::{DisplayRecord, SummaryStats},
};

/// Number of hourly samples shown on the dashboard.
pub const HORIZON: usize = 24;

/// Build at most [`HORIZON`] display records from the parallel hourly arrays,
/// in array order. The shortest array bounds the result; samples with a gap
/// in any series are skipped.
///
/// The horizon counts provider samples, not complete ones: a gap inside the
/// first [`HORIZON`] samples leaves fewer records, and later samples are not
/// pulled forward to fill it.
pub fn reshape(hourly: &HourlySeries) -> Vec<DisplayRecord> {
    let len = hourly
        .time
        .len()
        .min(hourly.temperature_2m.len())
        .min(hourly.wind_speed_10m.len())
        .min(hourly.relative_humidity_2m.len())
        .min(HORIZON);

    (0..len)
        .filter_map(|i| {
            let time = &hourly.time[i];
            match (
                hourly.temperature_2m[i],
                hourly.wind_speed_10m[i],
                hourly.relative_humidity_2m[i],
            ) {
                (Some(temperature), Some(wind_speed), Some(humidity)) => Some(DisplayRecord {
                    hour: format_hour_label(time),
                    temperature,
                    wind_speed,
                    humidity,
                }),
                _ => {
                    tracing::debug!(%time, index = i, "skipping hourly sample with missing values");
                    None
                }
            }
        })
        .collect()
}

/// Compute the four summary scalars from scratch. An empty slice yields
/// `None` for every field.
pub fn summarize(records: &[DisplayRecord]) -> SummaryStats {
    if records.is_empty() {
        return SummaryStats::default();
    }

    let temps = records.iter().map(|r| r.temperature);
    let max_temp = temps.clone().fold(f64::NEG_INFINITY, f64::max);
    let min_temp = temps.fold(f64::INFINITY, f64::min);

    SummaryStats {
        max_temp: Some(max_temp),
        min_temp: Some(min_temp),
        avg_wind_speed: mean(records.iter().map(|r| r.wind_speed)).map(round2),
        avg_humidity: mean(records.iter().map(|r| r.humidity)).map(round2),
    }
}

/// Format a provider timestamp as a 24-hour `HH:MM` label. Unrecognised
/// timestamps are returned unchanged.
pub fn format_hour_label(raw: &str) -> String {
    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
    {
        return dt.format("%H:%M").to_string();
    }

    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.format("%H:%M").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
