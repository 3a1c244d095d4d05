//! Human-friendly text output for the dashboard.

use chrono::NaiveDate;
use weather_core::{Dashboard, ErrorKind, Status, SummaryStats, WeatherReport};

use crate::chart::LineChart;

const NO_DATA: &str = "no data";
const COLUMN: usize = 38;
const CHART_HEIGHT: usize = 14;

/// Full screen: header, status line, summary panel and chart.
pub fn render_dashboard(dashboard: &Dashboard, today: NaiveDate) -> String {
    let mut out = String::from("Weather Forecast\n================\n\n");

    if let Some(status) = render_status(dashboard.status(), dashboard.report().map(|r| &**r)) {
        out.push_str(&status);
        out.push_str("\n\n");
    }

    match dashboard.report() {
        Some(report) => {
            out.push_str(&render_summary(report, today));
            out.push('\n');
            out.push_str(&render_chart(report));
        }
        None if dashboard.is_loading() => {}
        None => out.push_str("No weather data to show.\n"),
    }

    out
}

/// Loading indicator or error banner. `None` when the data on screen is current.
pub fn render_status(status: &Status, report: Option<&WeatherReport>) -> Option<String> {
    let showing = report.map(|r| r.place.display_name());

    match status {
        Status::Idle | Status::Ready => None,
        Status::Loading { location } => Some(match showing {
            Some(name) => format!("Loading weather for {location}... (showing {name})"),
            None => format!("Loading weather for {location}..."),
        }),
        Status::Failed {
            location,
            kind,
            message,
        } => {
            let banner = match kind {
                ErrorKind::NotFound => format!("! Location not found: {location}"),
                _ => format!("! Could not load weather for {location}: {message}"),
            };
            Some(match showing {
                Some(name) => format!("{banner}\n  Still showing previous results for {name}."),
                None => banner,
            })
        }
    }
}

pub fn render_summary(report: &WeatherReport, today: NaiveDate) -> String {
    let units = &report.forecast.units;
    let stats: &SummaryStats = &report.forecast.stats;

    let left = [
        format!("Date: {}", today.format("%B %-d, %Y")),
        format!("Location: {}", report.place.display_name()),
        format!(
            "Relative Humidity: {}",
            with_unit(fixed2(stats.avg_humidity), &units.humidity)
        ),
    ];
    let right = [
        format!(
            "Highest Temperature: {}",
            with_unit(plain(stats.max_temp), &units.temperature)
        ),
        format!(
            "Lowest Temperature: {}",
            with_unit(plain(stats.min_temp), &units.temperature)
        ),
        format!(
            "Average Wind Speed: {}",
            with_unit(fixed2(stats.avg_wind_speed), &units.wind_speed)
        ),
    ];

    let mut out = String::new();
    for (l, r) in left.iter().zip(right.iter()) {
        out.push_str(&format!("  {l:<w$}{r}\n", w = COLUMN));
    }

    if let Some(current) = &report.forecast.current {
        out.push_str(&format!(
            "  Now: {}, wind {}\n",
            with_unit(Some(current.temperature.to_string()), &units.temperature),
            with_unit(Some(current.wind_speed.to_string()), &units.wind_speed),
        ));
    }
    out
}

pub fn render_chart(report: &WeatherReport) -> String {
    let records = &report.forecast.records;
    let units = &report.forecast.units;

    let chart = LineChart::new(records.iter().map(|r| r.hour.clone()).collect())
        .set_height(CHART_HEIGHT)
        .set_column_width(3)
        .add_series(
            format!("wind speed ({})", units.wind_speed),
            '+',
            records.iter().map(|r| r.wind_speed).collect(),
        )
        .add_series(
            format!("temperature ({})", units.temperature),
            '*',
            records.iter().map(|r| r.temperature).collect(),
        )
        .add_series(
            format!("humidity ({})", units.humidity),
            'o',
            records.iter().map(|r| r.humidity).collect(),
        );

    format!("Next {} hours\n{}", records.len(), chart.render())
}

fn plain(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

fn fixed2(value: Option<f64>) -> Option<String> {
    value.map(|v| format!("{v:.2}"))
}

fn with_unit(value: Option<String>, unit: &str) -> String {
    match value {
        Some(v) if unit.starts_with('°') => format!("{v}{unit}"),
        Some(v) => format!("{v} {unit}"),
        None => NO_DATA.to_string(),
    }
}
