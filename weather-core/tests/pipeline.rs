//! End-to-end pipeline tests against mocked geocoding and forecast servers.

use weather_core::{
    Completion, Config, Dashboard, ErrorKind, LocationQuery, Pipeline, PipelineError, Status,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn config_for(server: &MockServer) -> Config {
    let mut cfg = Config::default();
    cfg.set_api_key(API_KEY.to_string());
    cfg.geocoding.base_url = server.uri();
    cfg.forecast.base_url = server.uri();
    cfg
}

fn query(s: &str) -> LocationQuery {
    LocationQuery::parse(s).expect("valid query")
}

/// Open-Meteo style body with `hours` samples, temperatures starting at `start`.
fn forecast_body(hours: usize, start: f64) -> serde_json::Value {
    let time: Vec<String> = (0..hours)
        .map(|i| format!("2024-06-{:02}T{:02}:00", 1 + i / 24, i % 24))
        .collect();
    let temps: Vec<f64> = (0..hours).map(|i| start + i as f64).collect();
    let wind: Vec<f64> = (0..hours).map(|i| (i % 4) as f64).collect();
    let humidity: Vec<u32> = (0..hours).map(|_| 75).collect();

    serde_json::json!({
        "latitude": 22.5,
        "longitude": 88.375,
        "current": {"time": "2024-06-01T10:00", "temperature_2m": 30.0, "wind_speed_10m": 7.2},
        "hourly_units": {
            "temperature_2m": "°C",
            "wind_speed_10m": "km/h",
            "relative_humidity_2m": "%"
        },
        "hourly": {
            "time": time,
            "temperature_2m": temps,
            "wind_speed_10m": wind,
            "relative_humidity_2m": humidity
        }
    })
}

async fn mount_geocode(server: &MockServer, location: &str, lat: f64, lon: f64) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", location))
        .and(query_param("limit", "1"))
        .and(query_param("appid", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"name": location, "lat": lat, "lon": lon, "country": "IN"}
        ])))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current", "temperature_2m,wind_speed_10m"))
        .and(query_param("hourly", "temperature_2m,relative_humidity_2m,wind_speed_10m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn kolkata_scenario() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Kolkata", 22.57, 88.36).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "22.57"))
        .and(query_param("longitude", "88.36"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(24, 20.0)))
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();
    let report = pipeline.run(&query("Kolkata")).await.unwrap();

    assert_eq!(report.place.display_name(), "Kolkata, IN");
    assert_eq!(report.forecast.records.len(), 24);
    assert_eq!(report.forecast.records[0].hour, "00:00");
    assert_eq!(report.forecast.records[23].hour, "23:00");
    assert_eq!(report.forecast.stats.max_temp, Some(43.0));
    assert_eq!(report.forecast.stats.min_temp, Some(20.0));
    assert_eq!(report.forecast.stats.avg_humidity, Some(75.0));
    assert_eq!(report.forecast.stats.avg_wind_speed, Some(1.5));
    assert!(report.forecast.current.is_some());
}

#[tokio::test]
async fn long_series_is_cut_to_the_horizon() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Kolkata", 22.57, 88.36).await;
    mount_forecast(&server, forecast_body(168, -10.0)).await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();
    let report = pipeline.run(&query("Kolkata")).await.unwrap();

    let temps: Vec<f64> = report.forecast.records.iter().map(|r| r.temperature).collect();
    assert_eq!(temps.len(), weather_core::HORIZON);
    assert_eq!(temps.first(), Some(&-10.0));
    assert_eq!(temps.last(), Some(&13.0));
    assert_eq!(report.forecast.stats.min_temp, Some(-10.0));
}

#[tokio::test]
async fn empty_hourly_series_reports_no_data() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Kolkata", 22.57, 88.36).await;
    mount_forecast(&server, forecast_body(0, 0.0)).await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();
    let report = pipeline.run(&query("Kolkata")).await.unwrap();

    assert!(report.forecast.records.is_empty());
    let stats = report.forecast.stats;
    assert_eq!(
        (stats.max_temp, stats.min_temp, stats.avg_wind_speed, stats.avg_humidity),
        (None, None, None, None)
    );
}

#[tokio::test]
async fn zero_geocode_matches_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();

    let mut dash = Dashboard::new();
    let token = dash.begin(query("Atlantis"));
    let result = pipeline.run(&query("Atlantis")).await;
    assert!(matches!(result, Err(PipelineError::NotFound { .. })));

    assert_eq!(dash.complete(token, result), Completion::Applied);
    assert!(matches!(
        dash.status(),
        Status::Failed {
            kind: ErrorKind::NotFound,
            ..
        }
    ));
}

#[tokio::test]
async fn server_error_is_a_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key"}"#),
        )
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();
    let err = pipeline.run(&query("Kolkata")).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
    assert!(matches!(err, PipelineError::Status { status: 401, .. }));
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn malformed_forecast_is_a_network_failure() {
    let server = MockServer::start().await;
    mount_geocode(&server, "Kolkata", 22.57, 88.36).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let pipeline = Pipeline::from_config(&config_for(&server)).unwrap();
    let err = pipeline.run(&query("Kolkata")).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Decode {
            endpoint: "forecast",
            ..
        }
    ));
    assert_eq!(err.kind(), ErrorKind::NetworkFailure);
}
