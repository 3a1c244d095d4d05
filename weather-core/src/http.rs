use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::PipelineError;

const USER_AGENT: &str = concat!("weather-dash/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> anyhow::Result<Client> {
    use anyhow::Context;

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")
}

/// Send a GET request and decode the JSON body, mapping every failure onto
/// [`PipelineError`].
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    endpoint: &'static str,
    url: &str,
    query: &[(&str, &str)],
) -> Result<T, PipelineError> {
    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| PipelineError::Request { endpoint, source })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|source| PipelineError::Request { endpoint, source })?;

    if !status.is_success() {
        return Err(PipelineError::Status {
            endpoint,
            status: status.as_u16(),
            body: truncate_body(&body),
        });
    }

    serde_json::from_str(&body).map_err(|source| PipelineError::Decode { endpoint, source })
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
