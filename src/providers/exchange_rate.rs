use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::rate_source::SpotRateSource;

/// Client for the exchangerate-api.com v6 pair endpoint.
pub struct ExchangeRateApi {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeRateApi {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxwatch/0.1")
            .timeout(timeout)
            .build()?;
        Ok(ExchangeRateApi {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }
}

#[derive(Deserialize, Debug)]
struct PairResponse {
    result: String,
    conversion_rate: Option<f64>,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
}

#[async_trait]
impl SpotRateSource for ExchangeRateApi {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(from = %from, to = %to)
    )]
    async fn current_rate(&self, from: &str, to: &str) -> Result<f64> {
        let url = format!("{}/{}/pair/{}/{}", self.base_url, self.api_key, from, to);
        debug!("Requesting current rate for {from}/{to}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for pair: {}/{}", e, from, to))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for pair: {}/{}",
                response.status(),
                from,
                to
            ));
        }

        let data = response
            .json::<PairResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse response for {}/{}: {}", from, to, e))?;

        if data.result != "success" {
            return Err(anyhow!(
                "API error: {} for pair: {}/{}",
                data.error_type.as_deref().unwrap_or("unknown"),
                from,
                to
            ));
        }

        let rate = data
            .conversion_rate
            .ok_or_else(|| anyhow!("No conversion rate in response for pair: {}/{}", from, to))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(anyhow!("Unusable rate {} for pair: {}/{}", rate, from, to));
        }

        Ok(rate)
    }
}
