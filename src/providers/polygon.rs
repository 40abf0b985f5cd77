use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::rate_source::{RatePoint, ReferenceRateSource};

/// Client for the polygon.io forex aggregates endpoints.
pub struct Polygon {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl Polygon {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxwatch/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Polygon {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    fn ticker(from: &str, to: &str) -> String {
        format!("C:{from}{to}")
    }

    /// Single fetch routine shared by every aggregates endpoint.
    async fn fetch_aggs(&self, endpoint: &str, pair: &str) -> Result<Vec<AggWindow>> {
        let sep = if endpoint.contains('?') { '&' } else { '?' };
        let url = format!(
            "{}{}{}apiKey={}",
            self.base_url, endpoint, sep, self.api_key
        );
        debug!("Requesting aggregates from {endpoint}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for pair: {}", e, pair))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for pair: {}",
                response.status(),
                pair
            ));
        }

        let data = response
            .json::<AggResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse response for {}: {}", pair, e))?;

        Ok(data.results.unwrap_or_default())
    }
}

#[derive(Deserialize, Debug)]
struct AggWindow {
    /// Closing rate of the window.
    c: f64,
    /// Window start, unix milliseconds.
    t: i64,
}

#[derive(Deserialize, Debug)]
struct AggResponse {
    results: Option<Vec<AggWindow>>,
}

fn window_date(window: &AggWindow) -> Option<NaiveDate> {
    Utc.timestamp_millis_opt(window.t)
        .single()
        .map(|dt| dt.date_naive())
}

#[async_trait]
impl ReferenceRateSource for Polygon {
    #[instrument(
        name = "PolygonPrevClose",
        skip(self),
        fields(from = %from, to = %to)
    )]
    async fn reference_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pair = format!("{from}/{to}");
        let endpoint = format!(
            "/v2/aggs/ticker/{}/prev?adjusted=true",
            Self::ticker(from, to)
        );

        let windows = self.fetch_aggs(&endpoint, &pair).await?;
        let close = windows
            .first()
            .map(|w| w.c)
            .ok_or_else(|| anyhow!("No previous close for pair: {pair}"))?;

        if !close.is_finite() || close < 0.0 {
            return Err(anyhow!("Unusable previous close {close} for pair: {pair}"));
        }
        Ok(close)
    }

    async fn historical_series(&self, from: &str, to: &str, days: u32) -> Result<Vec<RatePoint>> {
        let pair = format!("{from}/{to}");
        let end = Utc::now().date_naive();
        let start = end - ChronoDuration::days(i64::from(days));
        let endpoint = format!(
            "/v2/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&limit={}",
            Self::ticker(from, to),
            start,
            end,
            days
        );

        let windows = self.fetch_aggs(&endpoint, &pair).await?;
        Ok(windows
            .iter()
            .filter_map(|w| {
                window_date(w).map(|date| RatePoint {
                    date,
                    rate: w.c,
                })
            })
            .collect())
    }

    async fn rate_on_date(&self, from: &str, to: &str, date: NaiveDate) -> Result<f64> {
        let pair = format!("{from}/{to}");
        let endpoint = format!(
            "/v2/aggs/ticker/{}/range/1/day/{}/{}?adjusted=true&sort=asc&limit=1",
            Self::ticker(from, to),
            date,
            date
        );

        let windows = self.fetch_aggs(&endpoint, &pair).await?;
        windows
            .first()
            .map(|w| w.c)
            .ok_or_else(|| anyhow!("No data for pair {pair} on {date}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(base_url: &str) -> Polygon {
        Polygon::new(base_url, "poly-key", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_previous_close_fetch() {
        let mock_server = MockServer::start().await;
        let body = r#"{"resultsCount": 1, "results": [{"c": 1.0732, "t": 1719446400000}]}"#;

        Mock::given(method("GET"))
            .and(path("/v2/aggs/ticker/C:EURUSD/prev"))
            .and(query_param("apiKey", "poly-key"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let rate = provider(&mock_server.uri())
            .reference_rate("EUR", "USD")
            .await
            .unwrap();
        assert_eq!(rate, 1.0732);
    }

    #[tokio::test]
    async fn test_previous_close_empty_results() {
        let mock_server = MockServer::start().await;
        let body = r#"{"resultsCount": 0, "results": []}"#;

        Mock::given(method("GET"))
            .and(path("/v2/aggs/ticker/C:EURUSD/prev"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri())
            .reference_rate("EUR", "USD")
            .await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "No previous close for pair: EUR/USD"
        );
    }

    #[tokio::test]
    async fn test_previous_close_missing_results_field() {
        let mock_server = MockServer::start().await;
        let body = r#"{"status": "DELAYED"}"#;

        Mock::given(method("GET"))
            .and(path("/v2/aggs/ticker/C:EURUSD/prev"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri())
            .reference_rate("EUR", "USD")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_previous_close_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/aggs/ticker/C:EURUSD/prev"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server.uri())
            .reference_rate("EUR", "USD")
            .await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 403 Forbidden for pair: EUR/USD"
        );
    }

    #[tokio::test]
    async fn test_historical_series_maps_windows_to_dated_points() {
        let mock_server = MockServer::start().await;
        // 2024-06-25 and 2024-06-26, midnight UTC.
        let body = r#"{"results": [
            {"c": 1.0711, "t": 1719273600000},
            {"c": 1.0732, "t": 1719360000000}
        ]}"#;

        Mock::given(method("GET"))
            .and(wiremock::matchers::path_regex(
                r"^/v2/aggs/ticker/C:EURUSD/range/1/day/.*",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let series = provider(&mock_server.uri())
            .historical_series("EUR", "USD", 7)
            .await
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series[0].date,
            NaiveDate::from_ymd_opt(2024, 6, 25).unwrap()
        );
        assert_eq!(series[0].rate, 1.0711);
        assert_eq!(
            series[1].date,
            NaiveDate::from_ymd_opt(2024, 6, 26).unwrap()
        );
    }

    #[tokio::test]
    async fn test_rate_on_date() {
        let mock_server = MockServer::start().await;
        let body = r#"{"results": [{"c": 1.0698, "t": 1719273600000}]}"#;

        Mock::given(method("GET"))
            .and(path(
                "/v2/aggs/ticker/C:EURUSD/range/1/day/2024-06-25/2024-06-25",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 6, 25).unwrap();
        let rate = provider(&mock_server.uri())
            .rate_on_date("EUR", "USD", date)
            .await
            .unwrap();
        assert_eq!(rate, 1.0698);
    }

    #[tokio::test]
    async fn test_rate_on_date_no_data() {
        let mock_server = MockServer::start().await;
        let body = r#"{"results": []}"#;

        Mock::given(method("GET"))
            .and(path(
                "/v2/aggs/ticker/C:EURUSD/range/1/day/2024-06-23/2024-06-23",
            ))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let date = NaiveDate::from_ymd_opt(2024, 6, 23).unwrap();
        let result = provider(&mock_server.uri())
            .rate_on_date("EUR", "USD", date)
            .await;
        assert!(result.is_err());
    }
}
