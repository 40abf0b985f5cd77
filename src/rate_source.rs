use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// A dated closing rate, as returned by historical series lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// Source of live conversion rates.
#[async_trait]
pub trait SpotRateSource: Send + Sync {
    async fn current_rate(&self, from: &str, to: &str) -> Result<f64>;
}

/// Source of historical baselines: previous close, trailing series and
/// single-date lookups.
#[async_trait]
pub trait ReferenceRateSource: Send + Sync {
    /// Previous trading day's close for the pair.
    async fn reference_rate(&self, from: &str, to: &str) -> Result<f64>;

    /// Daily closes for the trailing `days` window, oldest first.
    async fn historical_series(&self, from: &str, to: &str, days: u32) -> Result<Vec<RatePoint>>;

    async fn rate_on_date(&self, from: &str, to: &str, date: NaiveDate) -> Result<f64>;
}
