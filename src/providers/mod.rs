pub mod exchange_rate;
pub mod polygon;

use crate::config::AppConfig;
use anyhow::Result;
use std::time::Duration;

/// Builds the live-rate source from the configured provider section.
pub fn spot_source(config: &AppConfig) -> Result<exchange_rate::ExchangeRateApi> {
    let (base_url, api_key) = config
        .providers
        .exchange_rate
        .as_ref()
        .map_or(("https://v6.exchangerate-api.com/v6", ""), |p| {
            (p.base_url.as_str(), p.api_key.as_str())
        });

    exchange_rate::ExchangeRateApi::new(
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
}

/// Builds the reference/historical source from the configured provider
/// section.
pub fn reference_source(config: &AppConfig) -> Result<polygon::Polygon> {
    let (base_url, api_key) = config
        .providers
        .polygon
        .as_ref()
        .map_or(("https://api.polygon.io", ""), |p| {
            (p.base_url.as_str(), p.api_key.as_str())
        });

    polygon::Polygon::new(
        base_url,
        api_key,
        Duration::from_secs(config.request_timeout_secs),
    )
}
