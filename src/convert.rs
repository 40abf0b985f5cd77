use crate::rate_source::SpotRateSource;
use anyhow::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub rate: f64,
    pub converted: f64,
}

/// Single-shot conversion: one request, multiply, done. No retry, no
/// caching.
pub async fn execute(
    source: &dyn SpotRateSource,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<Conversion> {
    let rate = source.current_rate(from, to).await?;
    Ok(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        rate,
        converted: amount * rate,
    })
}
