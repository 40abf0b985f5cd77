use crate::pair::{PairCode, TrackedPair};
use crate::rate_source::{ReferenceRateSource, SpotRateSource};
use futures::future::join_all;
use tracing::debug;

/// Fresh quote for one tracked pair. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PairQuote {
    pub code: PairCode,
    pub display_name: String,
    pub rate: f64,
    /// Change against the previous close, rounded to two decimals.
    pub percent_change: f64,
}

/// A pair whose refresh failed. No partial numeric data is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct PairFailure {
    pub code: PairCode,
    pub display_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    Quote(PairQuote),
    Failure(PairFailure),
}

impl PairOutcome {
    pub fn code(&self) -> &PairCode {
        match self {
            PairOutcome::Quote(q) => &q.code,
            PairOutcome::Failure(f) => &f.code,
        }
    }

    pub fn succeeded(&self) -> bool {
        matches!(self, PairOutcome::Quote(_))
    }
}

/// Percent change of `current` against `reference`, rounded to two
/// decimals. A zero reference yields zero rather than a division fault.
pub fn percent_change(reference: f64, current: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    let change = (current - reference) / reference * 100.0;
    (change * 100.0).round() / 100.0
}

/// Refreshes every tracked pair against both sources.
///
/// Pairs fan out concurrently and independently; each pair joins its two
/// source calls before its outcome is emitted. One outcome per input
/// pair, in input order regardless of completion order. A failed source
/// call degrades that pair to a `PairFailure` and never aborts the rest
/// of the batch. No retries within a refresh cycle.
pub async fn refresh(
    spot: &dyn SpotRateSource,
    reference: &dyn ReferenceRateSource,
    pairs: &[TrackedPair],
) -> Vec<PairOutcome> {
    let fetches = pairs.iter().map(|pair| async move {
        let from = pair.code.from_currency();
        let to = pair.code.to_currency();

        let (current, previous) = tokio::join!(
            spot.current_rate(from, to),
            reference.reference_rate(from, to)
        );

        match (current, previous) {
            (Ok(rate), Ok(prev))
                if rate.is_finite() && rate > 0.0 && prev.is_finite() && prev >= 0.0 =>
            {
                PairOutcome::Quote(PairQuote {
                    code: pair.code.clone(),
                    display_name: pair.display_name.clone(),
                    rate,
                    percent_change: percent_change(prev, rate),
                })
            }
            (current, previous) => {
                if let Err(e) = &current {
                    debug!("Spot rate failed for {}: {e}", pair.code);
                }
                if let Err(e) = &previous {
                    debug!("Reference rate failed for {}: {e}", pair.code);
                }
                PairOutcome::Failure(PairFailure {
                    code: pair.code.clone(),
                    display_name: pair.display_name.clone(),
                })
            }
        }
    });

    join_all(fetches).await
}
