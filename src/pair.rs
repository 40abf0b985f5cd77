use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid currency pair '{0}', expected the form USD/EUR")]
pub struct InvalidPair(String);

/// A currency pair in canonical `"FROM/TO"` form, both legs three
/// uppercase letters.
///
/// Parsing normalizes case and whitespace; deserialization goes through
/// the same validation, so a constructed `PairCode` is always canonical.
/// A degenerate pair with equal legs parses fine; callers that care
/// reject it at their own boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct PairCode(String);

impl PairCode {
    pub fn from_currency(&self) -> &str {
        &self.0[..3]
    }

    pub fn to_currency(&self) -> &str {
        &self.0[4..7]
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_leg(leg: &str) -> bool {
    leg.len() == 3 && leg.bytes().all(|b| b.is_ascii_uppercase())
}

impl FromStr for PairCode {
    type Err = InvalidPair;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let mut legs = code.split('/');
        match (legs.next(), legs.next(), legs.next()) {
            (Some(from), Some(to), None) if is_leg(from) && is_leg(to) => Ok(PairCode(code)),
            _ => Err(InvalidPair(s.to_string())),
        }
    }
}

impl TryFrom<String> for PairCode {
    type Error = InvalidPair;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for PairCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A watched currency pair. Never mutated in place; remove and re-add is
/// the only way to change its position in the watchlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackedPair {
    pub code: PairCode,
    pub display_name: String,
}

impl TrackedPair {
    pub fn new(code: PairCode, display_name: impl Into<String>) -> Self {
        TrackedPair {
            code,
            display_name: display_name.into(),
        }
    }
}

/// Seed pairs used when no watchlist has been persisted yet.
pub fn default_pairs() -> Vec<TrackedPair> {
    [
        ("EUR/USD", "Euro / US Dollar"),
        ("GBP/INR", "British Pound / Indian Rupee"),
        ("CAD/INR", "Canadian Dollar / Indian Rupee"),
    ]
    .into_iter()
    .map(|(code, name)| TrackedPair::new(code.parse().expect("default pair code"), name))
    .collect()
}
