use std::collections::BTreeMap;

use crate::currency::DOMESTIC;

/// Label shown for a snapshot nothing was ever recorded for.
pub const NO_DATA_LABEL: &str = "no data";

/// Timestamp format of persisted observations. Sorts lexicographically.
pub const OBSERVED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One persisted quote: roubles per single unit of `code`.
#[derive(Debug, Clone, PartialEq)]
pub struct RateObservation {
    pub code: String,
    pub rate: f64,
    pub observed_at: String,
}

/// Rates used for every conversion of one session. Built once, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    rates: BTreeMap<String, f64>,
    observed_at: Option<String>,
}

impl RateSnapshot {
    pub fn new(rates: BTreeMap<String, f64>, observed_at: Option<String>) -> Self {
        Self { rates, observed_at }
    }

    /// The degenerate snapshot used when neither the feed nor the store has rates.
    pub fn domestic_only() -> Self {
        Self::new(BTreeMap::from([(DOMESTIC.to_string(), 1.0)]), None)
    }

    /// Adds the implicit `RUB = 1.0` entry, which is never fetched or stored.
    pub fn with_domestic(mut self) -> Self {
        self.rates.insert(DOMESTIC.to_string(), 1.0);
        self
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(code)
    }

    /// Entries sorted by currency code.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn observed_at(&self) -> Option<&str> {
        self.observed_at.as_deref()
    }

    pub fn label(&self) -> &str {
        self.observed_at.as_deref().unwrap_or(NO_DATA_LABEL)
    }
}

impl FromIterator<RateObservation> for RateSnapshot {
    fn from_iter<I: IntoIterator<Item = RateObservation>>(iter: I) -> Self {
        let mut observed_at = None;
        let rates = iter
            .into_iter()
            .map(|observation| {
                observed_at.get_or_insert(observation.observed_at);
                (observation.code, observation.rate)
            })
            .collect();
        Self { rates, observed_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn observation(code: &str, rate: f64) -> RateObservation {
        RateObservation {
            code: code.to_string(),
            rate,
            observed_at: "2026-10-15 09:30".to_string(),
        }
    }

    #[test]
    fn test_collect_from_observations() {
        let snapshot: RateSnapshot = vec![observation("USD", 81.5), observation("EUR", 94.1)]
            .into_iter()
            .collect();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.rate("USD"), Some(81.5));
        assert_eq!(snapshot.label(), "2026-10-15 09:30");
        assert_eq!(snapshot.codes().collect::<Vec<_>>(), vec!["EUR", "USD"]);
    }

    #[test]
    fn test_domestic_entry() {
        let snapshot: RateSnapshot = vec![observation("USD", 81.5)].into_iter().collect();
        let snapshot = snapshot.with_domestic();
        assert_eq!(snapshot.rate("RUB"), Some(1.0));

        let empty = RateSnapshot::domestic_only();
        assert_eq!(empty.len(), 1);
        assert_eq!(empty.label(), NO_DATA_LABEL);
    }
}
