//! # Rate Policies
//!
//! Pure resolution of "the" exchange rate from per-source observations.
//!
//! ## Sources
//! The store follows several named feeds of the same underlying currency
//! pair — an official rate, a parallel-market rate, and a crypto-referenced
//! rate. They disagree, sometimes widely, so which one a given screen uses
//! is a configuration decision (`RatePolicy`), not a constant.
//!
//! ## Degraded Mode
//! A source that has never reported contributes 0 to an average and
//! resolves to 0 on its own. Staleness or emptiness of the rate store is
//! never an error here — callers get a number and decide what a zero means
//! for them (the sale engine, for one, refuses to open against it).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Well-Known Sources
// =============================================================================

/// The central-bank rate.
pub const SOURCE_OFFICIAL: &str = "official";

/// The parallel-market rate.
pub const SOURCE_PARALLEL: &str = "parallel";

/// The crypto-referenced rate.
pub const SOURCE_CRYPTO: &str = "crypto";

// =============================================================================
// Rate Quote
// =============================================================================

/// A (source, value) pair — the unit of feed output and of rate recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateQuote {
    /// Source name, e.g. "official".
    pub source: String,
    /// Local-currency units per one foreign unit.
    pub value: f64,
}

impl RateQuote {
    /// Convenience constructor.
    pub fn new(source: impl Into<String>, value: f64) -> Self {
        RateQuote {
            source: source.into(),
            value,
        }
    }
}

// =============================================================================
// Rate Policy
// =============================================================================

/// How to collapse the per-source observations into one usable rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RatePolicy {
    /// Follow a single named source.
    Single { source: String },

    /// Average of two named sources; a missing source counts as zero.
    Average { sources: [String; 2] },

    /// A user-specified fixed override; ignores the store entirely.
    Fixed { value: f64 },
}

impl RatePolicy {
    /// Official rate only.
    pub fn official() -> Self {
        RatePolicy::Single {
            source: SOURCE_OFFICIAL.to_string(),
        }
    }

    /// Parallel-market rate only.
    pub fn parallel() -> Self {
        RatePolicy::Single {
            source: SOURCE_PARALLEL.to_string(),
        }
    }

    /// Average of the official and crypto-referenced rates — the house
    /// compromise between the two markets.
    pub fn reference_average() -> Self {
        RatePolicy::Average {
            sources: [SOURCE_OFFICIAL.to_string(), SOURCE_CRYPTO.to_string()],
        }
    }

    /// Resolves the policy against the latest quote per source.
    ///
    /// `latest` is expected to hold at most one quote per source (the most
    /// recent); extra entries for a source are ignored beyond the first.
    /// Missing sources resolve to 0.0 rather than failing.
    pub fn resolve(&self, latest: &[RateQuote]) -> f64 {
        let lookup = |name: &str| {
            latest
                .iter()
                .find(|q| q.source == name)
                .map(|q| q.value)
                .unwrap_or(0.0)
        };

        match self {
            RatePolicy::Single { source } => lookup(source),
            RatePolicy::Average { sources } => (lookup(&sources[0]) + lookup(&sources[1])) / 2.0,
            RatePolicy::Fixed { value } => *value,
        }
    }
}

impl Default for RatePolicy {
    /// The reference average, matching the sale screen's default.
    fn default() -> Self {
        RatePolicy::reference_average()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn quotes() -> Vec<RateQuote> {
        vec![
            RateQuote::new(SOURCE_OFFICIAL, 36.0),
            RateQuote::new(SOURCE_PARALLEL, 40.0),
            RateQuote::new(SOURCE_CRYPTO, 38.0),
        ]
    }

    #[test]
    fn test_single_source() {
        assert_eq!(RatePolicy::official().resolve(&quotes()), 36.0);
        assert_eq!(RatePolicy::parallel().resolve(&quotes()), 40.0);
    }

    #[test]
    fn test_reference_average() {
        // (official 36.0 + crypto 38.0) / 2
        assert_eq!(RatePolicy::reference_average().resolve(&quotes()), 37.0);
    }

    #[test]
    fn test_missing_source_counts_as_zero() {
        let only_official = vec![RateQuote::new(SOURCE_OFFICIAL, 36.0)];

        assert_eq!(RatePolicy::parallel().resolve(&only_official), 0.0);
        // Average still divides by two with the missing side at zero.
        assert_eq!(
            RatePolicy::reference_average().resolve(&only_official),
            18.0
        );
    }

    #[test]
    fn test_empty_store_resolves_to_zero() {
        assert_eq!(RatePolicy::official().resolve(&[]), 0.0);
        assert_eq!(RatePolicy::reference_average().resolve(&[]), 0.0);
    }

    #[test]
    fn test_fixed_ignores_store() {
        let policy = RatePolicy::Fixed { value: 42.5 };
        assert_eq!(policy.resolve(&quotes()), 42.5);
        assert_eq!(policy.resolve(&[]), 42.5);
    }
}
