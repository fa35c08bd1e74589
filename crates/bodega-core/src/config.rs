//! # Store Configuration
//!
//! Typed configuration loaded at startup.
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.
//! If hot-reloading is added later, we'd wrap in `RwLock`.
//!
//! ## Persistence
//! Where the values come from (file, env, settings table) is the host
//! application's affair; this crate only defines the shape and defaults.

use serde::{Deserialize, Serialize};

use crate::rates::RatePolicy;

/// Application configuration.
///
/// The two rate policies are deliberately independent: the shelf-price
/// screen and the billing screen may follow different markets, and both
/// may be pinned to a fixed override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Store name (displayed on receipts).
    pub store_name: String,

    /// ISO 4217 code of the local currency.
    pub local_currency_code: String,

    /// ISO 4217 code of the foreign reference currency.
    pub foreign_currency_code: String,

    /// Rate policy used when displaying catalog prices in local currency.
    pub pricing_policy: RatePolicy,

    /// Rate policy used to snapshot a rate into a new sale.
    pub billing_policy: RatePolicy,
}

impl Default for StoreConfig {
    /// Defaults suitable for development.
    fn default() -> Self {
        StoreConfig {
            store_name: "Bodega Dev Store".to_string(),
            local_currency_code: "VES".to_string(),
            foreign_currency_code: "USD".to_string(),
            pricing_policy: RatePolicy::default(),
            billing_policy: RatePolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::RatePolicy;

    #[test]
    fn test_config_round_trips_through_json() {
        let config = StoreConfig {
            billing_policy: RatePolicy::Fixed { value: 40.0 },
            ..StoreConfig::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: StoreConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(back.billing_policy, RatePolicy::Fixed { value: 40.0 });
        assert_eq!(back.store_name, "Bodega Dev Store");
    }
}
