//! # Domain Types
//!
//! Core domain types used throughout Bodega POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Domain Types                               │
//! │                                                                     │
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐        │
//! │  │   Product    │   │     Sale     │   │     Payment      │        │
//! │  │ ──────────── │   │ ──────────── │   │ ──────────────── │        │
//! │  │ id (UUID)    │   │ id (UUID)    │   │ id (UUID)        │        │
//! │  │ name         │◄──┤ rate_snapshot│◄──┤ sale_id (UNIQUE) │        │
//! │  │ price_cents  │ N │ total_cents  │0..1 method           │        │
//! │  │ stock        │   └──────┬───────┘   │ local/foreign    │        │
//! │  └──────────────┘          │ 1─N       └──────────────────┘        │
//! │                     ┌──────┴───────┐   ┌──────────────────┐        │
//! │                     │   SaleLine   │   │ RateObservation  │        │
//! │                     │ price frozen │   │ append-only log  │        │
//! │                     └──────────────┘   └──────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Rule
//! A sale copies — never references — the state it depends on: the exchange
//! rate in effect at creation and each line's effective unit price. Catalog
//! edits and new rate observations never reflow committed history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Discount Rate
// =============================================================================

/// Catalog discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 250 bps = 2.5%; integer storage keeps discount math exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// No discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies the discount to an amount, rounding the reduction half-up.
    pub fn apply(&self, amount: Money) -> Money {
        if self.is_zero() {
            return amount;
        }
        let reduction = (amount.cents() * self.0 as i64 + 5_000) / 10_000;
        Money::from_cents(amount.cents() - reduction)
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown to the cashier and on historical lines.
    pub name: String,

    /// Base price in foreign-currency cents.
    pub price_cents: i64,

    /// Catalog discount in basis points (0 = none).
    pub discount_bps: u32,

    /// Units on hand. Never negative.
    pub stock: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the base price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Returns the catalog discount.
    #[inline]
    pub fn discount(&self) -> DiscountRate {
        DiscountRate::from_bps(self.discount_bps)
    }

    /// The price a sale actually freezes: base price less discount.
    #[inline]
    pub fn effective_price(&self) -> Money {
        self.discount().apply(self.price())
    }

    /// Checks whether the requested quantity is on hand.
    ///
    /// Advisory only — the authoritative check is the conditional stock
    /// decrement inside the sale transaction.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Currency
// =============================================================================

/// Which of the two currencies an amount is denominated in.
///
/// The catalog is priced in `Foreign`; customers may tender either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// The volatile local currency.
    Local,
    /// The stable reference currency the catalog is priced in.
    Foreign,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Card on an external terminal.
    Card,
    /// Bank transfer.
    Transfer,
    /// Phone-number mobile payment.
    MobilePayment,
}

// =============================================================================
// Cart Item
// =============================================================================

/// One entry of a client-side cart, as submitted to the sale engine.
///
/// The cart itself (building state) lives in the frontend; the engine only
/// ever sees this finished list.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartItem {
    /// Product to sell.
    pub product_id: String,
    /// Units requested. Must be positive.
    pub quantity: i64,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
///
/// Immutable after the creating transaction; its lines carry the detail.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,
    /// Exchange rate copied at creation time. All currency math tied to
    /// this sale uses this value, never a live rate.
    pub rate_snapshot: f64,
    /// Total in foreign-currency cents; equals the sum of line subtotals.
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line
// =============================================================================

/// A line item of a sale.
/// Uses the snapshot pattern to freeze the unit price at sale time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Units sold.
    pub quantity: i64,
    /// Effective unit price at sale time (frozen), foreign-currency cents.
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents.
    pub subtotal_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// The payment settling a sale. At most one per sale.
///
/// Carries the tendered amount in both currencies, derived with the sale's
/// frozen rate snapshot at settlement time.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Payment {
    pub id: String,
    pub sale_id: String,
    pub method: PaymentMethod,
    /// Amount the customer handed over, in `tendered_currency` cents.
    pub tendered_cents: i64,
    /// Currency the customer physically paid in.
    pub tendered_currency: Currency,
    /// Tendered amount expressed in local-currency cents.
    pub local_cents: i64,
    /// Tendered amount expressed in foreign-currency cents.
    pub foreign_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Rate Observation
// =============================================================================

/// One point-in-time exchange-rate observation from a named source.
///
/// The log is append-only; repeated observations per source are expected
/// (polling) and consumers select the most recent per source.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RateObservation {
    pub id: i64,
    /// Source name, e.g. "official", "parallel", "crypto".
    pub source: String,
    /// Local-currency units per one foreign unit.
    pub rate: f64,
    #[ts(as = "String")]
    pub observed_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_rate_apply() {
        let price = Money::from_cents(1000);

        assert_eq!(DiscountRate::zero().apply(price).cents(), 1000);
        // 10% off 10.00 → 9.00
        assert_eq!(DiscountRate::from_bps(1000).apply(price).cents(), 900);
        // 2.5% off 10.00 → 9.75
        assert_eq!(DiscountRate::from_bps(250).apply(price).cents(), 975);
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 2.5% of 99 cents = 2.475 → reduction rounds to 2
        let discounted = DiscountRate::from_bps(250).apply(Money::from_cents(99));
        assert_eq!(discounted.cents(), 97);
    }

    #[test]
    fn test_effective_price() {
        let now = Utc::now();
        let product = Product {
            id: "p-1".to_string(),
            name: "Café molido 500g".to_string(),
            price_cents: 1200,
            discount_bps: 500,
            stock: 10,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        // 5% off 12.00 → 11.40
        assert_eq!(product.effective_price().cents(), 1140);
        assert!(product.can_sell(10));
        assert!(!product.can_sell(11));
    }
}
