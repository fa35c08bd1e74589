//! # bodega-core: Pure Business Logic for Bodega POS
//!
//! This crate is the heart of Bodega POS. It contains all business logic
//! as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bodega POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                  Frontend (external collaborator)           │   │
//! │  │    Catalog UI ──► Cart UI ──► Billing UI ──► Dashboards     │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │ in-process request/response         │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ bodega-core (THIS CRATE) ★                  │   │
//! │  │                                                             │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌────────────┐       │   │
//! │  │   │  types  │ │  money  │ │  rates  │ │ validation │       │   │
//! │  │   │ Product │ │  Money  │ │ Policy  │ │   rules    │       │   │
//! │  │   │  Sale   │ │ FxRate  │ │ resolve │ │   checks   │       │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └────────────┘       │   │
//! │  │                                                             │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS        │   │
//! │  └────────────────────────────┬────────────────────────────────┘   │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐   │
//! │  │                  bodega-db (Storage Layer)                  │   │
//! │  │        SQLite, migrations, repositories, sale engine        │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Payment, RateObservation, …)
//! - [`money`] - Integer money plus the two-currency exchange math
//! - [`rates`] - Rate policies and their pure resolution
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`config`] - Typed store configuration
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: deterministic — same input, same output
//! 2. **No I/O**: database, network and file access are FORBIDDEN here
//! 3. **Integer Money**: stored amounts are cents (i64); fractional math is
//!    confined to `ExchangeRate`
//! 4. **Explicit Errors**: all errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod money;
pub mod rates;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use config::StoreConfig;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{ExchangeRate, Money};
pub use rates::{RatePolicy, RateQuote, SOURCE_CRYPTO, SOURCE_OFFICIAL, SOURCE_PARALLEL};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum items allowed in a single cart.
///
/// Prevents runaway carts and keeps a single transaction's write set
/// reasonable for one terminal.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in a cart.
///
/// Catches fat-finger entries (1000 instead of 10) before they reach the
/// stock ledger.
pub const MAX_ITEM_QUANTITY: i64 = 999;
