//! # bodega-db: Storage Layer for Bodega POS
//!
//! SQLite persistence for the sale/payment transaction core, via sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Bodega POS Data Flow                           │
//! │                                                                     │
//! │  Frontend request (list catalog, commit sale, settle payment, …)    │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  ┌─────────────────────────────────────────────────────────────┐   │
//! │  │                   bodega-db (THIS CRATE)                    │   │
//! │  │                                                             │   │
//! │  │   ┌────────────┐   ┌──────────────┐   ┌───────────────┐    │   │
//! │  │   │  Database  │   │ Repositories │   │  Migrations   │    │   │
//! │  │   │ (pool.rs)  │◄──│ product sale │   │  (embedded)   │    │   │
//! │  │   │ SqlitePool │   │ payment rate │   │ 001_init.sql  │    │   │
//! │  │   └────────────┘   │ report       │   └───────────────┘    │   │
//! │  │                    └──────────────┘                        │   │
//! │  │   feed.rs: RateFeed trait boundary to the external         │   │
//! │  │   rate collaborator (never fatal when it's down)           │   │
//! │  └─────────────────────────────────────────────────────────────┘   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │                    SQLite database (WAL mode)                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage error types
//! - [`repository`] - Repository implementations
//! - [`feed`] - The rate-feed trait boundary
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bodega_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("bodega.db")).await?;
//!
//! let page = db.products().list_for_sale(1, 8, Some("harina")).await?;
//! let sale = db.sales().create_sale(&cart, rate).await?;
//! db.payments().settle(&sale.id, method, tendered, currency).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod feed;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use feed::{refresh_rates, FeedError, RateFeed};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::payment::PaymentRepository;
pub use repository::product::ProductRepository;
pub use repository::rates::RateRepository;
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;
