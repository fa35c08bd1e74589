//! # Repository Module
//!
//! Database repository implementations for Bodega POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  The Repository pattern keeps SQL behind a typed API.               │
//! │                                                                     │
//! │  Caller                                                             │
//! │    │   db.sales().create_sale(&cart, rate)                          │
//! │    ▼                                                                │
//! │  SaleRepository ── one transaction ──► SQLite                       │
//! │                                                                     │
//! │  Benefits:                                                          │
//! │  • SQL is isolated in one place per entity                          │
//! │  • Row → struct mapping is typed (sqlx::FromRow), never dynamic     │
//! │  • The atomic units have exactly one owner each                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Inventory ledger: catalog + stock
//! - [`sale::SaleRepository`] - The sale transaction engine
//! - [`payment::PaymentRepository`] - Payment reconciliation
//! - [`rates::RateRepository`] - Exchange-rate observation store
//! - [`report::ReportRepository`] - Read-only reporting façade

pub mod payment;
pub mod product;
pub mod rates;
pub mod report;
pub mod sale;
