//! # Report Repository
//!
//! The read-only reporting façade consumed by dashboards and the history
//! view. Nothing here writes; every number is derived from the same rows
//! the transaction core persisted, so reported totals always agree with
//! stored sales.
//!
//! Local-currency figures use each sale's frozen `rate_snapshot` — a rate
//! change after a sale never moves history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use bodega_core::PaymentMethod;

/// Products considered "running low" on the dashboard.
const LOW_STOCK_THRESHOLD: i64 = 10;

/// How many low-stock / top-seller rows the dashboard shows.
const DASHBOARD_LIST_LIMIT: u32 = 5;

// =============================================================================
// DTOs
// =============================================================================

/// One settled sale in the history listing.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryEntry {
    pub sale_id: String,
    pub total_cents: i64,
    pub rate_snapshot: f64,
    pub method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

/// A page of sale history plus the total settled-sale count.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleHistoryPage {
    pub items: Vec<SaleHistoryEntry>,
    pub total: i64,
}

/// One line of a sale, joined to the product's current display name.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetailLine {
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// Full detail of one sale for the history modal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub sale_id: String,
    pub total_cents: i64,
    pub rate_snapshot: f64,
    pub created_at: DateTime<Utc>,
    /// None while the sale is still unsettled.
    pub method: Option<PaymentMethod>,
    pub lines: Vec<SaleDetailLine>,
}

/// A product running low, for the restock nudge.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub name: String,
    pub stock: i64,
}

/// A top seller of the day.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub name: String,
    pub units_sold: i64,
}

/// Today's trading at a glance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Sales committed today.
    pub sale_count: i64,
    /// Units sold today across all lines.
    pub units_sold: i64,
    /// Today's revenue in foreign-currency cents.
    pub revenue_foreign_cents: i64,
    /// The same revenue in local-currency cents, via per-sale snapshots.
    pub revenue_local_cents: i64,
    pub low_stock: Vec<LowStockProduct>,
    pub top_products: Vec<TopProduct>,
}

// =============================================================================
// Repository
// =============================================================================

/// Read-only reporting queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Pages through settled sales, newest first.
    pub async fn sales_history(&self, page: u32, page_size: u32) -> DbResult<SaleHistoryPage> {
        let offset = page.saturating_sub(1) as i64 * page_size as i64;

        let items = sqlx::query_as::<_, SaleHistoryEntry>(
            r#"
            SELECT
                s.id AS sale_id,
                s.total_cents,
                s.rate_snapshot,
                p.method,
                s.created_at
            FROM sales s
            JOIN payments p ON p.sale_id = s.id
            ORDER BY s.created_at DESC, s.id DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page_size)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales s JOIN payments p ON p.sale_id = s.id",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SaleHistoryPage { items, total })
    }

    /// Full detail of one sale: header, settlement method, lines with
    /// product names.
    ///
    /// Line names come from a join to the product table — the reason
    /// referenced products can only be soft-disabled, never hard-deleted.
    pub async fn sale_details(&self, sale_id: &str) -> DbResult<SaleDetails> {
        #[derive(sqlx::FromRow)]
        struct Header {
            total_cents: i64,
            rate_snapshot: f64,
            created_at: DateTime<Utc>,
            method: Option<PaymentMethod>,
        }

        let header = sqlx::query_as::<_, Header>(
            r#"
            SELECT s.total_cents, s.rate_snapshot, s.created_at, p.method
            FROM sales s
            LEFT JOIN payments p ON p.sale_id = s.id
            WHERE s.id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Sale", sale_id))?;

        let lines = sqlx::query_as::<_, SaleDetailLine>(
            r#"
            SELECT
                p.name AS product_name,
                l.quantity,
                l.unit_price_cents,
                l.subtotal_cents
            FROM sale_lines l
            JOIN products p ON p.id = l.product_id
            WHERE l.sale_id = ?1
            ORDER BY l.created_at, l.id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(SaleDetails {
            sale_id: sale_id.to_string(),
            total_cents: header.total_cents,
            rate_snapshot: header.rate_snapshot,
            created_at: header.created_at,
            method: header.method,
            lines,
        })
    }

    /// Today's trading at a glance, for the dashboard.
    pub async fn daily_summary(&self) -> DbResult<DailySummary> {
        let sale_count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sales WHERE DATE(created_at) = DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        let units_sold: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(l.quantity)
            FROM sale_lines l
            JOIN sales s ON s.id = l.sale_id
            WHERE DATE(s.created_at) = DATE('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let revenue_foreign: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_cents) FROM sales WHERE DATE(created_at) = DATE('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        // Per-sale frozen snapshots, rounded once over the sum.
        let revenue_local: Option<f64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_cents * rate_snapshot)
            FROM sales
            WHERE DATE(created_at) = DATE('now')
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let low_stock = sqlx::query_as::<_, LowStockProduct>(
            r#"
            SELECT name, stock
            FROM products
            WHERE is_active = 1 AND stock < ?1
            ORDER BY stock, name
            LIMIT ?2
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .bind(DASHBOARD_LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        let top_products = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT p.name, SUM(l.quantity) AS units_sold
            FROM sale_lines l
            JOIN products p ON p.id = l.product_id
            JOIN sales s ON s.id = l.sale_id
            WHERE DATE(s.created_at) = DATE('now')
            GROUP BY l.product_id
            ORDER BY units_sold DESC
            LIMIT ?1
            "#,
        )
        .bind(DASHBOARD_LIST_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(DailySummary {
            sale_count,
            units_sold: units_sold.unwrap_or(0),
            revenue_foreign_cents: revenue_foreign.unwrap_or(0),
            revenue_local_cents: revenue_local.unwrap_or(0.0).round() as i64,
            low_stock,
            top_products,
        })
    }
}
