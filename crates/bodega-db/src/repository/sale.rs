//! # Sale Repository
//!
//! The sale transaction engine: converts a finished cart into a durable
//! sale record, its lines, and the matching stock decrements — as one
//! atomic unit.
//!
//! ## The Atomic Unit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  create_sale(cart, rate_snapshot)                                   │
//! │                                                                     │
//! │  validate cart + rate          ← outside the transaction; a         │
//! │       │                          rejected sale leaves zero rows     │
//! │       ▼                                                             │
//! │  BEGIN ─────────────────────────────────────────────────────┐       │
//! │  │  INSERT sale header (timestamp, frozen rate, total 0)    │       │
//! │  │  for each cart item:                                     │       │
//! │  │     re-read product        → missing? abort everything   │       │
//! │  │     INSERT line (frozen effective price, subtotal)       │       │
//! │  │     conditional decrement  → short? abort everything     │       │
//! │  │  UPDATE header total = Σ line subtotals                  │       │
//! │  COMMIT ────────────────────────────────────────────────────┘       │
//! │                                                                     │
//! │  Any failure inside the unit rolls the whole thing back:            │
//! │  no sale, no lines, no stock change survive a partial failure.      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! The rate and each line's unit price are copied — not referenced — so
//! historical totals stay stable when the catalog or the rate log moves on.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::product::decrement_stock;
use bodega_core::validation::{validate_cart, validate_rate_snapshot};
use bodega_core::{CartItem, CoreError, Money, Product, Sale, SaleLine};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a cart as a sale. The central write path of the system.
    ///
    /// ## Arguments
    /// * `cart` - finished cart lines (product + positive quantity)
    /// * `rate_snapshot` - the exchange rate resolved by the caller before
    ///   this call; frozen into the sale for all later currency math
    ///
    /// ## Errors
    /// * `Domain(Validation(_))` - empty cart, bad quantity, bad rate;
    ///   raised before the transaction opens
    /// * `Domain(ProductNotFound)` - any cart item pointing nowhere
    /// * `Domain(InsufficientStock)` - conditional decrement found fewer
    ///   units than requested at the commit instant
    /// * `TransactionFailed` - the unit could not commit
    ///
    /// On any error, zero rows persist.
    pub async fn create_sale(&self, cart: &[CartItem], rate_snapshot: f64) -> DbResult<Sale> {
        validate_cart(cart).map_err(CoreError::from)?;
        validate_rate_snapshot(rate_snapshot).map_err(CoreError::from)?;

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(sale_id = %sale_id, items = cart.len(), rate = rate_snapshot, "Opening sale");

        // Everything below is one unit; an early return drops the
        // transaction, which rolls it back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO sales (id, rate_snapshot, total_cents, created_at)
            VALUES (?1, ?2, 0, ?3)
            "#,
        )
        .bind(&sale_id)
        .bind(rate_snapshot)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let mut total = Money::zero();

        for item in cart {
            // Re-read inside the unit: the price frozen into the line is
            // the price at commit time, not at cart-building time.
            let product = sqlx::query_as::<_, Product>(
                r#"
                SELECT id, name, price_cents, discount_bps, stock,
                       is_active, created_at, updated_at
                FROM products
                WHERE id = ?1
                "#,
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;

            let unit_price = product.effective_price();
            let subtotal = unit_price.times(item.quantity);

            sqlx::query(
                r#"
                INSERT INTO sale_lines (
                    id, sale_id, product_id, quantity,
                    unit_price_cents, subtotal_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&product.id)
            .bind(item.quantity)
            .bind(unit_price.cents())
            .bind(subtotal.cents())
            .bind(now)
            .execute(&mut *tx)
            .await?;

            // The guarded UPDATE is the authoritative availability check;
            // a racing sale that got there first makes this return false.
            if !decrement_stock(&mut *tx, &product.id, item.quantity).await? {
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock,
                    requested: item.quantity,
                }
                .into());
            }

            total += subtotal;
        }

        sqlx::query("UPDATE sales SET total_cents = ?2 WHERE id = ?1")
            .bind(&sale_id)
            .bind(total.cents())
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale_id,
            total_cents = total.cents(),
            lines = cart.len(),
            "Sale committed"
        );

        Ok(Sale {
            id: sale_id,
            rate_snapshot,
            total_cents: total.cents(),
            created_at: now,
        })
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, rate_snapshot, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets all lines of a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let lines = sqlx::query_as::<_, SaleLine>(
            r#"
            SELECT id, sale_id, product_id, quantity,
                   unit_price_cents, subtotal_cents, created_at
            FROM sale_lines
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Counts all committed sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
