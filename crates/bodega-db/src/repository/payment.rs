//! # Payment Repository
//!
//! Payment reconciliation: records the single payment that settles a sale,
//! expressed in both currencies through the sale's frozen rate snapshot.
//!
//! ## Frozen Rate, Not Live Rate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  Day 1  sale committed       rate_snapshot = 36.0                   │
//! │  Day 3  rates move           official now 39.5                      │
//! │  Day 3  customer pays                                               │
//! │             └── conversion uses 36.0 — the sale's snapshot —        │
//! │                 so what they owe is what the receipt said           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tendered local  → foreign equivalent = amount / snapshot
//! Tendered foreign → local equivalent  = amount × snapshot

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::validation::validate_tendered_amount;
use bodega_core::{CoreError, Currency, ExchangeRate, Money, Payment, PaymentMethod, Sale};

/// A committed sale still waiting for its payment — the billing queue.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UnsettledSale {
    pub sale_id: String,
    /// Foreign-currency cents owed.
    pub total_cents: i64,
    pub created_at: chrono::DateTime<Utc>,
}

/// Repository for payment database operations.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    pool: SqlitePool,
}

impl PaymentRepository {
    /// Creates a new PaymentRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PaymentRepository { pool }
    }

    /// Settles a sale with a single payment.
    ///
    /// ## Arguments
    /// * `sale_id` - the sale being paid
    /// * `method` - how the customer paid
    /// * `tendered` - the amount handed over, in `currency` cents
    /// * `currency` - which of the two currencies was tendered
    ///
    /// ## Errors
    /// * `Domain(SaleNotFound)` - no such sale
    /// * `Domain(SaleAlreadySettled)` - a payment already exists
    /// * `Domain(PaymentBelowTotal)` - the tender, converted with the
    ///   frozen snapshot, does not cover the sale total (overpayment is
    ///   recorded as given; change is the caller's affair)
    /// * `TransactionFailed` - the unit could not commit
    ///
    /// On any error, no payment row persists.
    pub async fn settle(
        &self,
        sale_id: &str,
        method: PaymentMethod,
        tendered: Money,
        currency: Currency,
    ) -> DbResult<Payment> {
        validate_tendered_amount(tendered.cents()).map_err(CoreError::from)?;

        debug!(sale_id = %sale_id, tendered = tendered.cents(), ?currency, "Settling sale");

        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, rate_snapshot, total_cents, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE sale_id = ?1")
            .bind(sale_id)
            .fetch_one(&mut *tx)
            .await?;

        if existing > 0 {
            return Err(CoreError::SaleAlreadySettled(sale_id.to_string()).into());
        }

        // The sale's snapshot, never a live rate.
        let rate = ExchangeRate::new(sale.rate_snapshot).map_err(CoreError::from)?;

        let (local, foreign) = match currency {
            Currency::Local => (tendered, rate.to_foreign(tendered)),
            Currency::Foreign => (rate.to_local(tendered), tendered),
        };

        if foreign.cents() < sale.total_cents {
            return Err(CoreError::PaymentBelowTotal {
                total_cents: sale.total_cents,
                tendered_cents: foreign.cents(),
            }
            .into());
        }

        let payment = Payment {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.to_string(),
            method,
            tendered_cents: tendered.cents(),
            tendered_currency: currency,
            local_cents: local.cents(),
            foreign_cents: foreign.cents(),
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO payments (
                id, sale_id, method, tendered_cents, tendered_currency,
                local_cents, foreign_cents, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.sale_id)
        .bind(payment.method)
        .bind(payment.tendered_cents)
        .bind(payment.tendered_currency)
        .bind(payment.local_cents)
        .bind(payment.foreign_cents)
        .bind(payment.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            sale_id = %sale_id,
            payment_id = %payment.id,
            local_cents = payment.local_cents,
            foreign_cents = payment.foreign_cents,
            "Payment recorded"
        );

        Ok(payment)
    }

    /// Gets the payment for a sale, if it has been settled.
    pub async fn get_for_sale(&self, sale_id: &str) -> DbResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, sale_id, method, tendered_cents, tendered_currency,
                   local_cents, foreign_cents, created_at
            FROM payments
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    /// Lists committed sales that have no payment yet, oldest first.
    pub async fn unsettled_sales(&self) -> DbResult<Vec<UnsettledSale>> {
        let sales = sqlx::query_as::<_, UnsettledSale>(
            r#"
            SELECT s.id AS sale_id, s.total_cents, s.created_at
            FROM sales s
            LEFT JOIN payments p ON p.sale_id = s.id
            WHERE p.id IS NULL
            ORDER BY s.created_at, s.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }
}
