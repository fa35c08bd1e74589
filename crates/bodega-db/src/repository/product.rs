//! # Product Repository
//!
//! The inventory ledger: catalog CRUD plus the stock-decrement primitive
//! used by the sale engine.
//!
//! ## Two Listings, Two Orders
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  list_for_sale   active AND in stock, ordered by name               │
//! │                  → what the cashier can actually sell               │
//! │                                                                     │
//! │  list_catalog    everything, newest first                           │
//! │                  → what the manager edits                           │
//! │                                                                     │
//! │  Both carry a stable secondary order (id) so pagination is          │
//! │  deterministic, and both return a total count for the pager.        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stock Decrements
//! `decrement_stock` is crate-private and transaction-scoped: only the sale
//! engine may call it, inside its atomic unit. A standalone decrement would
//! reopen the lost-update race this design exists to close.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use bodega_core::validation::{validate_price_cents, validate_product_name, validate_search_term};
use bodega_core::{CoreError, Product, ValidationError};

/// Page size of the cashier-facing product listing.
pub const SALE_PAGE_SIZE: u32 = 8;

/// Page size of the management catalog listing.
pub const CATALOG_PAGE_SIZE: u32 = 7;

/// One page of products plus the filtered total, for pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub items: Vec<Product>,
    /// Total matching rows across all pages.
    pub total: i64,
}

impl ProductPage {
    /// Number of pages at the given page size.
    pub fn total_pages(&self, page_size: u32) -> i64 {
        if page_size == 0 {
            return 0;
        }
        (self.total + page_size as i64 - 1) / page_size as i64
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists sellable products: active, in stock, optionally filtered by a
    /// case-insensitive substring of the name.
    ///
    /// Ordered by name (then id, for deterministic pagination). Pages are
    /// 1-based.
    pub async fn list_for_sale(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> DbResult<ProductPage> {
        let term = normalize_search(search).map_err(CoreError::from)?;
        let offset = page_offset(page, page_size);

        debug!(page = page, search = ?term, "Listing sellable products");

        // Fixed statement per filter combination; the term only ever
        // travels as a bound parameter.
        let (items, total) = match &term {
            Some(term) => {
                let pattern = like_pattern(term);
                let items = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, discount_bps, stock,
                           is_active, created_at, updated_at
                    FROM products
                    WHERE is_active = 1 AND stock > 0 AND name LIKE ?1
                    ORDER BY name, id
                    LIMIT ?2 OFFSET ?3
                    "#,
                )
                .bind(&pattern)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM products \
                     WHERE is_active = 1 AND stock > 0 AND name LIKE ?1",
                )
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;

                (items, total)
            }
            None => {
                let items = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, discount_bps, stock,
                           is_active, created_at, updated_at
                    FROM products
                    WHERE is_active = 1 AND stock > 0
                    ORDER BY name, id
                    LIMIT ?1 OFFSET ?2
                    "#,
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar(
                    "SELECT COUNT(*) FROM products WHERE is_active = 1 AND stock > 0",
                )
                .fetch_one(&self.pool)
                .await?;

                (items, total)
            }
        };

        Ok(ProductPage { items, total })
    }

    /// Lists the full catalog for management, newest first, optionally
    /// filtered by name. Includes disabled and out-of-stock products.
    pub async fn list_catalog(
        &self,
        page: u32,
        page_size: u32,
        search: Option<&str>,
    ) -> DbResult<ProductPage> {
        let term = normalize_search(search).map_err(CoreError::from)?;
        let offset = page_offset(page, page_size);

        debug!(page = page, search = ?term, "Listing catalog");

        let (items, total) = match &term {
            Some(term) => {
                let pattern = like_pattern(term);
                let items = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, discount_bps, stock,
                           is_active, created_at, updated_at
                    FROM products
                    WHERE name LIKE ?1
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?2 OFFSET ?3
                    "#,
                )
                .bind(&pattern)
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 =
                    sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE name LIKE ?1")
                        .bind(&pattern)
                        .fetch_one(&self.pool)
                        .await?;

                (items, total)
            }
            None => {
                let items = sqlx::query_as::<_, Product>(
                    r#"
                    SELECT id, name, price_cents, discount_bps, stock,
                           is_active, created_at, updated_at
                    FROM products
                    ORDER BY created_at DESC, id DESC
                    LIMIT ?1 OFFSET ?2
                    "#,
                )
                .bind(page_size)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

                let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?;

                (items, total)
            }
        };

        Ok(ProductPage { items, total })
    }

    /// Gets a product by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, price_cents, discount_bps, stock,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Creates a new product and returns it.
    pub async fn create(
        &self,
        name: &str,
        price_cents: i64,
        stock: i64,
        discount_bps: u32,
    ) -> DbResult<Product> {
        validate_product_name(name).map_err(CoreError::from)?;
        validate_price_cents(price_cents).map_err(CoreError::from)?;
        if stock < 0 {
            return Err(CoreError::from(ValidationError::MustBePositive {
                field: "stock".to_string(),
            })
            .into());
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            price_cents,
            discount_bps,
            stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, price_cents, discount_bps, stock,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.discount_bps)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(product)
    }

    /// Updates a product's catalog fields (name, price, stock, discount).
    ///
    /// This is the management edit path; the `stock` written here is an
    /// absolute correction, not a sale decrement.
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        validate_product_name(&product.name).map_err(CoreError::from)?;
        validate_price_cents(product.price_cents).map_err(CoreError::from)?;

        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                discount_bps = ?4,
                stock = ?5,
                is_active = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(product.discount_bps)
        .bind(product.stock)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Soft-disables a product (is_active = false).
    ///
    /// ## Why Soft Disable?
    /// - Historical sale lines still reference this product
    /// - Can be restored if disabled by mistake
    pub async fn soft_disable(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-disabling product");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
                .bind(id)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Hard-deletes a product, refusing while sale history references it.
    ///
    /// Historical line display joins back to this table for product names;
    /// deleting a referenced row would orphan those joins. The explicit
    /// count gives a clean error; the foreign key constraint is the
    /// backstop. Use [`soft_disable`](Self::soft_disable) instead for
    /// anything that has ever been sold.
    pub async fn hard_delete(&self, id: &str) -> DbResult<()> {
        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sale_lines WHERE product_id = ?1")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;

        if references > 0 {
            return Err(DbError::referenced(format!(
                "product {} appears in {} sale line(s); disable it instead",
                id, references
            )));
        }

        debug!(id = %id, "Hard-deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Adds delivered units to stock.
    pub async fn restock(&self, id: &str, quantity: i64) -> DbResult<()> {
        if quantity <= 0 {
            return Err(CoreError::from(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            })
            .into());
        }

        debug!(id = %id, quantity = quantity, "Restocking product");

        let now = Utc::now();

        let result =
            sqlx::query("UPDATE products SET stock = stock + ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(quantity)
                .bind(now)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics and dashboards).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-Scoped Stock Decrement
// =============================================================================

/// Conditionally decrements stock inside an open transaction.
///
/// The `stock >= quantity` guard in the WHERE clause is the authoritative
/// availability check: two racing sales can both have read a sufficient
/// stock, but only the one whose UPDATE still finds it gets a row affected.
/// Returns `false` when stock was insufficient; the caller aborts its unit.
///
/// Crate-private on purpose — only the sale engine may decrement, and only
/// inside its atomic unit.
pub(crate) async fn decrement_stock(
    conn: &mut SqliteConnection,
    product_id: &str,
    quantity: i64,
) -> DbResult<bool> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        UPDATE products
        SET stock = stock - ?2, updated_at = ?3
        WHERE id = ?1 AND stock >= ?2
        "#,
    )
    .bind(product_id)
    .bind(quantity)
    .bind(now)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

// =============================================================================
// Helpers
// =============================================================================

/// Trims and validates an optional search term; empty becomes None.
fn normalize_search(search: Option<&str>) -> Result<Option<String>, ValidationError> {
    match search {
        None => Ok(None),
        Some(raw) => {
            let term = validate_search_term(raw)?;
            Ok(if term.is_empty() { None } else { Some(term) })
        }
    }
}

/// Builds the LIKE pattern for a substring match.
fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

/// 1-based page to row offset.
fn page_offset(page: u32, page_size: u32) -> i64 {
    page.saturating_sub(1) as i64 * page_size as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_is_one_based() {
        assert_eq!(page_offset(1, 8), 0);
        assert_eq!(page_offset(2, 8), 8);
        // Page 0 is treated as page 1 rather than underflowing.
        assert_eq!(page_offset(0, 8), 0);
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("café"), "%café%");
    }
}
