//! Integration tests for the reporting façade.
//!
//! The contract: every reported figure is derivable from the stored rows,
//! and local-currency figures come from per-sale frozen snapshots.

use bodega_core::{CartItem, Currency, PaymentMethod};
use bodega_db::{Database, DbConfig, DbError};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

async fn sell(db: &Database, product_id: &str, quantity: i64, rate: f64) -> String {
    db.sales()
        .create_sale(
            &[CartItem {
                product_id: product_id.to_string(),
                quantity,
            }],
            rate,
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn history_lists_settled_sales_newest_first() {
    let db = test_db().await;
    let product = db.products().create("Jugo de naranja 1L", 220, 50, 0).await.unwrap();

    let first = sell(&db, &product.id, 1, 36.0).await;
    let second = sell(&db, &product.id, 2, 36.0).await;
    let unsettled = sell(&db, &product.id, 3, 36.0).await;

    for (sale_id, method) in [(&first, PaymentMethod::Cash), (&second, PaymentMethod::Card)] {
        let total = db.sales().get_by_id(sale_id).await.unwrap().unwrap().total();
        db.payments()
            .settle(sale_id, method, total, Currency::Foreign)
            .await
            .unwrap();
    }

    let page = db.reports().sales_history(1, 10).await.unwrap();

    // Only settled sales appear, newest first.
    assert_eq!(page.total, 2);
    assert_eq!(page.items[0].sale_id, second);
    assert_eq!(page.items[0].method, PaymentMethod::Card);
    assert_eq!(page.items[1].sale_id, first);
    assert!(!page.items.iter().any(|e| e.sale_id == unsettled));
}

#[tokio::test]
async fn sale_details_join_product_names_onto_frozen_lines() {
    let db = test_db().await;
    let coffee = db.products().create("Café molido 500g", 650, 20, 0).await.unwrap();
    let sugar = db.products().create("Azúcar 1kg", 110, 20, 0).await.unwrap();

    let sale = db
        .sales()
        .create_sale(
            &[
                CartItem {
                    product_id: coffee.id.clone(),
                    quantity: 1,
                },
                CartItem {
                    product_id: sugar.id.clone(),
                    quantity: 3,
                },
            ],
            38.0,
        )
        .await
        .unwrap();

    let details = db.reports().sale_details(&sale.id).await.unwrap();

    assert_eq!(details.sale_id, sale.id);
    assert_eq!(details.rate_snapshot, 38.0);
    assert_eq!(details.method, None);
    assert_eq!(details.lines.len(), 2);
    assert_eq!(details.lines[0].product_name, "Café molido 500g");
    assert_eq!(details.lines[1].subtotal_cents, 330);

    // Reported total equals the sum of its own lines.
    let line_sum: i64 = details.lines.iter().map(|l| l.subtotal_cents).sum();
    assert_eq!(line_sum, details.total_cents);

    assert!(matches!(
        db.reports().sale_details("missing").await.unwrap_err(),
        DbError::NotFound { .. }
    ));
}

#[tokio::test]
async fn daily_summary_derives_both_currencies_from_snapshots() {
    let db = test_db().await;
    let product = db.products().create("Harina de maíz 1kg", 100, 100, 0).await.unwrap();

    // Two sales today at different snapshots: 2.00 @ 36 and 3.00 @ 40.
    sell(&db, &product.id, 2, 36.0).await;
    sell(&db, &product.id, 3, 40.0).await;

    let summary = db.reports().daily_summary().await.unwrap();

    assert_eq!(summary.sale_count, 2);
    assert_eq!(summary.units_sold, 5);
    assert_eq!(summary.revenue_foreign_cents, 500);
    // 200×36 + 300×40, per-sale snapshots — not today's live rate.
    assert_eq!(summary.revenue_local_cents, 19_200);

    assert_eq!(summary.top_products.len(), 1);
    assert_eq!(summary.top_products[0].units_sold, 5);
}

#[tokio::test]
async fn daily_summary_flags_low_stock() {
    let db = test_db().await;

    db.products().create("Fósforos caja", 25, 3, 0).await.unwrap();
    db.products().create("Arroz blanco 1kg", 120, 80, 0).await.unwrap();
    let disabled = db.products().create("Cloro 1L", 150, 1, 0).await.unwrap();
    db.products().soft_disable(&disabled.id).await.unwrap();

    let summary = db.reports().daily_summary().await.unwrap();

    // Only active products below the threshold, scarcest first.
    assert_eq!(summary.low_stock.len(), 1);
    assert_eq!(summary.low_stock[0].name, "Fósforos caja");
    assert_eq!(summary.low_stock[0].stock, 3);
}
