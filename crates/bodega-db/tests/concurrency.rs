//! The §-stress scenario for the stock race: two sales of 10 units racing
//! against a starting stock of 10 must not both succeed.
//!
//! Uses a file-backed database because `:memory:` pools are pinned to one
//! connection — there is nothing to race on. The losing transaction fails
//! either on the conditional decrement (stock already taken) or on the
//! write-lock upgrade; both abort its unit completely.

use bodega_core::CartItem;
use bodega_db::{Database, DbConfig};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sales_cannot_oversell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");

    let db = Database::new(DbConfig::new(&path).max_connections(4))
        .await
        .unwrap();

    let product = db
        .products()
        .create("Cerveza lager 295ml", 85, 10, 0)
        .await
        .unwrap();

    let cart = vec![CartItem {
        product_id: product.id.clone(),
        quantity: 10,
    }];

    let db_a = db.clone();
    let db_b = db.clone();
    let cart_a = cart.clone();
    let cart_b = cart.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { db_a.sales().create_sale(&cart_a, 36.5).await }),
        tokio::spawn(async move { db_b.sales().create_sale(&cart_b, 36.5).await }),
    );

    let results = [a.unwrap(), b.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();

    // The race must never admit both.
    assert!(successes <= 1, "both concurrent sales committed");

    // And the ledger must agree with whatever did commit.
    let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert!(after.stock >= 0);
    assert_eq!(after.stock, 10 - 10 * successes as i64);
    assert_eq!(db.sales().count().await.unwrap() as usize, successes);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_small_sales_against_ample_stock_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("busy.db");

    let db = Database::new(DbConfig::new(&path).max_connections(4))
        .await
        .unwrap();

    let product = db
        .products()
        .create("Papel higiénico x4", 310, 1000, 0)
        .await
        .unwrap();

    // Sequential pressure from several tasks; SQLite serializes the
    // writes, the conditional decrement keeps the count exact.
    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = db.clone();
        let cart = vec![CartItem {
            product_id: product.id.clone(),
            quantity: 5,
        }];
        handles.push(tokio::spawn(async move {
            db.sales().create_sale(&cart, 36.5).await
        }));
    }

    let mut committed = 0i64;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            committed += 1;
        }
    }

    let after = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(after.stock, 1000 - 5 * committed);
    assert_eq!(db.sales().count().await.unwrap(), committed);
}
