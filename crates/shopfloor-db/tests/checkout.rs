//! Integration tests for the atomic sale workflow.
//!
//! These tests require a running PostgreSQL database:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/shopfloor_test cargo test -p shopfloor-db -- --ignored
//! ```

mod common;

use shopfloor_core::{CoreError, DiscountRate, Money, NewSaleItem, ValidationError};
use shopfloor_db::{CheckoutError, Database};
use sqlx::postgres::PgPoolOptions;

fn line(product_id: i64, quantity: i32, price_cents: i64) -> NewSaleItem {
    NewSaleItem {
        product_id,
        quantity,
        price_at_sale: Money::from_cents(price_cents),
    }
}

async fn sales_for(db: &Database, user_id: i64) -> usize {
    db.sales()
        .find_by_user(user_id)
        .await
        .expect("Failed to list sales")
        .len()
}

// ============================================================================
// Validation (no database needed)
// ============================================================================

#[tokio::test]
async fn test_empty_items_rejected_before_connecting() {
    // Nothing listens here; validation must fail before a connection is tried.
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    let db = Database::from_pool(pool);

    let err = db
        .sales()
        .create_sale_with_items(1, &[], DiscountRate::zero())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
    ));
}

#[tokio::test]
async fn test_bad_line_rejected_before_connecting() {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    let db = Database::from_pool(pool);

    let err = db
        .sales()
        .create_sale_with_items(1, &[line(1, 0, 500)], DiscountRate::zero())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Rejected(CoreError::Validation(_))));

    let err = db
        .sales()
        .create_sale_with_items(0, &[line(1, 1, 500)], DiscountRate::zero())
        .await
        .unwrap_err();
    assert!(matches!(err, CheckoutError::Rejected(CoreError::Validation(_))));
}

#[tokio::test]
async fn test_overflowing_amounts_rejected_before_connecting() {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    let db = Database::from_pool(pool);
    let huge = Money::parse_decimal("50000000000000000").unwrap().cents();

    // One line whose total doesn't fit
    let err = db
        .sales()
        .create_sale_with_items(1, &[line(1, 2, huge)], DiscountRate::zero())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::Validation(ValidationError::OutOfRange { ref field, .. }))
            if field == "subtotal"
    ));

    // Two lines that fit alone but not together
    let err = db
        .sales()
        .create_sale_with_items(1, &[line(1, 1, huge), line(2, 1, huge)], DiscountRate::zero())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::Validation(ValidationError::OutOfRange { .. }))
    ));
}

#[tokio::test]
async fn test_discount_above_full_rejected_before_connecting() {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://nobody@127.0.0.1:1/none")
        .expect("lazy pool");
    let db = Database::from_pool(pool);

    let err = db
        .sales()
        .create_sale_with_items(1, &[line(1, 1, 500)], DiscountRate::from_bps(20_000))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::Validation(ValidationError::OutOfRange { ref field, .. }))
            if field == "discount_percentage"
    ));
}

// ============================================================================
// Committed Sales
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_discounted_sale_decrements_stock() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 500, 10).await;

    let completed = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(product.product_id, 3, 500)],
            DiscountRate::from_bps(1000),
        )
        .await
        .expect("checkout should succeed");

    assert_eq!(completed.sale.subtotal_cents, 1500);
    assert_eq!(completed.sale.discount_bps, 1000);
    assert_eq!(completed.sale.discount_cents, 150);
    assert_eq!(completed.sale.total_cents, 1350);
    assert_eq!(completed.items.len(), 1);
    assert_eq!(completed.items[0].price_at_sale_cents, 500);
    assert_eq!(completed.units(), 3);

    assert_eq!(common::stock_of(&db, product.product_id).await, 7);

    // What was returned is what was stored
    let stored = db
        .sales()
        .find_by_id(completed.sale.sale_id)
        .await
        .unwrap()
        .expect("sale persisted");
    assert_eq!(stored, completed.sale);

    let items = db
        .sale_items()
        .find_by_sale_id(completed.sale.sale_id)
        .await
        .unwrap();
    assert_eq!(items, completed.items);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_price_at_sale_is_a_snapshot() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 500, 10).await;

    // Caller snapshots 4.75 even though the catalog says 5.00
    let completed = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(product.product_id, 2, 475)],
            DiscountRate::zero(),
        )
        .await
        .unwrap();

    assert_eq!(completed.sale.subtotal_cents, 950);
    assert_eq!(completed.sale.total_cents, 950);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_multi_item_sale_totals() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let a = common::stocked_product(&db, 199, 10).await;
    let b = common::stocked_product(&db, 1250, 4).await;

    let completed = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(a.product_id, 3, 199), line(b.product_id, 4, 1250)],
            DiscountRate::from_bps(1250),
        )
        .await
        .unwrap();

    // 5.97 + 50.00 = 55.97; 12.5% = 6.99625 → 7.00
    assert_eq!(completed.sale.subtotal_cents, 5597);
    assert_eq!(completed.sale.discount_cents, 700);
    assert_eq!(completed.sale.total_cents, 4897);
    assert_eq!(
        completed.items.iter().map(|i| i.product_id).collect::<Vec<_>>(),
        vec![a.product_id, b.product_id]
    );

    assert_eq!(common::stock_of(&db, a.product_id).await, 7);
    assert_eq!(common::stock_of(&db, b.product_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_same_product_twice_sees_own_decrement() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 100, 5).await;

    let err = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(product.product_id, 3, 100), line(product.product_id, 3, 100)],
            DiscountRate::zero(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::InsufficientStock {
            available: 2,
            requested: 3,
            ..
        })
    ));
    assert_eq!(common::stock_of(&db, product.product_id).await, 5);
}

// ============================================================================
// Rollback
// ============================================================================

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_insufficient_stock_rolls_back() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 500, 2).await;

    let err = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(product.product_id, 5, 500)],
            DiscountRate::zero(),
        )
        .await
        .unwrap_err();

    match err {
        CheckoutError::Rejected(CoreError::InsufficientStock {
            product_id,
            available,
            requested,
        }) => {
            assert_eq!(product_id, product.product_id);
            assert_eq!(available, 2);
            assert_eq!(requested, 5);
        }
        other => panic!("expected insufficient stock, got {other:?}"),
    }

    assert_eq!(common::stock_of(&db, product.product_id).await, 2);
    assert_eq!(sales_for(&db, user.user_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_failing_second_line_undoes_first() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let plenty = common::stocked_product(&db, 300, 10).await;
    let scarce = common::stocked_product(&db, 300, 1).await;

    let err = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(plenty.product_id, 4, 300), line(scarce.product_id, 2, 300)],
            DiscountRate::zero(),
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        CheckoutError::Rejected(CoreError::InsufficientStock { .. })
    ));

    // First line was inserted and decremented inside the transaction; none of it stays
    assert_eq!(common::stock_of(&db, plenty.product_id).await, 10);
    assert_eq!(common::stock_of(&db, scarce.product_id).await, 1);
    assert_eq!(sales_for(&db, user.user_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_missing_inventory_rolls_back() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let stocked = common::stocked_product(&db, 300, 10).await;
    let unstocked = common::product(&db, 300).await;

    let err = db
        .sales()
        .create_sale_with_items(
            user.user_id,
            &[line(stocked.product_id, 1, 300), line(unstocked.product_id, 1, 300)],
            DiscountRate::zero(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CheckoutError::Rejected(CoreError::NotFound { .. })));
    assert_eq!(common::stock_of(&db, stocked.product_id).await, 10);
    assert_eq!(sales_for(&db, user.user_id).await, 0);
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_unknown_user_is_not_found() {
    let db = common::database().await;
    let product = common::stocked_product(&db, 300, 10).await;

    let err = db
        .sales()
        .create_sale_with_items(i64::MAX, &[line(product.product_id, 1, 300)], DiscountRate::zero())
        .await
        .unwrap_err();

    match err {
        CheckoutError::Rejected(CoreError::NotFound { entity, .. }) => assert_eq!(entity, "User"),
        other => panic!("expected user not found, got {other:?}"),
    }
    assert_eq!(common::stock_of(&db, product.product_id).await, 10);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_concurrent_checkouts_never_oversell() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 500, 5).await;

    let attempts: Vec<_> = (0..2)
        .map(|_| {
            let sales = db.sales();
            let lines = vec![line(product.product_id, 3, 500)];
            let user_id = user.user_id;
            tokio::spawn(async move {
                sales
                    .create_sale_with_items(user_id, &lines, DiscountRate::zero())
                    .await
            })
        })
        .collect();

    let mut committed = 0;
    let mut rejected = 0;
    for attempt in attempts {
        match attempt.await.expect("task panicked") {
            Ok(_) => committed += 1,
            Err(CheckoutError::Rejected(CoreError::InsufficientStock {
                available, requested, ..
            })) => {
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
                rejected += 1;
            }
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }

    assert_eq!(committed, 1);
    assert_eq!(rejected, 1);
    assert_eq!(common::stock_of(&db, product.product_id).await, 2);
    assert_eq!(sales_for(&db, user.user_id).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_many_concurrent_single_units() {
    let db = common::database().await;
    let user = common::user(&db).await;
    let product = common::stocked_product(&db, 100, 5).await;

    let attempts: Vec<_> = (0..8)
        .map(|_| {
            let sales = db.sales();
            let lines = vec![line(product.product_id, 1, 100)];
            let user_id = user.user_id;
            tokio::spawn(async move {
                sales
                    .create_sale_with_items(user_id, &lines, DiscountRate::zero())
                    .await
            })
        })
        .collect();

    let mut committed = 0;
    for attempt in attempts {
        if attempt.await.expect("task panicked").is_ok() {
            committed += 1;
        }
    }

    assert_eq!(committed, 5);
    assert_eq!(common::stock_of(&db, product.product_id).await, 0);
}
