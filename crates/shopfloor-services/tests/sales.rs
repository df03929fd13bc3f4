//! End-to-end service tests against PostgreSQL.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/shopfloor_test cargo test -p shopfloor-services -- --ignored
//! ```

use chrono::{TimeZone, Utc};
use shopfloor_core::{NewUser, UserRole};
use shopfloor_db::{Database, DbConfig};
use shopfloor_services::{ErrorCode, ProductForm, SaleLineForm, ServiceError, Services};

async fn setup() -> (Database, Services) {
    let db = Database::connect(DbConfig::from_env().expect("DATABASE_URL must be set"))
        .await
        .expect("Failed to connect to test database");
    let services = Services::new(db.clone());
    (db, services)
}

async fn buyer(db: &Database) -> i64 {
    let tag = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    db.users()
        .create(&NewUser {
            first_name: "Service".into(),
            last_name: "Buyer".into(),
            email: format!("service-{tag}@test.local"),
            password_hash: "!".into(),
            role: UserRole::Customer,
        })
        .await
        .expect("Failed to create user")
        .user_id
}

async fn stocked(services: &Services, price: &str, stock: &str) -> String {
    let product = services
        .products
        .create(&ProductForm {
            product_name: Some(format!("Service Widget {}", Utc::now().timestamp_nanos_opt().unwrap_or_default())),
            unit_price: Some(price.into()),
            product_type: Some("Test".into()),
            ..Default::default()
        })
        .await
        .expect("Failed to create product");

    let id = product.product_id.to_string();
    services
        .inventory
        .create(&id, stock)
        .await
        .expect("Failed to create inventory");
    id
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_checkout_snapshots_catalog_price() {
    let (db, services) = setup().await;
    let user_id = buyer(&db).await.to_string();
    let product_id = stocked(&services, "5.00", "10").await;

    let sale = services
        .sales
        .checkout(&user_id, &[SaleLineForm::new(&product_id, "3")], Some("10"))
        .await
        .unwrap();

    assert_eq!(sale.subtotal, "15.00");
    assert_eq!(sale.discount_percentage, "10.00");
    assert_eq!(sale.discount_amount, "1.50");
    assert_eq!(sale.total_amount, "13.50");
    assert_eq!(sale.items[0].price_at_sale, "5.00");

    let stock = services.inventory.get_by_product(&product_id).await.unwrap();
    assert_eq!(stock.quantity_in_stock, 7);

    // Later price edits don't touch the recorded sale
    services
        .products
        .update(
            &product_id,
            &ProductForm {
                unit_price: Some("9.99".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let reloaded = services.sales.get(&sale.sale_id.to_string()).await.unwrap();
    assert_eq!(reloaded.items[0].price_at_sale, "5.00");
    assert_eq!(reloaded.total_amount, "13.50");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_insufficient_stock_reports_amounts() {
    let (db, services) = setup().await;
    let user_id = buyer(&db).await.to_string();
    let product_id = stocked(&services, "5.00", "2").await;

    let err = services
        .sales
        .checkout(&user_id, &[SaleLineForm::new(&product_id, "5")], None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::InsufficientStock {
            available: 2,
            requested: 5,
            ..
        }
    ));
    assert_eq!(err.code(), ErrorCode::InsufficientStock);
    assert_eq!(
        services.inventory.get_by_product(&product_id).await.unwrap().quantity_in_stock,
        2
    );
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_apply_discount_twice_is_stable() {
    let (db, services) = setup().await;
    let user_id = buyer(&db).await.to_string();
    let product_id = stocked(&services, "19.99", "5").await;

    let sale = services
        .sales
        .checkout(&user_id, &[SaleLineForm::new(&product_id, "1")], None)
        .await
        .unwrap();
    let id = sale.sale_id.to_string();

    let first = services.sales.apply_discount(&id, "15").await.unwrap();
    let second = services.sales.apply_discount(&id, "15").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(first.subtotal, "19.99");
    assert_eq!(first.discount_amount, "3.00");
    assert_eq!(first.total_amount, "16.99");

    let err = services.sales.apply_discount(&i64::MAX.to_string(), "15").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_date_range_uses_display_format() {
    let (db, services) = setup().await;
    let user_id = buyer(&db).await;

    for date in [
        Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2024, 2, 10, 9, 0, 0).unwrap(),
    ] {
        let sale = db.sales().create(user_id).await.unwrap();
        sqlx::query("UPDATE sales SET sale_date = $2 WHERE sale_id = $1")
            .bind(sale.sale_id)
            .bind(date)
            .execute(db.pool())
            .await
            .unwrap();
    }

    let found: Vec<_> = services
        .sales
        .by_date_range("01/01/2024", "31/01/2024")
        .await
        .unwrap()
        .into_iter()
        .filter(|sale| sale.user_id == user_id)
        .collect();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].sale_date, "10/01/2024");
}

#[tokio::test]
#[ignore = "Requires running PostgreSQL; set DATABASE_URL"]
async fn test_adjust_below_zero_is_insufficient_stock() {
    let (_db, services) = setup().await;
    let product_id = stocked(&services, "1.00", "3").await;

    let err = services.inventory.adjust(&product_id, "-4").await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InsufficientStock {
            available: 3,
            requested: 4,
            ..
        }
    ));

    let restocked = services.inventory.restock(&product_id, "7").await.unwrap();
    assert_eq!(restocked.quantity_in_stock, 10);

    let low = services.inventory.low_stock(Some("11")).await.unwrap();
    assert!(low.iter().any(|row| row.product_id.to_string() == product_id));
}
