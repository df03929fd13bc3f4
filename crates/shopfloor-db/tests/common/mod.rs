//! Shared fixtures for the PostgreSQL-backed tests.
//!
//! Every fixture creates fresh rows with unique names, so tests can share
//! one database and run in parallel without seeing each other's data.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use shopfloor_core::{Money, NewProduct, NewUser, Product, ProductStatus, User, UserRole};
use shopfloor_db::{Database, DbConfig};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A tag unique within this process and across runs.
pub fn unique(prefix: &str) -> String {
    let n = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
    format!("{prefix}-{nanos}-{n}")
}

/// Connects using `DATABASE_URL` and applies migrations.
pub async fn database() -> Database {
    let config = DbConfig::from_env()
        .expect("DATABASE_URL must be set for integration tests")
        .max_connections(8);
    Database::connect(config)
        .await
        .expect("Failed to connect to test database")
}

pub async fn user(db: &Database) -> User {
    db.users()
        .create(&NewUser {
            first_name: "Test".into(),
            last_name: "Buyer".into(),
            email: format!("{}@test.local", unique("buyer")),
            password_hash: "!".into(),
            role: UserRole::Customer,
        })
        .await
        .expect("Failed to create test user")
}

/// A product priced at `price_cents` with `stock` units in inventory.
pub async fn stocked_product(db: &Database, price_cents: i64, stock: i32) -> Product {
    let product = product(db, price_cents).await;
    db.inventory()
        .create(product.product_id, stock)
        .await
        .expect("Failed to create inventory row");
    product
}

/// A product with no inventory row.
pub async fn product(db: &Database, price_cents: i64) -> Product {
    db.products()
        .create(&NewProduct {
            product_name: unique("Widget"),
            description: Some("integration fixture".into()),
            unit_price: Money::from_cents(price_cents),
            product_type: "Test".into(),
            status: ProductStatus::Available,
        })
        .await
        .expect("Failed to create test product")
}

pub async fn stock_of(db: &Database, product_id: i64) -> i32 {
    db.inventory()
        .find_by_product_id(product_id)
        .await
        .expect("Failed to read inventory")
        .expect("Inventory row missing")
        .quantity_in_stock
}
