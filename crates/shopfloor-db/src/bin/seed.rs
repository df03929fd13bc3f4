//! # Seed Data Generator
//!
//! Populates the database with users, products and stock for development.
//!
//! ## Usage
//! ```bash
//! # Seed every catalog entry (default)
//! DATABASE_URL=postgres://localhost/shopfloor cargo run -p shopfloor-db --bin seed
//!
//! # Only the first N products
//! cargo run -p shopfloor-db --bin seed -- --count 20
//!
//! # Louder logs
//! RUST_LOG=shopfloor_db=debug cargo run -p shopfloor-db --bin seed
//! ```
//!
//! ## Generated Data
//! - One admin and two customers. Their password hash is `!`, which no
//!   password verifier accepts, so the accounts can own sales but can't log in.
//! - Products across five categories, every third one with low stock so the
//!   low-stock report has something to show.

use std::env;
use std::time::Instant;

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shopfloor_core::{Money, NewProduct, NewUser, ProductStatus, UserRole};
use shopfloor_db::{Database, DbConfig};

/// (product_type, [(name, description, price in cents)])
const CATALOG: &[(&str, &[(&str, &str, i64)])] = &[
    (
        "Beverages",
        &[
            ("Sparkling Water", "Lightly carbonated, 500ml", 120),
            ("Orange Juice", "Freshly squeezed, 1L", 349),
            ("Cold Brew Coffee", "Unsweetened, 330ml", 275),
            ("Green Tea", "Bottled, 500ml", 199),
        ],
    ),
    (
        "Snacks",
        &[
            ("Sea Salt Crisps", "Kettle cooked, 150g", 229),
            ("Dark Chocolate Bar", "70% cocoa, 100g", 310),
            ("Trail Mix", "Nuts and dried fruit, 250g", 455),
            ("Oat Cookies", "Pack of 12", 289),
        ],
    ),
    (
        "Dairy",
        &[
            ("Whole Milk", "1L", 135),
            ("Greek Yogurt", "Plain, 500g", 260),
            ("Aged Cheddar", "200g", 540),
        ],
    ),
    (
        "Household",
        &[
            ("Dish Soap", "Lemon scent, 750ml", 305),
            ("Paper Towels", "Pack of 6", 799),
            ("Laundry Pods", "Box of 30", 1299),
        ],
    ),
    (
        "Electronics",
        &[
            ("USB-C Cable", "1m, braided", 999),
            ("Wireless Mouse", "2.4GHz receiver", 1950),
            ("AA Batteries", "Pack of 8", 650),
        ],
    ),
];

const USERS: &[(&str, &str, &str, UserRole)] = &[
    ("Ada", "Admin", "admin@shopfloor.local", UserRole::Admin),
    ("Carl", "Customer", "carl@shopfloor.local", UserRole::Customer),
    ("Cora", "Customer", "cora@shopfloor.local", UserRole::Customer),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let mut count = usize::MAX;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                let raw = args.get(i + 1).context("--count needs a value")?;
                count = raw
                    .parse()
                    .with_context(|| format!("--count must be a number, got {raw}"))?;
                i += 1;
            }
            "--help" | "-h" => {
                println!("Shopfloor Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: all)");
                println!("  -h, --help         Show this help message");
                println!();
                println!("Connection settings come from DATABASE_URL and DATABASE_* variables.");
                return Ok(());
            }
            other => bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    let config = DbConfig::from_env().context("reading database configuration")?;
    let db = Database::connect(config)
        .await
        .context("connecting to the database")?;

    let (embedded, applied) = shopfloor_db::migrations::migration_status(db.pool()).await?;
    info!(embedded, applied, "Connected");

    let existing = db.products().count().await?;
    if existing > 0 {
        warn!(existing, "Database already has products, skipping seed");
        return Ok(());
    }

    let start = Instant::now();

    for (first_name, last_name, email, role) in USERS {
        let user = db
            .users()
            .create(&NewUser {
                first_name: (*first_name).to_string(),
                last_name: (*last_name).to_string(),
                email: (*email).to_string(),
                password_hash: "!".to_string(),
                role: *role,
            })
            .await
            .with_context(|| format!("inserting user {email}"))?;
        info!(user_id = user.user_id, email = %user.email, "User created");
    }

    let mut generated = 0usize;

    'catalog: for (product_type, entries) in CATALOG {
        for (name, description, price_cents) in entries.iter() {
            if generated >= count {
                break 'catalog;
            }

            let product = db
                .products()
                .create(&NewProduct {
                    product_name: (*name).to_string(),
                    description: Some((*description).to_string()),
                    unit_price: Money::from_cents(*price_cents),
                    product_type: (*product_type).to_string(),
                    status: ProductStatus::Available,
                })
                .await
                .with_context(|| format!("inserting product {name}"))?;

            let stock = stock_for(generated);
            db.inventory()
                .create(product.product_id, stock)
                .await
                .with_context(|| format!("inserting stock for {name}"))?;

            generated += 1;
        }
    }

    let low = db.inventory().find_below_threshold(shopfloor_core::DEFAULT_LOW_STOCK_THRESHOLD).await?;

    info!(
        users = USERS.len(),
        products = generated,
        low_stock = low.len(),
        elapsed = ?start.elapsed(),
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Every third product starts below the default low-stock threshold.
fn stock_for(index: usize) -> i32 {
    if index % 3 == 2 {
        (index % 5) as i32
    } else {
        20 + (index % 7) as i32 * 10
    }
}
