//! # Repository Module
//!
//! Database repository implementations for Shopfloor.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Contract                                  │
//! │                                                                         │
//! │  Service                                                               │
//! │       │  db.products().find_by_id(42)                                  │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── create(&NewProduct)         → Product                             │
//! │  ├── find_all()                  → Vec<Product>                        │
//! │  ├── find_by_id(id)              → Option<Product>   (None = absent)   │
//! │  ├── update(id, &ProductUpdate)  → Option<Product>                     │
//! │  └── delete(id)                  → bool                                │
//! │       │  parameterized SQL                                             │
//! │       ▼                                                                 │
//! │  PostgreSQL ── rows mapped to typed records right here (FromRow)       │
//! │                                                                         │
//! │  Every sqlx::Error leaves as DbError with its original message.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD
//! - [`inventory::InventoryRepository`] - Stock levels, joined reads, low stock
//! - [`sale::SaleRepository`] - Sales, reporting queries, checkout entry point
//! - [`sale_item::SaleItemRepository`] - Sale lines
//! - [`user::UserRepository`] - Sale owners

pub mod inventory;
pub mod product;
pub mod sale;
pub mod sale_item;
pub mod user;
