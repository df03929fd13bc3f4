//! # shopfloor-db: Database Layer for Shopfloor
//!
//! PostgreSQL access for the back office, built on sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Shopfloor Data Flow                              │
//! │                                                                         │
//! │  SaleService::checkout(...)                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   shopfloor-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐   ┌───────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │   │   Checkout    │  │   │
//! │  │   │   (pool.rs)   │    │ Product, Sale  │   │ SaleTransaction│ │   │
//! │  │   │   PgPool      │◄───│ Inventory, ... │   │ FOR UPDATE    │  │   │
//! │  │   └───────────────┘    └────────────────┘   └───────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PostgreSQL (products, inventory, sales, sale_items, users)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Configuration and connection pool
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Storage and checkout error types
//! - [`repository`] - Per-entity repositories
//! - [`checkout`] - The atomic sale-creation workflow
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfloor_db::{Database, DbConfig};
//!
//! let db = Database::connect(DbConfig::from_env()?).await?;
//! let low = db.inventory().find_below_threshold(5).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::{CompletedSale, SaleTransaction};
pub use error::{CheckoutError, ConfigError, DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::inventory::InventoryRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::sale_item::SaleItemRepository;
pub use repository::user::UserRepository;
