//! # shopfloor-services: Business Services for Shopfloor
//!
//! The layer a web/presentation layer calls into. Every method takes the raw
//! text a page submitted, validates it before touching storage, and returns
//! DTOs or a [`ServiceError`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Presentation layer (routes, pages, flash messages)                    │
//! │       │  services.sales.checkout("7", &lines, Some("10"))              │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               shopfloor-services (THIS CRATE)                   │   │
//! │  │  ProductService • InventoryService • SaleService • DTOs         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                ▼                                        │
//! │  shopfloor-db (repositories, checkout transaction) → PostgreSQL        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use shopfloor_db::{Database, DbConfig};
//! use shopfloor_services::{SaleLineForm, Services};
//!
//! let services = Services::new(Database::connect(DbConfig::from_env()?).await?);
//!
//! let sale = services
//!     .sales
//!     .checkout("7", &[SaleLineForm::new("3", "2")], Some("10"))
//!     .await?;
//! println!("{} total {}", sale.sale_id, sale.total_amount);
//! ```

pub mod dto;
pub mod error;
mod input;
pub mod inventory;
pub mod product;
pub mod sale;

pub use dto::{InventoryDto, ProductDto, ProductForm, SaleDto, SaleItemDto, SaleLineForm};
pub use error::{ErrorBody, ErrorCode, ResultExt, ServiceError, ServiceResult};
pub use inventory::InventoryService;
pub use product::ProductService;
pub use sale::SaleService;

use shopfloor_db::Database;

/// All services over one database handle.
#[derive(Debug, Clone)]
pub struct Services {
    pub products: ProductService,
    pub inventory: InventoryService,
    pub sales: SaleService,
}

impl Services {
    pub fn new(db: Database) -> Self {
        Services {
            products: ProductService::new(db.clone()),
            inventory: InventoryService::new(db.clone()),
            sales: SaleService::new(db),
        }
    }
}
