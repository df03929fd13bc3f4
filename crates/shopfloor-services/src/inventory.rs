//! # Inventory Service
//!
//! Stock levels outside of checkout: manual counts, restocks, corrections
//! and the low-stock report. Checkout decrements go through the sale
//! transaction instead, see `shopfloor_db::checkout`.

use tracing::{info, warn};

use shopfloor_core::validation::parse_id;
use shopfloor_db::{Database, DbError};

use crate::dto::InventoryDto;
use crate::error::{ResultExt, ServiceError, ServiceResult};
use crate::input::{parse_delta, parse_quantity, parse_stock_level, parse_threshold};

/// Inventory operations for the presentation layer.
#[derive(Debug, Clone)]
pub struct InventoryService {
    db: Database,
}

impl InventoryService {
    pub fn new(db: Database) -> Self {
        InventoryService { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<InventoryDto>> {
        let rows = self.db.inventory().find_all().await.context("listing inventory")?;
        Ok(rows.into_iter().map(InventoryDto::from).collect())
    }

    /// Stock rows with product name, price, type and status.
    pub async fn list_with_products(&self) -> ServiceResult<Vec<InventoryDto>> {
        let rows = self
            .db
            .inventory()
            .find_all_with_product_details()
            .await
            .context("listing inventory with products")?;
        Ok(rows.into_iter().map(InventoryDto::from).collect())
    }

    pub async fn get_by_product(&self, raw_product_id: &str) -> ServiceResult<InventoryDto> {
        let product_id = parse_id("product_id", raw_product_id)?;

        self.db
            .inventory()
            .find_by_product_id(product_id)
            .await
            .context(format!("loading inventory for product {product_id}"))?
            .map(InventoryDto::from)
            .ok_or_else(|| ServiceError::not_found("Inventory for product", product_id))
    }

    /// Creates the stock row of an existing product.
    pub async fn create(&self, raw_product_id: &str, raw_quantity: &str) -> ServiceResult<InventoryDto> {
        let product_id = parse_id("product_id", raw_product_id)?;
        let quantity = parse_stock_level(raw_quantity)?;

        let product = self
            .db
            .products()
            .find_by_id(product_id)
            .await
            .context(format!("loading product {product_id}"))?;
        if product.is_none() {
            return Err(ServiceError::not_found("Product", product_id));
        }

        let row = self
            .db
            .inventory()
            .create(product_id, quantity)
            .await
            .context(format!("creating inventory for product {product_id}"))?;

        info!(product_id = %product_id, quantity = %quantity, "Inventory created");
        Ok(row.into())
    }

    /// Overwrites the stock level (e.g. after a physical count).
    pub async fn set_quantity(&self, raw_product_id: &str, raw_quantity: &str) -> ServiceResult<InventoryDto> {
        let product_id = parse_id("product_id", raw_product_id)?;
        let quantity = parse_stock_level(raw_quantity)?;

        let row = self
            .db
            .inventory()
            .set_quantity(product_id, quantity)
            .await
            .context(format!("setting stock for product {product_id}"))?
            .ok_or_else(|| ServiceError::not_found("Inventory for product", product_id))?;

        info!(product_id = %product_id, quantity = %quantity, "Stock level set");
        Ok(row.into())
    }

    /// Adds a positive quantity of received goods.
    pub async fn restock(&self, raw_product_id: &str, raw_quantity: &str) -> ServiceResult<InventoryDto> {
        let product_id = parse_id("product_id", raw_product_id)?;
        let quantity = parse_quantity(raw_quantity)?;
        self.apply_delta(product_id, quantity).await
    }

    /// Applies a signed correction (breakage, recount).
    ///
    /// ## Errors
    /// * `InsufficientStock` - the correction would take stock below zero;
    ///   nothing is changed
    pub async fn adjust(&self, raw_product_id: &str, raw_delta: &str) -> ServiceResult<InventoryDto> {
        let product_id = parse_id("product_id", raw_product_id)?;
        let delta = parse_delta(raw_delta)?;
        self.apply_delta(product_id, delta).await
    }

    async fn apply_delta(&self, product_id: i64, delta: i32) -> ServiceResult<InventoryDto> {
        let context = format!("adjusting stock for product {product_id}");

        match self.db.inventory().adjust_quantity(product_id, delta).await {
            Ok(Some(row)) => {
                info!(product_id = %product_id, delta = %delta, quantity = %row.quantity_in_stock, "Stock adjusted");
                Ok(row.into())
            }
            Ok(None) => Err(ServiceError::not_found("Inventory for product", product_id)),
            Err(DbError::CheckViolation { .. }) => {
                let available = self
                    .db
                    .inventory()
                    .find_by_product_id(product_id)
                    .await
                    .context(context)?
                    .map_or(0, |row| row.quantity_in_stock);

                warn!(product_id = %product_id, delta = %delta, available = %available, "Adjustment below zero refused");
                Err(ServiceError::InsufficientStock {
                    product_id,
                    available: i64::from(available),
                    requested: -i64::from(delta),
                })
            }
            Err(source) => Err(ServiceError::Storage { context, source }),
        }
    }

    pub async fn delete(&self, raw_product_id: &str) -> ServiceResult<()> {
        let product_id = parse_id("product_id", raw_product_id)?;

        let deleted = self
            .db
            .inventory()
            .delete(product_id)
            .await
            .context(format!("deleting inventory for product {product_id}"))?;

        if !deleted {
            return Err(ServiceError::not_found("Inventory for product", product_id));
        }
        Ok(())
    }

    /// Rows strictly below `threshold` (default 5), lowest first.
    pub async fn low_stock(&self, threshold: Option<&str>) -> ServiceResult<Vec<InventoryDto>> {
        let threshold = parse_threshold(threshold)?;

        let rows = self
            .db
            .inventory()
            .find_below_threshold(threshold)
            .await
            .context(format!("listing stock below {threshold}"))?;
        Ok(rows.into_iter().map(InventoryDto::from).collect())
    }
}
