//! # Inventory Repository
//!
//! One stock row per product. The `quantity_in_stock >= 0` CHECK constraint
//! is the last line of defence against overselling; the checkout transaction
//! locks rows before decrementing so the constraint never fires there.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use shopfloor_core::{Inventory, InventoryWithProduct};

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        InventoryRepository { pool }
    }

    /// Creates the stock row for a product.
    ///
    /// A second row for the same product is rejected with
    /// `DbError::UniqueViolation`; an unknown product with
    /// `DbError::ForeignKeyViolation`.
    pub async fn create(&self, product_id: i64, quantity: i32) -> DbResult<Inventory> {
        debug!(product_id = %product_id, quantity = %quantity, "Creating inventory row");

        let inventory = sqlx::query_as::<_, Inventory>(
            r#"
            INSERT INTO inventory (product_id, quantity_in_stock, last_updated)
            VALUES ($1, $2, NOW())
            RETURNING inventory_id, product_id, quantity_in_stock, last_updated
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_one(&self.pool)
        .await?;

        Ok(inventory)
    }

    pub async fn find_all(&self) -> DbResult<Vec<Inventory>> {
        let rows = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT inventory_id, product_id, quantity_in_stock, last_updated
            FROM inventory
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Gets the stock row of a product, `None` if the product has none.
    pub async fn find_by_product_id(&self, product_id: i64) -> DbResult<Option<Inventory>> {
        let row = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT inventory_id, product_id, quantity_in_stock, last_updated
            FROM inventory
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Overwrites the stock level and refreshes `last_updated`.
    pub async fn set_quantity(&self, product_id: i64, quantity: i32) -> DbResult<Option<Inventory>> {
        debug!(product_id = %product_id, quantity = %quantity, "Setting stock level");

        let row = sqlx::query_as::<_, Inventory>(
            r#"
            UPDATE inventory
            SET quantity_in_stock = $2, last_updated = NOW()
            WHERE product_id = $1
            RETURNING inventory_id, product_id, quantity_in_stock, last_updated
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Adds `delta` (may be negative) to the stock level in one statement.
    ///
    /// A delta that would take stock below zero is refused by the CHECK
    /// constraint and surfaces as `DbError::CheckViolation`; the row is left
    /// untouched.
    pub async fn adjust_quantity(&self, product_id: i64, delta: i32) -> DbResult<Option<Inventory>> {
        debug!(product_id = %product_id, delta = %delta, "Adjusting stock level");

        let row = sqlx::query_as::<_, Inventory>(
            r#"
            UPDATE inventory
            SET quantity_in_stock = quantity_in_stock + $2, last_updated = NOW()
            WHERE product_id = $1
            RETURNING inventory_id, product_id, quantity_in_stock, last_updated
            "#,
        )
        .bind(product_id)
        .bind(delta)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Removes the stock row of a product. Returns `false` when none existed.
    pub async fn delete(&self, product_id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM inventory WHERE product_id = $1")
            .bind(product_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Lists stock rows joined with their product, ordered by product name.
    pub async fn find_all_with_product_details(&self) -> DbResult<Vec<InventoryWithProduct>> {
        let rows = sqlx::query_as::<_, InventoryWithProduct>(
            r#"
            SELECT
                i.inventory_id, i.product_id, i.quantity_in_stock, i.last_updated,
                p.product_name, p.unit_price_cents, p.product_type, p.status
            FROM inventory i
            JOIN products p ON p.product_id = i.product_id
            ORDER BY p.product_name, i.product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed inventory with product details");
        Ok(rows)
    }

    /// Stock rows with `quantity_in_stock` strictly below `threshold`,
    /// lowest stock first.
    pub async fn find_below_threshold(&self, threshold: i32) -> DbResult<Vec<InventoryWithProduct>> {
        let rows = sqlx::query_as::<_, InventoryWithProduct>(
            r#"
            SELECT
                i.inventory_id, i.product_id, i.quantity_in_stock, i.last_updated,
                p.product_name, p.unit_price_cents, p.product_type, p.status
            FROM inventory i
            JOIN products p ON p.product_id = i.product_id
            WHERE i.quantity_in_stock < $1
            ORDER BY i.quantity_in_stock, i.product_id
            "#,
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        debug!(threshold = %threshold, count = rows.len(), "Low stock query");
        Ok(rows)
    }
}
