//! # Sale Item Repository
//!
//! Sale items are immutable once written: there is no update. Items created
//! through checkout come from [`crate::checkout::SaleTransaction`]; `create`
//! here exists for back-office corrections and does not touch stock.

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use shopfloor_core::{NewSaleItem, SaleItem};

/// Repository for sale item database operations.
#[derive(Debug, Clone)]
pub struct SaleItemRepository {
    pool: PgPool,
}

impl SaleItemRepository {
    pub fn new(pool: PgPool) -> Self {
        SaleItemRepository { pool }
    }

    /// Inserts an item under an existing sale.
    pub async fn create(&self, sale_id: i64, item: &NewSaleItem) -> DbResult<SaleItem> {
        debug!(sale_id = %sale_id, product_id = %item.product_id, "Inserting sale item");

        let created = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, price_at_sale_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING sale_item_id, sale_id, product_id, quantity, price_at_sale_cents
            "#,
        )
        .bind(sale_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price_at_sale.cents())
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<SaleItem>> {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT sale_item_id, sale_id, product_id, quantity, price_at_sale_cents
            FROM sale_items
            WHERE sale_item_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Items of a sale in insertion order.
    pub async fn find_by_sale_id(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT sale_item_id, sale_id, product_id, quantity, price_at_sale_cents
            FROM sale_items
            WHERE sale_id = $1
            ORDER BY sale_item_id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM sale_items WHERE sale_item_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
