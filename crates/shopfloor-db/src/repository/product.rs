//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - CRUD with a partial update
//! - Hard delete (rows still referenced by sale items are protected by the
//!   foreign key and surface as `DbError::ForeignKeyViolation`)

use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use shopfloor_core::{NewProduct, Product, ProductUpdate};

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
/// let product = repo.find_by_id(42).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: PgPool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a new product and returns it with its generated id.
    pub async fn create(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.product_name, "Inserting product");

        let created = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_name, description, unit_price_cents, product_type, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING product_id, product_name, description, unit_price_cents, product_type, status
            "#,
        )
        .bind(&product.product_name)
        .bind(&product.description)
        .bind(product.unit_price.cents())
        .bind(&product.product_type)
        .bind(product.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Lists every product, ordered by id.
    pub async fn find_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, product_name, description, unit_price_cents, product_type, status
            FROM products
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, product_name, description, unit_price_cents, product_type, status
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Applies a partial update. Fields left as `None` keep their value;
    /// `clear_description` sets the description to NULL.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Updated row
    /// * `Ok(None)` - Product doesn't exist
    pub async fn update(&self, id: i64, update: &ProductUpdate) -> DbResult<Option<Product>> {
        debug!(id = %id, "Updating product");

        let updated = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                product_name     = COALESCE($2, product_name),
                description      = CASE WHEN $7 THEN NULL ELSE COALESCE($3, description) END,
                unit_price_cents = COALESCE($4, unit_price_cents),
                product_type     = COALESCE($5, product_type),
                status           = COALESCE($6, status)
            WHERE product_id = $1
            RETURNING product_id, product_name, description, unit_price_cents, product_type, status
            "#,
        )
        .bind(id)
        .bind(&update.product_name)
        .bind(&update.description)
        .bind(update.unit_price.map(|price| price.cents()))
        .bind(&update.product_type)
        .bind(update.status)
        .bind(update.clear_description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Hard-deletes a product. Returns `false` when no row matched.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
