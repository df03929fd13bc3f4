//! # Product Service
//!
//! Catalog management: raw form input in, [`ProductDto`] out.

use tracing::{debug, info};

use shopfloor_core::validation::{parse_id, validate_new_product, validate_product_update};
use shopfloor_db::Database;

use crate::dto::{ProductDto, ProductForm};
use crate::error::{ResultExt, ServiceError, ServiceResult};

/// Product operations for the presentation layer.
#[derive(Debug, Clone)]
pub struct ProductService {
    db: Database,
}

impl ProductService {
    pub fn new(db: Database) -> Self {
        ProductService { db }
    }

    pub async fn list(&self) -> ServiceResult<Vec<ProductDto>> {
        let products = self.db.products().find_all().await.context("listing products")?;
        Ok(products.into_iter().map(ProductDto::from).collect())
    }

    /// Gets one product.
    ///
    /// ## Errors
    /// * `Validation` - id absent, non-numeric, zero or negative
    /// * `NotFound` - no such product
    pub async fn get(&self, raw_id: &str) -> ServiceResult<ProductDto> {
        let id = parse_id("product_id", raw_id)?;

        self.db
            .products()
            .find_by_id(id)
            .await
            .context(format!("loading product {id}"))?
            .map(ProductDto::from)
            .ok_or_else(|| ServiceError::not_found("Product", id))
    }

    pub async fn create(&self, form: &ProductForm) -> ServiceResult<ProductDto> {
        let product = form.to_new_product()?;
        validate_new_product(&product)?;

        let created = self
            .db
            .products()
            .create(&product)
            .await
            .context("creating product")?;

        info!(product_id = %created.product_id, name = %created.product_name, "Product created");
        Ok(created.into())
    }

    /// Applies the fields present in `form`; at least one is required.
    pub async fn update(&self, raw_id: &str, form: &ProductForm) -> ServiceResult<ProductDto> {
        let id = parse_id("product_id", raw_id)?;
        let update = form.to_update()?;
        validate_product_update(&update)?;

        let updated = self
            .db
            .products()
            .update(id, &update)
            .await
            .context(format!("updating product {id}"))?
            .ok_or_else(|| ServiceError::not_found("Product", id))?;

        debug!(product_id = %id, "Product updated");
        Ok(updated.into())
    }

    /// Hard-deletes a product.
    ///
    /// A product that already appears on a sale cannot be deleted; that
    /// surfaces as a `Storage` error with code `CONFLICT`.
    pub async fn delete(&self, raw_id: &str) -> ServiceResult<()> {
        let id = parse_id("product_id", raw_id)?;

        let deleted = self
            .db
            .products()
            .delete(id)
            .await
            .context(format!("deleting product {id}"))?;

        if !deleted {
            return Err(ServiceError::not_found("Product", id));
        }

        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        self.db.products().count().await.context("counting products")
    }
}
