//! # Sale Repository
//!
//! Database operations for sales.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Sale Lifecycle                                 │
//! │                                                                         │
//! │  create_sale_with_items (one transaction, see checkout.rs)             │
//! │     INSERT sale (totals = 0)                                           │
//! │     per line: lock stock → insert item → decrement stock               │
//! │     UPDATE sale totals                                                 │
//! │     COMMIT                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  update_totals (discount re-applied later)                             │
//! │     subtotal / discount_bps / discount / total written together        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;

use crate::checkout::{CompletedSale, SaleTransaction};
use crate::error::{CheckoutError, DbResult};
use shopfloor_core::validation::{validate_id, validate_sale_lines};
use shopfloor_core::{DiscountBreakdown, DiscountRate, Money, NewSaleItem, Sale};

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: PgPool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: PgPool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts an empty sale (all totals zero) owned by `user_id`.
    pub async fn create(&self, user_id: i64) -> DbResult<Sale> {
        debug!(user_id = %user_id, "Creating empty sale");

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents)
            VALUES ($1, NOW(), 0, 0, 0, 0)
            RETURNING sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Lists all sales, newest first.
    pub async fn find_all(&self) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            FROM sales
            ORDER BY sale_date DESC, sale_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            FROM sales
            WHERE sale_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Persists a [`DiscountBreakdown`] in a single statement so the subtotal,
    /// rate, discount and total never drift apart.
    ///
    /// Returns `None` when the sale doesn't exist.
    pub async fn update_totals(&self, id: i64, breakdown: &DiscountBreakdown) -> DbResult<Option<Sale>> {
        debug!(
            sale_id = %id,
            subtotal = %breakdown.subtotal,
            rate = %breakdown.rate,
            total = %breakdown.total,
            "Updating sale totals"
        );

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            UPDATE sales SET
                subtotal_cents = $2,
                discount_bps   = $3,
                discount_cents = $4,
                total_cents    = $5
            WHERE sale_id = $1
            RETURNING sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            "#,
        )
        .bind(id)
        .bind(breakdown.subtotal.cents())
        .bind(breakdown.rate.bps() as i32)
        .bind(breakdown.discount.cents())
        .bind(breakdown.total.cents())
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Deletes a sale; its items go with it (ON DELETE CASCADE).
    ///
    /// Stock is not restored.
    pub async fn delete(&self, id: i64) -> DbResult<bool> {
        debug!(sale_id = %id, "Deleting sale");

        let result = sqlx::query("DELETE FROM sales WHERE sale_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sales whose calendar date (UTC) falls within `start..=end`, newest first.
    pub async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            FROM sales
            WHERE (sale_date AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            ORDER BY sale_date DESC, sale_id DESC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        debug!(%start, %end, count = sales.len(), "Date range query");
        Ok(sales)
    }

    /// Sales owned by a user, newest first.
    pub async fn find_by_user(&self, user_id: i64) -> DbResult<Vec<Sale>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            FROM sales
            WHERE user_id = $1
            ORDER BY sale_date DESC, sale_id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sum of `total` across every sale; zero when there are none.
    pub async fn total_revenue(&self) -> DbResult<Money> {
        // SUM(bigint) is NUMERIC in PostgreSQL
        let cents: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(total_cents), 0)::BIGINT FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(Money::from_cents(cents))
    }

    /// Counts total sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Creates a sale with its items, decrementing stock, as one atomic unit.
    ///
    /// Inputs are validated before a connection is taken from the pool. Any
    /// failure after `BEGIN` rolls the whole attempt back.
    ///
    /// ## Errors
    /// * `CheckoutError::Rejected(CoreError::Validation)` - empty or malformed
    ///   lines, amounts that overflow, or a rate above 100%
    /// * `CheckoutError::Rejected(CoreError::NotFound)` - unknown user, or a
    ///   product without an inventory row
    /// * `CheckoutError::Rejected(CoreError::InsufficientStock)` - not enough stock
    /// * `CheckoutError::Storage` - database failure
    pub async fn create_sale_with_items(
        &self,
        user_id: i64,
        items: &[NewSaleItem],
        rate: DiscountRate,
    ) -> Result<CompletedSale, CheckoutError> {
        validate_id("user_id", user_id)?;
        validate_sale_lines(items)?;
        DiscountRate::checked_from_bps(i64::from(rate.bps()))?;

        let mut tx = SaleTransaction::begin(&self.pool).await?;

        match tx.run(user_id, items, rate).await {
            Ok(()) => tx.commit().await,
            Err(err) => {
                tx.rollback(&err).await;
                Err(err)
            }
        }
    }
}
