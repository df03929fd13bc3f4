//! # Checkout Transaction
//!
//! The atomic "sale with items" workflow.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    SaleTransaction (one pooled connection)              │
//! │                                                                         │
//! │  BEGIN                                                                 │
//! │    ensure_user(user_id)               unknown → NotFound               │
//! │    insert_sale(user_id)               totals = 0, sale_date = NOW()    │
//! │    for each line, in input order:                                      │
//! │      lock_inventory(product)          SELECT ... FOR UPDATE            │
//! │        no row        → NotFound                                        │
//! │        stock < qty   → InsufficientStock { available, requested }      │
//! │      insert_item(sale, line)                                           │
//! │      decrement_stock(product, qty)                                     │
//! │      subtotal += price_at_sale × qty                                   │
//! │    finalize_totals(rate)              DiscountBreakdown::compute       │
//! │  COMMIT  ─────────────► CompletedSale { sale, items }                  │
//! │                                                                         │
//! │  any error → ROLLBACK → error returned unchanged                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//!
//! Row locks are per product. Two checkouts touching the same product
//! serialize on its inventory row; checkouts on disjoint products never
//! wait on each other. A product listed twice in one sale is locked once
//! and the second line sees the already-decremented quantity.
//!
//! If the value is dropped without `commit`, sqlx rolls the transaction back
//! when the connection returns to the pool.

use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, info, warn};

use crate::error::{CheckoutError, DbError};
use shopfloor_core::validation::subtotal_overflow;
use shopfloor_core::{
    CoreError, DiscountBreakdown, DiscountRate, Money, NewSaleItem, Sale, SaleItem,
};

/// A committed sale and the items inserted with it, in input order.
#[derive(Debug, Clone)]
pub struct CompletedSale {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

impl CompletedSale {
    /// Total units sold across all items.
    pub fn units(&self) -> i64 {
        self.items.iter().map(|item| i64::from(item.quantity)).sum()
    }
}

/// Explicit transaction scope for one checkout.
pub struct SaleTransaction {
    tx: Transaction<'static, Postgres>,
    sale: Option<Sale>,
    items: Vec<SaleItem>,
    subtotal: Money,
}

impl SaleTransaction {
    /// Checks a connection out of the pool and issues `BEGIN`.
    pub async fn begin(pool: &PgPool) -> Result<Self, DbError> {
        let tx = pool.begin().await.map_err(DbError::transaction)?;

        Ok(SaleTransaction {
            tx,
            sale: None,
            items: Vec::new(),
            subtotal: Money::zero(),
        })
    }

    /// Runs every step of the workflow up to, but not including, `COMMIT`.
    pub async fn run(
        &mut self,
        user_id: i64,
        lines: &[NewSaleItem],
        rate: DiscountRate,
    ) -> Result<(), CheckoutError> {
        self.ensure_user(user_id).await?;
        let sale_id = self.insert_sale(user_id).await?.sale_id;

        for line in lines {
            let available = self.lock_inventory(line.product_id).await?;

            if available < line.quantity {
                return Err(CoreError::InsufficientStock {
                    product_id: line.product_id,
                    available: i64::from(available),
                    requested: i64::from(line.quantity),
                }
                .into());
            }

            self.insert_item(sale_id, line).await?;
            self.decrement_stock(line.product_id, line.quantity).await?;
        }

        self.finalize_totals(rate).await?;
        Ok(())
    }

    /// Fails with `NotFound` unless the owning user exists.
    pub async fn ensure_user(&mut self, user_id: i64) -> Result<(), CheckoutError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id)
                .fetch_one(&mut *self.tx)
                .await?;

        if !exists {
            return Err(CoreError::not_found("User", user_id).into());
        }
        Ok(())
    }

    /// Inserts the sale row with zero totals.
    pub async fn insert_sale(&mut self, user_id: i64) -> Result<&Sale, CheckoutError> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents)
            VALUES ($1, NOW(), 0, 0, 0, 0)
            RETURNING sale_id, user_id, sale_date, subtotal_cents, discount_bps, discount_cents, total_cents
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *self.tx)
        .await?;

        debug!(sale_id = %sale.sale_id, user_id = %user_id, "Sale row inserted");
        Ok(&*self.sale.insert(sale))
    }

    /// Takes the row lock on a product's inventory and returns the locked
    /// quantity. Blocks while another transaction holds the lock.
    pub async fn lock_inventory(&mut self, product_id: i64) -> Result<i32, CheckoutError> {
        let quantity: Option<i32> = sqlx::query_scalar(
            "SELECT quantity_in_stock FROM inventory WHERE product_id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        match quantity {
            Some(quantity) => {
                debug!(product_id = %product_id, quantity = %quantity, "Inventory row locked");
                Ok(quantity)
            }
            None => Err(CoreError::not_found("Inventory for product", product_id).into()),
        }
    }

    /// Inserts one sale item and adds its line total to the running subtotal.
    pub async fn insert_item(
        &mut self,
        sale_id: i64,
        line: &NewSaleItem,
    ) -> Result<&SaleItem, CheckoutError> {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, price_at_sale_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING sale_item_id, sale_id, product_id, quantity, price_at_sale_cents
            "#,
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.price_at_sale.cents())
        .fetch_one(&mut *self.tx)
        .await?;

        self.subtotal = item
            .price_at_sale()
            .checked_multiply_quantity(i64::from(item.quantity))
            .and_then(|total| self.subtotal.checked_add(total))
            .ok_or_else(subtotal_overflow)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Decrements stock on an already locked row.
    pub async fn decrement_stock(&mut self, product_id: i64, quantity: i32) -> Result<(), CheckoutError> {
        sqlx::query(
            r#"
            UPDATE inventory
            SET quantity_in_stock = quantity_in_stock - $2, last_updated = NOW()
            WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    /// Writes subtotal, rate, discount and total onto the sale row.
    pub async fn finalize_totals(&mut self, rate: DiscountRate) -> Result<&Sale, CheckoutError> {
        let sale_id = match &self.sale {
            Some(sale) => sale.sale_id,
            None => {
                return Err(DbError::Internal("finalize_totals called before insert_sale".into()).into())
            }
        };

        let breakdown = DiscountBreakdown::compute(self.subtotal, rate);

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
        .bind(sale_id)
        .bind(breakdown.subtotal.cents())
        .bind(breakdown.rate.bps() as i32)
        .bind(breakdown.discount.cents())
        .bind(breakdown.total.cents())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(&*self.sale.insert(sale))
    }

    /// Issues `COMMIT` and hands back what was written.
    pub async fn commit(self) -> Result<CompletedSale, CheckoutError> {
        let SaleTransaction { tx, sale, items, .. } = self;

        let sale = match sale {
            Some(sale) => sale,
            None => return Err(DbError::Internal("commit called before insert_sale".into()).into()),
        };

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            sale_id = %sale.sale_id,
            user_id = %sale.user_id,
            items = items.len(),
            total = %sale.total(),
            "Sale committed"
        );

        Ok(CompletedSale { sale, items })
    }

    /// Issues `ROLLBACK`. A failing rollback is only logged: the server
    /// discards the transaction anyway once the connection is dropped.
    pub async fn rollback(self, reason: &CheckoutError) {
        let sale_id = self.sale.as_ref().map(|sale| sale.sale_id);
        warn!(?sale_id, error = %reason, "Rolling back sale");

        if let Err(err) = self.tx.rollback().await {
            warn!(error = %err, "Rollback failed");
        }
    }
}
