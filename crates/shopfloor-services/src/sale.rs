//! # Sale Service
//!
//! Checkout, post-hoc discounts and sales reporting.
//!
//! ## Checkout
//! ```text
//! raw user id, lines, discount
//!       │  parse + validate everything (no storage yet)
//!       ▼
//! lines without a price ── snapshot current unit price from the catalog
//!       │
//!       ▼
//! SaleRepository::create_sale_with_items  (one transaction, row locks)
//!       │
//!       ▼
//! SaleDto with items
//! ```

use tracing::info;

use shopfloor_core::dates::parse_display_date;
use shopfloor_core::validation::{parse_id, validate_sale_lines};
use shopfloor_core::{
    DiscountBreakdown, DiscountRate, Money, NewSaleItem, ValidationError, MAX_SALE_LINES,
};
use shopfloor_db::Database;

use crate::dto::{SaleDto, SaleLineForm};
use crate::error::{ResultExt, ServiceError, ServiceResult};
use crate::input::parse_quantity;

/// A line after parsing, before its price is known for sure.
struct ParsedLine {
    product_id: i64,
    quantity: i32,
    price_at_sale: Option<Money>,
}

/// Sale operations for the presentation layer.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
}

impl SaleService {
    pub fn new(db: Database) -> Self {
        SaleService { db }
    }

    /// Creates a sale with its items and decrements stock, atomically.
    ///
    /// `discount` is a percentage such as `"10"` or `"12.5"`; blank or
    /// absent means no discount.
    ///
    /// ## Errors
    /// * `Validation` - bad user id, no lines, bad quantity/price/discount
    /// * `NotFound` - unknown user or product, or a product without stock row
    /// * `InsufficientStock` - with available and requested amounts
    /// * `Storage` - the transaction failed; nothing was written
    pub async fn checkout(
        &self,
        raw_user_id: &str,
        lines: &[SaleLineForm],
        discount: Option<&str>,
    ) -> ServiceResult<SaleDto> {
        let user_id = parse_id("user_id", raw_user_id)?;
        let rate = parse_discount(discount)?;
        let parsed = parse_lines(lines)?;

        let mut items = Vec::with_capacity(parsed.len());
        for line in parsed {
            let price_at_sale = match line.price_at_sale {
                Some(price) => price,
                None => self.current_price(line.product_id).await?,
            };
            items.push(NewSaleItem {
                product_id: line.product_id,
                quantity: line.quantity,
                price_at_sale,
            });
        }
        validate_sale_lines(&items)?;

        let completed = self
            .db
            .sales()
            .create_sale_with_items(user_id, &items, rate)
            .await
            .map_err(|err| ServiceError::from_checkout(err, format!("creating sale for user {user_id}")))?;

        info!(
            sale_id = %completed.sale.sale_id,
            units = completed.units(),
            total = %completed.sale.total(),
            "Checkout complete"
        );
        Ok(SaleDto::with_items(completed.sale, completed.items))
    }

    async fn current_price(&self, product_id: i64) -> ServiceResult<Money> {
        self.db
            .products()
            .find_by_id(product_id)
            .await
            .context(format!("loading product {product_id}"))?
            .map(|product| product.unit_price())
            .ok_or_else(|| ServiceError::not_found("Product", product_id))
    }

    /// Re-applies a discount to an existing sale.
    ///
    /// The stored subtotal is taken as authoritative; items are not summed
    /// again. Applying the same percentage twice gives the same figures.
    pub async fn apply_discount(&self, raw_sale_id: &str, raw_percentage: &str) -> ServiceResult<SaleDto> {
        let sale_id = parse_id("sale_id", raw_sale_id)?;
        let rate = DiscountRate::parse_percentage(raw_percentage)?;
        let context = format!("applying discount to sale {sale_id}");

        let sale = self
            .db
            .sales()
            .find_by_id(sale_id)
            .await
            .context(context.clone())?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        let breakdown = DiscountBreakdown::compute(sale.subtotal(), rate);

        let updated = self
            .db
            .sales()
            .update_totals(sale_id, &breakdown)
            .await
            .context(context)?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        info!(sale_id = %sale_id, rate = %rate, total = %updated.total(), "Discount applied");
        Ok(updated.into())
    }

    /// All sales, newest first, without items.
    pub async fn list(&self) -> ServiceResult<Vec<SaleDto>> {
        let sales = self.db.sales().find_all().await.context("listing sales")?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// One sale with its items.
    pub async fn get(&self, raw_sale_id: &str) -> ServiceResult<SaleDto> {
        let sale_id = parse_id("sale_id", raw_sale_id)?;
        let context = format!("loading sale {sale_id}");

        let sale = self
            .db
            .sales()
            .find_by_id(sale_id)
            .await
            .context(context.clone())?
            .ok_or_else(|| ServiceError::not_found("Sale", sale_id))?;

        let items = self
            .db
            .sale_items()
            .find_by_sale_id(sale_id)
            .await
            .context(context)?;

        Ok(SaleDto::with_items(sale, items))
    }

    pub async fn by_user(&self, raw_user_id: &str) -> ServiceResult<Vec<SaleDto>> {
        let user_id = parse_id("user_id", raw_user_id)?;

        let sales = self
            .db
            .sales()
            .find_by_user(user_id)
            .await
            .context(format!("listing sales of user {user_id}"))?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// Sales between two `DD/MM/YYYY` dates, both inclusive, newest first.
    ///
    /// Malformed dates and `start` after `end` are rejected before querying.
    pub async fn by_date_range(&self, raw_start: &str, raw_end: &str) -> ServiceResult<Vec<SaleDto>> {
        let start = parse_display_date("startDate", raw_start)?;
        let end = parse_display_date("endDate", raw_end)?;

        if start > end {
            return Err(ValidationError::InvalidRange {
                reason: format!("start date {} is after end date {}", raw_start.trim(), raw_end.trim()),
            }
            .into());
        }

        let sales = self
            .db
            .sales()
            .find_by_date_range(start, end)
            .await
            .context(format!("listing sales from {start} to {end}"))?;
        Ok(sales.into_iter().map(SaleDto::from).collect())
    }

    /// Sum of every sale's total.
    pub async fn total_revenue(&self) -> ServiceResult<Money> {
        self.db.sales().total_revenue().await.context("summing revenue")
    }

    pub async fn count(&self) -> ServiceResult<i64> {
        self.db.sales().count().await.context("counting sales")
    }

    /// Deletes a sale and its items. Stock is not restored.
    pub async fn delete(&self, raw_sale_id: &str) -> ServiceResult<()> {
        let sale_id = parse_id("sale_id", raw_sale_id)?;

        let deleted = self
            .db
            .sales()
            .delete(sale_id)
            .await
            .context(format!("deleting sale {sale_id}"))?;

        if !deleted {
            return Err(ServiceError::not_found("Sale", sale_id));
        }

        info!(sale_id = %sale_id, "Sale deleted");
        Ok(())
    }
}

fn parse_discount(raw: Option<&str>) -> Result<DiscountRate, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => DiscountRate::parse_percentage(raw),
        None => Ok(DiscountRate::zero()),
    }
}

fn parse_lines(lines: &[SaleLineForm]) -> Result<Vec<ParsedLine>, ValidationError> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    // Checked here too: unpriced lines each cost a catalog lookup
    if lines.len() > MAX_SALE_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_SALE_LINES as i64,
        });
    }

    lines
        .iter()
        .map(|line| {
            let price_at_sale = match line.price_at_sale.as_deref().map(str::trim) {
                Some(raw) if !raw.is_empty() => Some(Money::parse_decimal(raw)?),
                _ => None,
            };

            Ok(ParsedLine {
                product_id: parse_id("product_id", &line.product_id)?,
                quantity: parse_quantity(&line.quantity)?,
                price_at_sale,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::offline_db;

    #[test]
    fn test_parse_discount() {
        assert_eq!(parse_discount(None).unwrap(), DiscountRate::zero());
        assert_eq!(parse_discount(Some(" ")).unwrap(), DiscountRate::zero());
        assert_eq!(parse_discount(Some("10")).unwrap().bps(), 1000);
        assert!(parse_discount(Some("101")).is_err());
        assert!(parse_discount(Some("ten")).is_err());
    }

    #[test]
    fn test_parse_lines() {
        let parsed = parse_lines(&[
            SaleLineForm::new("4", "3").at_price("5.00"),
            SaleLineForm::new("7", "1"),
        ])
        .unwrap();

        assert_eq!(parsed[0].product_id, 4);
        assert_eq!(parsed[0].quantity, 3);
        assert_eq!(parsed[0].price_at_sale, Some(Money::from_cents(500)));
        assert_eq!(parsed[1].price_at_sale, None);

        assert!(parse_lines(&[]).is_err());
        assert!(parse_lines(&[SaleLineForm::new("4", "0")]).is_err());
        assert!(parse_lines(&[SaleLineForm::new("x", "1")]).is_err());
        assert!(parse_lines(&[SaleLineForm::new("4", "1").at_price("-1")]).is_err());
    }

    #[tokio::test]
    async fn test_checkout_validates_before_storage() {
        let service = SaleService::new(offline_db());

        let err = service.checkout("1", &[], None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::Required { .. })));

        let err = service
            .checkout("abc", &[SaleLineForm::new("1", "1")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = service
            .checkout("1", &[SaleLineForm::new("1", "1").at_price("1.00")], Some("150"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ValidationError::OutOfRange { .. })));
    }

    #[tokio::test]
    async fn test_checkout_rejects_too_many_lines_without_lookups() {
        // Unpriced lines would each need the catalog; the offline pool turns
        // any lookup into a Storage error.
        let service = SaleService::new(offline_db());
        let lines: Vec<_> = (1..=MAX_SALE_LINES + 1)
            .map(|id| SaleLineForm::new(id.to_string(), "1"))
            .collect();

        let err = service.checkout("1", &lines, None).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "items"
        ));
    }

    #[tokio::test]
    async fn test_checkout_rejects_overflowing_subtotal() {
        let service = SaleService::new(offline_db());

        let err = service
            .checkout(
                "1",
                &[SaleLineForm::new("1", "2").at_price("50000000000000000")],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "subtotal"
        ));
    }

    #[tokio::test]
    async fn test_date_range_rejects_malformed_dates() {
        let service = SaleService::new(offline_db());

        for (start, end) in [
            ("2024-01-01", "31/01/2024"),
            ("01/01/2024", "31-01-2024"),
            ("1/1/2024", "31/01/2024"),
            ("31/02/2024", "01/03/2024"),
            ("", "31/01/2024"),
        ] {
            let err = service.by_date_range(start, end).await.unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{start} - {end}: {err:?}");
        }
    }

    #[tokio::test]
    async fn test_date_range_rejects_reversed_range() {
        let service = SaleService::new(offline_db());

        let err = service.by_date_range("31/01/2024", "01/01/2024").await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::InvalidRange { .. })
        ));
    }

    #[tokio::test]
    async fn test_apply_discount_validates_percentage() {
        let service = SaleService::new(offline_db());

        assert!(matches!(
            service.apply_discount("5", "100.5").await.unwrap_err(),
            ServiceError::Validation(_)
        ));
        assert!(matches!(
            service.apply_discount("0", "10").await.unwrap_err(),
            ServiceError::Validation(_)
        ));
    }
}
