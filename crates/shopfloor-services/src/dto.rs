//! # Data Transfer Objects
//!
//! Shapes exchanged with the presentation layer.
//!
//! Outgoing DTOs serialize in camelCase with money as two-decimal strings
//! (`"13.50"`) and dates as `DD/MM/YYYY`. Incoming forms carry the raw text
//! a page submitted; they are parsed and validated by the services before
//! anything touches storage.

use serde::{Deserialize, Serialize};

use shopfloor_core::dates::format_display_date;
use shopfloor_core::{
    Inventory, InventoryWithProduct, Money, NewProduct, Product, ProductStatus, ProductUpdate,
    Sale, SaleItem, ValidationError,
};

// =============================================================================
// Outgoing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub product_id: i64,
    pub product_name: String,
    pub description: Option<String>,
    pub unit_price: String,
    pub product_type: String,
    pub status: ProductStatus,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto {
            unit_price: product.unit_price().to_decimal_string(),
            product_id: product.product_id,
            product_name: product.product_name,
            description: product.description,
            product_type: product.product_type,
            status: product.status,
        }
    }
}

/// A stock row, with product details when read through the joined query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDto {
    pub inventory_id: i64,
    pub product_id: i64,
    pub quantity_in_stock: i32,
    pub last_updated: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProductStatus>,
}

impl From<Inventory> for InventoryDto {
    fn from(row: Inventory) -> Self {
        InventoryDto {
            inventory_id: row.inventory_id,
            product_id: row.product_id,
            quantity_in_stock: row.quantity_in_stock,
            last_updated: format_display_date(&row.last_updated),
            product_name: None,
            unit_price: None,
            product_type: None,
            status: None,
        }
    }
}

impl From<InventoryWithProduct> for InventoryDto {
    fn from(row: InventoryWithProduct) -> Self {
        InventoryDto {
            inventory_id: row.inventory_id,
            product_id: row.product_id,
            quantity_in_stock: row.quantity_in_stock,
            last_updated: format_display_date(&row.last_updated),
            product_name: Some(row.product_name),
            unit_price: Some(Money::from_cents(row.unit_price_cents).to_decimal_string()),
            product_type: Some(row.product_type),
            status: Some(row.status),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDto {
    pub sale_item_id: i64,
    pub sale_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub price_at_sale: String,
    pub line_total: String,
}

impl From<SaleItem> for SaleItemDto {
    fn from(item: SaleItem) -> Self {
        SaleItemDto {
            price_at_sale: item.price_at_sale().to_decimal_string(),
            line_total: item.line_total().to_decimal_string(),
            sale_item_id: item.sale_item_id,
            sale_id: item.sale_id,
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// A sale as shown on a page. `items` is empty in list views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub sale_id: i64,
    pub user_id: i64,
    pub sale_date: String,
    pub subtotal: String,
    pub discount_percentage: String,
    pub discount_amount: String,
    pub total_amount: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<SaleItemDto>,
}

impl SaleDto {
    /// Builds the DTO with its items attached.
    pub fn with_items(sale: Sale, items: Vec<SaleItem>) -> Self {
        let mut dto = SaleDto::from(sale);
        dto.items = items.into_iter().map(SaleItemDto::from).collect();
        dto
    }
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        SaleDto {
            sale_id: sale.sale_id,
            user_id: sale.user_id,
            sale_date: format_display_date(&sale.sale_date),
            subtotal: sale.subtotal().to_decimal_string(),
            discount_percentage: sale.discount_rate().to_percentage_string(),
            discount_amount: sale.discount().to_decimal_string(),
            total_amount: sale.total().to_decimal_string(),
            items: Vec::new(),
        }
    }
}

// =============================================================================
// Incoming
// =============================================================================

/// Product fields as submitted by a form. Blank fields count as absent, so
/// an edit removes the description through `clear_description` instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub product_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub clear_description: bool,
    pub unit_price: Option<String>,
    pub product_type: Option<String>,
    pub status: Option<String>,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(field: &'a Option<String>, name: &str) -> Result<&'a str, ValidationError> {
    present(field).ok_or_else(|| ValidationError::Required {
        field: name.to_string(),
    })
}

impl ProductForm {
    /// Parses a create form. Name, price and type are required; status
    /// defaults to `available`.
    pub fn to_new_product(&self) -> Result<NewProduct, ValidationError> {
        let product_name = required(&self.product_name, "product_name")?.to_string();
        let unit_price = Money::parse_decimal(required(&self.unit_price, "unit_price")?)?;
        let product_type = required(&self.product_type, "product_type")?.to_string();
        let status = match present(&self.status) {
            Some(raw) => raw.parse()?,
            None => ProductStatus::default(),
        };

        Ok(NewProduct {
            product_name,
            description: present(&self.description).map(str::to_string),
            unit_price,
            product_type,
            status,
        })
    }

    /// Parses an edit form into a partial update (any subset of fields).
    pub fn to_update(&self) -> Result<ProductUpdate, ValidationError> {
        Ok(ProductUpdate {
            product_name: present(&self.product_name).map(str::to_string),
            description: present(&self.description).map(str::to_string),
            clear_description: self.clear_description,
            unit_price: present(&self.unit_price).map(Money::parse_decimal).transpose()?,
            product_type: present(&self.product_type).map(str::to_string),
            status: present(&self.status).map(str::parse::<ProductStatus>).transpose()?,
        })
    }
}

/// One line of a checkout as submitted. A blank `price_at_sale` means
/// "the product's current unit price".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineForm {
    pub product_id: String,
    pub quantity: String,
    #[serde(default)]
    pub price_at_sale: Option<String>,
}

impl SaleLineForm {
    pub fn new(product_id: impl Into<String>, quantity: impl Into<String>) -> Self {
        SaleLineForm {
            product_id: product_id.into(),
            quantity: quantity.into(),
            price_at_sale: None,
        }
    }

    /// Sets an explicit price snapshot.
    pub fn at_price(mut self, price: impl Into<String>) -> Self {
        self.price_at_sale = Some(price.into());
        self
    }
}
