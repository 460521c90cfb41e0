//! # Product Catalog
//!
//! The product list screen: an infinite-scroll list plus add/edit/delete.
//!
//! ## Paging State
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  refresh()     list(0, N)       ─► items = page      offset = len      │
//! │  load_more()   list(offset, N)  ─► items += page     offset += len     │
//! │                                                                         │
//! │  has_more = (last page len == N)                                       │
//! │  When the remaining rows are exactly N, one extra empty page is        │
//! │  fetched before has_more turns false.                                  │
//! │                                                                         │
//! │  add / update  ─► write, then refresh()                                │
//! │  delete        ─► write, then drop locally (offset - 1, no refetch)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiResult;
use inventario_core::validation::{
    parse_amount, parse_optional_quantity, parse_quantity, validate_price_cents,
    validate_product_name,
};
use inventario_core::{NewProduct, Product, ValidationError};
use inventario_db::Database;

/// Fields of the add-product screen, as typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductForm {
    pub name: String,
    pub quantity: String,
    pub sell_price: String,
    pub buy_price: String,
    /// Blank means 0.
    pub min_stock: String,
    /// Blank means 0.
    pub average_quantity: String,
    pub description: String,
    pub image: Option<Vec<u8>>,
    pub category_id: Option<i64>,
    pub owner: String,
}

impl ProductForm {
    pub fn validate(&self) -> Result<NewProduct, ValidationError> {
        Ok(NewProduct {
            name: validate_product_name(&self.name)?,
            quantity_hundredths: parse_quantity("quantity", &self.quantity)?.hundredths(),
            min_stock_hundredths: parse_optional_quantity("min stock", &self.min_stock)?.hundredths(),
            average_quantity_hundredths: parse_optional_quantity(
                "average quantity",
                &self.average_quantity,
            )?
            .hundredths(),
            description: self.description.trim().to_string(),
            image: self.image.clone(),
            sell_price_cents: parse_amount("sell price", &self.sell_price)?.cents(),
            buy_price_cents: parse_amount("buy price", &self.buy_price)?.cents(),
            category_id: self.category_id,
            owner: self.owner.trim().to_string(),
        })
    }
}

fn validate_existing(product: &Product) -> Result<Product, ValidationError> {
    let mut checked = product.clone();
    checked.name = validate_product_name(&product.name)?;

    for (field, value) in [
        ("quantity", product.quantity_hundredths),
        ("min stock", product.min_stock_hundredths),
        ("average quantity", product.average_quantity_hundredths),
    ] {
        if value < 0 {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                min: 0,
                max: i64::MAX,
            });
        }
    }

    validate_price_cents("sell price", product.sell_price_cents)?;
    validate_price_cents("buy price", product.buy_price_cents)?;
    Ok(checked)
}

/// In-memory product list owned by one screen.
#[derive(Debug, Clone)]
pub struct ProductCatalog {
    db: Database,
    page_size: u32,
    items: Vec<Product>,
    offset: u32,
    has_more: bool,
}

impl ProductCatalog {
    pub fn new(db: Database, page_size: u32) -> Self {
        ProductCatalog {
            db,
            page_size: page_size.max(1),
            items: Vec::new(),
            offset: 0,
            has_more: true,
        }
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Reloads the first page, discarding everything accumulated.
    pub async fn refresh(&mut self) -> ApiResult<()> {
        let page = self.db.products().list(0, self.page_size).await?;
        let len = page.len() as u32;

        self.items = page;
        self.offset = len;
        self.has_more = len == self.page_size;

        debug!(rows = len, has_more = self.has_more, "Catalog refreshed");
        Ok(())
    }

    /// Appends the next page. Returns how many rows arrived.
    pub async fn load_more(&mut self) -> ApiResult<usize> {
        if !self.has_more {
            return Ok(0);
        }

        let page = self.db.products().list(self.offset, self.page_size).await?;
        let len = page.len();

        self.offset += len as u32;
        self.has_more = len as u32 == self.page_size;
        self.items.extend(page);

        debug!(rows = len, offset = self.offset, "Catalog page appended");
        Ok(len)
    }

    /// Validates and inserts, then reloads from the first page.
    pub async fn add(&mut self, form: &ProductForm) -> ApiResult<i64> {
        let product = form.validate()?;
        let id = self.db.products().insert(&product).await?;
        info!(id, name = %product.name, "Product added");

        self.refresh().await?;
        Ok(id)
    }

    pub async fn update(&mut self, product: &Product) -> ApiResult<()> {
        let product = validate_existing(product)?;
        self.db.products().update(&product).await?;
        info!(id = product.id, "Product updated");

        self.refresh().await
    }

    /// Deletes in the store, then drops the row from the loaded list.
    pub async fn delete(&mut self, id: i64) -> ApiResult<()> {
        self.db.products().delete(id).await?;
        info!(id, "Product deleted");

        if let Some(pos) = self.items.iter().position(|p| p.id == id) {
            self.items.remove(pos);
            // the next page starts one row earlier now
            self.offset = self.offset.saturating_sub(1);
        }
        Ok(())
    }
}
