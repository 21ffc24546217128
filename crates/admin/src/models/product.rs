//! Product catalog domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{Money, ProductId};

/// A stocked product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub sku: String,
    pub category: String,
    /// Selling price per unit.
    pub price: Money,
    /// Purchase cost per unit.
    pub cost: Money,
    /// Units on hand.
    pub stock: u32,
    /// Reorder threshold.
    pub min_stock: u32,
    pub supplier: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// A product is low on stock once it reaches its minimum.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Value of the units on hand at selling price.
    #[must_use]
    pub fn stock_value(&self) -> Money {
        self.price.times(self.stock)
    }

    /// Case-insensitive search over name, SKU and category.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.name.to_lowercase().contains(needle)
            || self.sku.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
    }
}

/// Validated field values for creating or updating a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub sku: String,
    pub category: String,
    pub price: Money,
    pub cost: Money,
    pub stock: u32,
    pub min_stock: u32,
    pub supplier: String,
}

/// Raw product form as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub min_stock: String,
    #[serde(default)]
    pub supplier: String,
}

/// A single form field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    #[must_use]
    pub const fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ProductForm {
    /// Validate the form, collecting every failing field.
    ///
    /// # Errors
    ///
    /// Returns all field errors when any field is missing or out of range.
    pub fn validate(&self) -> Result<ProductDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let mut required = |field: &'static str, value: &str, message: &'static str| {
            let value = value.trim();
            if value.is_empty() {
                errors.push(FieldError::new(field, message));
            }
            value.to_string()
        };
        let name = required("name", &self.name, "Product name is required");
        let description = required("description", &self.description, "Description is required");
        let sku = required("sku", &self.sku, "SKU is required");
        let category = required("category", &self.category, "Category is required");
        let supplier = required("supplier", &self.supplier, "Supplier is required");

        let price = Money::parse(&self.price)
            .map_err(|_| errors.push(FieldError::new("price", "Price must be positive")))
            .ok();
        let cost = Money::parse(&self.cost)
            .map_err(|_| errors.push(FieldError::new("cost", "Cost must be positive")))
            .ok();
        let stock = self
            .stock
            .trim()
            .parse::<u32>()
            .map_err(|_| errors.push(FieldError::new("stock", "Stock must be positive")))
            .ok();
        let min_stock = self
            .min_stock
            .trim()
            .parse::<u32>()
            .map_err(|_| {
                errors.push(FieldError::new(
                    "min_stock",
                    "Minimum stock must be positive",
                ));
            })
            .ok();

        match (price, cost, stock, min_stock) {
            (Some(price), Some(cost), Some(stock), Some(min_stock)) if errors.is_empty() => {
                Ok(ProductDraft {
                    name,
                    description,
                    sku,
                    category,
                    price,
                    cost,
                    stock,
                    min_stock,
                    supplier,
                })
            }
            _ => Err(errors),
        }
    }
}
