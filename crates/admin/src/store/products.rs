//! Product catalog table.

use chrono::{DateTime, Utc};

use stockroom_core::ProductId;

use super::StoreError;
use crate::models::{Product, ProductDraft};

/// Products keyed by id, kept in insertion order.
#[derive(Debug, Clone)]
pub struct ProductStore {
    products: Vec<Product>,
    next_id: ProductId,
}

impl ProductStore {
    #[must_use]
    pub fn new(products: Vec<Product>) -> Self {
        let next_id = products
            .iter()
            .map(|p| p.id)
            .max()
            .map_or(ProductId::new(1), |id| id.next());
        Self { products, next_id }
    }

    /// All products.
    #[must_use]
    pub fn list(&self) -> &[Product] {
        &self.products
    }

    /// Products whose name, SKU or category contains `query`, ignoring case.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products.iter().filter(|p| p.matches(&needle)).collect()
    }

    /// Products at or below their minimum stock.
    #[must_use]
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    /// Look up a product by id.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this id.
    pub fn get(&self, id: ProductId) -> Result<&Product, StoreError> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound("product"))
    }

    /// Add a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the SKU is already used.
    pub fn create(&mut self, draft: ProductDraft, now: DateTime<Utc>) -> Result<Product, StoreError> {
        self.ensure_unique_sku(&draft.sku, None)?;
        let product = Product {
            id: self.next_id,
            name: draft.name,
            description: draft.description,
            sku: draft.sku,
            category: draft.category,
            price: draft.price,
            cost: draft.cost,
            stock: draft.stock,
            min_stock: draft.min_stock,
            supplier: draft.supplier,
            image: None,
            created_at: now,
            updated_at: now,
        };
        self.next_id = self.next_id.next();
        self.products.push(product.clone());
        Ok(product)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` for an unknown id, or
    /// `StoreError::Conflict` if the SKU belongs to another product.
    pub fn update(
        &mut self,
        id: ProductId,
        draft: ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        self.ensure_unique_sku(&draft.sku, Some(id))?;
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StoreError::NotFound("product"))?;
        product.name = draft.name;
        product.description = draft.description;
        product.sku = draft.sku;
        product.category = draft.category;
        product.price = draft.price;
        product.cost = draft.cost;
        product.stock = draft.stock;
        product.min_stock = draft.min_stock;
        product.supplier = draft.supplier;
        product.updated_at = now;
        Ok(product.clone())
    }

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no product has this id.
    pub fn delete(&mut self, id: ProductId) -> Result<Product, StoreError> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(StoreError::NotFound("product"))?;
        Ok(self.products.remove(index))
    }

    fn ensure_unique_sku(&self, sku: &str, except: Option<ProductId>) -> Result<(), StoreError> {
        let taken = self
            .products
            .iter()
            .any(|p| Some(p.id) != except && p.sku.eq_ignore_ascii_case(sku));
        if taken {
            return Err(StoreError::Conflict(format!("SKU {sku} is already in use")));
        }
        Ok(())
    }
}
