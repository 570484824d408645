//! Product catalog service.

use tracing::instrument;

use storekeep_core::ProductId;

use crate::models::{Product, ProductDraft};
use crate::store::{IdSpaceExhausted, Store};

/// Errors that can occur during catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("product {0} not found")]
    NotFound(ProductId),

    #[error(transparent)]
    Store(#[from] IdSpaceExhausted),
}

/// Catalog reads for everyone, writes for admins (enforced by the routes).
pub struct CatalogService<'a> {
    store: &'a Store,
}

impl<'a> CatalogService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Every product, in id order.
    #[must_use]
    pub fn list(&self) -> Vec<Product> {
        self.store.read().products.list().cloned().collect()
    }

    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if there is no such product.
    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store
            .read()
            .products
            .get(id)
            .cloned()
            .ok_or(CatalogError::NotFound(id))
    }

    /// Add a product and return it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Store` if no product id is left to assign.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub fn create(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = self
            .store
            .write()
            .products
            .create_returning(|id| Product::from_draft(id, draft))?
            .clone();

        tracing::info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// Replace the editable fields of a product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if there is no such product.
    #[instrument(skip(self, draft))]
    pub fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = self
            .store
            .write()
            .products
            .update(id, |p| p.apply(draft))
            .cloned()
            .ok_or(CatalogError::NotFound(id))?;

        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }

    /// Remove a product and return what was removed.
    ///
    /// Carts that still reference it keep their line; placing an order with
    /// that line fails until it is removed. Past orders keep their snapshot.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::NotFound` if there is no such product.
    #[instrument(skip(self))]
    pub fn delete(&self, id: ProductId) -> Result<Product, CatalogError> {
        let product = self
            .store
            .write()
            .products
            .delete(id)
            .ok_or(CatalogError::NotFound(id))?;

        tracing::info!(product_id = %id, "product deleted");
        Ok(product)
    }
}
