//! Product domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{Price, ProductId};

/// A catalog product.
///
/// `stock` is unsigned, so it can never go below zero; the order transaction
/// checks every line against it before decrementing anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
    pub created_at: DateTime<Utc>,
}

/// Validated product fields, used both to create a product and to update
/// an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub stock: u32,
}

impl Product {
    /// Build a new product record from a draft.
    #[must_use]
    pub fn from_draft(id: ProductId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            price: draft.price,
            stock: draft.stock,
            created_at: Utc::now(),
        }
    }

    /// Overwrite the editable fields. `id` and `created_at` never change.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.description = draft.description;
        self.price = draft.price;
        self.stock = draft.stock;
    }
}
