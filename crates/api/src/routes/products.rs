//! Product route handlers.
//!
//! Reads are public; writes require an admin.

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use storekeep_core::{Price, ProductId};

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductDraft};
use crate::routes::envelope::Envelope;
use crate::state::AppState;
use crate::validation::{
    JsonBody, ValidationError, Violations, decimal, integer, non_empty_str, path_id,
};

const INVALID_PRODUCT_ID: &str = "Valid product ID required";

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    name: Option<Value>,
    description: Option<Value>,
    price: Option<Value>,
    stock: Option<Value>,
}

impl ProductBody {
    fn validate(self) -> std::result::Result<ProductDraft, ValidationError> {
        let mut v = Violations::new();

        let name = v.require(non_empty_str(self.name.as_ref()), "Product name is required");
        let description = v.require(
            non_empty_str(self.description.as_ref()),
            "Description is required",
        );
        let price = v.require(
            decimal(self.price.as_ref())
                .and_then(|amount| Price::new(amount).ok())
                .filter(|price| price.is_positive()),
            "Price must be greater than 0",
        );
        let stock = v.require(
            integer(self.stock.as_ref()).and_then(|n| u32::try_from(n).ok()),
            "Stock must be a non-negative integer",
        );
        v.finish()?;

        match (name, description, price, stock) {
            (Some(name), Some(description), Some(price), Some(stock)) => Ok(ProductDraft {
                name: name.to_string(),
                description: description.to_string(),
                price,
                stock,
            }),
            _ => Err(ValidationError::single("Invalid product")),
        }
    }
}

fn product_id(raw: &str) -> std::result::Result<ProductId, ValidationError> {
    path_id(raw, INVALID_PRODUCT_ID)
}

/// `GET /products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Envelope<Vec<Product>> {
    Envelope::list(state.catalog().list())
}

/// `GET /products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Envelope<Product>> {
    let product = state.catalog().get(product_id(&id)?)?;
    Ok(Envelope::ok(product))
}

/// `POST /products`
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    JsonBody(body): JsonBody<ProductBody>,
) -> Result<Envelope<Product>> {
    let product = state.catalog().create(body.validate()?)?;
    Ok(Envelope::created(product).with_message("Product created successfully"))
}

/// `PUT /products/{id}`
#[instrument(skip(state, _admin, body))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ProductBody>,
) -> Result<Envelope<Product>> {
    let id = product_id(&id)?;
    let draft = body.validate()?;
    let product = state.catalog().update(id, draft)?;
    Ok(Envelope::ok(product).with_message("Product updated successfully"))
}

/// `DELETE /products/{id}`
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Envelope<Product>> {
    let product = state.catalog().delete(product_id(&id)?)?;
    Ok(Envelope::ok(product).with_message("Product deleted successfully"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn body(value: Value) -> ProductBody {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_valid_product() {
        let draft = body(json!({
            "name": "Monitor",
            "description": "27 inch",
            "price": 199.5,
            "stock": "4"
        }))
        .validate()
        .unwrap();

        assert_eq!(draft.price.amount(), Decimal::new(1995, 1));
        assert_eq!(draft.stock, 4);
    }

    #[test]
    fn test_every_field_is_checked() {
        let err = body(json!({"name": "", "price": 0, "stock": -1}))
            .validate()
            .unwrap_err();

        assert_eq!(
            err.messages(),
            [
                "Product name is required",
                "Description is required",
                "Price must be greater than 0",
                "Stock must be a non-negative integer",
            ]
        );
    }

    #[test]
    fn test_zero_stock_is_allowed() {
        let draft = body(json!({
            "name": "Sold out",
            "description": "gone",
            "price": "1.00",
            "stock": 0
        }))
        .validate()
        .unwrap();
        assert_eq!(draft.stock, 0);
    }

    #[test]
    fn test_product_id() {
        assert_eq!(product_id("3").unwrap(), ProductId::new(3));
        assert_eq!(
            product_id("three").unwrap_err().messages(),
            [INVALID_PRODUCT_ID]
        );
    }
}
