//! Cart route handlers. Every route acts on the caller's own cart.

use axum::extract::{Path, State};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use storekeep_core::{ProductId, Quantity};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::{Cart, CartView};
use crate::routes::envelope::Envelope;
use crate::state::AppState;
use crate::validation::{JsonBody, ValidationError, Violations, integer, path_id};

const INVALID_PRODUCT_ID: &str = "Valid product ID required";

/// Body of `POST /cart/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemBody {
    product_id: Option<Value>,
    quantity: Option<Value>,
}

impl AddItemBody {
    fn validate(self) -> std::result::Result<(ProductId, Quantity), ValidationError> {
        let mut v = Violations::new();

        let product_id = v.require(
            integer(self.product_id.as_ref())
                .and_then(|n| i32::try_from(n).ok())
                .map(ProductId::new),
            INVALID_PRODUCT_ID,
        );
        let quantity = v.require(
            integer(self.quantity.as_ref())
                .and_then(|n| u32::try_from(n).ok())
                .and_then(|n| Quantity::new(n).ok()),
            "Quantity must be at least 1",
        );
        v.finish()?;

        product_id
            .zip(quantity)
            .ok_or_else(|| ValidationError::single("Invalid cart item"))
    }
}

/// `GET /cart`
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, RequireUser(user): RequireUser) -> Envelope<CartView> {
    Envelope::ok(state.carts().view(user.id))
}

/// `POST /cart/add`
#[instrument(skip_all)]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    JsonBody(body): JsonBody<AddItemBody>,
) -> Result<Envelope<Cart>> {
    let (product_id, quantity) = body.validate()?;
    let cart = state.carts().add_item(user.id, product_id, quantity)?;
    Ok(Envelope::ok(cart).with_message("Product added to cart"))
}

/// `DELETE /cart/remove/{productId}`
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<String>,
) -> Result<Envelope<Cart>> {
    let product_id = path_id(&product_id, INVALID_PRODUCT_ID)?;
    let cart = state.carts().remove_item(user.id, product_id);
    Ok(Envelope::ok(cart).with_message("Product removed from cart"))
}

/// `DELETE /cart`
#[instrument(skip_all)]
pub async fn clear(State(state): State<AppState>, RequireUser(user): RequireUser) -> Envelope<Cart> {
    Envelope::ok(state.carts().clear(user.id)).with_message("Cart cleared")
}
