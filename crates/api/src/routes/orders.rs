//! Order route handlers.

use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use storekeep_core::{OrderId, OrderStatus, Price};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::{Order, OrderLine};
use crate::routes::envelope::Envelope;
use crate::state::AppState;
use crate::validation::path_id;

/// Receipt returned when an order is placed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub items: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderReceipt {
    fn from(order: Order) -> Self {
        Self {
            order_id: order.id,
            total_amount: order.total_amount,
            status: order.status,
            items: order.items,
            created_at: order.created_at,
        }
    }
}

/// `POST /orders`
#[instrument(skip_all)]
pub async fn place(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Envelope<OrderReceipt>> {
    let order = state.orders().place_order(user.id)?;
    Ok(Envelope::created(OrderReceipt::from(order)).with_message("Order placed successfully"))
}

/// `GET /orders`
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, RequireUser(user): RequireUser) -> Envelope<Vec<Order>> {
    Envelope::list(state.orders().orders_for_user(user.id))
}

/// `GET /orders/{id}`
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Envelope<Order>> {
    let order_id = path_id(&id, "Valid order ID required")?;
    let order = state.orders().order_for_user(user.id, order_id)?;
    Ok(Envelope::ok(order))
}
