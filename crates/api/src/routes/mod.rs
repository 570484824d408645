//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                          - Welcome document
//! GET    /health                    - Liveness check
//!
//! # Users
//! POST   /users/signup              - Register a shopper account
//! POST   /users/login               - Exchange credentials for a bearer token
//! GET    /users/profile             - Caller's profile (auth)
//!
//! # Products
//! GET    /products                  - Product listing
//! GET    /products/{id}             - Product detail
//! POST   /products                  - Create product (admin)
//! PUT    /products/{id}             - Update product (admin)
//! DELETE /products/{id}             - Delete product (admin)
//!
//! # Cart (auth)
//! GET    /cart                      - Cart with current product details
//! POST   /cart/add                  - Add or merge a line
//! DELETE /cart/remove/{productId}   - Remove a line
//! DELETE /cart                      - Empty the cart
//!
//! # Orders (auth)
//! POST   /orders                    - Place an order from the cart
//! GET    /orders                    - Caller's orders
//! GET    /orders/{id}               - One of the caller's orders
//! ```

pub mod cart;
pub mod envelope;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Json, Router,
    extract::Request,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(users::signup))
        .route("/login", post(users::login))
        .route("/profile", get(users::profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/add", post(cart::add))
        .route("/remove/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::place).get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome))
        .route("/health", get(health))
        .nest("/users", user_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
        .fallback(route_not_found)
}

/// The full application: routes, state, request tracing and Sentry.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(axum_middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
                user_id = tracing::field::Empty,
            )
        }))
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[derive(Debug, Serialize)]
struct Welcome {
    message: &'static str,
    version: &'static str,
    endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
struct Endpoints {
    users: &'static str,
    products: &'static str,
    cart: &'static str,
    orders: &'static str,
}

/// Welcome document listing the top-level resources.
async fn welcome() -> Json<Welcome> {
    Json(Welcome {
        message: "Welcome to the Storekeep API",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            users: "/users",
            products: "/products",
            cart: "/cart",
            orders: "/orders",
        },
    })
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}

async fn route_not_found() -> AppError {
    AppError::RouteNotFound
}
