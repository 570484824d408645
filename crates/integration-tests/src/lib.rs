//! Integration tests for the Storekeep API.
//!
//! Each test gets its own server: a fresh store seeded with the demo
//! catalog and one admin account, bound to an ephemeral port on localhost.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storekeep-integration-tests
//! ```

use reqwest::{Client, Response, StatusCode};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use storekeep_api::config::ApiConfig;
use storekeep_api::services::NewUser;
use storekeep_api::store::Store;
use storekeep_api::{AppState, app};
use storekeep_core::Email;

pub const ADMIN_EMAIL: &str = "admin@storekeep.test";
pub const ADMIN_PASSWORD: &str = "admin-pass-123";
const TOKEN_SECRET: &str = "k9$Lq2!vB7@xN4#pR8^tW1&zY6*mC3%e";

/// A running server plus an HTTP client pointed at it.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub state: AppState,
}

impl TestContext {
    /// Start a server on `127.0.0.1:0`.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let config = ApiConfig::with_token_secret(SecretString::from(TOKEN_SECRET.to_string()))
            .expect("test secret is valid");
        let state = AppState::new(config, Store::with_demo_catalog());

        state
            .auth()
            .bootstrap_admin(NewUser {
                name: "Admin".to_string(),
                email: Email::parse(ADMIN_EMAIL).expect("valid admin email"),
                password: SecretString::from(ADMIN_PASSWORD.to_string()),
            })
            .expect("admin account created");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has an address");
        let router = app(state.clone());
        tokio::spawn(async move {
            axum_serve(listener, router).await;
        });

        Self {
            client: Client::new(),
            base_url: format!("http://{addr}"),
            state,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Send a request, optionally with a bearer token and JSON body, and
    /// return the status with the parsed JSON response.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the response is not JSON.
    pub async fn send(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = self.client.request(method, self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.expect("request failed");
        read_json(response).await
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::GET, path, token, None).await
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.send(reqwest::Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(reqwest::Method::DELETE, path, token, None).await
    }

    /// Log in and return the bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/users/login",
                None,
                json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["data"]["token"]
            .as_str()
            .expect("login returns a token")
            .to_string()
    }

    /// Register a shopper and return their token.
    ///
    /// # Panics
    ///
    /// Panics if signup or login is rejected.
    pub async fn shopper(&self, email: &str) -> String {
        let (status, body) = self
            .post(
                "/users/signup",
                None,
                json!({"name": "Shopper", "email": email, "password": "shopper-pass"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        self.login(email, "shopper-pass").await
    }

    pub async fn admin(&self) -> String {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Current stock of a product, read straight from the store.
    ///
    /// # Panics
    ///
    /// Panics if the product does not exist.
    #[must_use]
    pub fn stock(&self, product_id: i32) -> u32 {
        self.state
            .store()
            .read()
            .products
            .get(product_id.into())
            .expect("product exists")
            .stock
    }
}

async fn axum_serve(listener: TcpListener, router: axum::Router) {
    if let Err(e) = axum::serve(listener, router).await {
        panic!("test server stopped: {e}");
    }
}

async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = response.json().await.expect("response is JSON");
    (status, body)
}
