//! Integration test support for the user cart widget.
//!
//! [`StubApi`] serves the three storefront endpoints from memory on an
//! ephemeral port so the real `CartApiClient` can be driven end to end.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p usercart-integration-tests
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct StubData {
    users: HashMap<String, Value>,
    carts: HashMap<String, Vec<Value>>,
    user_errors: HashMap<String, Value>,
    failing_removes: HashSet<String>,
    removed: Vec<(String, String)>,
    requests: Vec<String>,
}

/// In-memory storefront API.
#[derive(Clone, Default)]
pub struct StubApi {
    data: Arc<Mutex<StubData>>,
}

impl StubApi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `u1` / `Ann` / `c1` fixture with `p1 Shoes` and `p2 Shirt`.
    #[must_use]
    pub fn ann() -> Self {
        Self::new()
            .user("u1", "Ann", "c1")
            .cart("c1", &[("p1", "Shoes"), ("p2", "Shirt")])
    }

    #[must_use]
    pub fn user(self, id: &str, name: &str, cart_id: &str) -> Self {
        self.lock()
            .users
            .insert(id.to_owned(), json!({ "id": id, "name": name, "cart_id": cart_id }));
        self
    }

    #[must_use]
    pub fn cart(self, cart_id: &str, items: &[(&str, &str)]) -> Self {
        let items = items
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect();
        self.lock().carts.insert(cart_id.to_owned(), items);
        self
    }

    /// Answer the user endpoint with HTTP 200 and a non-null `error`.
    #[must_use]
    pub fn user_error(self, id: &str, error: Value) -> Self {
        self.lock().user_errors.insert(id.to_owned(), error);
        self
    }

    /// Make DELETE for `item_id` fail with HTTP 500.
    #[must_use]
    pub fn failing_remove(self, item_id: &str) -> Self {
        self.lock().failing_removes.insert(item_id.to_owned());
        self
    }

    /// `(user_id, item_id)` pairs successfully deleted so far.
    #[must_use]
    pub fn removed(&self) -> Vec<(String, String)> {
        self.lock().removed.clone()
    }

    /// Request paths served so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.lock().requests.clone()
    }

    /// Serve on `127.0.0.1` and return the base URL.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot bind.
    pub async fn spawn(&self) -> std::io::Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let app = Router::new()
            .route("/v2/user/{user_id}", get(get_user))
            .route("/v2/cart/{cart_id}", get(get_cart))
            .route("/v2/user/{user_id}/cart/{item_id}", delete(remove_item))
            .with_state(self.clone());

        tokio::spawn(async move { axum::serve(listener, app).await });

        Ok(format!("http://{addr}"))
    }

    fn lock(&self) -> MutexGuard<'_, StubData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn get_user(State(api): State<StubApi>, Path(user_id): Path<String>) -> Response {
    let mut data = api.lock();
    data.requests.push(format!("GET /v2/user/{user_id}"));

    if let Some(error) = data.user_errors.get(&user_id) {
        return axum::Json(json!({ "data": null, "error": error })).into_response();
    }
    match data.users.get(&user_id) {
        Some(user) => axum::Json(json!({ "data": user, "error": null })).into_response(),
        None => (StatusCode::NOT_FOUND, "user not found").into_response(),
    }
}

async fn get_cart(State(api): State<StubApi>, Path(cart_id): Path<String>) -> Response {
    let mut data = api.lock();
    data.requests.push(format!("GET /v2/cart/{cart_id}"));

    match data.carts.get(&cart_id) {
        Some(items) => axum::Json(json!({ "data": items })).into_response(),
        None => (StatusCode::NOT_FOUND, "cart not found").into_response(),
    }
}

async fn remove_item(
    State(api): State<StubApi>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> StatusCode {
    let mut data = api.lock();
    data.requests
        .push(format!("DELETE /v2/user/{user_id}/cart/{item_id}"));

    if data.failing_removes.contains(&item_id) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }

    let cart_id = data
        .users
        .get(&user_id)
        .and_then(|user| user["cart_id"].as_str())
        .map(str::to_owned);
    if let Some(items) = cart_id.and_then(|id| data.carts.get_mut(&id))
        && let Some(index) = items.iter().position(|item| item["id"] == item_id.as_str())
    {
        items.remove(index);
    }
    data.removed.push((user_id, item_id));
    StatusCode::NO_CONTENT
}
