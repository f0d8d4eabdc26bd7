//! In-memory transport doubles shared by the unit tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::Notify;
use usercart_core::{CartId, CartItem, ItemId, UserId, UserProfile};

use crate::api::{ApiError, CartTransport};

/// A transport call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    User(String),
    Cart(String),
    Remove(String, String),
}

/// Serves canned users and carts and records every call.
#[derive(Default)]
pub struct StubTransport {
    users: HashMap<String, UserProfile>,
    carts: HashMap<String, Vec<CartItem>>,
    failing_removes: Vec<String>,
    /// Users whose profile fetch waits for `gate` before answering.
    gated_users: Vec<String>,
    pub gate: Notify,
    pub calls: Mutex<Vec<Call>>,
}

impl StubTransport {
    /// The `u1` / `Ann` / `c1` storefront fixture.
    pub fn ann() -> Self {
        Self::default()
            .with_user("u1", "Ann", "c1")
            .with_cart("c1", &[("p1", "Shoes"), ("p2", "Shirt")])
    }

    pub fn with_user(mut self, id: &str, name: &str, cart_id: &str) -> Self {
        self.users.insert(
            id.to_string(),
            UserProfile::new(UserId::from(id), name, CartId::from(cart_id)),
        );
        self
    }

    pub fn with_cart(mut self, id: &str, items: &[(&str, &str)]) -> Self {
        self.carts.insert(
            id.to_string(),
            items
                .iter()
                .map(|(item_id, name)| CartItem::new(*item_id, *name))
                .collect(),
        );
        self
    }

    pub fn failing_remove(mut self, item_id: &str) -> Self {
        self.failing_removes.push(item_id.to_string());
        self
    }

    pub fn gated(mut self, user_id: &str) -> Self {
        self.gated_users.push(user_id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl CartTransport for StubTransport {
    async fn fetch_user(&self, user_id: &UserId) -> Result<UserProfile, ApiError> {
        self.record(Call::User(user_id.to_string()));
        if self.gated_users.iter().any(|u| u == user_id.as_str()) {
            self.gate.notified().await;
        }
        self.users
            .get(user_id.as_str())
            .cloned()
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: format!("user {user_id} not found"),
            })
    }

    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Vec<CartItem>, ApiError> {
        self.record(Call::Cart(cart_id.to_string()));
        self.carts
            .get(cart_id.as_str())
            .cloned()
            .ok_or_else(|| ApiError::Remote(format!("cart {cart_id} not found")))
    }

    async fn remove_cart_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<(), ApiError> {
        self.record(Call::Remove(user_id.to_string(), item_id.to_string()));
        if self.failing_removes.iter().any(|i| i == item_id.as_str()) {
            return Err(ApiError::Status {
                status: 503,
                message: "try later".to_string(),
            });
        }
        Ok(())
    }
}
