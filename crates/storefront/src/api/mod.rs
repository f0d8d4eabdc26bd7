//! Storefront REST API access.
//!
//! # Endpoints
//!
//! ```text
//! GET    /v2/user/{user_id}                 - User profile  { data: { id, name, cart_id }, error }
//! GET    /v2/cart/{cart_id}                 - Cart contents { data: [{ id, name }], error }
//! DELETE /v2/user/{user_id}/cart/{item_id}  - Remove an item from the user's cart
//! ```
//!
//! The service never talks to HTTP directly; it is handed a [`CartTransport`]
//! so tests can substitute an in-memory double for [`CartApiClient`].

mod client;
mod wire;

pub use client::CartApiClient;

use std::future::Future;

use thiserror::Error;
use usercart_core::{CartId, CartItem, ItemId, UserId, UserProfile};

/// Errors that can occur when talking to the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The response body carried an `error` value or no `data`.
    #[error("Remote error: {0}")]
    Remote(String),
}

/// Transport capability used by the cart service.
///
/// Each operation is a single request; ordering between calls is the
/// caller's concern.
pub trait CartTransport: Send + Sync {
    /// Fetch a user's profile.
    fn fetch_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<UserProfile, ApiError>> + Send;

    /// Fetch the items of a cart.
    fn fetch_cart(
        &self,
        cart_id: &CartId,
    ) -> impl Future<Output = Result<Vec<CartItem>, ApiError>> + Send;

    /// Remove one item from a user's cart.
    fn remove_cart_item(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}
