//! `reqwest` implementation of [`CartTransport`].

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use usercart_core::{CartId, CartItem, ItemId, UserId, UserProfile};

use super::wire::{CartResponse, Envelope, UserResponse};
use super::{ApiError, CartTransport};
use crate::config::WidgetConfig;

/// Longest slice of an error body kept in `ApiError::Status`.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the storefront REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct CartApiClient {
    inner: Arc<CartApiClientInner>,
}

struct CartApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl CartApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WidgetConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(CartApiClientInner {
                client: builder.build()?,
                base_url: config.api_base_url.clone(),
            }),
        })
    }

    /// The API origin this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Build an endpoint URL from percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.inner.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Execute a GET and decode the response envelope.
    async fn get_envelope<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<Envelope<T>, ApiError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %truncate(&body, 500),
                "Storefront API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %truncate(&body, 500),
                "Failed to parse storefront API response"
            );
            ApiError::Parse(e)
        })
    }
}

impl CartTransport for CartApiClient {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn fetch_user(&self, user_id: &UserId) -> Result<UserProfile, ApiError> {
        let url = self.endpoint(&["v2", "user", user_id.as_str()]);
        let response: UserResponse = self.get_envelope(&url).await?;
        let profile = UserProfile::from(response.into_data()?);
        debug!(cart_id = %profile.cart_id, "Fetched user profile");
        Ok(profile)
    }

    #[instrument(skip(self), fields(cart_id = %cart_id))]
    async fn fetch_cart(&self, cart_id: &CartId) -> Result<Vec<CartItem>, ApiError> {
        let url = self.endpoint(&["v2", "cart", cart_id.as_str()]);
        let response: CartResponse = self.get_envelope(&url).await?;
        let items: Vec<CartItem> = response
            .into_data()?
            .into_iter()
            .map(CartItem::from)
            .collect();
        debug!(count = items.len(), "Fetched cart");
        Ok(items)
    }

    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id))]
    async fn remove_cart_item(&self, user_id: &UserId, item_id: &ItemId) -> Result<(), ApiError> {
        let url = self.endpoint(&["v2", "user", user_id.as_str(), "cart", item_id.as_str()]);
        let response = self.inner.client.delete(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        // The ack body is usually empty; honour an error envelope if one is sent.
        if let Ok(envelope) = serde_json::from_str::<Envelope<serde_json::Value>>(&body) {
            envelope.check()?;
        }

        debug!("Removed cart item");
        Ok(())
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
