//! User cart service.
//!
//! Mediates between a [`CartTransport`] and the views observing the
//! snapshot channel. Keeps the raw cart of the last successful fetch so
//! filtering never needs another request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, instrument, warn};
use usercart_core::{CartItem, CartSnapshot, ItemId, UserId, filter_by_prefix};

use crate::api::{ApiError, CartTransport};
use crate::channel::{SnapshotChannel, Subscription};
use crate::error::{FetchFailed, FetchStage};

/// How a `request_user_data` call ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// The fetched snapshot was stored and published.
    Published,
    /// A newer request was issued meanwhile; nothing was stored or published.
    Superseded,
}

/// Ticket identifying one logical request.
///
/// Issuing a new ticket invalidates every earlier one.
struct RequestToken<'a> {
    generation: u64,
    latest: &'a AtomicU64,
}

impl RequestToken<'_> {
    fn is_current(&self) -> bool {
        self.latest.load(Ordering::Acquire) == self.generation
    }
}

/// Fetches user profiles and carts and publishes them as [`CartSnapshot`]s.
pub struct UserCartService<T> {
    transport: T,
    channel: SnapshotChannel<CartSnapshot>,
    raw_cart: Mutex<Vec<CartItem>>,
    latest_request: AtomicU64,
    /// Serializes the token check with the store-and-publish step.
    publish_lock: Mutex<()>,
}

impl<T: CartTransport> UserCartService<T> {
    /// Create a service over the given transport with an empty channel.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            channel: SnapshotChannel::new(),
            raw_cart: Mutex::new(Vec::new()),
            latest_request: AtomicU64::new(0),
            publish_lock: Mutex::new(()),
        }
    }

    /// Fetch a user's profile, then their cart, and publish both.
    ///
    /// The cart fetch starts only after the profile fetch succeeded. If
    /// another request is issued while this one is in flight, this one
    /// finishes as [`RequestOutcome::Superseded`] without touching any state.
    ///
    /// # Errors
    ///
    /// Returns `FetchFailed` naming the failed stage. Nothing is stored or
    /// published in that case; a fetched profile without its cart is dropped.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn request_user_data(&self, user_id: &UserId) -> Result<RequestOutcome, FetchFailed> {
        let token = self.issue_token();

        let user = match self.transport.fetch_user(user_id).await {
            Ok(user) => user,
            Err(source) => return self.fail(&token, user_id, FetchStage::Profile, source),
        };

        if !token.is_current() {
            debug!("Request superseded after profile fetch");
            return Ok(RequestOutcome::Superseded);
        }

        let cart = match self.transport.fetch_cart(&user.cart_id).await {
            Ok(cart) => cart,
            Err(source) => return self.fail(&token, user_id, FetchStage::Cart, source),
        };

        let _guard = self.publish_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !token.is_current() {
            debug!("Request superseded after cart fetch");
            return Ok(RequestOutcome::Superseded);
        }

        debug!(cart_id = %user.cart_id, items = cart.len(), "Publishing snapshot");
        *self.raw_cart() = cart.clone();
        self.channel.publish(CartSnapshot::full(user, cart));
        Ok(RequestOutcome::Published)
    }

    /// Ask the API to remove an item from a user's cart.
    ///
    /// Neither the published snapshot nor the stored cart changes; callers
    /// reflect a successful removal themselves.
    ///
    /// # Errors
    ///
    /// Returns the transport error unchanged.
    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id))]
    pub async fn remove_item_from_user_cart(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
    ) -> Result<(), ApiError> {
        self.transport.remove_cart_item(user_id, item_id).await
    }

    /// Publish a cart-only snapshot with the stored items whose name starts
    /// with `term`.
    ///
    /// Always filters the full stored cart, so successive calls never compound.
    pub fn filter_cart_items(&self, term: &str) {
        let filtered = filter_by_prefix(&self.raw_cart(), term);
        debug!(term, matches = filtered.len(), "Filtered cart");
        self.channel.publish(CartSnapshot::cart_only(filtered));
    }

    /// Observe published snapshots. The latest one is replayed immediately.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&CartSnapshot) + Send + Sync + 'static,
    {
        self.channel.subscribe(observer)
    }

    /// The most recently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Option<CartSnapshot> {
        self.channel.current()
    }

    /// The unfiltered cart of the last successful fetch.
    #[must_use]
    pub fn stored_cart(&self) -> Vec<CartItem> {
        self.raw_cart().clone()
    }

    /// The channel snapshots are published on.
    #[must_use]
    pub const fn channel(&self) -> &SnapshotChannel<CartSnapshot> {
        &self.channel
    }

    #[cfg(test)]
    pub(crate) const fn transport(&self) -> &T {
        &self.transport
    }

    fn issue_token(&self) -> RequestToken<'_> {
        let generation = self.latest_request.fetch_add(1, Ordering::AcqRel) + 1;
        RequestToken {
            generation,
            latest: &self.latest_request,
        }
    }

    /// Map a transport failure, unless the request is already stale.
    fn fail(
        &self,
        token: &RequestToken<'_>,
        user_id: &UserId,
        stage: FetchStage,
        source: ApiError,
    ) -> Result<RequestOutcome, FetchFailed> {
        if !token.is_current() {
            debug!(%stage, error = %source, "Ignoring failure of superseded request");
            return Ok(RequestOutcome::Superseded);
        }
        warn!(%stage, error = %source, "Fetching user cart failed");
        Err(FetchFailed {
            user_id: user_id.clone(),
            stage,
            source,
        })
    }

    fn raw_cart(&self) -> MutexGuard<'_, Vec<CartItem>> {
        self.raw_cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
