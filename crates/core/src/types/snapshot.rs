//! The value published to cart observers.

use serde::{Deserialize, Serialize};

use super::cart::CartItem;
use super::profile::UserProfile;

/// The combined user and cart state published for display.
///
/// A full snapshot carries both the user and the cart. A partial snapshot
/// (produced by filtering) carries only the cart; observers keep whatever
/// user they already hold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// The user, absent on cart-only updates.
    pub user: Option<UserProfile>,
    /// Cart items in display order.
    pub cart: Vec<CartItem>,
}

impl CartSnapshot {
    /// A full snapshot for a freshly fetched user and cart.
    #[must_use]
    pub const fn full(user: UserProfile, cart: Vec<CartItem>) -> Self {
        Self {
            user: Some(user),
            cart,
        }
    }

    /// A cart-only update.
    #[must_use]
    pub const fn cart_only(cart: Vec<CartItem>) -> Self {
        Self { user: None, cart }
    }

    /// Whether this snapshot carries a user.
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.user.is_some()
    }
}
