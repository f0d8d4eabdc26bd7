//! User profile type.

use serde::{Deserialize, Serialize};

use super::id::{CartId, UserId};

/// A storefront user as returned by the profile endpoint.
///
/// Immutable once constructed; a new profile replaces the old one on every
/// successful fetch. `cart_id` names the cart that belongs to this user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// User identifier.
    pub id: UserId,
    /// Name shown in the widget heading.
    pub display_name: String,
    /// Identifier of the user's cart.
    pub cart_id: CartId,
}

impl UserProfile {
    /// Create a new user profile.
    #[must_use]
    pub fn new(id: UserId, display_name: impl Into<String>, cart_id: CartId) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            cart_id,
        }
    }
}
