//! Cart item type and pure cart list operations.

use serde::{Deserialize, Serialize};

use super::id::ItemId;

/// A single entry in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Item identifier, also used for the product detail link.
    pub id: ItemId,
    /// Display name, matched by the prefix filter.
    pub name: String,
}

impl CartItem {
    /// Create a new cart item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Keep the items whose name starts with `term`.
///
/// Matching is case-sensitive and order-preserving. An empty term keeps
/// every item.
#[must_use]
pub fn filter_by_prefix(items: &[CartItem], term: &str) -> Vec<CartItem> {
    items
        .iter()
        .filter(|item| item.name.starts_with(term))
        .cloned()
        .collect()
}

/// Remove the first item whose id equals `id`.
///
/// Returns the removed item, or `None` (leaving `items` untouched) when no
/// item matches.
pub fn remove_first(items: &mut Vec<CartItem>, id: &ItemId) -> Option<CartItem> {
    let index = items.iter().position(|item| &item.id == id)?;
    Some(items.remove(index))
}
