//! Errors surfaced to the view layer.

use thiserror::Error;
use usercart_core::UserId;

use crate::api::ApiError;

/// Which step of the profile → cart pipeline failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    /// `GET /v2/user/{id}`
    Profile,
    /// `GET /v2/cart/{id}`
    Cart,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Profile => f.write_str("profile"),
            Self::Cart => f.write_str("cart"),
        }
    }
}

/// Loading a user's cart failed; nothing was published.
#[derive(Debug, Error)]
#[error("Failed to fetch {stage} for user {user_id}: {source}")]
pub struct FetchFailed {
    /// User whose data was requested.
    pub user_id: UserId,
    /// Step that failed.
    pub stage: FetchStage,
    /// Underlying transport error.
    #[source]
    pub source: ApiError,
}

/// Errors returned by view gestures.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Loading the bound user failed.
    #[error(transparent)]
    Fetch(#[from] FetchFailed),

    /// A gesture needs a loaded user and none is loaded yet.
    #[error("No user loaded")]
    NoUser,

    /// The remove request failed; the item stays displayed.
    #[error("Remove failed: {0}")]
    Remove(#[source] ApiError),

    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}
