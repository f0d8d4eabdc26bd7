//! User cart storefront widget.
//!
//! Fetches a user's profile and cart from the storefront REST API, publishes
//! them on a replaying snapshot channel and renders them as an HTML fragment.
//!
//! # Architecture
//!
//! - [`api`] - `CartTransport` capability and its `reqwest` implementation
//! - [`channel`] - Single-slot publish/subscribe cell with replay on subscribe
//! - [`service`] - `UserCartService`: sequential profile → cart pipeline,
//!   prefix filtering over the last fetched cart, item removal
//! - [`view`] - `UserCartView`: binds a user id, tracks the latest snapshot,
//!   forwards gestures and renders through Askama
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use usercart_storefront::{CartApiClient, UserCartService, UserCartView, WidgetConfig};
//!
//! let config = WidgetConfig::from_env()?;
//! let service = Arc::new(UserCartService::new(CartApiClient::new(&config)?));
//! let mut view = UserCartView::new(Arc::clone(&service));
//!
//! view.set_user_id("u1".into()).await?;
//! view.filter_items("Sh");
//! println!("{}", view.render()?);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod channel;
pub mod config;
pub mod error;
pub mod service;
pub mod view;

#[cfg(test)]
mod test_support;

pub use api::{ApiError, CartApiClient, CartTransport};
pub use channel::{SnapshotChannel, Subscription};
pub use config::{ConfigError, WidgetConfig};
pub use error::{FetchFailed, FetchStage, ViewError};
pub use service::{RequestOutcome, UserCartService};
pub use view::UserCartView;
