//! User cart core - Shared types library.
//!
//! This crate provides the domain types used by the user cart widget:
//! - `storefront` - REST client, snapshot channel, service and view
//! - `cli` - Command-line driver for the widget
//!
//! # Architecture
//!
//! The core crate contains only types and pure cart operations - no I/O,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, user profiles, cart items and snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
