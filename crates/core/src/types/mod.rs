//! Core types for the user cart widget.
//!
//! This module provides type-safe wrappers for the profile and cart concepts.

pub mod cart;
pub mod id;
pub mod profile;
pub mod snapshot;

pub use cart::{CartItem, filter_by_prefix, remove_first};
pub use id::*;
pub use profile::UserProfile;
pub use snapshot::CartSnapshot;
