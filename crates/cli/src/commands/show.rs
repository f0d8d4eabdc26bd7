//! One-shot render of a user's cart.
//!
//! # Usage
//!
//! ```bash
//! usercart show --user u1 --remove p2 --filter Sh
//! ```
//!
//! # Environment Variables
//!
//! - `USERCART_API_BASE_URL` - API root (default `http://api-url.com`)
//! - `USERCART_REQUEST_TIMEOUT_SECS` - Per-request timeout
//! - `SENTRY_DSN` - Report failures to Sentry

use usercart_core::{ItemId, UserId};
use usercart_storefront::{CartTransport, UserCartView, ViewError, WidgetConfig};

/// Load `user`, apply `filter` and `remove`, and print the widget.
///
/// # Errors
///
/// Fails on the first fetch, remove or render error.
pub async fn run(
    config: &WidgetConfig,
    user: UserId,
    remove: &[ItemId],
    filter: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut view = super::build_view(config)?;
    prepare(&mut view, user, remove, filter).await?;
    super::emit(&view.render()?)?;
    Ok(())
}

/// Bind the view, then filter, then remove.
///
/// Filtering republishes from the service's stored cart, so it has to
/// happen before the local removals or removed items would reappear.
async fn prepare<T: CartTransport>(
    view: &mut UserCartView<T>,
    user: UserId,
    remove: &[ItemId],
    filter: Option<&str>,
) -> Result<(), ViewError> {
    view.set_user_id(user).await?;

    if let Some(term) = filter {
        view.filter_items(term);
    }

    for item_id in remove {
        if !view.remove(item_id).await? {
            tracing::info!(%item_id, "Item was not in the displayed cart");
        }
    }

    Ok(())
}
