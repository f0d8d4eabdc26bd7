//! CLI command implementations.

pub mod session;
pub mod show;

use std::io::Write;
use std::sync::Arc;

use usercart_storefront::{ApiError, CartApiClient, UserCartService, UserCartView, WidgetConfig};

/// Build a view wired to the HTTP API client.
pub fn build_view(config: &WidgetConfig) -> Result<UserCartView<CartApiClient>, ApiError> {
    let client = CartApiClient::new(config)?;
    tracing::debug!(base_url = %client.base_url(), "API client ready");
    Ok(UserCartView::new(Arc::new(UserCartService::new(client))))
}

/// Write rendered HTML to stdout.
pub fn emit(html: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{html}")?;
    stdout.flush()
}
