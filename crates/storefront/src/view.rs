//! User cart view.
//!
//! Binds a user id to a [`UserCartService`], mirrors the latest published
//! snapshot and forwards filter and remove gestures. Rendering goes through
//! the `user_cart.html` Askama template.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use askama::Template;
use tracing::{debug, instrument, warn};
use usercart_core::{CartItem, ItemId, UserId, UserProfile, remove_first};

use crate::api::CartTransport;
use crate::channel::Subscription;
use crate::error::ViewError;
use crate::service::{RequestOutcome, UserCartService};

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    /// Percent-encoded product detail path.
    pub href: String,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            href: format!("/product/{}", urlencoding::encode(item.id.as_str())),
        }
    }
}

/// User cart widget template.
#[derive(Template)]
#[template(path = "user_cart.html")]
pub struct UserCartTemplate<'a> {
    pub display_name: Option<&'a str>,
    pub items: Vec<CartItemView>,
    pub filter_text: &'a str,
    pub error: Option<&'a str>,
}

/// State written by the channel observer.
#[derive(Default)]
struct ViewState {
    user: Option<UserProfile>,
    cart: Vec<CartItem>,
}

/// Presentation component for one user's cart.
pub struct UserCartView<T> {
    service: Arc<UserCartService<T>>,
    state: Arc<Mutex<ViewState>>,
    user_id: Option<UserId>,
    filter: String,
    last_error: Option<String>,
    _subscription: Subscription,
}

impl<T: CartTransport> UserCartView<T> {
    /// Create a view and subscribe it to the service's snapshots.
    ///
    /// Cart-only snapshots replace the cart and keep the current user.
    #[must_use]
    pub fn new(service: Arc<UserCartService<T>>) -> Self {
        let state = Arc::new(Mutex::new(ViewState::default()));
        let sink = Arc::clone(&state);
        let subscription = service.subscribe(move |snapshot| {
            let mut state = sink.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(user) = &snapshot.user {
                state.user = Some(user.clone());
            }
            state.cart.clone_from(&snapshot.cart);
        });

        Self {
            service,
            state,
            user_id: None,
            filter: String::new(),
            last_error: None,
            _subscription: subscription,
        }
    }

    /// Bind the view to a user and load their cart.
    ///
    /// Does nothing and returns `Ok(None)` when `user_id` is already bound.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Fetch` when loading fails; the error is also kept
    /// for rendering.
    pub async fn set_user_id(
        &mut self,
        user_id: UserId,
    ) -> Result<Option<RequestOutcome>, ViewError> {
        if self.user_id.as_ref() == Some(&user_id) {
            return Ok(None);
        }
        self.user_id = Some(user_id);
        self.refresh().await.map(Some)
    }

    /// Reload the bound user's data.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NoUser` when no user id is bound, or
    /// `ViewError::Fetch` when loading fails.
    #[instrument(skip(self), fields(user_id = ?self.user_id))]
    pub async fn refresh(&mut self) -> Result<RequestOutcome, ViewError> {
        let user_id = self.user_id.clone().ok_or(ViewError::NoUser)?;

        match self.service.request_user_data(&user_id).await {
            Ok(RequestOutcome::Published) => {
                self.last_error = None;
                self.filter.clear();
                Ok(RequestOutcome::Published)
            }
            Ok(RequestOutcome::Superseded) => Ok(RequestOutcome::Superseded),
            Err(err) => {
                self.last_error = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Forward filter input to the service.
    pub fn filter_items(&mut self, text: &str) {
        text.clone_into(&mut self.filter);
        self.service.filter_cart_items(text);
    }

    /// Remove an item from the current user's cart.
    ///
    /// After the API confirms, the first displayed item with `item_id` is
    /// dropped locally. Returns whether a displayed item was removed; an id
    /// that is not displayed leaves the cart as it is.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NoUser` before a user is loaded, or
    /// `ViewError::Remove` if the API call fails (the cart is left untouched).
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn remove(&mut self, item_id: &ItemId) -> Result<bool, ViewError> {
        let user_id = self
            .lock_state()
            .user
            .as_ref()
            .map(|user| user.id.clone())
            .ok_or(ViewError::NoUser)?;

        if let Err(err) = self
            .service
            .remove_item_from_user_cart(&user_id, item_id)
            .await
        {
            warn!(error = %err, "Remove from cart failed");
            self.last_error = Some(format!("Could not remove item {item_id}: {err}"));
            return Err(ViewError::Remove(err));
        }

        self.last_error = None;
        let removed = remove_first(&mut self.lock_state().cart, item_id).is_some();
        debug!(removed, "Remove confirmed");
        Ok(removed)
    }

    /// Render the widget as an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::Render` if the template fails to render.
    pub fn render(&self) -> Result<String, ViewError> {
        let state = self.lock_state();
        let template = UserCartTemplate {
            display_name: state.user.as_ref().map(|user| user.display_name.as_str()),
            items: state.cart.iter().map(CartItemView::from).collect(),
            filter_text: &self.filter,
            error: self.last_error.as_deref(),
        };
        Ok(template.render()?)
    }

    /// The bound user id.
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// The displayed user.
    #[must_use]
    pub fn user(&self) -> Option<UserProfile> {
        self.lock_state().user.clone()
    }

    /// The displayed cart items.
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        self.lock_state().cart.clone()
    }

    /// Message of the last failed gesture, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Current filter input text.
    #[must_use]
    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn lock_state(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
