//! Click binding for `update-cart` controls

use super::page::Notice;
use super::updater::{CartUpdate, CartUpdateClient};
use crate::cart::models::{PageContext, SessionIdentity, UpdateCartControl};
use crate::error::{CartError, Result};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Alert shown when a guest clicks an update-cart control.
pub const GUEST_CART_MESSAGE: &str = "Please log in to add items to your cart.";

/// What a click did
#[derive(Debug)]
pub enum ClickOutcome {
    /// Guest session: alert shown, nothing sent
    Blocked,
    /// Control attributes were invalid: nothing sent
    Rejected(CartError),
    /// Request in flight; the handle resolves once the page is reconciled
    Dispatched(JoinHandle<Result<CartUpdate>>),
}

/// Binds update-cart controls on one page to a [`CartUpdateClient`].
pub struct CartBinding {
    client: Arc<CartUpdateClient>,
    user: SessionIdentity,
}

impl CartBinding {
    /// Runs once the page is ready: shows the server-rendered count and
    /// remembers who is browsing.
    pub fn initialize(client: Arc<CartUpdateClient>, context: PageContext) -> Self {
        client.show_initial_count(context.initial_cart_count);
        Self {
            client,
            user: context.user,
        }
    }

    pub fn client(&self) -> &Arc<CartUpdateClient> {
        &self.client
    }

    /// Click handler for one update-cart control.
    ///
    /// Returns immediately; the request runs on the tokio runtime, so this
    /// must be called from within one. A failed request restores the last
    /// confirmed count and shows a non-blocking notice.
    pub fn click(&self, control: &UpdateCartControl) -> ClickOutcome {
        if self.user.is_anonymous() {
            self.client.page().alert(GUEST_CART_MESSAGE);
            return ClickOutcome::Blocked;
        }

        let cart_action = match control.cart_action() {
            Ok(cart_action) => cart_action,
            Err(e) => {
                warn!(?control, "ignoring click on malformed update-cart control: {e}");
                return ClickOutcome::Rejected(e);
            }
        };

        let client = Arc::clone(&self.client);
        ClickOutcome::Dispatched(tokio::spawn(async move {
            let result = client.submit_cart_action(&cart_action).await;
            if let Err(e) = &result {
                warn!(product = %cart_action.product_id, "cart update failed: {e}");
                client.restore_confirmed_count();
                client.page().notify(Notice::UpdateFailed(e.to_string()));
            }
            result
        }))
    }
}
