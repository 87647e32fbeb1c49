//! Shopping Cart State Management
//!
//! In-memory cart storage for the reference `/update_item/` backend.

use super::helpers::total_items;
use super::models::{Action, CartAction};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

// =============================================================================
// Application State
// =============================================================================

/// Shared application state that can be safely passed between threads
pub type SharedState = Arc<AppState>;

/// Carts keyed by session id, each mapping product id to quantity
#[derive(Default)]
pub struct AppState {
    /// DashMap allows concurrent access without external Mutexes.
    pub carts: DashMap<String, HashMap<String, u32>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one cart action for `session_id` and returns the new item count.
    ///
    /// Removing the last unit deletes the line; removing a product that is not
    /// in the cart leaves it unchanged.
    pub fn apply(&self, session_id: &str, cart_action: &CartAction) -> u32 {
        let mut lines = self.carts.entry(session_id.to_string()).or_default();
        match cart_action.action {
            Action::Add => {
                *lines.entry(cart_action.product_id.clone()).or_insert(0) += 1;
            }
            Action::Remove => {
                if let Some(quantity) = lines.get_mut(&cart_action.product_id) {
                    *quantity = quantity.saturating_sub(1);
                    if *quantity == 0 {
                        lines.remove(&cart_action.product_id);
                    }
                }
            }
        }
        total_items(&lines)
    }

    /// Current item count for `session_id` (zero for unknown sessions).
    pub fn cart_items(&self, session_id: &str) -> u32 {
        self.carts
            .get(session_id)
            .map(|lines| total_items(&lines))
            .unwrap_or(0)
    }
}
