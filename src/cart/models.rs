//! Shopping Cart Domain Models
//!
//! Wire types exchanged with the `/update_item/` endpoint plus the page
//! context the storefront embeds at load time.

use crate::config::ANONYMOUS_USER;
use crate::error::CartError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Cart Domain Models
// =============================================================================

/// Mutation requested by an update-cart control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Add one unit of the product
    Add,
    /// Remove one unit of the product
    Remove,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Action::Add),
            "remove" => Ok(Action::Remove),
            other => Err(CartError::UnknownAction(other.to_string())),
        }
    }
}

/// Body of `POST /update_item/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartAction {
    /// Product identifier, sent verbatim from `data-product`
    pub product_id: String,

    pub action: Action,
}

impl CartAction {
    pub fn new(product_id: impl Into<String>, action: Action) -> Self {
        Self {
            product_id: product_id.into(),
            action,
        }
    }
}

/// Successful response from `POST /update_item/`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateItemResponse {
    /// Authoritative number of items in the user's cart
    pub cart_items: u32,
}

// =============================================================================
// Page Inputs
// =============================================================================

/// Who is browsing, as rendered into the page by the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionIdentity {
    Anonymous,
    Authenticated(String),
}

impl SessionIdentity {
    /// Interprets the server-rendered user marker; [`ANONYMOUS_USER`] is a guest.
    pub fn from_marker(user: &str) -> Self {
        if user == ANONYMOUS_USER {
            SessionIdentity::Anonymous
        } else {
            SessionIdentity::Authenticated(user.to_string())
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, SessionIdentity::Anonymous)
    }
}

/// Values the storefront embeds in the page before the cart script runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    pub user: SessionIdentity,

    /// Cart count rendered by the server at page load
    pub initial_cart_count: u32,
}

/// Data attributes of one `update-cart` control
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCartControl {
    /// `data-product`
    pub product: Option<String>,

    /// `data-action`
    pub action: Option<String>,
}

impl UpdateCartControl {
    pub fn new(product: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            product: Some(product.into()),
            action: Some(action.into()),
        }
    }

    /// Builds a control from an element's dataset (keys without the `data-` prefix).
    pub fn from_dataset(dataset: &HashMap<String, String>) -> Self {
        Self {
            product: dataset.get("product").cloned(),
            action: dataset.get("action").cloned(),
        }
    }

    /// Validates the attributes into a [`CartAction`].
    pub fn cart_action(&self) -> Result<CartAction, CartError> {
        let product = self
            .product
            .as_deref()
            .ok_or(CartError::MissingControlAttribute("product"))?;
        let action = self
            .action
            .as_deref()
            .ok_or(CartError::MissingControlAttribute("action"))?
            .parse()?;
        Ok(CartAction::new(product, action))
    }
}
