//! Shopping Cart Domain Module
//!
//! This module contains the cart domain shared by the client and the
//! reference backend:
//! - Wire models (CartAction, UpdateItemResponse) and page inputs
//! - Helpers (cookie token extraction, cart-page detection)
//! - In-memory cart state
//! - The `/update_item/` handler

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::routes;
pub use models::{Action, CartAction, PageContext, SessionIdentity, UpdateCartControl};
pub use state::{AppState, SharedState};
