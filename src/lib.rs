//! Storefront Cart Client Library
//!
//! Client side of a storefront's cart counter: sends add/remove requests to
//! `/update_item/` with the page's CSRF token and reconciles the displayed
//! item count with the backend's answer. A small in-memory backend for the
//! same endpoint is included for local runs and tests.

// Domain modules
pub mod cart;
pub mod client;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;

pub use error::{CartError, Result};
