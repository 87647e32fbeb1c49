//! Cart Update Client Module
//!
//! Turns clicks on update-cart controls into `/update_item/` requests and
//! keeps the page's cart counter in line with the backend:
//! - Page seam (PageView) and an in-memory page
//! - Network seam (CartTransport) and its reqwest implementation
//! - The update client with stale-response protection
//! - Click binding

pub mod binding;
pub mod page;
pub mod transport;
pub mod updater;

pub use binding::{CartBinding, ClickOutcome, GUEST_CART_MESSAGE};
pub use page::{MemoryPage, Notice, PageView};
pub use transport::{CartTransport, HttpTransport, PageCredentials};
pub use updater::{CartUpdate, CartUpdateClient};
