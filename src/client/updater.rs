//! Cart update client: one request per cart action, counter reconciled from
//! the backend's authoritative response.

use super::page::PageView;
use super::transport::{CartTransport, PageCredentials};
use crate::cart::helpers::{extract_token, is_cart_page};
use crate::cart::models::CartAction;
use crate::config::ClientConfig;
use crate::error::Result;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a completed cart update request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartUpdate {
    /// Issue order of the request, starting at 1
    pub sequence: u64,
    /// Count returned by the backend
    pub cart_items: u32,
    /// False when a later-issued request had already updated the counter
    pub applied: bool,
    /// True when the page was reloaded after the counter update
    pub reloaded: bool,
}

struct Counter {
    /// Sequence of the newest response written to the page
    applied_sequence: u64,
    /// Last count the page shows with the backend's blessing
    confirmed: u32,
}

pub struct CartUpdateClient {
    config: ClientConfig,
    transport: Arc<dyn CartTransport>,
    page: Arc<dyn PageView>,
    issued: AtomicU64,
    counter: Mutex<Counter>,
}

impl CartUpdateClient {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn CartTransport>,
        page: Arc<dyn PageView>,
    ) -> Self {
        Self {
            config,
            transport,
            page,
            issued: AtomicU64::new(0),
            counter: Mutex::new(Counter {
                applied_sequence: 0,
                confirmed: 0,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn page(&self) -> &Arc<dyn PageView> {
        &self.page
    }

    /// Count the page currently shows as confirmed by the server.
    pub fn confirmed_count(&self) -> u32 {
        self.counter.lock().confirmed
    }

    /// Writes the server-rendered count to the page at load time.
    pub fn show_initial_count(&self, count: u32) {
        let mut counter = self.counter.lock();
        counter.confirmed = count;
        self.page.set_cart_count(&count.to_string());
    }

    /// Rewrites the last confirmed count, undoing anything shown since.
    pub fn restore_confirmed_count(&self) {
        let counter = self.counter.lock();
        self.page.set_cart_count(&counter.confirmed.to_string());
    }

    /// POSTs `cart_action` and writes the returned count to the page.
    ///
    /// A response is dropped if a later-issued request's response was already
    /// applied, so out-of-order completions never roll the counter back. On a
    /// cart page an applied response is followed by exactly one reload.
    pub async fn submit_cart_action(&self, cart_action: &CartAction) -> Result<CartUpdate> {
        let sequence = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        let cookies = self.page.cookies();
        let token = extract_token(&cookies, &self.config.csrf_cookie_name);
        if token.is_none() {
            warn!(
                cookie = %self.config.csrf_cookie_name,
                "no CSRF cookie on page, sending cart update without token"
            );
        }

        debug!(sequence, product = %cart_action.product_id, action = %cart_action.action, "cart update issued");
        let response = self
            .transport
            .update_item(
                cart_action,
                PageCredentials {
                    cookies: &cookies,
                    csrf_token: token.as_deref(),
                },
            )
            .await?;

        {
            let mut counter = self.counter.lock();
            if sequence < counter.applied_sequence {
                debug!(
                    sequence,
                    newer = counter.applied_sequence,
                    "dropping stale cart update response"
                );
                return Ok(CartUpdate {
                    sequence,
                    cart_items: response.cart_items,
                    applied: false,
                    reloaded: false,
                });
            }
            counter.applied_sequence = sequence;
            counter.confirmed = response.cart_items;
            self.page.set_cart_count(&response.cart_items.to_string());
        }
        info!(sequence, cart_items = response.cart_items, "cart updated");

        // Cart pages render line items server-side; a reload keeps them in
        // step with the counter until they are updated incrementally.
        let reloaded = is_cart_page(&self.page.pathname(), &self.config.cart_path_marker);
        if reloaded {
            self.page.reload();
        }

        Ok(CartUpdate {
            sequence,
            cart_items: response.cart_items,
            applied: true,
            reloaded,
        })
    }
}
