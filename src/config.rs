//! Client and backend configuration
//!
//! Defaults mirror the storefront's conventions: a Django-style CSRF cookie
//! and header pair, the `/update_item/` endpoint and `/cart/` page path.

use crate::error::{CartError, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

/// Endpoint that accepts cart mutations.
pub const DEFAULT_ENDPOINT_PATH: &str = "/update_item/";
/// Cookie the backend sets with the CSRF secret.
pub const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
/// Header the backend checks against the CSRF cookie.
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";
/// Path fragment identifying the cart page, which is reloaded after updates.
pub const DEFAULT_CART_PATH_MARKER: &str = "/cart/";
/// Session identity the server renders for guests.
pub const ANONYMOUS_USER: &str = "AnonymousUser";
/// Default bind address of the reference backend.
pub const DEFAULT_BACKEND_ADDR: &str = "0.0.0.0:8000";

/// Settings for [`crate::client::CartUpdateClient`] and its HTTP transport.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Scheme and authority of the storefront, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    pub endpoint_path: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    pub cart_path_marker: String,
    /// Request timeout in seconds; `0` waits forever.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            endpoint_path: DEFAULT_ENDPOINT_PATH.to_string(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER.to_string(),
            cart_path_marker: DEFAULT_CART_PATH_MARKER.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    /// Creates a default config pointing at `base_url`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(CartError::InvalidConfig("base_url must not be empty".into()));
        }
        if !self.endpoint_path.starts_with('/') {
            return Err(CartError::InvalidConfig(format!(
                "endpoint_path must start with '/': {}",
                self.endpoint_path
            )));
        }
        if self.csrf_cookie_name.trim().is_empty() || self.csrf_header_name.trim().is_empty() {
            return Err(CartError::InvalidConfig(
                "CSRF cookie and header names must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Absolute URL of the update endpoint.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint_path
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

/// Settings for the reference backend binary.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub addr: SocketAddr,
}

impl BackendConfig {
    /// Reads `CART_BACKEND_ADDR`, falling back to [`DEFAULT_BACKEND_ADDR`].
    pub fn from_env() -> Result<Self> {
        let raw =
            std::env::var("CART_BACKEND_ADDR").unwrap_or_else(|_| DEFAULT_BACKEND_ADDR.to_string());
        let addr = raw
            .parse()
            .map_err(|_| CartError::InvalidConfig(format!("invalid CART_BACKEND_ADDR: {raw}")))?;
        Ok(Self { addr })
    }
}
