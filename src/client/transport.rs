//! Network seam between the cart client and the storefront backend

use crate::cart::models::{CartAction, UpdateItemResponse};
use crate::config::ClientConfig;
use crate::error::Result;
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::Client;
use tracing::debug;

/// Page cookies and the CSRF token taken from them, read together per request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCredentials<'a> {
    /// The page's `document.cookie` string at send time
    pub cookies: &'a str,
    /// `None` when the page has no CSRF cookie; the header is then omitted
    /// and the backend is expected to reject the request.
    pub csrf_token: Option<&'a str>,
}

/// Sends one cart mutation and returns the backend's authoritative count.
#[async_trait]
pub trait CartTransport: Send + Sync {
    async fn update_item(
        &self,
        cart_action: &CartAction,
        credentials: PageCredentials<'_>,
    ) -> Result<UpdateItemResponse>;
}

/// [`CartTransport`] over HTTP with `reqwest`.
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    csrf_header: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: config.endpoint_url(),
            csrf_header: config.csrf_header_name.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl CartTransport for HttpTransport {
    async fn update_item(
        &self,
        cart_action: &CartAction,
        credentials: PageCredentials<'_>,
    ) -> Result<UpdateItemResponse> {
        debug!(
            endpoint = %self.endpoint,
            product = %cart_action.product_id,
            action = %cart_action.action,
            "sending cart update"
        );

        let mut req = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(cart_action);
        if let Some(token) = credentials.csrf_token {
            req = req.header(self.csrf_header.as_str(), token);
        }
        // Attach the page's cookies as a browser would for a same-origin request.
        if !credentials.cookies.trim().is_empty() {
            req = req.header(COOKIE, credentials.cookies);
        }

        let resp = req.send().await?.error_for_status()?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
