//! Error types for the cart update client

use thiserror::Error;

/// Everything that can go wrong between a click and a counter update.
#[derive(Debug, Error)]
pub enum CartError {
    /// The clicked control lacks a required `data-*` attribute
    #[error("update-cart control is missing the `data-{0}` attribute")]
    MissingControlAttribute(&'static str),

    /// The control's `data-action` is neither `add` nor `remove`
    #[error("unknown cart action `{0}`")]
    UnknownAction(String),

    /// The request did not complete within the configured timeout
    #[error("cart update timed out")]
    Timeout,

    /// Connection-level failure talking to the backend
    #[error("cart update request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("backend rejected cart update with status {0}")]
    Status(u16),

    /// The response body was not `{"cart_items": <integer>}`
    #[error("malformed cart update response: {0}")]
    Decode(String),

    #[error("invalid client configuration: {0}")]
    InvalidConfig(String),
}

impl From<reqwest::Error> for CartError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CartError::Timeout
        } else if err.is_decode() {
            CartError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            CartError::Status(status.as_u16())
        } else {
            CartError::Transport(err)
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Decode(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
