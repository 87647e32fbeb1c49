//! REST API handler for the reference `/update_item/` endpoint
//!
//! Enough of the storefront backend to drive the client end to end: session
//! lookup from the `sessionid` cookie, a double-submit CSRF check, and the
//! `{"cart_items": n}` response.

use super::{helpers::extract_token, models::*, state::SharedState};
use crate::config::{DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER, DEFAULT_ENDPOINT_PATH};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::{info, warn};

/// Cookie carrying the authenticated session id
pub const SESSION_COOKIE: &str = "sessionid";

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new().route(DEFAULT_ENDPOINT_PATH, post(update_item))
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Endpoint: POST /update_item/
/// Applies one add/remove to the caller's cart and returns the new item count.
async fn update_item(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Json<CartAction>, JsonRejection>,
) -> Response {
    let cookies = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");

    let Some(session_id) = extract_token(&cookies, SESSION_COOKIE) else {
        warn!("update_item without session cookie");
        return reject(StatusCode::FORBIDDEN, "authentication required");
    };

    let expected = extract_token(&cookies, DEFAULT_CSRF_COOKIE);
    let presented = headers
        .get(DEFAULT_CSRF_HEADER)
        .and_then(|v| v.to_str().ok());
    match (expected.as_deref(), presented) {
        (Some(cookie), Some(header)) if cookie == header => {}
        _ => {
            warn!(session = %session_id, "update_item failed CSRF verification");
            return reject(StatusCode::FORBIDDEN, "CSRF verification failed");
        }
    }

    let cart_action = match body {
        Ok(Json(cart_action)) => cart_action,
        Err(e) => {
            warn!("update_item body rejected: {}", e.body_text());
            return reject(StatusCode::BAD_REQUEST, "invalid cart action");
        }
    };

    let cart_items = state.apply(&session_id, &cart_action);
    info!(
        session = %session_id,
        product = %cart_action.product_id,
        action = %cart_action.action,
        cart_items,
        "cart updated"
    );

    Json(UpdateItemResponse { cart_items }).into_response()
}
