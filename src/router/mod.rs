//! Routing module for the reference storefront backend

use crate::cart::state::SharedState;
use axum::{body::Body, extract::Request, middleware::Next, response::Response, Router};
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Logs one line per request with method, path, status and latency.
async fn log_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let res = next.run(req).await;
    let status = res.status().as_u16();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if res.status().is_success() {
        info!(%method, %uri, status, elapsed_ms, "request served");
    } else {
        warn!(%method, %uri, status, elapsed_ms, "request failed");
    }
    res
}

/// Builds the backend router: the cart endpoint behind request logging and
/// a permissive CORS layer for local pages on other origins.
pub fn create_app_router(state: SharedState) -> Router {
    Router::new()
        .merge(crate::cart::routes())
        .layer(axum::middleware::from_fn(log_request))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
