use crate::{AppState, handlers};
use axum::{Router, routing::{get, post}};

/// Public Router Module
///
/// Defines endpoints that are **unauthenticated** and accessible to any
/// client. Everything else in the API sits behind the bearer-token layer, so
/// the only gateways here are monitoring and the login exchange itself.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // A simple, unauthenticated endpoint used for monitoring and load
        // balancer checks. Returns "ok" immediately.
        .route("/health", get(|| async { "ok" }))
        // POST /api/auth/login
        // Exchanges credentials for a signed bearer token with a 24-hour
        // expiry. This is the only way to obtain a token.
        .route("/api/auth/login", post(handlers::login))
}
