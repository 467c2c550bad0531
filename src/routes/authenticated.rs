use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// Defines the routes accessible once a request carries a valid bearer token:
/// the full post CRUD surface.
///
/// Access Control Strategy:
/// Every handler in this module relies on the `AuthUser` extractor middleware
/// being layered above this module in `create_router`. A request that reaches
/// a handler here has already presented a token that verified and has not
/// expired.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/posts?page=...&limit=...
        // One page of posts, newest first. POST creates a new post (201).
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        // GET/PUT/DELETE /api/posts/{id}
        // Retrieve, partially update, or permanently remove a single post.
        .route(
            "/api/posts/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
}
