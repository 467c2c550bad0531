use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    AppState,
    auth::{self, AuthUser},
    error::{AuthError, RepoError},
    models::{CreatePostRequest, LoginRequest, Post, PostPage, TokenResponse, UpdatePostRequest},
    repository::{DEFAULT_LIMIT, DEFAULT_PAGE},
};

// --- Query Structs ---

/// ListQuery
///
/// Accepted query parameters for the listing endpoint (GET /api/posts). Both
/// are optional; absent values fall back to page 1 and the default page size,
/// and values below 1 are clamped up to 1.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ListQuery {
    /// 1-indexed page number.
    pub page: Option<u64>,
    /// Maximum number of posts per page.
    pub limit: Option<u64>,
}

// --- Handlers ---

/// login
///
/// [Public Route] Exchanges credentials for a bearer token. The only endpoint
/// that does not require authentication besides the health check.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = auth::issue_token(&state.config, &payload)?;
    tracing::info!(subject = %payload.email, "login succeeded, token issued");
    Ok(Json(TokenResponse { token }))
}

/// list_posts
///
/// [Authenticated Route] Lists posts newest first with page-based pagination.
/// Pages past the end return an empty list with the same pagination envelope.
#[utoipa::path(
    get,
    path = "/api/posts",
    params(ListQuery),
    responses(
        (status = 200, description = "One page of posts", body = PostPage),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn list_posts(
    _user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<PostPage>, RepoError> {
    let page = query.page.unwrap_or(DEFAULT_PAGE).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).max(1);
    let listing = state.repo.list(page, limit).await?;
    Ok(Json(listing))
}

/// get_post
///
/// [Authenticated Route] Retrieves a single post by id.
#[utoipa::path(
    get,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Found", body = Post),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn get_post(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Post>, RepoError> {
    let post = state.repo.get(&id).await?;
    Ok(Json(post))
}

/// create_post
///
/// [Authenticated Route] Submits a new post. The repository assigns the id and
/// timestamps and validates before persisting; a missing status defaults to
/// draft.
#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = CreatePostRequest,
    responses(
        (status = 201, description = "Created", body = Post),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn create_post(
    AuthUser { subject }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<Post>), RepoError> {
    let post = state.repo.create(payload).await?;
    tracing::debug!(id = %post.id, author = %subject, "post created");
    Ok((StatusCode::CREATED, Json(post)))
}

/// update_post
///
/// [Authenticated Route] Applies a partial update to an existing post. Absent
/// fields are left unchanged; `updatedAt` always moves forward.
#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    responses(
        (status = 200, description = "Updated", body = Post),
        (status = 404, description = "Not Found"),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn update_post(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<Json<Post>, RepoError> {
    let post = state.repo.update(&id, payload).await?;
    Ok(Json(post))
}

/// delete_post
///
/// [Authenticated Route] Removes a post permanently and confirms it.
#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = String, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 401, description = "Unauthenticated")
    )
)]
pub async fn delete_post(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, RepoError> {
    state.repo.delete(&id).await?;
    Ok(Json(json!({ "message": "Post deleted successfully" })))
}
