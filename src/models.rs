use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Application Schemas ---

/// PostStatus
///
/// Lifecycle status of a post. New posts default to `Draft` unless the client
/// supplies a status explicitly; visibility enforcement is left to the consumer.
///
/// Serialized lowercase on the wire (`"draft"` / `"published"`); the bincode
/// derives cover the sled record encoding.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    TS,
    ToSchema,
    bincode::Encode,
    bincode::Decode,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Post
///
/// The canonical post record as stored and served. This is the primary data
/// structure for the core business logic.
///
/// `id` is assigned by the repository at creation and immutable thereafter, as
/// is `created_at`; `updated_at` moves on every successful update. Both
/// timestamps are kept at millisecond granularity, which is what both backends
/// can round-trip faithfully.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, ToSchema)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub status: PostStatus,

    // Timestamp handling for storage integration and JSON serialization.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub updated_at: DateTime<Utc>,
}

/// --- Request Payloads (Input Schemas) ---

/// CreatePostRequest
///
/// Input payload for submitting a new post (POST /api/posts). The repository
/// assigns `id` and both timestamps; clients cannot supply them. A missing
/// `status` falls back to `Draft` during deserialization, so both backends see
/// the same already-defaulted draft.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub status: PostStatus,
}

/// UpdatePostRequest
///
/// Partial update payload for modifying an existing post (PUT /api/posts/{id}).
///
/// Uses `Option<T>` for all fields and `#[serde(skip_serializing_if = "Option::is_none")]`
/// so only provided fields participate in the merge; absent fields leave the
/// stored record untouched.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdatePostRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
}

/// --- Listing & Auth Schemas (Output) ---

/// PostPage
///
/// One page of the listing, newest first, plus the pagination envelope the
/// frontend drives its pager with: `totalPages = ceil(total / limit)` and the
/// page that was actually requested.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total_pages: u64,
    pub current_page: u64,
}

/// LoginRequest
///
/// Input payload for the login endpoint (POST /api/auth/login). Credentials are
/// checked against the configured identity; the password is never persisted or
/// logged.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// TokenResponse
///
/// Output schema for a successful login: the signed bearer token the client
/// presents as `Authorization: Bearer <token>` on every post request.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}
