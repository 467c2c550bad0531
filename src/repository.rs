use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::{
    error::RepoError,
    models::{CreatePostRequest, Post, PostPage, PostStatus, UpdatePostRequest},
    validator::validate_post,
};

/// Page number assumed when the client sends none.
pub const DEFAULT_PAGE: u64 = 1;
/// Page size assumed when the client sends none.
pub const DEFAULT_LIMIT: u64 = 6;

/// PostRepository Trait
///
/// Defines the abstract contract for all persistence operations on the post
/// collection. Callers observe the same pagination math, ordering, and error
/// conditions whether the store is a single JSON document (`FileRepository`)
/// or an embedded document database (`SledRepository`).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn PostRepository>`) safely shareable across Axum's asynchronous
/// task boundaries.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// One page of posts, newest first, with the pagination envelope.
    /// Pages beyond the last yield an empty sequence, not an error.
    async fn list(&self, page: u64, limit: u64) -> Result<PostPage, RepoError>;

    /// A single post by id.
    async fn get(&self, id: &str) -> Result<Post, RepoError>;

    /// Assigns an id and both timestamps, validates, persists, and returns the
    /// stored record. The assigned id is unique even under concurrent creates.
    async fn create(&self, draft: CreatePostRequest) -> Result<Post, RepoError>;

    /// Merges the present patch fields onto the existing record, forces
    /// `updated_at` forward, re-validates the merged result, persists, and
    /// returns it. A rejected merge leaves the stored record untouched.
    async fn update(&self, id: &str, patch: UpdatePostRequest) -> Result<Post, RepoError>;

    /// Removes the record outright; there is no soft-delete.
    async fn delete(&self, id: &str) -> Result<(), RepoError>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn PostRepository>;

// --- Shared semantics ---
//
// Id assignment, timestamping, patch merging, and pagination live here so the
// two backends cannot drift apart on the parts of the contract callers can
// observe.

// Process-wide creation sequence. A timestamp alone can collide when two
// creates land in the same millisecond; the sequence disambiguates them and
// doubles as the insertion-order tie-breaker for equal timestamps.
static CREATE_SEQ: AtomicU64 = AtomicU64::new(0);

fn next_post_id(created_at: DateTime<Utc>) -> String {
    let seq = CREATE_SEQ.fetch_add(1, Ordering::Relaxed);
    // Zero-padding keeps lexicographic id order equal to creation order within
    // a millisecond.
    format!("{}-{:08}", created_at.timestamp_millis(), seq)
}

// Both stores persist timestamps at millisecond granularity; truncating at
// creation keeps the record a caller gets back byte-equal to the record that
// was returned at create time, on either backend.
fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

fn new_post(draft: CreatePostRequest) -> Result<Post, RepoError> {
    let now = now_millis();
    let post = Post {
        id: next_post_id(now),
        title: draft.title,
        content: draft.content,
        status: draft.status,
        created_at: now,
        updated_at: now,
    };
    validate_post(&post)?;
    Ok(post)
}

fn merge_patch(existing: &Post, patch: UpdatePostRequest) -> Result<Post, RepoError> {
    let mut post = existing.clone();
    if let Some(title) = patch.title {
        post.title = title;
    }
    if let Some(content) = patch.content {
        post.content = content;
    }
    if let Some(status) = patch.status {
        post.status = status;
    }
    // Forced regardless of patch content; `id` and `created_at` never move.
    post.updated_at = now_millis();
    validate_post(&post)?;
    Ok(post)
}

fn paginate(mut posts: Vec<Post>, page: u64, limit: u64) -> PostPage {
    // Inputs below 1 are out of contract; clamp rather than divide by zero.
    let page = page.max(1);
    let limit = limit.max(1);

    // Newest first; same-millisecond creates fall back to creation order via
    // the id's sequence component.
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });

    let total = posts.len() as u64;
    let total_pages = total.div_ceil(limit);
    let skip = (page - 1).saturating_mul(limit);

    let posts = posts
        .into_iter()
        .skip(skip as usize)
        .take(limit as usize)
        .collect();

    PostPage {
        posts,
        total_pages,
        current_page: page,
    }
}

// --- File backend ---

/// FileRepository
///
/// Persists the whole collection as one pretty-printed JSON array, rewritten
/// in full on every mutation. Every operation is a full read of the file;
/// create/update/delete re-serialize and re-write it.
///
/// The lock guards the read-modify-write cycle: mutations hold the write half
/// for the duration of read+modify+write, readers hold the read half, so a
/// reader sees either the pre- or post-mutation file, never a partial write.
pub struct FileRepository {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileRepository {
    /// Opens the repository, seeding an empty collection if the data file does
    /// not exist yet.
    pub async fn new(path: impl Into<PathBuf>) -> Result<Self, RepoError> {
        let path = path.into();
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, b"[]").await?;
        }
        Ok(Self {
            path,
            lock: RwLock::new(()),
        })
    }

    async fn read_all(&self) -> Result<Vec<Post>, RepoError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_all(&self, posts: &[Post]) -> Result<(), RepoError> {
        let body = serde_json::to_vec_pretty(posts)?;
        tokio::fs::write(&self.path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl PostRepository for FileRepository {
    async fn list(&self, page: u64, limit: u64) -> Result<PostPage, RepoError> {
        let _guard = self.lock.read().await;
        let posts = self.read_all().await?;
        Ok(paginate(posts, page, limit))
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        let _guard = self.lock.read().await;
        let posts = self.read_all().await?;
        posts
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })
    }

    async fn create(&self, draft: CreatePostRequest) -> Result<Post, RepoError> {
        let _guard = self.lock.write().await;
        let mut posts = self.read_all().await?;
        let post = new_post(draft)?;
        posts.push(post.clone());
        self.write_all(&posts).await?;
        Ok(post)
    }

    async fn update(&self, id: &str, patch: UpdatePostRequest) -> Result<Post, RepoError> {
        let _guard = self.lock.write().await;
        let mut posts = self.read_all().await?;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })?;
        let merged = merge_patch(&posts[index], patch)?;
        posts[index] = merged.clone();
        self.write_all(&posts).await?;
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let _guard = self.lock.write().await;
        let mut posts = self.read_all().await?;
        let index = posts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| RepoError::NotFound { id: id.to_string() })?;
        posts.remove(index);
        self.write_all(&posts).await?;
        Ok(())
    }
}

// --- Sled backend ---

const POSTS_TREE: &str = "posts";

/// StoredPost
///
/// The sled record encoding of a post. Timestamps are stored as unix
/// milliseconds, matching the granularity the rest of the system works at.
#[derive(Debug, bincode::Encode, bincode::Decode)]
struct StoredPost {
    id: String,
    title: String,
    content: String,
    status: PostStatus,
    created_at: i64,
    updated_at: i64,
}

impl From<&Post> for StoredPost {
    fn from(post: &Post) -> Self {
        StoredPost {
            id: post.id.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            status: post.status,
            created_at: post.created_at.timestamp_millis(),
            updated_at: post.updated_at.timestamp_millis(),
        }
    }
}

impl TryFrom<StoredPost> for Post {
    type Error = RepoError;

    fn try_from(stored: StoredPost) -> Result<Self, RepoError> {
        let created_at = DateTime::from_timestamp_millis(stored.created_at)
            .ok_or_else(|| RepoError::Storage(format!("corrupt createdAt on post {}", stored.id)))?;
        let updated_at = DateTime::from_timestamp_millis(stored.updated_at)
            .ok_or_else(|| RepoError::Storage(format!("corrupt updatedAt on post {}", stored.id)))?;
        Ok(Post {
            id: stored.id,
            title: stored.title,
            content: stored.content,
            status: stored.status,
            created_at,
            updated_at,
        })
    }
}

fn encode_post(post: &Post) -> Result<Vec<u8>, RepoError> {
    Ok(bincode::encode_to_vec(
        StoredPost::from(post),
        bincode::config::standard(),
    )?)
}

fn decode_post(bytes: &[u8]) -> Result<Post, RepoError> {
    let (stored, _): (StoredPost, usize) =
        bincode::decode_from_slice(bytes, bincode::config::standard())?;
    Post::try_from(stored)
}

/// SledRepository
///
/// The document-database variant, backed by an embedded sled store with one
/// record per post keyed by id. Per-record atomicity is delegated to sled, so
/// no application-level locking is needed; `list`'s scan is not transactionally
/// consistent with concurrent mutations, which the contract permits.
pub struct SledRepository {
    db: sled::Db,
}

impl SledRepository {
    /// Opens (or creates) the database at the given path.
    pub fn open(path: &str) -> Result<Self, RepoError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// An ephemeral database for tests; storage is discarded on drop.
    pub fn temporary() -> Result<Self, RepoError> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn posts_tree(&self) -> Result<sled::Tree, RepoError> {
        Ok(self.db.open_tree(POSTS_TREE)?)
    }
}

#[async_trait]
impl PostRepository for SledRepository {
    async fn list(&self, page: u64, limit: u64) -> Result<PostPage, RepoError> {
        let tree = self.posts_tree()?;
        let mut posts = Vec::with_capacity(tree.len());
        for entry in tree.iter() {
            let (_key, value) = entry?;
            posts.push(decode_post(&value)?);
        }
        Ok(paginate(posts, page, limit))
    }

    async fn get(&self, id: &str) -> Result<Post, RepoError> {
        let tree = self.posts_tree()?;
        match tree.get(id.as_bytes())? {
            Some(value) => decode_post(&value),
            None => Err(RepoError::NotFound { id: id.to_string() }),
        }
    }

    async fn create(&self, draft: CreatePostRequest) -> Result<Post, RepoError> {
        let tree = self.posts_tree()?;
        let post = new_post(draft)?;
        tree.insert(post.id.as_bytes(), encode_post(&post)?)?;
        Ok(post)
    }

    async fn update(&self, id: &str, patch: UpdatePostRequest) -> Result<Post, RepoError> {
        let tree = self.posts_tree()?;
        let existing = match tree.get(id.as_bytes())? {
            Some(value) => decode_post(&value)?,
            None => return Err(RepoError::NotFound { id: id.to_string() }),
        };
        let merged = merge_patch(&existing, patch)?;
        tree.insert(id.as_bytes(), encode_post(&merged)?)?;
        Ok(merged)
    }

    async fn delete(&self, id: &str) -> Result<(), RepoError> {
        let tree = self.posts_tree()?;
        match tree.remove(id.as_bytes())? {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound { id: id.to_string() }),
        }
    }
}
