use crate::{error::ValidationError, models::Post};

/// validate_post
///
/// Checks a candidate post against the structural rules every persisted record
/// must satisfy: a non-empty id, non-empty title and content, and timestamps
/// where `created_at` never trails `updated_at`. Status membership and
/// timestamp well-formedness are already carried by the types, so this covers
/// what the type system cannot.
///
/// Runs on every create (after the repository has assigned id and timestamps)
/// and on the merged result of every update, before anything is persisted.
/// No side effects.
pub fn validate_post(post: &Post) -> Result<(), ValidationError> {
    if post.id.is_empty() {
        return Err(ValidationError {
            field: "id",
            reason: "is required",
        });
    }
    if post.title.is_empty() {
        return Err(ValidationError {
            field: "title",
            reason: "must not be empty",
        });
    }
    if post.content.is_empty() {
        return Err(ValidationError {
            field: "content",
            reason: "must not be empty",
        });
    }
    if post.updated_at < post.created_at {
        return Err(ValidationError {
            field: "updatedAt",
            reason: "must not precede createdAt",
        });
    }
    Ok(())
}
