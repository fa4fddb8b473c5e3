use luncheon_shared::{api::CreateCommentRequest, Comment, CommentBody, ReactionKind, Scope};

use super::ApiError;

/// The persistence side of a comment thread. The store only ever talks to
/// the backend through this trait, so tests can swap in an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait CommentBackend {
    /// Every top-level comment in `scope`, replies nested one level.
    async fn list(&self, scope: &Scope) -> Result<Vec<Comment>, ApiError>;

    /// Creates a comment or, with `parent_id` set, a reply. Returns the
    /// stored record with its real id.
    async fn create(&self, req: &CreateCommentRequest) -> Result<CommentBody, ApiError>;

    async fn update_reaction(&self, comment_id: &str, kind: ReactionKind) -> Result<(), ApiError>;

    async fn delete(&self, comment_id: &str) -> Result<(), ApiError>;
}
