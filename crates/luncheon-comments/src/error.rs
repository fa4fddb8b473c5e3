use crate::api::ApiError;

#[derive(Debug, thiserror::Error)]
pub enum CommentError {
    #[error("Comment cannot be empty")]
    EmptyContent,

    #[error("Comment is too long ({len} characters, limit is {limit})")]
    TooLong { len: usize, limit: usize },

    #[error(transparent)]
    Api(#[from] ApiError),
}
