mod backend;
mod client;

pub use backend::CommentBackend;
pub use client::{ApiClient, ApiError};
