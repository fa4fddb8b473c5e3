//! Comment threads for the luncheon site: an in-memory store with
//! optimistic reactions, reply insertion and backend resync.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod reaction;
pub mod recovery;
#[cfg(feature = "dev-fallback")]
mod sample;
pub mod store;
pub mod submit;

#[cfg(test)]
mod testing;

pub use api::{ApiClient, ApiError, CommentBackend};
pub use auth::AuthContext;
pub use config::{Config, StoreOptions};
pub use error::CommentError;
pub use recovery::ReconciliationPolicy;
pub use store::{CommentStore, CommentsView};
pub use submit::{NewComment, Submitted};
