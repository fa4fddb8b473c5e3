use luncheon_shared::{api::CreateCommentRequest, Comment, CommentStatus, Reply, Scope};

use crate::api::CommentBackend;
use crate::error::CommentError;
use crate::recovery::Mutation;
use crate::store::CommentStore;

pub const MAX_COMMENT_CHARS: usize = 1000;
pub const MAX_REPLY_CHARS: usize = 500;

/// A comment or reply as typed by the viewer.
#[derive(Debug, Clone, Default)]
pub struct NewComment {
    pub content: String,
    /// Defaults to the scope the store last loaded.
    pub scope: Option<Scope>,
    pub parent_id: Option<String>,
}

impl NewComment {
    pub fn top_level(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn reply(parent_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            parent_id: Some(parent_id.into()),
            ..Self::default()
        }
    }

    /// Trimmed content, if it satisfies the length rules
    pub fn validated_content(&self) -> Result<&str, CommentError> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(CommentError::EmptyContent);
        }

        let limit = if self.parent_id.is_some() {
            MAX_REPLY_CHARS
        } else {
            MAX_COMMENT_CHARS
        };
        let len = content.chars().count();
        if len > limit {
            return Err(CommentError::TooLong { len, limit });
        }

        Ok(content)
    }
}

/// Where a confirmed submission ended up locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Comment { id: String },
    Reply { id: String, parent_id: String },
    /// Stored by the backend but its parent is not in the local thread.
    Orphaned { id: String, parent_id: String },
    /// Stored under a scope other than the one on display.
    OtherScope { id: String },
}

impl<B: CommentBackend> CommentStore<B> {
    pub async fn submit_comment(&mut self, new: NewComment) -> Result<Submitted, CommentError> {
        let content = match new.validated_content() {
            Ok(content) => content.to_string(),
            Err(e) => {
                self.set_error(e.to_string());
                return Err(e);
            }
        };

        let scope = new.scope.unwrap_or_else(|| self.scope().clone());
        let req = CreateCommentRequest {
            content,
            show_id: scope.show_id().map(str::to_string),
            parent_id: new.parent_id,
        };

        self.submitting = true;
        let result = self.backend().create(&req).await;
        self.submitting = false;

        let mut body = match result {
            Ok(body) => body,
            Err(e) => {
                self.reconcile_failure(Mutation::Submit, &e).await;
                self.set_error(format!("Failed to post comment: {}", e));
                return Err(e.into());
            }
        };

        // Everything starts in the moderation queue.
        body.status = CommentStatus::Pending;
        let id = body.id.clone();

        if &scope != self.scope() {
            tracing::debug!(id = %id, ?scope, "Posted outside the displayed scope");
            return Ok(Submitted::OtherScope { id });
        }

        let Some(parent_id) = req.parent_id else {
            self.comments.insert(0, Comment::new(body));
            return Ok(Submitted::Comment { id });
        };

        match self.comments.iter_mut().find(|c| c.body.id == parent_id) {
            Some(parent) => {
                parent.push_reply(Reply::new(body, parent_id.clone()));
                Ok(Submitted::Reply { id, parent_id })
            }
            None => {
                tracing::warn!(id = %id, parent_id = %parent_id, "Reply parent not in local thread, dropping");
                Ok(Submitted::Orphaned { id, parent_id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthContext;
    use crate::config::StoreOptions;
    use crate::recovery::ReconciliationPolicy;
    use crate::testing::{author_thread, FakeBackend};

    async fn loaded(backend: FakeBackend) -> CommentStore<FakeBackend> {
        let mut store = CommentStore::new(backend, AuthContext::authenticated("u1"), StoreOptions::default());
        store.load_comments(Scope::Global).await.unwrap();
        store
    }

    #[tokio::test]
    async fn first_comment_lands_in_empty_thread() {
        let backend = FakeBackend::default();
        backend.queue_ids(&["c1"]);
        let mut store = loaded(backend).await;

        let outcome = store.submit_comment(NewComment::top_level("Great talk!")).await.unwrap();

        assert_eq!(outcome, Submitted::Comment { id: "c1".into() });
        assert_eq!(store.comments().len(), 1);
        let body = &store.comments()[0].body;
        assert_eq!(body.id, "c1");
        assert_eq!(body.content, "Great talk!");
        assert_eq!(body.author.id, "u1");
        assert_eq!(body.status, CommentStatus::Pending);
        assert_eq!(store.count_total(), 1);
        assert!(!store.submitting());
    }

    #[tokio::test]
    async fn new_comments_go_on_top() {
        let backend = FakeBackend::with_comments(vec![author_thread("old", "u2", &[])]);
        backend.queue_ids(&["new"]);
        let mut store = loaded(backend).await;

        store.submit_comment(NewComment::top_level("  Fresh  ")).await.unwrap();

        assert_eq!(store.comments()[0].body.id, "new");
        assert_eq!(store.comments()[0].body.content, "Fresh");
        assert_eq!(store.comments()[1].body.id, "old");
    }

    #[tokio::test]
    async fn reply_appends_under_parent() {
        let backend = FakeBackend::with_comments(vec![author_thread("c1", "u2", &[])]);
        backend.queue_ids(&["r1"]);
        let mut store = loaded(backend).await;

        let outcome = store.submit_comment(NewComment::reply("c1", "Thanks")).await.unwrap();

        assert_eq!(
            outcome,
            Submitted::Reply {
                id: "r1".into(),
                parent_id: "c1".into()
            }
        );
        let replies = &store.comments()[0].replies;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].body.id, "r1");
        assert_eq!(replies[0].parent_id(), "c1");
        assert_eq!(store.count_total(), 2);
        assert_eq!(store.backend().created.borrow()[0].parent_id.as_deref(), Some("c1"));
    }

    #[tokio::test]
    async fn reply_to_unknown_parent_is_dropped() {
        let backend = FakeBackend::with_comments(vec![author_thread("c1", "u2", &[])]);
        let mut store = loaded(backend).await;
        let before = store.comments().to_vec();

        let outcome = store
            .submit_comment(NewComment::reply("nonexistent", "Hello?"))
            .await
            .unwrap();

        assert!(matches!(outcome, Submitted::Orphaned { .. }));
        assert_eq!(store.comments(), before.as_slice());
    }

    #[tokio::test]
    async fn backend_status_is_overridden_to_pending() {
        let backend = FakeBackend::default();
        backend.echo_status.set(Some(CommentStatus::Approved));
        let mut store = loaded(backend).await;

        store.submit_comment(NewComment::top_level("Admin note")).await.unwrap();
        assert_eq!(store.comments()[0].body.status, CommentStatus::Pending);
    }

    #[tokio::test]
    async fn blank_and_oversized_content_never_reach_backend() {
        let mut store = loaded(FakeBackend::default()).await;

        let err = store.submit_comment(NewComment::top_level("   \n")).await.unwrap_err();
        assert!(matches!(err, CommentError::EmptyContent));
        assert_eq!(store.error(), Some("Comment cannot be empty"));

        let long_reply = "x".repeat(MAX_REPLY_CHARS + 1);
        let err = store
            .submit_comment(NewComment::reply("c1", long_reply.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, CommentError::TooLong { limit: MAX_REPLY_CHARS, .. }));

        // the same text is fine as a top-level comment
        assert!(NewComment::top_level(long_reply).validated_content().is_ok());
        assert!(store.backend().created.borrow().is_empty());
    }

    #[tokio::test]
    async fn failed_submit_records_error_without_inserting() {
        let backend = FakeBackend::with_comments(vec![author_thread("c1", "u2", &[])]);
        backend.fail_create.set(true);
        let options = StoreOptions {
            policy: ReconciliationPolicy::KeepLocal,
            ..StoreOptions::default()
        };
        let mut store = CommentStore::new(backend, AuthContext::authenticated("u1"), options);
        store.load_comments(Scope::Global).await.unwrap();

        assert!(store.submit_comment(NewComment::top_level("Hi")).await.is_err());
        assert_eq!(store.count_total(), 1);
        assert!(store.error().unwrap().starts_with("Failed to post comment"));
        assert!(!store.submitting());
    }

    #[tokio::test]
    async fn failed_submit_resyncs_under_default_policy() {
        let backend = FakeBackend::with_comments(vec![author_thread("c1", "u2", &[])]);
        backend.fail_create.set(true);
        let mut store = loaded(backend).await;

        assert!(store.submit_comment(NewComment::top_level("Hi")).await.is_err());
        assert_eq!(store.backend().list_calls.get(), 2);
        assert_eq!(store.count_total(), 1);
    }

    #[tokio::test]
    async fn submit_error_survives_failed_resync() {
        let backend = FakeBackend::with_comments(vec![author_thread("c1", "u2", &[])]);
        let mut store = loaded(backend).await;
        store.backend().fail_create.set(true);
        store.backend().fail_list.set(true);

        assert!(store.submit_comment(NewComment::top_level("hi")).await.is_err());

        assert_eq!(store.backend().list_calls.get(), 2);
        assert!(store.error().unwrap().starts_with("Failed to post comment"));
        assert_eq!(store.count_total(), 1);
        assert!(!store.submitting());
    }

    #[tokio::test]
    async fn show_scope_is_sent_with_submission() {
        let backend = FakeBackend::default();
        let mut store = CommentStore::new(backend, AuthContext::authenticated("u1"), StoreOptions::default());
        store.load_comments(Scope::Show("s9".into())).await.unwrap();

        store.submit_comment(NewComment::top_level("On topic")).await.unwrap();
        assert_eq!(store.backend().created.borrow()[0].show_id.as_deref(), Some("s9"));
        assert_eq!(store.count_total(), 1);

        let elsewhere = NewComment {
            content: "Elsewhere".into(),
            scope: Some(Scope::Global),
            parent_id: None,
        };
        let outcome = store.submit_comment(elsewhere).await.unwrap();
        assert!(matches!(outcome, Submitted::OtherScope { .. }));
        assert_eq!(store.count_total(), 1);
    }
}
