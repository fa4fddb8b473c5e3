use std::collections::HashSet;

use luncheon_shared::{Comment, CommentBody, Scope};

use crate::api::CommentBackend;
use crate::auth::AuthContext;
use crate::config::StoreOptions;
use crate::error::CommentError;
use crate::recovery::Mutation;

/// Everything the display layer reads from a store.
///
/// `loading` and `submitting` are set only while an action holds the store
/// mutably across its backend call, and both are back to `false` by the
/// time the action returns. No caller can read the view mid-flight, so
/// between actions both always read `false`.
#[derive(Debug, Clone, Copy)]
pub struct CommentsView<'a> {
    pub comments: &'a [Comment],
    pub total_comments: usize,
    pub total_participants: usize,
    pub loading: bool,
    pub submitting: bool,
    pub error: Option<&'a str>,
}

/// In-memory thread for one scope.
///
/// Mutations land in the local tree before the backend is asked to confirm
/// them. Failures from loads, submits and deletes are recorded in `error`
/// and stay there until `clear_error`.
pub struct CommentStore<B> {
    backend: B,
    auth: AuthContext,
    options: StoreOptions,
    scope: Scope,
    pub(crate) comments: Vec<Comment>,
    loading: bool,
    pub(crate) submitting: bool,
    error: Option<String>,
}

impl<B: CommentBackend> CommentStore<B> {
    pub fn new(backend: B, auth: AuthContext, options: StoreOptions) -> Self {
        Self {
            backend,
            auth,
            options,
            scope: Scope::Global,
            comments: Vec::new(),
            loading: false,
            submitting: false,
            error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn comments(&self) -> &[Comment] {
        &self.comments
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn submitting(&self) -> bool {
        self.submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn view(&self) -> CommentsView<'_> {
        CommentsView {
            comments: &self.comments,
            total_comments: self.count_total(),
            total_participants: self.count_participants(),
            loading: self.loading,
            submitting: self.submitting,
            error: self.error(),
        }
    }

    /// Top-level comments plus their direct replies.
    pub fn count_total(&self) -> usize {
        self.comments.iter().map(Comment::thread_len).sum()
    }

    /// Distinct author ids across comments and replies.
    pub fn count_participants(&self) -> usize {
        let mut authors = HashSet::new();
        for comment in &self.comments {
            authors.insert(comment.body.author.id.as_str());
            for reply in &comment.replies {
                authors.insert(reply.body.author.id.as_str());
            }
        }
        authors.len()
    }

    /// Replace the local tree with the backend's copy of `scope`.
    ///
    /// On failure the previous tree and its scope are kept unless the dev
    /// fallback is compiled in and enabled.
    pub async fn load_comments(&mut self, scope: Scope) -> Result<(), CommentError> {
        self.loading = true;

        let result = self.backend.list(&scope).await;
        self.loading = false;

        match result {
            Ok(mut comments) => {
                for comment in &mut comments {
                    comment.adopt_replies();
                }
                tracing::debug!(?scope, count = comments.len(), "Loaded comments");
                self.scope = scope;
                self.comments = comments;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(?scope, error = %e, "Failed to load comments");
                self.set_error(format!("Failed to load comments: {}", e));

                #[cfg(feature = "dev-fallback")]
                if self.options.sample_fallback {
                    tracing::warn!("Using sample comments");
                    self.comments = crate::sample::thread(&scope);
                    self.scope = scope;
                }

                Err(e.into())
            }
        }
    }

    /// Reload the current scope, discarding any speculative local state.
    pub async fn resync(&mut self) {
        let scope = self.scope.clone();
        // load_comments records its own error
        let _ = self.load_comments(scope).await;
    }

    /// Remove a comment or reply locally, then ask the backend to delete it.
    /// Returns whether anything was removed locally.
    pub async fn delete_comment(&mut self, comment_id: &str) -> Result<bool, CommentError> {
        let removed = self.remove_local(comment_id);

        if let Err(e) = self.backend.delete(comment_id).await {
            self.reconcile_failure(Mutation::Delete, &e).await;
            // set after reconciling so a failed resync can't replace it
            self.set_error(format!("Failed to delete comment: {}", e));
            return Err(e.into());
        }

        Ok(removed)
    }

    fn remove_local(&mut self, comment_id: &str) -> bool {
        if let Some(idx) = self.comments.iter().position(|c| c.body.id == comment_id) {
            self.comments.remove(idx);
            return true;
        }

        for comment in &mut self.comments {
            if let Some(idx) = comment.replies.iter().position(|r| r.body.id == comment_id) {
                comment.replies.remove(idx);
                return true;
            }
        }

        false
    }

    /// Top-level comments are searched before any replies.
    pub(crate) fn find_body_mut(&mut self, comment_id: &str) -> Option<&mut CommentBody> {
        if let Some(idx) = self.comments.iter().position(|c| c.body.id == comment_id) {
            return Some(&mut self.comments[idx].body);
        }

        self.comments
            .iter_mut()
            .flat_map(|c| c.replies.iter_mut())
            .find(|r| r.body.id == comment_id)
            .map(|r| &mut r.body)
    }

    pub fn find(&self, comment_id: &str) -> Option<&CommentBody> {
        self.comments.iter().find_map(|c| {
            if c.body.id == comment_id {
                Some(&c.body)
            } else {
                c.replies
                    .iter()
                    .find(|r| r.body.id == comment_id)
                    .map(|r| &r.body)
            }
        })
    }
}
