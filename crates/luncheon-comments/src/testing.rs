//! In-memory backend for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use chrono::{TimeZone, Utc};
use luncheon_shared::{
    api::CreateCommentRequest, Author, AuthorRole, Comment, CommentBody, CommentStatus,
    ReactionKind, Reactions, Reply, Scope,
};

use crate::api::{ApiError, CommentBackend};
use crate::reaction::toggle;

pub fn body(id: &str, author_id: &str, content: &str) -> CommentBody {
    CommentBody {
        id: id.to_string(),
        content: content.to_string(),
        author: Author {
            id: author_id.to_string(),
            name: format!("Member {}", author_id),
            avatar: None,
            role: AuthorRole::User,
        },
        created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        updated_at: None,
        status: CommentStatus::Approved,
        reactions: Reactions::default(),
        show_id: None,
    }
}

/// A top-level comment by `author_id` with `(reply_id, reply_author)` replies.
pub fn author_thread(id: &str, author_id: &str, replies: &[(&str, &str)]) -> Comment {
    let mut comment = Comment::new(body(id, author_id, "Lovely lunch"));
    for (reply_id, reply_author) in replies {
        comment.push_reply(Reply::new(body(reply_id, reply_author, "Indeed"), id));
    }
    comment
}

/// Behaves like the real backend: it keeps its own copy of the thread and
/// applies confirmed mutations to it.
#[derive(Default)]
pub struct FakeBackend {
    pub server: RefCell<Vec<Comment>>,
    pub next_ids: RefCell<VecDeque<String>>,
    pub echo_status: Cell<Option<CommentStatus>>,

    pub fail_list: Cell<bool>,
    pub fail_create: Cell<bool>,
    pub fail_reaction: Cell<bool>,
    pub fail_delete: Cell<bool>,

    pub list_calls: Cell<usize>,
    pub created: RefCell<Vec<CreateCommentRequest>>,
    pub reactions: RefCell<Vec<(String, ReactionKind)>>,
    pub deleted: RefCell<Vec<String>>,
}

impl FakeBackend {
    pub fn with_comments(comments: Vec<Comment>) -> Self {
        Self {
            server: RefCell::new(comments),
            ..Self::default()
        }
    }

    pub fn queue_ids(&self, ids: &[&str]) {
        self.next_ids
            .borrow_mut()
            .extend(ids.iter().map(|id| id.to_string()));
    }

    fn outage() -> ApiError {
        ApiError::Server("503 Service Unavailable: backend down".to_string())
    }
}

impl CommentBackend for FakeBackend {
    async fn list(&self, scope: &Scope) -> Result<Vec<Comment>, ApiError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list.get() {
            return Err(Self::outage());
        }

        Ok(self
            .server
            .borrow()
            .iter()
            .filter(|c| c.body.show_id.as_deref() == scope.show_id())
            .cloned()
            .collect())
    }

    async fn create(&self, req: &CreateCommentRequest) -> Result<CommentBody, ApiError> {
        self.created.borrow_mut().push(req.clone());
        if self.fail_create.get() {
            return Err(Self::outage());
        }

        let id = self
            .next_ids
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| format!("gen-{}", self.created.borrow().len()));
        let mut created = body(&id, "u1", &req.content);
        created.show_id = req.show_id.clone();
        created.status = self.echo_status.get().unwrap_or(CommentStatus::Pending);

        let mut server = self.server.borrow_mut();
        match &req.parent_id {
            Some(parent_id) => {
                if let Some(parent) = server.iter_mut().find(|c| &c.body.id == parent_id) {
                    parent.push_reply(Reply::new(created.clone(), parent_id.clone()));
                }
            }
            None => server.insert(0, Comment::new(created.clone())),
        }

        Ok(created)
    }

    async fn update_reaction(&self, comment_id: &str, kind: ReactionKind) -> Result<(), ApiError> {
        self.reactions
            .borrow_mut()
            .push((comment_id.to_string(), kind));
        if self.fail_reaction.get() {
            return Err(Self::outage());
        }

        let mut server = self.server.borrow_mut();
        for comment in server.iter_mut() {
            if comment.body.id == comment_id {
                toggle(&mut comment.body.reactions, kind);
            }
            for reply in comment.replies.iter_mut() {
                if reply.body.id == comment_id {
                    toggle(&mut reply.body.reactions, kind);
                }
            }
        }
        Ok(())
    }

    async fn delete(&self, comment_id: &str) -> Result<(), ApiError> {
        self.deleted.borrow_mut().push(comment_id.to_string());
        if self.fail_delete.get() {
            return Err(Self::outage());
        }

        let mut server = self.server.borrow_mut();
        server.retain(|c| c.body.id != comment_id);
        for comment in server.iter_mut() {
            comment.replies.retain(|r| r.body.id != comment_id);
        }
        Ok(())
    }
}
