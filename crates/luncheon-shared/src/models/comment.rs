use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Author, Reactions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Approved,
    Pending,
    Rejected,
}

/// Grouping key a thread is fetched and submitted under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Global,
    Show(String),
}

impl Scope {
    pub fn show_id(&self) -> Option<&str> {
        match self {
            Self::Global => None,
            Self::Show(id) => Some(id),
        }
    }
}

impl From<Option<String>> for Scope {
    fn from(show_id: Option<String>) -> Self {
        show_id.map(Self::Show).unwrap_or_default()
    }
}

/// Fields shared by top-level comments and replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentBody {
    pub id: String,
    pub content: String,
    pub author: Author,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub status: CommentStatus,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_id: Option<String>,
}

/// A top-level comment. Replies are one level deep and carry no replies
/// of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(flatten)]
    pub body: CommentBody,
    #[serde(default)]
    pub replies: Vec<Reply>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(flatten)]
    pub body: CommentBody,
    #[serde(rename = "parentId", default)]
    parent_id: String,
}

impl Comment {
    pub fn new(body: CommentBody) -> Self {
        Self {
            body,
            replies: Vec::new(),
        }
    }

    /// Appends a reply under this comment. A reply that arrived without a
    /// parent id is bound to this comment; an existing binding is kept.
    pub fn push_reply(&mut self, mut reply: Reply) {
        if reply.parent_id.is_empty() {
            reply.parent_id = self.body.id.clone();
        }
        self.replies.push(reply);
    }

    /// Binds every reply that arrived without a parent id to this comment.
    pub fn adopt_replies(&mut self) {
        for reply in &mut self.replies {
            if reply.parent_id.is_empty() {
                reply.parent_id = self.body.id.clone();
            }
        }
    }

    /// This comment plus its direct replies.
    pub fn thread_len(&self) -> usize {
        1 + self.replies.len()
    }
}

impl Reply {
    pub fn new(body: CommentBody, parent_id: impl Into<String>) -> Self {
        Self {
            body,
            parent_id: parent_id.into(),
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }
}
