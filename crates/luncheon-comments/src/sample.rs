use chrono::{Duration, Utc};
use luncheon_shared::{
    Author, AuthorRole, Comment, CommentBody, CommentStatus, ReactionKind, Reactions, Reply, Scope,
};
use uuid::Uuid;

fn member(id: &str, name: &str, role: AuthorRole) -> Author {
    Author {
        id: id.to_string(),
        name: name.to_string(),
        avatar: None,
        role,
    }
}

fn body(scope: &Scope, author: Author, content: &str, minutes_ago: i64, reactions: Reactions) -> CommentBody {
    let created_at = Utc::now() - Duration::minutes(minutes_ago);
    CommentBody {
        id: Uuid::new_v4().to_string(),
        content: content.to_string(),
        author,
        created_at,
        updated_at: Some(created_at),
        status: CommentStatus::Approved,
        reactions,
        show_id: scope.show_id().map(str::to_string),
    }
}

/// Canned thread for local development when the backend is unreachable.
pub fn thread(scope: &Scope) -> Vec<Comment> {
    let skipper = member("sample-skipper", "Harbour Master", AuthorRole::Admin);
    let crew = member("sample-crew", "Deck Hand", AuthorRole::User);
    let officer = member("sample-mod", "Race Officer", AuthorRole::Moderator);

    let mut opening = Comment::new(body(
        scope,
        crew,
        "Fantastic talk on heavy-weather sailing. Any chance the slides will be shared?",
        90,
        Reactions {
            likes: 4,
            dislikes: 0,
            user_reaction: Some(ReactionKind::Like),
        },
    ));
    let parent_id = opening.body.id.clone();
    opening.push_reply(Reply::new(
        body(scope, skipper, "They'll be on the show page by Friday.", 60, Reactions::default()),
        parent_id,
    ));

    let second = Comment::new(body(
        scope,
        officer,
        "Reminder: next week's luncheon starts half an hour early.",
        30,
        Reactions {
            likes: 2,
            dislikes: 1,
            user_reaction: None,
        },
    ));

    vec![second, opening]
}
