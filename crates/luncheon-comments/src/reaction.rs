use luncheon_shared::{ReactionKind, Reactions};

use crate::api::CommentBackend;
use crate::recovery::Mutation;
use crate::store::CommentStore;

/// Apply the viewer's request to toggle `kind`.
///
/// Asking for the reaction already held clears it. Asking for the other one
/// moves the viewer's mark across. Counts saturate at both ends.
pub fn toggle(reactions: &mut Reactions, kind: ReactionKind) {
    if reactions.user_reaction == Some(kind) {
        let count = reactions.count_mut(kind);
        *count = count.saturating_sub(1);
        reactions.user_reaction = None;
        return;
    }

    if reactions.user_reaction == Some(kind.opposite()) {
        let other = reactions.count_mut(kind.opposite());
        *other = other.saturating_sub(1);
    }

    let count = reactions.count_mut(kind);
    *count = count.saturating_add(1);
    reactions.user_reaction = Some(kind);
}

impl<B: CommentBackend> CommentStore<B> {
    /// Toggle the viewer's reaction on a comment or reply. The new counts
    /// are visible immediately; a rejected confirmation is handled by the
    /// reconciliation policy without recording an error.
    ///
    /// Returns the optimistic reactions, or `None` if the id is not in the
    /// local tree (the backend is not called in that case).
    pub async fn update_reaction(&mut self, comment_id: &str, kind: ReactionKind) -> Option<Reactions> {
        let Some(body) = self.find_body_mut(comment_id) else {
            tracing::warn!(comment_id, "Reaction target not in local thread");
            return None;
        };
        toggle(&mut body.reactions, kind);
        let optimistic = body.reactions;

        if let Err(e) = self.backend().update_reaction(comment_id, kind).await {
            self.reconcile_failure(Mutation::Reaction, &e).await;
        }

        Some(optimistic)
    }
}
