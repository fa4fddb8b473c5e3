use std::str::FromStr;

use crate::api::{ApiError, CommentBackend};
use crate::store::CommentStore;

/// What to do when the backend rejects a mutation that was already applied
/// or attempted locally. One policy covers submits, reactions and deletes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconciliationPolicy {
    /// Reload the whole scope from the backend.
    #[default]
    Resync,
    /// Leave local state untouched and only log.
    KeepLocal,
}

impl FromStr for ReconciliationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resync" => Ok(Self::Resync),
            "keep-local" | "keep_local" => Ok(Self::KeepLocal),
            other => Err(format!("unknown reconciliation policy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mutation {
    Submit,
    Reaction,
    Delete,
}

impl<B: CommentBackend> CommentStore<B> {
    pub(crate) async fn reconcile_failure(&mut self, mutation: Mutation, err: &ApiError) {
        match self.options().policy {
            ReconciliationPolicy::Resync => {
                tracing::info!(?mutation, error = %err, "Mutation rejected, resyncing comments");
                self.resync().await;
            }
            ReconciliationPolicy::KeepLocal => {
                tracing::warn!(?mutation, error = %err, "Mutation rejected, keeping local state");
            }
        }
    }
}
