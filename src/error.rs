use thiserror::Error;
use uuid::Uuid;

/// Failures returned by the task and habit stores.
///
/// A store that returns an error has not changed any of its state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PlannerError {
    pub(crate) fn task_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "task", id }
    }

    pub(crate) fn habit_not_found(id: Uuid) -> Self {
        Self::NotFound { kind: "habit", id }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Outcome of a failed sign-in attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// There is no window to present the provider's sign-in flow in.
    #[error("no window available to present the sign-in flow")]
    NoPresentationContext,
    #[error("identity provider failed: {0}")]
    ProviderFailure(String),
    /// The user dismissed the flow, or it did not finish in time.
    #[error("sign-in cancelled")]
    Cancelled,
    /// Another sign-in attempt is still outstanding.
    #[error("a sign-in attempt is already in progress")]
    Busy,
}
