//! Reducer-style state updates + memoized reads.

pub mod action;
pub mod collection;
pub mod reducer;
pub mod selectors;
pub mod state;

#[cfg(test)]
pub(crate) mod fixtures;

pub use action::{
    Action, ActivityAction, BranchAction, CommentAction, CommitAction, DeploymentAction,
    ErrorsAction, NotificationAction, ProjectAction, RequestAction, SessionAction,
    StreamingAction,
};
pub use collection::{Collection, Entry};
pub use reducer::streaming::{ConnectionState, ConnectionStatus};
pub use selectors::{ListingView, Selectors};
pub use state::AppState;

/// Owns the application state and the selector caches reading it.
#[derive(Default)]
pub struct Store {
    state: AppState,
    selectors: Selectors,
    dispatched: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn selectors(&self) -> &Selectors {
        &self.selectors
    }

    /// Number of actions dispatched so far.
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Runs `action` through the reducers. Returns whether any slice changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let next = reducer::reduce(&self.state, &action);
        let changed = !next.ptr_eq(&self.state);
        self.dispatched += 1;
        if changed {
            log::debug!("{}: state changed", action.kind());
        } else {
            log::debug!("{}: no-op", action.kind());
        }
        if let Action::Request(RequestAction::Failed(err)) = &action {
            log::warn!(
                "{} failed: {}",
                err.request(),
                err.failure().error
            );
        }
        self.state = next;
        changed
    }

    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> usize {
        actions
            .into_iter()
            .map(|action| self.dispatch(action))
            .filter(|changed| *changed)
            .count()
    }
}
