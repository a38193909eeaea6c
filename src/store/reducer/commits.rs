use crate::domain::{Commit, MinardError, Operation};
use crate::store::action::{Action, CommitAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Commit>, action: &Action) -> Collection<Commit> {
    match action {
        Action::Commits(CommitAction::Store { entities }) => state.store(entities),
        Action::Commits(CommitAction::SetDeployment { id, deployment }) => {
            state.update(id, |commit| {
                (commit.deployment.as_ref() != Some(deployment)).then(|| Commit {
                    deployment: Some(deployment.clone()),
                    ..commit.clone()
                })
            })
        }
        Action::Request(RequestAction::Failed(MinardError::Fetch(err)))
            if err.operation == Operation::LoadCommit =>
        {
            state.fail(err)
        }
        Action::Session(SessionAction::ClearStoredData) => state.clear(),
        _ => state.clone(),
    }
}
