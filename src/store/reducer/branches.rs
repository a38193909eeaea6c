use crate::domain::{Branch, Listing, MinardError, Operation, listing};
use crate::store::action::{Action, BranchAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Branch>, action: &Action) -> Collection<Branch> {
    match action {
        Action::Branches(action) => reduce_branch_action(state, action),
        Action::Request(RequestAction::Failed(MinardError::Fetch(err))) => match err.operation {
            Operation::LoadBranch => state.fail(err),
            Operation::LoadCommitsForBranch => state.fail_listing(err),
            _ => state.clone(),
        },
        Action::Session(SessionAction::ClearStoredData) => state.clear(),
        _ => state.clone(),
    }
}

fn reduce_branch_action(state: &Collection<Branch>, action: &BranchAction) -> Collection<Branch> {
    match action {
        BranchAction::Store { entities } => state.store(entities),
        BranchAction::AddCommits {
            id,
            commits,
            all_commits_loaded,
        } => state.update(id, |branch| {
            let existing: &[String] = match &branch.commits {
                Some(Listing::Loaded(ids)) => ids,
                _ => &[],
            };
            let appended = listing::append_new(existing, commits);
            let loaded_changed = *all_commits_loaded && !branch.all_commits_loaded;
            if appended.is_none() && !loaded_changed && branch.commits.is_some() {
                return None;
            }
            Some(Branch {
                commits: Some(Listing::Loaded(
                    appended.unwrap_or_else(|| existing.to_vec()),
                )),
                all_commits_loaded: branch.all_commits_loaded || *all_commits_loaded,
                ..branch.clone()
            })
        }),
        BranchAction::UpdateLatestActivityTimestamp { id, timestamp } => {
            state.update(id, |branch| {
                (branch.latest_activity_timestamp != Some(*timestamp)).then(|| Branch {
                    latest_activity_timestamp: Some(*timestamp),
                    ..branch.clone()
                })
            })
        }
        BranchAction::UpdateLatestDeployedCommit { id, commit } => state.update(id, |branch| {
            (branch.latest_successfully_deployed_commit.as_ref() != Some(commit)).then(|| {
                Branch {
                    latest_successfully_deployed_commit: Some(commit.clone()),
                    ..branch.clone()
                }
            })
        }),
        BranchAction::UpdateLatestCommit { id, commit } => state.update(id, |branch| {
            (branch.latest_commit.as_ref() != Some(commit)).then(|| Branch {
                latest_commit: Some(commit.clone()),
                ..branch.clone()
            })
        }),
        BranchAction::Remove { id } => state.remove(id),
    }
}
