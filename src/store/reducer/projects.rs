use crate::domain::{Listing, MinardError, Operation, Project, listing};
use crate::store::action::{Action, ProjectAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Project>, action: &Action) -> Collection<Project> {
    match action {
        Action::Projects(action) => reduce_project_action(state, action),
        Action::Request(RequestAction::Failed(MinardError::Fetch(err))) => match err.operation {
            Operation::LoadProject => state.fail(err),
            Operation::LoadBranchesForProject => state.fail_listing(err),
            _ => state.clone(),
        },
        Action::Request(RequestAction::Succeeded(info))
            if info.operation == Operation::DeleteProject =>
        {
            match &info.id {
                Some(id) => state.remove(id),
                None => state.clone(),
            }
        }
        Action::Session(SessionAction::ClearStoredData) => state.clear(),
        _ => state.clone(),
    }
}

fn reduce_project_action(state: &Collection<Project>, action: &ProjectAction) -> Collection<Project> {
    match action {
        ProjectAction::Store { entities } => state.store(entities),
        ProjectAction::AddBranches { id, branches } => state.update(id, |project| {
            let existing: &[String] = match &project.branches {
                Some(Listing::Loaded(ids)) => ids.as_slice(),
                _ => &[],
            };
            let next = listing::append_new(existing, branches)?;
            Some(Project {
                branches: Some(Listing::Loaded(next)),
                ..project.clone()
            })
        }),
        ProjectAction::RemoveBranch { id, branch } => state.update(id, |project| {
            let ids = project.branches.as_ref()?.ids()?;
            let next = listing::without(ids, branch)?;
            Some(Project {
                branches: Some(Listing::Loaded(next)),
                ..project.clone()
            })
        }),
        ProjectAction::UpdateLatestActivityTimestamp { id, timestamp } => {
            state.update(id, |project| {
                (project.latest_activity_timestamp != Some(*timestamp)).then(|| Project {
                    latest_activity_timestamp: Some(*timestamp),
                    ..project.clone()
                })
            })
        }
        ProjectAction::UpdateLatestDeployedCommit { id, commit } => state.update(id, |project| {
            (project.latest_successfully_deployed_commit.as_ref() != Some(commit)).then(|| {
                Project {
                    latest_successfully_deployed_commit: Some(commit.clone()),
                    ..project.clone()
                }
            })
        }),
        ProjectAction::Edit {
            id,
            name,
            description,
        } => state.update(id, |project| {
            (project.name != *name || project.description != *description).then(|| Project {
                name: name.clone(),
                description: description.clone(),
                ..project.clone()
            })
        }),
        ProjectAction::Remove { id } => state.remove(id),
    }
}
