use crate::domain::{Deployment, Listing, MinardError, Operation, listing};
use crate::store::action::{Action, DeploymentAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Deployment>, action: &Action) -> Collection<Deployment> {
    match action {
        Action::Deployments(action) => reduce_deployment_action(state, action),
        Action::Request(RequestAction::Failed(MinardError::Fetch(err))) => match err.operation {
            Operation::LoadDeployment => state.fail(err),
            Operation::LoadCommentsForDeployment => state.fail_listing(err),
            _ => state.clone(),
        },
        Action::Request(RequestAction::Succeeded(info))
            if info.operation == Operation::DeleteComment =>
        {
            match &info.id {
                Some(comment) => drop_deleted_comment(state, comment),
                None => state.clone(),
            }
        }
        Action::Session(SessionAction::ClearStoredData) => state.clear(),
        _ => state.clone(),
    }
}

/// Removes a deleted comment from every deployment listing it.
fn drop_deleted_comment(state: &Collection<Deployment>, comment: &str) -> Collection<Deployment> {
    let owners: Vec<String> = state
        .entities()
        .filter(|deployment| {
            deployment
                .comments
                .as_ref()
                .and_then(Listing::ids)
                .is_some_and(|ids| ids.iter().any(|id| id == comment))
        })
        .map(|deployment| deployment.id.clone())
        .collect();
    owners
        .iter()
        .fold(state.clone(), |acc, id| remove_comment(&acc, id, comment))
}

fn remove_comment(
    state: &Collection<Deployment>,
    id: &str,
    comment: &str,
) -> Collection<Deployment> {
    state.update(id, |deployment| {
        let ids = deployment.comments.as_ref()?.ids()?;
        let next = listing::without(ids, comment)?;
        Some(Deployment {
            comments: Some(Listing::Loaded(next)),
            comment_count: deployment.comment_count.map(|count| count.saturating_sub(1)),
            ..deployment.clone()
        })
    })
}

fn reduce_deployment_action(
    state: &Collection<Deployment>,
    action: &DeploymentAction,
) -> Collection<Deployment> {
    match action {
        DeploymentAction::Store { entities } => state.store(entities),
        DeploymentAction::AddComments { id, comments } => state.update(id, |deployment| {
            let existing: &[String] = match &deployment.comments {
                Some(Listing::Loaded(ids)) => ids,
                _ => &[],
            };
            let next = listing::append_new(existing, comments)?;
            let added = next.len() - existing.len();
            Some(Deployment {
                comments: Some(Listing::Loaded(next)),
                comment_count: Some(deployment.comment_count.unwrap_or(0) + added),
                ..deployment.clone()
            })
        }),
        DeploymentAction::RemoveComment { id, comment } => remove_comment(state, id, comment),
    }
}
