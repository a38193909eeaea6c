pub mod activities;
pub mod branches;
pub mod comments;
pub mod commits;
pub mod deployments;
pub mod errors;
pub mod notifications;
pub mod projects;
pub mod requests;
pub mod streaming;

use super::action::Action;
use super::state::AppState;

/// Runs `action` through every slice reducer.
///
/// Slices the action does not touch come back as the same allocation.
pub fn reduce(state: &AppState, action: &Action) -> AppState {
    AppState {
        projects: projects::reduce(&state.projects, action),
        branches: branches::reduce(&state.branches, action),
        commits: commits::reduce(&state.commits, action),
        deployments: deployments::reduce(&state.deployments, action),
        comments: comments::reduce(&state.comments, action),
        activities: activities::reduce(&state.activities, action),
        notifications: notifications::reduce(&state.notifications, action),
        errors: errors::reduce(&state.errors, action),
        requests: requests::reduce(&state.requests, action),
        streaming: streaming::reduce(&state.streaming, action),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DeleteError, Failure, Listing, MinardError, Operation, RequestInformation,
    };
    use crate::store::action::RequestAction;
    use crate::store::fixtures::{activity, deployment, fetch_error, project};
    use crate::store::reducer::streaming::{ConnectionState, ConnectionStatus};

    fn populated() -> AppState {
        let actions = [
            Action::store_projects(vec![project("p1")]),
            Action::store_deployments(vec![deployment("d1")]),
            Action::store_activities(vec![activity("a1", 10, "p1")]),
            Action::request_started(Operation::LoadActivities, None),
            Action::request_failed(MinardError::Delete(DeleteError {
                operation: Operation::DeleteProject,
                id: "p1".into(),
                failure: Failure::new("nope", None),
            })),
            Action::set_connection_state(ConnectionState::new(ConnectionStatus::Open, None)),
        ];
        actions
            .iter()
            .fold(AppState::default(), |state, action| reduce(&state, action))
    }

    #[test]
    fn untouched_slices_keep_reference() {
        let state = populated();
        let next = reduce(&state, &Action::store_activities(vec![]));
        assert!(next.ptr_eq(&state));

        let next = reduce(&state, &Action::store_projects(vec![project("p2")]));
        assert!(!next.projects.ptr_eq(&state.projects));
        assert!(next.activities.ptr_eq(&state.activities));
        assert!(std::sync::Arc::ptr_eq(&next.errors, &state.errors));
    }

    #[test]
    fn one_failure_updates_entities_errors_and_requests() {
        let state = reduce(
            &AppState::default(),
            &Action::store_projects(vec![project("p1")]),
        );
        let state = reduce(
            &state,
            &Action::request_started(Operation::LoadBranchesForProject, Some("p1".into())),
        );
        assert_eq!(
            state.requests.as_slice(),
            &[RequestInformation::entity(Operation::LoadBranchesForProject, "p1")]
        );

        let next = reduce(
            &state,
            &Action::Request(RequestAction::Failed(MinardError::Fetch(fetch_error(
                Operation::LoadBranchesForProject,
                "p1",
            )))),
        );
        assert!(next.requests.is_empty());
        assert!(matches!(
            next.projects.entity("p1").unwrap().branches,
            Some(Listing::Failed(_))
        ));
        assert!(next.errors.is_empty());
    }

    #[test]
    fn clear_stored_data_resets_every_slice() {
        let state = populated();
        assert!(!state.is_initial());
        let cleared = reduce(&state, &Action::clear_stored_data());
        assert!(cleared.is_initial());

        let again = reduce(&AppState::default(), &Action::clear_stored_data());
        assert!(again.is_initial());
    }
}
