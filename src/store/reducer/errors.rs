use std::sync::Arc;

use crate::domain::MinardError;
use crate::store::action::{Action, ErrorsAction, RequestAction, SessionAction};

/// Failures the rendering layer shows outside of the entity they concern.
///
/// Id-scoped fetch failures live in the entity maps instead, and create or
/// edit failures are reported straight to the form that issued them.
pub type ErrorList = Arc<Vec<MinardError>>;

pub fn reduce(state: &ErrorList, action: &Action) -> ErrorList {
    match action {
        Action::Request(RequestAction::Failed(err)) if is_kept(err) => {
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend(state.iter().cloned());
            next.push(err.clone());
            Arc::new(next)
        }
        // A retry clears the errors left by the previous attempt.
        Action::Request(RequestAction::Started(info)) => {
            retain(state, |err| !info.is_settled_by(&err.request()))
        }
        Action::Errors(ErrorsAction::ClearSignupErrors) => {
            retain(state, |err| !matches!(err, MinardError::Signup(_)))
        }
        Action::Errors(ErrorsAction::ClearDeletionErrors { operation, id }) => retain(state, |err| {
            !matches!(err, MinardError::Delete(e) if e.operation == *operation && e.id == *id)
        }),
        Action::Errors(ErrorsAction::ClearFetchCollectionErrors { operation }) => {
            retain(state, |err| {
                !matches!(err, MinardError::FetchCollection(e) if e.operation == *operation)
            })
        }
        Action::Session(SessionAction::ClearStoredData) => Arc::new(Vec::new()),
        _ => Arc::clone(state),
    }
}

fn is_kept(err: &MinardError) -> bool {
    matches!(
        err,
        MinardError::FetchCollection(_) | MinardError::Delete(_) | MinardError::Signup(_)
    )
}

fn retain<F>(state: &ErrorList, keep: F) -> ErrorList
where
    F: Fn(&MinardError) -> bool,
{
    let next: Vec<MinardError> = state.iter().filter(|err| keep(err)).cloned().collect();
    if next.len() == state.len() {
        Arc::clone(state)
    } else {
        Arc::new(next)
    }
}
