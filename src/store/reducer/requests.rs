use std::sync::Arc;

use crate::domain::{Operation, RequestInformation};
use crate::store::action::{Action, RequestAction, SessionAction};

/// Requests currently in flight, in the order they started.
///
/// A marker only goes away when its request completes. A request whose
/// completion is never dispatched keeps its marker until the session is
/// cleared.
pub type RequestList = Arc<Vec<RequestInformation>>;

/// Operations that drive a loading indicator.
pub fn is_tracked(operation: Operation) -> bool {
    operation.is_load()
        || matches!(
            operation,
            Operation::DeleteProject | Operation::DeleteComment
        )
}

pub fn reduce(state: &RequestList, action: &Action) -> RequestList {
    match action {
        Action::Request(RequestAction::Started(info)) if is_tracked(info.operation) => {
            let marker = RequestInformation::new(info.operation, info.id.clone());
            if state.contains(&marker) {
                return Arc::clone(state);
            }
            let mut next = Vec::with_capacity(state.len() + 1);
            next.extend(state.iter().cloned());
            next.push(marker);
            Arc::new(next)
        }
        Action::Request(request @ (RequestAction::Succeeded(_) | RequestAction::Failed(_))) => {
            let completed = request.request();
            if !is_tracked(completed.operation)
                || !state.iter().any(|marker| marker.is_settled_by(&completed))
            {
                return Arc::clone(state);
            }
            Arc::new(
                state
                    .iter()
                    .filter(|marker| !marker.is_settled_by(&completed))
                    .cloned()
                    .collect(),
            )
        }
        Action::Session(SessionAction::ClearStoredData) => Arc::new(Vec::new()),
        _ => Arc::clone(state),
    }
}
