use crate::domain::Activity;
use crate::store::action::{Action, ActivityAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Activity>, action: &Action) -> Collection<Activity> {
    match action {
        Action::Activities(ActivityAction::Store { entities }) => state.store(entities),
        Action::Session(SessionAction::ClearStoredData) => state.clear(),
        _ => state.clone(),
    }
}
