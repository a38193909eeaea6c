use crate::domain::{NotificationConfiguration, Operation};
use crate::store::action::{Action, NotificationAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(
    state: &Collection<NotificationConfiguration>,
    action: &Action,
) -> Collection<NotificationConfiguration> {
    match action {
        Action::Notifications(NotificationAction::Store { entities }) => state.store(entities),
        Action::Notifications(NotificationAction::Remove { id }) => state.remove(id),
        Action::Request(RequestAction::Succeeded(info))
            if info.operation == Operation::DeleteNotificationConfiguration =>
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
