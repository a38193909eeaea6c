use crate::domain::{Comment, Operation};
use crate::store::action::{Action, CommentAction, RequestAction, SessionAction};
use crate::store::collection::Collection;

pub fn reduce(state: &Collection<Comment>, action: &Action) -> Collection<Comment> {
    match action {
        Action::Comments(CommentAction::Store { entities }) => state.store(entities),
        Action::Comments(CommentAction::Remove { id }) => state.remove(id),
        Action::Request(RequestAction::Succeeded(info))
            if info.operation == Operation::DeleteComment =>
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
