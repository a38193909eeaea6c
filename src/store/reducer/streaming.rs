use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::store::action::{Action, SessionAction, StreamingAction};

/// State of the live update stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    Open,
    InitialConnect,
    Connecting,
    #[default]
    Closed,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::InitialConnect => write!(f, "initial_connect"),
            Self::Connecting => write!(f, "connecting"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConnectionState {
    pub status: ConnectionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConnectionState {
    pub fn new(status: ConnectionStatus, error: Option<String>) -> Self {
        Self { status, error }
    }
}

pub fn reduce(state: &Arc<ConnectionState>, action: &Action) -> Arc<ConnectionState> {
    match action {
        Action::Streaming(StreamingAction::SetConnectionState(next)) => {
            if **state == *next {
                Arc::clone(state)
            } else {
                Arc::new(next.clone())
            }
        }
        Action::Session(SessionAction::ClearStoredData) => Arc::new(ConnectionState::default()),
        _ => Arc::clone(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        let state = ConnectionState::default();
        assert_eq!(state.status, ConnectionStatus::Closed);
        assert_eq!(state.error, None);
    }

    #[test]
    fn replaces_only_on_change() {
        let state = Arc::new(ConnectionState::default());
        let open = Action::set_connection_state(ConnectionState::new(ConnectionStatus::Open, None));
        let next = reduce(&state, &open);
        assert_eq!(next.status, ConnectionStatus::Open);
        assert!(Arc::ptr_eq(&reduce(&next, &open), &next));

        let errored = Action::set_connection_state(ConnectionState::new(
            ConnectionStatus::Open,
            Some("stream reset".into()),
        ));
        let next = reduce(&next, &errored);
        assert_eq!(next.error.as_deref(), Some("stream reset"));
    }

    #[test]
    fn clear_stored_data_restores_initial_state() {
        let state = Arc::new(ConnectionState::new(
            ConnectionStatus::Connecting,
            Some("lost".into()),
        ));
        let next = reduce(&state, &Action::clear_stored_data());
        assert_eq!(*next, ConnectionState::default());
    }
}
