use std::sync::Arc;

use crate::domain::{
    Activity, Branch, Comment, Commit, Deployment, NotificationConfiguration, Project,
};

use super::collection::Collection;
use super::reducer::errors::ErrorList;
use super::reducer::requests::RequestList;
use super::reducer::streaming::ConnectionState;

/// All cached state in one struct.
///
/// Every field is reference counted, so cloning the state is cheap and two
/// states can be compared slice by slice with `ptr_eq`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub projects: Collection<Project>,
    pub branches: Collection<Branch>,
    pub commits: Collection<Commit>,
    pub deployments: Collection<Deployment>,
    pub comments: Collection<Comment>,
    pub activities: Collection<Activity>,
    pub notifications: Collection<NotificationConfiguration>,
    pub errors: ErrorList,
    pub requests: RequestList,
    pub streaming: Arc<ConnectionState>,
}

impl AppState {
    /// Whether every slice is the same allocation as in `other`.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.projects.ptr_eq(&other.projects)
            && self.branches.ptr_eq(&other.branches)
            && self.commits.ptr_eq(&other.commits)
            && self.deployments.ptr_eq(&other.deployments)
            && self.comments.ptr_eq(&other.comments)
            && self.activities.ptr_eq(&other.activities)
            && self.notifications.ptr_eq(&other.notifications)
            && Arc::ptr_eq(&self.errors, &other.errors)
            && Arc::ptr_eq(&self.requests, &other.requests)
            && Arc::ptr_eq(&self.streaming, &other.streaming)
    }

    /// Whether nothing is cached, as right after start-up or a session reset.
    pub fn is_initial(&self) -> bool {
        self.projects.is_empty()
            && self.branches.is_empty()
            && self.commits.is_empty()
            && self.deployments.is_empty()
            && self.comments.is_empty()
            && self.activities.is_empty()
            && self.notifications.is_empty()
            && self.errors.is_empty()
            && self.requests.is_empty()
            && *self.streaming == ConnectionState::default()
    }
}
