use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    Activity, Branch, BranchId, Comment, CommentId, Commit, CommitId, Deployment, DeploymentId,
    MinardError, NotificationConfiguration, NotificationId, Operation, Project, ProjectId,
    RequestInformation,
};

use super::reducer::streaming::ConnectionState;

/// Every state transition the store understands.
///
/// Each slice reducer sees every action and reacts to the ones it cares
/// about, so a single request failure can update the entity maps, the error
/// list and the request markers at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Projects(ProjectAction),
    Branches(BranchAction),
    Commits(CommitAction),
    Deployments(DeploymentAction),
    Comments(CommentAction),
    Activities(ActivityAction),
    Notifications(NotificationAction),
    Request(RequestAction),
    Errors(ErrorsAction),
    Streaming(StreamingAction),
    Session(SessionAction),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    Store {
        entities: Vec<Project>,
    },
    AddBranches {
        id: ProjectId,
        branches: Vec<BranchId>,
    },
    RemoveBranch {
        id: ProjectId,
        branch: BranchId,
    },
    UpdateLatestActivityTimestamp {
        id: ProjectId,
        timestamp: DateTime<Utc>,
    },
    UpdateLatestDeployedCommit {
        id: ProjectId,
        commit: CommitId,
    },
    /// Applies the result of a successful project edit.
    Edit {
        id: ProjectId,
        name: String,
        description: Option<String>,
    },
    Remove {
        id: ProjectId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchAction {
    Store {
        entities: Vec<Branch>,
    },
    AddCommits {
        id: BranchId,
        commits: Vec<CommitId>,
        #[serde(default)]
        all_commits_loaded: bool,
    },
    UpdateLatestActivityTimestamp {
        id: BranchId,
        timestamp: DateTime<Utc>,
    },
    UpdateLatestDeployedCommit {
        id: BranchId,
        commit: CommitId,
    },
    UpdateLatestCommit {
        id: BranchId,
        commit: CommitId,
    },
    Remove {
        id: BranchId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitAction {
    Store {
        entities: Vec<Commit>,
    },
    SetDeployment {
        id: CommitId,
        deployment: DeploymentId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentAction {
    Store {
        entities: Vec<Deployment>,
    },
    AddComments {
        id: DeploymentId,
        comments: Vec<CommentId>,
    },
    RemoveComment {
        id: DeploymentId,
        comment: CommentId,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentAction {
    Store { entities: Vec<Comment> },
    Remove { id: CommentId },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    Store { entities: Vec<Activity> },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationAction {
    Store {
        entities: Vec<NotificationConfiguration>,
    },
    Remove {
        id: NotificationId,
    },
}

/// Lifecycle of a remote call, dispatched by whatever performs the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestAction {
    Started(RequestInformation),
    Succeeded(RequestInformation),
    Failed(MinardError),
}

impl RequestAction {
    /// The request this action starts or completes.
    pub fn request(&self) -> RequestInformation {
        match self {
            Self::Started(info) | Self::Succeeded(info) => info.clone(),
            Self::Failed(err) => err.request(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorsAction {
    ClearSignupErrors,
    ClearDeletionErrors { operation: Operation, id: String },
    ClearFetchCollectionErrors { operation: Operation },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreamingAction {
    SetConnectionState(ConnectionState),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionAction {
    /// Drops everything cached for the session, on logout or session reset.
    ClearStoredData,
}

impl Action {
    pub fn store_projects(entities: Vec<Project>) -> Self {
        Self::Projects(ProjectAction::Store { entities })
    }

    pub fn store_branches(entities: Vec<Branch>) -> Self {
        Self::Branches(BranchAction::Store { entities })
    }

    pub fn store_commits(entities: Vec<Commit>) -> Self {
        Self::Commits(CommitAction::Store { entities })
    }

    pub fn store_deployments(entities: Vec<Deployment>) -> Self {
        Self::Deployments(DeploymentAction::Store { entities })
    }

    pub fn store_comments(entities: Vec<Comment>) -> Self {
        Self::Comments(CommentAction::Store { entities })
    }

    pub fn store_activities(entities: Vec<Activity>) -> Self {
        Self::Activities(ActivityAction::Store { entities })
    }

    pub fn store_notification_configurations(entities: Vec<NotificationConfiguration>) -> Self {
        Self::Notifications(NotificationAction::Store { entities })
    }

    pub fn add_branches_to_project(id: impl Into<String>, branches: Vec<BranchId>) -> Self {
        Self::Projects(ProjectAction::AddBranches {
            id: id.into(),
            branches,
        })
    }

    pub fn add_commits_to_branch(
        id: impl Into<String>,
        commits: Vec<CommitId>,
        all_commits_loaded: bool,
    ) -> Self {
        Self::Branches(BranchAction::AddCommits {
            id: id.into(),
            commits,
            all_commits_loaded,
        })
    }

    pub fn add_comments_to_deployment(id: impl Into<String>, comments: Vec<CommentId>) -> Self {
        Self::Deployments(DeploymentAction::AddComments {
            id: id.into(),
            comments,
        })
    }

    pub fn remove_comment_from_deployment(
        id: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self::Deployments(DeploymentAction::RemoveComment {
            id: id.into(),
            comment: comment.into(),
        })
    }

    pub fn request_started(operation: Operation, id: Option<String>) -> Self {
        Self::Request(RequestAction::Started(RequestInformation::new(operation, id)))
    }

    pub fn request_succeeded(operation: Operation, id: Option<String>) -> Self {
        Self::Request(RequestAction::Succeeded(RequestInformation::new(
            operation, id,
        )))
    }

    pub fn request_failed(error: MinardError) -> Self {
        Self::Request(RequestAction::Failed(error))
    }

    pub fn set_connection_state(state: ConnectionState) -> Self {
        Self::Streaming(StreamingAction::SetConnectionState(state))
    }

    pub fn clear_stored_data() -> Self {
        Self::Session(SessionAction::ClearStoredData)
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Projects(a) => match a {
                ProjectAction::Store { .. } => "projects/store",
                ProjectAction::AddBranches { .. } => "projects/add_branches",
                ProjectAction::RemoveBranch { .. } => "projects/remove_branch",
                ProjectAction::UpdateLatestActivityTimestamp { .. } => {
                    "projects/update_latest_activity_timestamp"
                }
                ProjectAction::UpdateLatestDeployedCommit { .. } => {
                    "projects/update_latest_deployed_commit"
                }
                ProjectAction::Edit { .. } => "projects/edit",
                ProjectAction::Remove { .. } => "projects/remove",
            },
            Self::Branches(a) => match a {
                BranchAction::Store { .. } => "branches/store",
                BranchAction::AddCommits { .. } => "branches/add_commits",
                BranchAction::UpdateLatestActivityTimestamp { .. } => {
                    "branches/update_latest_activity_timestamp"
                }
                BranchAction::UpdateLatestDeployedCommit { .. } => {
                    "branches/update_latest_deployed_commit"
                }
                BranchAction::UpdateLatestCommit { .. } => "branches/update_latest_commit",
                BranchAction::Remove { .. } => "branches/remove",
            },
            Self::Commits(a) => match a {
                CommitAction::Store { .. } => "commits/store",
                CommitAction::SetDeployment { .. } => "commits/set_deployment",
            },
            Self::Deployments(a) => match a {
                DeploymentAction::Store { .. } => "deployments/store",
                DeploymentAction::AddComments { .. } => "deployments/add_comments",
                DeploymentAction::RemoveComment { .. } => "deployments/remove_comment",
            },
            Self::Comments(a) => match a {
                CommentAction::Store { .. } => "comments/store",
                CommentAction::Remove { .. } => "comments/remove",
            },
            Self::Activities(ActivityAction::Store { .. }) => "activities/store",
            Self::Notifications(a) => match a {
                NotificationAction::Store { .. } => "notifications/store",
                NotificationAction::Remove { .. } => "notifications/remove",
            },
            Self::Request(a) => match a {
                RequestAction::Started(_) => "request/started",
                RequestAction::Succeeded(_) => "request/succeeded",
                RequestAction::Failed(_) => "request/failed",
            },
            Self::Errors(a) => match a {
                ErrorsAction::ClearSignupErrors => "errors/clear_signup",
                ErrorsAction::ClearDeletionErrors { .. } => "errors/clear_deletion",
                ErrorsAction::ClearFetchCollectionErrors { .. } => "errors/clear_fetch_collection",
            },
            Self::Streaming(StreamingAction::SetConnectionState(_)) => "streaming/set_state",
            Self::Session(SessionAction::ClearStoredData) => "session/clear_stored_data",
        }
    }
}
