use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A remote operation the dashboard issues against the API.
///
/// Operations name both the request markers kept while a call is in flight
/// and the error records produced when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    LoadAllProjects,
    LoadProject,
    LoadBranchesForProject,
    LoadBranch,
    LoadCommitsForBranch,
    LoadCommit,
    LoadDeployment,
    LoadCommentsForDeployment,
    LoadActivities,
    LoadActivitiesForProject,
    LoadNotificationConfigurations,
    CreateProject,
    EditProject,
    DeleteProject,
    CreateComment,
    DeleteComment,
    CreateNotificationConfiguration,
    DeleteNotificationConfiguration,
    Signup,
}

/// Whether an operation targets one entity or a whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Collection,
    Entity,
}

impl Operation {
    pub const ALL: [Operation; 19] = [
        Self::LoadAllProjects,
        Self::LoadProject,
        Self::LoadBranchesForProject,
        Self::LoadBranch,
        Self::LoadCommitsForBranch,
        Self::LoadCommit,
        Self::LoadDeployment,
        Self::LoadCommentsForDeployment,
        Self::LoadActivities,
        Self::LoadActivitiesForProject,
        Self::LoadNotificationConfigurations,
        Self::CreateProject,
        Self::EditProject,
        Self::DeleteProject,
        Self::CreateComment,
        Self::DeleteComment,
        Self::CreateNotificationConfiguration,
        Self::DeleteNotificationConfiguration,
        Self::Signup,
    ];

    pub fn scope(self) -> Scope {
        match self {
            Self::LoadAllProjects
            | Self::LoadActivities
            | Self::LoadNotificationConfigurations
            | Self::CreateProject
            | Self::CreateNotificationConfiguration
            | Self::Signup => Scope::Collection,
            Self::LoadProject
            | Self::LoadBranchesForProject
            | Self::LoadBranch
            | Self::LoadCommitsForBranch
            | Self::LoadCommit
            | Self::LoadDeployment
            | Self::LoadCommentsForDeployment
            | Self::LoadActivitiesForProject
            | Self::EditProject
            | Self::DeleteProject
            | Self::CreateComment
            | Self::DeleteComment
            | Self::DeleteNotificationConfiguration => Scope::Entity,
        }
    }

    pub fn is_load(self) -> bool {
        matches!(
            self,
            Self::LoadAllProjects
                | Self::LoadProject
                | Self::LoadBranchesForProject
                | Self::LoadBranch
                | Self::LoadCommitsForBranch
                | Self::LoadCommit
                | Self::LoadDeployment
                | Self::LoadCommentsForDeployment
                | Self::LoadActivities
                | Self::LoadActivitiesForProject
                | Self::LoadNotificationConfigurations
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoadAllProjects => "load_all_projects",
            Self::LoadProject => "load_project",
            Self::LoadBranchesForProject => "load_branches_for_project",
            Self::LoadBranch => "load_branch",
            Self::LoadCommitsForBranch => "load_commits_for_branch",
            Self::LoadCommit => "load_commit",
            Self::LoadDeployment => "load_deployment",
            Self::LoadCommentsForDeployment => "load_comments_for_deployment",
            Self::LoadActivities => "load_activities",
            Self::LoadActivitiesForProject => "load_activities_for_project",
            Self::LoadNotificationConfigurations => "load_notification_configurations",
            Self::CreateProject => "create_project",
            Self::EditProject => "edit_project",
            Self::DeleteProject => "delete_project",
            Self::CreateComment => "create_comment",
            Self::DeleteComment => "delete_comment",
            Self::CreateNotificationConfiguration => "create_notification_configuration",
            Self::DeleteNotificationConfiguration => "delete_notification_configuration",
            Self::Signup => "signup",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == normalized)
            .ok_or_else(|| format!("unknown operation: {s}"))
    }
}

/// Marker for one request currently in flight.
///
/// The id is only set for entity-scoped operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestInformation {
    pub operation: Operation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl RequestInformation {
    /// Builds a marker, dropping the id for collection-scoped operations.
    pub fn new(operation: Operation, id: Option<String>) -> Self {
        let id = match operation.scope() {
            Scope::Collection => None,
            Scope::Entity => id,
        };
        Self { operation, id }
    }

    pub fn collection(operation: Operation) -> Self {
        Self::new(operation, None)
    }

    pub fn entity(operation: Operation, id: impl Into<String>) -> Self {
        Self::new(operation, Some(id.into()))
    }

    /// Whether a completion described by `other` settles this marker.
    pub fn is_settled_by(&self, other: &RequestInformation) -> bool {
        if self.operation != other.operation {
            return false;
        }
        match self.operation.scope() {
            Scope::Collection => true,
            Scope::Entity => self.id == other.id,
        }
    }
}

impl fmt::Display for RequestInformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}({})", self.operation, id),
            None => write!(f, "{}", self.operation),
        }
    }
}
