use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::branch::BranchId;
use super::commit::Commit;
use super::deployment::Deployment;
use super::entity::Entity;
use super::error::ConversionError;
use super::project::ProjectId;

/// Unique identifier for an activity
pub type ActivityId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Deployment,
    Comment,
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deployment => write!(f, "deployment"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

impl FromStr for ActivityType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deployment" => Ok(Self::Deployment),
            "comment" => Ok(Self::Comment),
            other => Err(ConversionError::UnknownActivityType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: ProjectId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchSummary {
    pub id: BranchId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// One entry of the activity feed.
///
/// Activities are denormalized snapshots: they copy the project, branch,
/// commit and deployment as they were when the activity happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    pub activity_type: ActivityType,
    pub timestamp: DateTime<Utc>,
    pub project: ProjectSummary,
    pub branch: BranchSummary,
    pub commit: Commit,
    pub deployment: Deployment,
    #[serde(default)]
    pub comment: Option<CommentSummary>,
}

impl Entity for Activity {
    fn id(&self) -> &str {
        &self.id
    }
}
