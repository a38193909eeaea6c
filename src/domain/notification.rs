use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::project::ProjectId;

/// Unique identifier for a notification configuration
pub type NotificationId = String;

/// Where deployment notifications are delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationTarget {
    Flowdock {
        project_id: ProjectId,
        flow_token: String,
    },
    Slack {
        project_id: ProjectId,
        slack_webhook_url: String,
    },
    #[serde(rename = "hipchat")]
    HipChat {
        project_id: ProjectId,
        hipchat_room_id: u64,
        hipchat_auth_token: String,
    },
    /// GitHub notifications configured once for every project of a team.
    #[serde(rename = "github_team")]
    GitHubTeam { team_id: String },
    /// GitHub notifications for a single project's repository.
    #[serde(rename = "github_project")]
    GitHubProject {
        project_id: ProjectId,
        github_owner: String,
        github_repo: String,
        github_app_id: u64,
    },
}

impl NotificationTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Flowdock { .. } => "flowdock",
            Self::Slack { .. } => "slack",
            Self::HipChat { .. } => "hipchat",
            Self::GitHubTeam { .. } | Self::GitHubProject { .. } => "github",
        }
    }

    pub fn project_id(&self) -> Option<&str> {
        match self {
            Self::Flowdock { project_id, .. }
            | Self::Slack { project_id, .. }
            | Self::HipChat { project_id, .. }
            | Self::GitHubProject { project_id, .. } => Some(project_id),
            Self::GitHubTeam { .. } => None,
        }
    }

    pub fn team_id(&self) -> Option<&str> {
        match self {
            Self::GitHubTeam { team_id } => Some(team_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfiguration {
    pub id: NotificationId,
    #[serde(flatten)]
    pub target: NotificationTarget,
}

impl Entity for NotificationConfiguration {
    fn id(&self) -> &str {
        &self.id
    }
}
