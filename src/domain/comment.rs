use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deployment::DeploymentId;
use super::entity::Entity;

/// Unique identifier for a comment
pub type CommentId = String;

/// A comment left on a deployment preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub deployment: DeploymentId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Entity for Comment {
    fn id(&self) -> &str {
        &self.id
    }
}
