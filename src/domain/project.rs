use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::CommitId;
use super::entity::Entity;
use super::listing::Listing;

/// Unique identifier for a project
pub type ProjectId = String;

/// Someone who has recently pushed to a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveUser {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

/// A project hosted on the deployment server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Branch ids, newest activity first as delivered by the API.
    #[serde(default)]
    pub branches: Option<Listing>,
    #[serde(default)]
    pub latest_activity_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_successfully_deployed_commit: Option<CommitId>,
    #[serde(default)]
    pub active_users: Vec<ActiveUser>,
    pub repo_url: String,
    pub token: String,
    #[serde(default)]
    pub webhook_url: Option<String>,
}

impl Entity for Project {
    fn id(&self) -> &str {
        &self.id
    }

    fn listing(&self) -> Option<&Option<Listing>> {
        Some(&self.branches)
    }

    fn listing_mut(&mut self) -> Option<&mut Option<Listing>> {
        Some(&mut self.branches)
    }
}
