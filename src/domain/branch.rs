use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::commit::CommitId;
use super::entity::Entity;
use super::listing::Listing;
use super::project::ProjectId;

/// Unique identifier for a branch
pub type BranchId = String;

/// A branch of a project's repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub project: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Commit ids in the order they were fetched, newest first.
    #[serde(default)]
    pub commits: Option<Listing>,
    /// Set once paging through the branch history reached the first commit.
    #[serde(default)]
    pub all_commits_loaded: bool,
    #[serde(default)]
    pub latest_activity_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub latest_successfully_deployed_commit: Option<CommitId>,
    #[serde(default)]
    pub latest_commit: Option<CommitId>,
}

impl Entity for Branch {
    fn id(&self) -> &str {
        &self.id
    }

    fn listing(&self) -> Option<&Option<Listing>> {
        Some(&self.commits)
    }

    fn listing_mut(&mut self) -> Option<&mut Option<Listing>> {
        Some(&mut self.commits)
    }
}
