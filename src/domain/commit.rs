use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::deployment::DeploymentId;
use super::entity::Entity;

/// Unique identifier for a commit
pub type CommitId = String;

/// Author or committer of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: CommitId,
    pub hash: String,
    /// First line of the commit message.
    pub message: String,
    /// The rest of the commit message, if there is any.
    #[serde(default)]
    pub description: Option<String>,
    pub author: Signature,
    pub committer: Signature,
    #[serde(default)]
    pub deployment: Option<DeploymentId>,
}

impl Commit {
    /// Splits a raw commit message into its subject line and body.
    pub fn split_message(raw: &str) -> (String, Option<String>) {
        let (subject, body) = raw.split_once('\n').unwrap_or((raw, ""));
        let body = body.trim();
        (
            subject.trim_end().to_string(),
            (!body.is_empty()).then(|| body.to_string()),
        )
    }
}

impl Entity for Commit {
    fn id(&self) -> &str {
        &self.id
    }
}
