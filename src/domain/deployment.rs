use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::commit::Signature;
use super::entity::Entity;
use super::error::ConversionError;
use super::listing::Listing;

/// Unique identifier for a deployment
pub type DeploymentId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    Success,
    Failed,
    Running,
    Pending,
    Canceled,
}

impl DeploymentStatus {
    /// Whether the deployment may still change status.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Running | Self::Pending)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Running => write!(f, "running"),
            Self::Pending => write!(f, "pending"),
            Self::Canceled => write!(f, "canceled"),
        }
    }
}

impl FromStr for DeploymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            "running" => Ok(Self::Running),
            "pending" => Ok(Self::Pending),
            "canceled" => Ok(Self::Canceled),
            other => Err(ConversionError::InvalidDeploymentStatus(other.to_string())),
        }
    }
}

/// A preview deployment of one commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deployment {
    pub id: DeploymentId,
    pub status: DeploymentStatus,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub screenshot: Option<String>,
    pub creator: Signature,
    pub token: String,
    #[serde(default)]
    pub comments: Option<Listing>,
    /// Total number of comments on the server, which may exceed the ids in
    /// `comments` when not all of them were fetched.
    #[serde(default)]
    pub comment_count: Option<usize>,
}

impl Entity for Deployment {
    fn id(&self) -> &str {
        &self.id
    }

    fn listing(&self) -> Option<&Option<Listing>> {
        Some(&self.comments)
    }

    fn listing_mut(&mut self) -> Option<&mut Option<Listing>> {
        Some(&mut self.comments)
    }
}
