//! Human and JSON summaries of a store's contents.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::domain::{ActivityType, RequestInformation};
use crate::store::{ConnectionState, Store};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub projects: usize,
    pub branches: usize,
    pub commits: usize,
    pub deployments: usize,
    /// Deployments still pending or running.
    pub active_deployments: usize,
    pub comments: usize,
    pub activities: usize,
    pub notifications: usize,
    /// Entries that hold a fetch error instead of an entity.
    pub failed: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedLine {
    pub timestamp: DateTime<Utc>,
    pub activity_type: ActivityType,
    pub project: String,
    pub branch: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLine {
    pub request: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub dispatched: u64,
    pub counts: EntityCounts,
    pub feed: Vec<FeedLine>,
    pub errors: Vec<ErrorLine>,
    pub in_flight: Vec<RequestInformation>,
    pub connection: ConnectionState,
}

impl StoreSummary {
    /// Summarizes `store`, keeping at most `feed_limit` activities.
    pub fn new(store: &Store, feed_limit: usize) -> Self {
        let state = store.state();
        let failed = state.projects.iter().filter(|(_, e)| e.is_failed()).count()
            + state.branches.iter().filter(|(_, e)| e.is_failed()).count()
            + state.commits.iter().filter(|(_, e)| e.is_failed()).count()
            + state.deployments.iter().filter(|(_, e)| e.is_failed()).count()
            + state.comments.iter().filter(|(_, e)| e.is_failed()).count()
            + state.activities.iter().filter(|(_, e)| e.is_failed()).count();

        let feed = store
            .selectors()
            .activities(state)
            .iter()
            .take(feed_limit)
            .map(|activity| FeedLine {
                timestamp: activity.timestamp,
                activity_type: activity.activity_type,
                project: activity.project.name.clone(),
                branch: activity.branch.name.clone(),
                text: match (&activity.activity_type, &activity.comment) {
                    (ActivityType::Comment, Some(comment)) => comment.message.clone(),
                    _ => format!(
                        "{} deployed {}",
                        activity.deployment.creator.email, activity.commit.message
                    ),
                },
            })
            .collect();

        let errors = state
            .errors
            .iter()
            .map(|err| ErrorLine {
                request: err.request().to_string(),
                message: err.failure().pretty_error.clone(),
            })
            .collect();

        Self {
            dispatched: store.dispatched(),
            counts: EntityCounts {
                projects: state.projects.len(),
                branches: state.branches.len(),
                commits: state.commits.len(),
                deployments: state.deployments.len(),
                active_deployments: state
                    .deployments
                    .entities()
                    .filter(|deployment| deployment.status.is_active())
                    .count(),
                comments: state.comments.len(),
                activities: state.activities.len(),
                notifications: state.notifications.len(),
                failed,
            },
            feed,
            errors,
            in_flight: state.requests.to_vec(),
            connection: (*state.streaming).clone(),
        }
    }
}

impl fmt::Display for StoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.counts;
        writeln!(f, "Actions dispatched: {}", self.dispatched)?;
        writeln!(
            f,
            "Projects: {}  Branches: {}  Commits: {}  Deployments: {} ({} active)  Comments: {}",
            c.projects, c.branches, c.commits, c.deployments, c.active_deployments, c.comments
        )?;
        writeln!(
            f,
            "Activities: {}  Notifications: {}  Failed entries: {}",
            c.activities, c.notifications, c.failed
        )?;
        writeln!(f, "Connection: {}", self.connection.status)?;
        if let Some(err) = &self.connection.error {
            writeln!(f, "  {err}")?;
        }

        if !self.feed.is_empty() {
            writeln!(f, "\nLatest activity:")?;
            for line in &self.feed {
                writeln!(
                    f,
                    "  {} [{}] {}/{}: {}",
                    line.timestamp.format("%Y-%m-%d %H:%M"),
                    line.activity_type,
                    line.project,
                    line.branch,
                    line.text
                )?;
            }
        }

        if !self.errors.is_empty() {
            writeln!(f, "\nErrors:")?;
            for line in &self.errors {
                writeln!(f, "  {}: {}", line.request, line.message)?;
            }
        }

        if !self.in_flight.is_empty() {
            writeln!(f, "\nIn flight:")?;
            for request in &self.in_flight {
                writeln!(f, "  {request}")?;
            }
        }
        Ok(())
    }
}
