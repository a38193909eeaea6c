use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::{Document, Resource};
use crate::domain::{
    Activity, ActivityType, ActiveUser, Branch, BranchSummary, Comment, CommentSummary, Commit,
    ConversionError, Deployment, DeploymentStatus, Listing, NotificationConfiguration,
    NotificationTarget, Project, ProjectSummary, Signature,
};
use crate::store::Action;

/// Entities found in one response document, grouped by type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Converted {
    pub projects: Vec<Project>,
    pub branches: Vec<Branch>,
    pub commits: Vec<Commit>,
    pub deployments: Vec<Deployment>,
    pub comments: Vec<Comment>,
    pub activities: Vec<Activity>,
    pub notifications: Vec<NotificationConfiguration>,
    /// Resource types that were skipped.
    pub skipped: Vec<String>,
}

impl Converted {
    pub fn len(&self) -> usize {
        self.projects.len()
            + self.branches.len()
            + self.commits.len()
            + self.deployments.len()
            + self.comments.len()
            + self.activities.len()
            + self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One store action per non-empty group.
    pub fn into_actions(self) -> Vec<Action> {
        let mut actions = Vec::new();
        if !self.projects.is_empty() {
            actions.push(Action::store_projects(self.projects));
        }
        if !self.branches.is_empty() {
            actions.push(Action::store_branches(self.branches));
        }
        if !self.commits.is_empty() {
            actions.push(Action::store_commits(self.commits));
        }
        if !self.deployments.is_empty() {
            actions.push(Action::store_deployments(self.deployments));
        }
        if !self.comments.is_empty() {
            actions.push(Action::store_comments(self.comments));
        }
        if !self.activities.is_empty() {
            actions.push(Action::store_activities(self.activities));
        }
        if !self.notifications.is_empty() {
            actions.push(Action::store_notification_configurations(
                self.notifications,
            ));
        }
        actions
    }
}

/// Converts every primary and included resource of `document`.
///
/// Unknown resource types are logged and skipped; a malformed resource of a
/// known type fails the whole document.
pub fn convert_document(document: &Document) -> Result<Converted, ConversionError> {
    let mut out = Converted::default();
    for resource in document.resources() {
        match resource.kind.as_str() {
            "projects" => out.projects.push(to_project(resource)?),
            "branches" => out.branches.push(to_branch(resource)?),
            "commits" => out.commits.push(to_commit(resource)?),
            "deployments" => out.deployments.push(to_deployment(resource)?),
            "comments" => out.comments.push(to_comment(resource)?),
            "activities" => out.activities.push(to_activity(resource)?),
            "notifications" => out.notifications.push(to_notification(resource)?),
            other => {
                log::warn!("Skipping resource {} of unknown type {}", resource.id, other);
                out.skipped.push(other.to_string());
            }
        }
    }
    Ok(out)
}

fn expect_kind(resource: &Resource, expected: &str) -> Result<(), ConversionError> {
    if resource.kind == expected {
        Ok(())
    } else {
        Err(ConversionError::UnexpectedResourceType {
            expected: expected.to_string(),
            found: resource.kind.clone(),
        })
    }
}

fn attributes<T: DeserializeOwned>(resource: &Resource) -> Result<T, ConversionError> {
    serde_json::from_value(resource.attributes.clone()).map_err(|source| {
        ConversionError::InvalidAttributes {
            kind: resource.kind.clone(),
            id: resource.id.clone(),
            source,
        }
    })
}

fn required<T>(resource: &Resource, field: &'static str, value: Option<T>) -> Result<T, ConversionError> {
    value.ok_or_else(|| ConversionError::MissingField {
        kind: resource.kind.clone(),
        id: resource.id.clone(),
        field,
    })
}

/// A listing only when the server sent linkage for it.
fn listing(resource: &Resource, name: &str) -> Option<Listing> {
    resource.has_linkage(name).then(|| {
        Listing::Loaded(
            resource
                .related_ids(name)
                .into_iter()
                .map(str::to_string)
                .collect(),
        )
    })
}

fn related(resource: &Resource, name: &str) -> Option<String> {
    resource.related_id(name).map(str::to_string)
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ProjectAttributes {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    active_committers: Vec<ActiveUser>,
    #[serde(default)]
    latest_activity_timestamp: Option<DateTime<Utc>>,
    repo_url: String,
    token: String,
    #[serde(default)]
    webhook_url: Option<String>,
}

pub fn to_project(resource: &Resource) -> Result<Project, ConversionError> {
    expect_kind(resource, "projects")?;
    let attrs: ProjectAttributes = attributes(resource)?;
    Ok(Project {
        id: resource.id.clone(),
        name: attrs.name,
        description: attrs.description,
        branches: listing(resource, "branches"),
        latest_activity_timestamp: attrs.latest_activity_timestamp,
        latest_successfully_deployed_commit: related(
            resource,
            "latest-successfully-deployed-commit",
        ),
        active_users: attrs.active_committers,
        repo_url: attrs.repo_url,
        token: attrs.token,
        webhook_url: attrs.webhook_url,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct BranchAttributes {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    latest_activity_timestamp: Option<DateTime<Utc>>,
}

pub fn to_branch(resource: &Resource) -> Result<Branch, ConversionError> {
    expect_kind(resource, "branches")?;
    let attrs: BranchAttributes = attributes(resource)?;
    Ok(Branch {
        id: resource.id.clone(),
        project: required(resource, "project", related(resource, "project"))?,
        name: attrs.name,
        description: attrs.description,
        commits: listing(resource, "commits"),
        all_commits_loaded: false,
        latest_activity_timestamp: attrs.latest_activity_timestamp,
        latest_successfully_deployed_commit: related(
            resource,
            "latest-successfully-deployed-commit",
        ),
        latest_commit: related(resource, "latest-commit"),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CommitAttributes {
    hash: String,
    message: String,
    author: Signature,
    committer: Signature,
}

pub fn to_commit(resource: &Resource) -> Result<Commit, ConversionError> {
    expect_kind(resource, "commits")?;
    let attrs: CommitAttributes = attributes(resource)?;
    let (message, description) = Commit::split_message(&attrs.message);
    Ok(Commit {
        id: resource.id.clone(),
        hash: attrs.hash,
        message,
        description,
        author: attrs.author,
        committer: attrs.committer,
        deployment: related(resource, "deployments"),
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeploymentAttributes {
    status: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    screenshot: Option<String>,
    creator: Signature,
    #[serde(default)]
    comment_count: Option<usize>,
    #[serde(default)]
    token: String,
}

impl DeploymentAttributes {
    fn into_deployment(self, id: String) -> Result<Deployment, ConversionError> {
        Ok(Deployment {
            id,
            status: self.status.parse::<DeploymentStatus>()?,
            url: self.url,
            screenshot: self.screenshot,
            creator: self.creator,
            token: self.token,
            comments: None,
            comment_count: self.comment_count,
        })
    }
}

pub fn to_deployment(resource: &Resource) -> Result<Deployment, ConversionError> {
    expect_kind(resource, "deployments")?;
    let attrs: DeploymentAttributes = attributes(resource)?;
    let mut deployment = attrs.into_deployment(resource.id.clone())?;
    deployment.comments = listing(resource, "comments");
    Ok(deployment)
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CommentAttributes {
    email: String,
    #[serde(default)]
    name: Option<String>,
    message: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    deployment: Option<String>,
}

pub fn to_comment(resource: &Resource) -> Result<Comment, ConversionError> {
    expect_kind(resource, "comments")?;
    let attrs: CommentAttributes = attributes(resource)?;
    let deployment = attrs.deployment.or_else(|| related(resource, "deployment"));
    Ok(Comment {
        id: resource.id.clone(),
        deployment: required(resource, "deployment", deployment)?,
        name: attrs.name,
        email: attrs.email,
        message: attrs.message,
        created_at: attrs.created_at,
    })
}

#[derive(Deserialize)]
struct ActivityCommit {
    id: String,
    #[serde(flatten)]
    attrs: CommitAttributes,
}

#[derive(Deserialize)]
struct ActivityDeployment {
    id: String,
    #[serde(flatten)]
    attrs: DeploymentAttributes,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ActivityAttributes {
    activity_type: String,
    timestamp: DateTime<Utc>,
    project: ProjectSummary,
    branch: BranchSummary,
    commit: ActivityCommit,
    deployment: ActivityDeployment,
    #[serde(default)]
    comment: Option<CommentSummary>,
}

pub fn to_activity(resource: &Resource) -> Result<Activity, ConversionError> {
    expect_kind(resource, "activities")?;
    let attrs: ActivityAttributes = attributes(resource)?;
    let (message, description) = Commit::split_message(&attrs.commit.attrs.message);
    let deployment = attrs.deployment.attrs.into_deployment(attrs.deployment.id)?;
    Ok(Activity {
        id: resource.id.clone(),
        activity_type: attrs.activity_type.parse::<ActivityType>()?,
        timestamp: attrs.timestamp,
        project: attrs.project,
        branch: attrs.branch,
        commit: Commit {
            id: attrs.commit.id,
            hash: attrs.commit.attrs.hash,
            message,
            description,
            author: attrs.commit.attrs.author,
            committer: attrs.commit.attrs.committer,
            deployment: Some(deployment.id.clone()),
        },
        deployment,
        comment: attrs.comment,
    })
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct NotificationAttributes {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    flow_token: Option<String>,
    #[serde(default)]
    slack_webhook_url: Option<String>,
    #[serde(default)]
    hipchat_room_id: Option<u64>,
    #[serde(default)]
    hipchat_auth_token: Option<String>,
    #[serde(default)]
    github_owner: Option<String>,
    #[serde(default)]
    github_repo: Option<String>,
    #[serde(default)]
    github_app_id: Option<u64>,
}

pub fn to_notification(resource: &Resource) -> Result<NotificationConfiguration, ConversionError> {
    expect_kind(resource, "notifications")?;
    let attrs: NotificationAttributes = attributes(resource)?;
    let project_id = || required(resource, "project-id", attrs.project_id.clone());
    let target = match attrs.kind.as_str() {
        "flowdock" => NotificationTarget::Flowdock {
            project_id: project_id()?,
            flow_token: required(resource, "flow-token", attrs.flow_token.clone())?,
        },
        "slack" => NotificationTarget::Slack {
            project_id: project_id()?,
            slack_webhook_url: required(
                resource,
                "slack-webhook-url",
                attrs.slack_webhook_url.clone(),
            )?,
        },
        "hipchat" => NotificationTarget::HipChat {
            project_id: project_id()?,
            hipchat_room_id: required(resource, "hipchat-room-id", attrs.hipchat_room_id)?,
            hipchat_auth_token: required(
                resource,
                "hipchat-auth-token",
                attrs.hipchat_auth_token.clone(),
            )?,
        },
        "github" => match &attrs.team_id {
            Some(team_id) => NotificationTarget::GitHubTeam {
                team_id: team_id.clone(),
            },
            None => NotificationTarget::GitHubProject {
                project_id: project_id()?,
                github_owner: required(resource, "github-owner", attrs.github_owner.clone())?,
                github_repo: required(resource, "github-repo", attrs.github_repo.clone())?,
                github_app_id: required(resource, "github-app-id", attrs.github_app_id)?,
            },
        },
        other => return Err(ConversionError::UnknownNotificationType(other.to_string())),
    };
    Ok(NotificationConfiguration {
        id: resource.id.clone(),
        target,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(value: serde_json::Value) -> Resource {
        serde_json::from_value(value).unwrap()
    }

    fn signature() -> serde_json::Value {
        json!({"name": "Ada", "email": "ada@example.com", "timestamp": "2017-01-01T10:00:00Z"})
    }

    #[test]
    fn project_with_branch_linkage() {
        let project = to_project(&resource(json!({
            "id": "1",
            "type": "projects",
            "attributes": {
                "name": "minard",
                "description": null,
                "active-committers": [{"name": "Ada", "email": "ada@example.com"}],
                "latest-activity-timestamp": "2017-01-02T00:00:00Z",
                "repo-url": "http://git/minard.git",
                "token": "tok",
                "webhook-url": "http://hook"
            },
            "relationships": {
                "branches": {"data": [{"id": "b1", "type": "branches"}]},
                "latest-successfully-deployed-commit": {"data": {"id": "c9", "type": "commits"}}
            }
        })))
        .unwrap();
        assert_eq!(project.branches, Some(Listing::Loaded(vec!["b1".into()])));
        assert_eq!(project.latest_successfully_deployed_commit.as_deref(), Some("c9"));
        assert_eq!(project.active_users.len(), 1);
        assert_eq!(project.webhook_url.as_deref(), Some("http://hook"));
    }

    #[test]
    fn project_without_linkage_has_no_listing() {
        let project = to_project(&resource(json!({
            "id": "1",
            "type": "projects",
            "attributes": {"name": "minard", "repo-url": "u", "token": "t"}
        })))
        .unwrap();
        assert_eq!(project.branches, None);
    }

    #[test]
    fn branch_requires_project() {
        let err = to_branch(&resource(json!({
            "id": "b1", "type": "branches", "attributes": {"name": "master"}
        })))
        .unwrap_err();
        assert!(matches!(err, ConversionError::MissingField { field: "project", .. }));
    }

    #[test]
    fn commit_message_is_split() {
        let commit = to_commit(&resource(json!({
            "id": "c1",
            "type": "commits",
            "attributes": {
                "hash": "abc",
                "message": "Subject line\n\nLonger body.\n",
                "author": signature(),
                "committer": signature()
            },
            "relationships": {"deployments": {"data": [{"id": "d1", "type": "deployments"}]}}
        })))
        .unwrap();
        assert_eq!(commit.message, "Subject line");
        assert_eq!(commit.description.as_deref(), Some("Longer body."));
        assert_eq!(commit.deployment.as_deref(), Some("d1"));
    }

    #[test]
    fn unknown_deployment_status_is_typed_error() {
        let err = to_deployment(&resource(json!({
            "id": "d1",
            "type": "deployments",
            "attributes": {"status": "exploded", "creator": signature()}
        })))
        .unwrap_err();
        assert!(matches!(err, ConversionError::InvalidDeploymentStatus(s) if s == "exploded"));
    }

    #[test]
    fn wrong_resource_type_is_rejected() {
        let err = to_comment(&resource(json!({"id": "1", "type": "projects"}))).unwrap_err();
        assert!(matches!(err, ConversionError::UnexpectedResourceType { .. }));
    }

    #[test]
    fn activity_embeds_commit_and_deployment() {
        let activity = to_activity(&resource(json!({
            "id": "a1",
            "type": "activities",
            "attributes": {
                "activity-type": "comment",
                "timestamp": "2017-01-03T00:00:00Z",
                "project": {"id": "p1", "name": "minard"},
                "branch": {"id": "b1", "name": "master"},
                "commit": {
                    "id": "c1", "hash": "abc", "message": "Fix",
                    "author": signature(), "committer": signature()
                },
                "deployment": {
                    "id": "d1", "status": "success", "creator": signature(),
                    "comment-count": 2
                },
                "comment": {"message": "Looks good", "email": "bob@example.com"}
            }
        })))
        .unwrap();
        assert_eq!(activity.activity_type, ActivityType::Comment);
        assert_eq!(activity.commit.deployment.as_deref(), Some("d1"));
        assert_eq!(activity.deployment.comment_count, Some(2));
        assert_eq!(activity.comment.unwrap().message, "Looks good");
    }

    #[test]
    fn notification_shapes() {
        let team = to_notification(&resource(json!({
            "id": "n1", "type": "notifications",
            "attributes": {"type": "github", "team-id": "t1"}
        })))
        .unwrap();
        assert_eq!(team.target.team_id(), Some("t1"));

        let slack = to_notification(&resource(json!({
            "id": "n2", "type": "notifications",
            "attributes": {"type": "slack", "project-id": "p1", "slack-webhook-url": "http://s"}
        })))
        .unwrap();
        assert_eq!(slack.target.project_id(), Some("p1"));

        let err = to_notification(&resource(json!({
            "id": "n3", "type": "notifications", "attributes": {"type": "email"}
        })))
        .unwrap_err();
        assert!(matches!(err, ConversionError::UnknownNotificationType(_)));
    }

    #[test]
    fn document_groups_included_and_skips_unknown() {
        let document: Document = serde_json::from_value(json!({
            "data": {
                "id": "d1", "type": "deployments",
                "attributes": {"status": "running", "creator": signature()}
            },
            "included": [
                {"id": "x", "type": "screenshots"},
                {
                    "id": "m1", "type": "comments",
                    "attributes": {
                        "email": "a@b.c", "message": "hi",
                        "created-at": "2017-01-01T00:00:00Z", "deployment": "d1"
                    }
                }
            ]
        }))
        .unwrap();
        let converted = convert_document(&document).unwrap();
        assert_eq!(converted.len(), 2);
        assert_eq!(converted.skipped, ["screenshots"]);
        let kinds: Vec<&str> = converted
            .into_actions()
            .iter()
            .map(|action| action.kind())
            .collect();
        assert_eq!(kinds, ["deployments/store", "comments/store"]);
    }
}
