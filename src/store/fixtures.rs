//! Entity builders shared by the store tests.

use chrono::{DateTime, Utc};

use crate::domain::{
    Activity, ActivityType, Branch, BranchSummary, Comment, Commit, Deployment, DeploymentStatus,
    Failure, FetchError, Operation, Project, ProjectSummary, Signature,
};

pub fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub fn signature(email: &str) -> Signature {
    Signature {
        name: None,
        email: email.into(),
        timestamp: at(1_000),
    }
}

pub fn project(id: &str) -> Project {
    Project {
        id: id.into(),
        name: format!("project-{id}"),
        description: None,
        branches: None,
        latest_activity_timestamp: None,
        latest_successfully_deployed_commit: None,
        active_users: Vec::new(),
        repo_url: format!("https://git.test/{id}.git"),
        token: "token".into(),
        webhook_url: None,
    }
}

pub fn branch(id: &str, project: &str) -> Branch {
    Branch {
        id: id.into(),
        project: project.into(),
        name: format!("branch-{id}"),
        description: None,
        commits: None,
        all_commits_loaded: false,
        latest_activity_timestamp: None,
        latest_successfully_deployed_commit: None,
        latest_commit: None,
    }
}

pub fn commit(id: &str) -> Commit {
    Commit {
        id: id.into(),
        hash: format!("{id}abcdef"),
        message: "Change things".into(),
        description: None,
        author: signature("author@test"),
        committer: signature("committer@test"),
        deployment: None,
    }
}

pub fn deployment(id: &str) -> Deployment {
    Deployment {
        id: id.into(),
        status: DeploymentStatus::Success,
        url: Some(format!("https://{id}.preview.test")),
        screenshot: None,
        creator: signature("creator@test"),
        token: "token".into(),
        comments: None,
        comment_count: None,
    }
}

pub fn comment(id: &str, deployment: &str) -> Comment {
    Comment {
        id: id.into(),
        deployment: deployment.into(),
        name: None,
        email: "commenter@test".into(),
        message: "Looks good".into(),
        created_at: at(2_000),
    }
}

pub fn activity(id: &str, secs: i64, project: &str) -> Activity {
    Activity {
        id: id.into(),
        activity_type: ActivityType::Deployment,
        timestamp: at(secs),
        project: ProjectSummary {
            id: project.into(),
            name: format!("project-{project}"),
        },
        branch: BranchSummary {
            id: "b1".into(),
            name: "main".into(),
        },
        commit: commit("c1"),
        deployment: deployment("d1"),
        comment: None,
    }
}

pub fn fetch_error(operation: Operation, id: &str) -> FetchError {
    FetchError::new(operation, id, Failure::new("Failed to fetch", None))
}
