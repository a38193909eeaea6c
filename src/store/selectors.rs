//! Read access to the store for the rendering layer.
//!
//! Derived lists are memoized on the identity of their inputs: asking twice
//! with unchanged slices returns the same `Arc`, which lets views skip
//! re-rendering. Plain lookups and predicates are free functions.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::domain::{
    Activity, Branch, Comment, Commit, DeleteError, Deployment, Entity, FetchCollectionError,
    FetchError, Listing, MinardError, NotificationConfiguration, Operation, Project, SignupError,
};

use super::collection::{Collection, Entry};
use super::reducer::errors::ErrorList;
use super::reducer::streaming::ConnectionState;
use super::state::AppState;

/// Inputs that can tell whether they are the very same value as before.
pub trait SameRef {
    fn same_ref(&self, other: &Self) -> bool;
}

impl<E> SameRef for Collection<E> {
    fn same_ref(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> SameRef for Arc<T> {
    fn same_ref(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl SameRef for String {
    fn same_ref(&self, other: &Self) -> bool {
        self == other
    }
}

impl SameRef for Operation {
    fn same_ref(&self, other: &Self) -> bool {
        self == other
    }
}

impl<A: SameRef, B: SameRef> SameRef for (A, B) {
    fn same_ref(&self, other: &Self) -> bool {
        self.0.same_ref(&other.0) && self.1.same_ref(&other.1)
    }
}

impl<A: SameRef, B: SameRef, C: SameRef> SameRef for (A, B, C) {
    fn same_ref(&self, other: &Self) -> bool {
        self.0.same_ref(&other.0) && self.1.same_ref(&other.1) && self.2.same_ref(&other.2)
    }
}

/// Remembers the last input and output of a derivation.
pub struct Memo<K, V> {
    last: Mutex<Option<(K, Arc<V>)>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }
}

impl<K: SameRef, V> Memo<K, V> {
    pub fn get(&self, key: K, compute: impl FnOnce(&K) -> V) -> Arc<V> {
        let mut last = self.last.lock();
        if let Some((previous, value)) = last.as_ref() {
            if previous.same_ref(&key) {
                return Arc::clone(value);
            }
        }
        let value = Arc::new(compute(&key));
        *last = Some((key, Arc::clone(&value)));
        value
    }
}

/// Memoized selectors, one cache per derived view.
#[derive(Default)]
pub struct Selectors {
    activities: Memo<Collection<Activity>, Vec<Activity>>,
    project_activities: Memo<(Collection<Activity>, String), Vec<Activity>>,
    projects: Memo<Collection<Project>, Vec<Project>>,
    fetch_collection_errors: Memo<(ErrorList, Operation), Vec<FetchCollectionError>>,
    deletion_errors: Memo<(ErrorList, Operation, String), Vec<DeleteError>>,
    signup_errors: Memo<ErrorList, Vec<SignupError>>,
}

impl Selectors {
    pub fn new() -> Self {
        Self::default()
    }

    /// The activity feed, newest first.
    pub fn activities(&self, state: &AppState) -> Arc<Vec<Activity>> {
        self.activities
            .get(state.activities.clone(), |activities| {
                sorted_feed(activities.entities())
            })
    }

    pub fn activities_for_project(&self, state: &AppState, project_id: &str) -> Arc<Vec<Activity>> {
        self.project_activities.get(
            (state.activities.clone(), project_id.to_string()),
            |(activities, project_id)| {
                sorted_feed(
                    activities
                        .entities()
                        .filter(|activity| activity.project.id == *project_id),
                )
            },
        )
    }

    /// Loaded projects, most recently active first.
    pub fn projects(&self, state: &AppState) -> Arc<Vec<Project>> {
        self.projects.get(state.projects.clone(), |projects| {
            let mut list: Vec<Project> = projects.entities().cloned().collect();
            list.sort_by(|a, b| {
                b.latest_activity_timestamp
                    .cmp(&a.latest_activity_timestamp)
                    .then_with(|| a.name.cmp(&b.name))
                    .then_with(|| a.id.cmp(&b.id))
            });
            list
        })
    }

    pub fn fetch_collection_errors(
        &self,
        state: &AppState,
        operation: Operation,
    ) -> Arc<Vec<FetchCollectionError>> {
        self.fetch_collection_errors
            .get((state.errors.clone(), operation), |(errors, operation)| {
                errors
                    .iter()
                    .filter_map(|err| match err {
                        MinardError::FetchCollection(e) if e.operation == *operation => {
                            Some(e.clone())
                        }
                        _ => None,
                    })
                    .collect()
            })
    }

    pub fn deletion_errors(
        &self,
        state: &AppState,
        operation: Operation,
        id: &str,
    ) -> Arc<Vec<DeleteError>> {
        self.deletion_errors.get(
            (state.errors.clone(), operation, id.to_string()),
            |(errors, operation, id)| {
                errors
                    .iter()
                    .filter_map(|err| match err {
                        MinardError::Delete(e) if e.operation == *operation && e.id == *id => {
                            Some(e.clone())
                        }
                        _ => None,
                    })
                    .collect()
            },
        )
    }

    pub fn signup_errors(&self, state: &AppState) -> Arc<Vec<SignupError>> {
        self.signup_errors.get(state.errors.clone(), |errors| {
            errors
                .iter()
                .filter_map(|err| match err {
                    MinardError::Signup(e) => Some(e.clone()),
                    _ => None,
                })
                .collect()
        })
    }
}

fn sorted_feed<'a>(activities: impl Iterator<Item = &'a Activity>) -> Vec<Activity> {
    let mut feed: Vec<Activity> = activities.cloned().collect();
    feed.sort_by(|a, b| {
        b.timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.id.cmp(&b.id))
    });
    feed
}

/// How a sub-collection of an entity looks to a view.
#[derive(Debug, PartialEq)]
pub enum ListingView<'a, E> {
    /// The owning entity is missing, failed, or never had the list requested.
    NotRequested,
    Failed(&'a FetchError),
    /// Listed entries in order; ids not in the store are skipped.
    Loaded(Vec<&'a Entry<E>>),
}

impl<E> ListingView<'_, E> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

fn listing_view<'a, O, E>(owner: Option<&'a O>, items: &'a Collection<E>) -> ListingView<'a, E>
where
    O: Entity,
{
    match owner.and_then(|owner| owner.listing()).and_then(Option::as_ref) {
        None => ListingView::NotRequested,
        Some(Listing::Failed(err)) => ListingView::Failed(err),
        Some(Listing::Loaded(ids)) => {
            ListingView::Loaded(ids.iter().filter_map(|id| items.get(id)).collect())
        }
    }
}

pub fn get_project<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Project>> {
    state.projects.get(id)
}

pub fn get_branch<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Branch>> {
    state.branches.get(id)
}

pub fn get_commit<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Commit>> {
    state.commits.get(id)
}

pub fn get_deployment<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Deployment>> {
    state.deployments.get(id)
}

pub fn get_comment<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Comment>> {
    state.comments.get(id)
}

pub fn get_activity<'a>(state: &'a AppState, id: &str) -> Option<&'a Entry<Activity>> {
    state.activities.get(id)
}

pub fn branches_for_project<'a>(state: &'a AppState, project_id: &str) -> ListingView<'a, Branch> {
    listing_view(state.projects.entity(project_id), &state.branches)
}

pub fn commits_for_branch<'a>(state: &'a AppState, branch_id: &str) -> ListingView<'a, Commit> {
    listing_view(state.branches.entity(branch_id), &state.commits)
}

pub fn comments_for_deployment<'a>(
    state: &'a AppState,
    deployment_id: &str,
) -> ListingView<'a, Comment> {
    listing_view(state.deployments.entity(deployment_id), &state.comments)
}

/// The deployment of a commit, if the commit points at one that is stored.
pub fn deployment_for_commit<'a>(
    state: &'a AppState,
    commit_id: &str,
) -> Option<&'a Entry<Deployment>> {
    let commit = state.commits.entity(commit_id)?;
    state.deployments.get(commit.deployment.as_deref()?)
}

pub fn notification_configurations_for_project<'a>(
    state: &'a AppState,
    project_id: &str,
) -> Vec<&'a NotificationConfiguration> {
    sorted_by_id(
        state
            .notifications
            .entities()
            .filter(|config| config.target.project_id() == Some(project_id)),
    )
}

pub fn notification_configurations_for_team<'a>(
    state: &'a AppState,
    team_id: &str,
) -> Vec<&'a NotificationConfiguration> {
    sorted_by_id(
        state
            .notifications
            .entities()
            .filter(|config| config.target.team_id() == Some(team_id)),
    )
}

fn sorted_by_id<'a>(
    configs: impl Iterator<Item = &'a NotificationConfiguration>,
) -> Vec<&'a NotificationConfiguration> {
    let mut list: Vec<_> = configs.collect();
    list.sort_by_key(|config| config.id.as_str());
    list
}

/// Whether `operation` is in flight. Without an id, any marker of the
/// operation counts.
pub fn is_loading(state: &AppState, operation: Operation, id: Option<&str>) -> bool {
    state
        .requests
        .iter()
        .any(|marker| marker.operation == operation && (id.is_none() || marker.id.as_deref() == id))
}

pub fn is_loading_all_projects(state: &AppState) -> bool {
    is_loading(state, Operation::LoadAllProjects, None)
}

pub fn is_loading_activities(state: &AppState) -> bool {
    is_loading(state, Operation::LoadActivities, None)
}

pub fn is_loading_activities_for_project(state: &AppState, project_id: &str) -> bool {
    is_loading(state, Operation::LoadActivitiesForProject, Some(project_id))
}

pub fn is_loading_branches_for_project(state: &AppState, project_id: &str) -> bool {
    is_loading(state, Operation::LoadBranchesForProject, Some(project_id))
}

pub fn is_loading_commits_for_branch(state: &AppState, branch_id: &str) -> bool {
    is_loading(state, Operation::LoadCommitsForBranch, Some(branch_id))
}

pub fn is_loading_comments_for_deployment(state: &AppState, deployment_id: &str) -> bool {
    is_loading(state, Operation::LoadCommentsForDeployment, Some(deployment_id))
}

pub fn is_deleting_project(state: &AppState, project_id: &str) -> bool {
    is_loading(state, Operation::DeleteProject, Some(project_id))
}

pub fn connection_state(state: &AppState) -> &ConnectionState {
    &state.streaming
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Failure, NotificationTarget};
    use crate::store::action::Action;
    use crate::store::fixtures::{activity, branch, comment, commit, deployment, fetch_error, project};
    use crate::store::reducer::reduce;

    fn apply(actions: Vec<Action>) -> AppState {
        actions
            .iter()
            .fold(AppState::default(), |state, action| reduce(&state, action))
    }

    #[test]
    fn activities_are_newest_first() {
        let state = apply(vec![Action::store_activities(vec![
            activity("a1", 10, "p1"),
            activity("a2", 30, "p2"),
            activity("a3", 20, "p1"),
        ])]);
        let selectors = Selectors::new();
        let feed = selectors.activities(&state);
        let ids: Vec<&str> = feed.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a2", "a3", "a1"]);

        let for_project = selectors.activities_for_project(&state, "p1");
        let ids: Vec<&str> = for_project.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a3", "a1"]);
    }

    #[test]
    fn memoized_until_input_changes() {
        let state = apply(vec![Action::store_activities(vec![activity("a1", 10, "p1")])]);
        let selectors = Selectors::new();
        let first = selectors.activities(&state);

        let same = reduce(&state, &Action::store_activities(vec![]));
        assert!(Arc::ptr_eq(&first, &selectors.activities(&same)));

        let unrelated = reduce(&same, &Action::store_projects(vec![project("p1")]));
        assert!(Arc::ptr_eq(&first, &selectors.activities(&unrelated)));

        let changed = reduce(
            &unrelated,
            &Action::store_activities(vec![activity("a2", 5, "p1")]),
        );
        let second = selectors.activities(&changed);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 2);
    }

    #[test]
    fn parameterized_memo_tracks_argument() {
        let state = apply(vec![Action::store_activities(vec![
            activity("a1", 10, "p1"),
            activity("a2", 10, "p2"),
        ])]);
        let selectors = Selectors::new();
        let p1 = selectors.activities_for_project(&state, "p1");
        assert!(Arc::ptr_eq(&p1, &selectors.activities_for_project(&state, "p1")));
        let p2 = selectors.activities_for_project(&state, "p2");
        assert_eq!(p2[0].id, "a2");
    }

    #[test]
    fn projects_sorted_by_activity_then_name() {
        let mut recent = project("p2");
        recent.latest_activity_timestamp = Some(crate::store::fixtures::at(50));
        let state = apply(vec![Action::store_projects(vec![
            project("p3"),
            recent,
            project("p1"),
        ])]);
        let selectors = Selectors::new();
        let ids: Vec<String> = selectors
            .projects(&state)
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids, ["p2", "p1", "p3"]);
    }

    #[test]
    fn listing_views() {
        let mut p1 = project("p1");
        p1.branches = Some(Listing::Loaded(vec!["b1".into(), "missing".into()]));
        let state = apply(vec![
            Action::store_projects(vec![p1, project("p2")]),
            Action::store_branches(vec![branch("b1", "p1")]),
            Action::request_failed(MinardError::Fetch(fetch_error(
                Operation::LoadBranchesForProject,
                "p2",
            ))),
        ]);

        match branches_for_project(&state, "p1") {
            ListingView::Loaded(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].loaded().unwrap().id, "b1");
            }
            other => panic!("expected loaded branches, got {other:?}"),
        }
        assert!(matches!(
            branches_for_project(&state, "p2"),
            ListingView::Failed(_)
        ));
        assert_eq!(branches_for_project(&state, "p9"), ListingView::NotRequested);
    }

    #[test]
    fn comments_and_commit_deployment_lookup() {
        let state = apply(vec![
            Action::store_deployments(vec![deployment("d1")]),
            Action::store_comments(vec![comment("c1", "d1")]),
            Action::add_comments_to_deployment("d1", vec!["c1".into()]),
            Action::store_commits(vec![Commit {
                deployment: Some("d1".into()),
                ..commit("k1")
            }]),
        ]);
        assert!(comments_for_deployment(&state, "d1").is_loaded());
        assert!(deployment_for_commit(&state, "k1").is_some());
        assert!(deployment_for_commit(&state, "k2").is_none());
    }

    #[test]
    fn error_subsets_are_memoized() {
        let delete = MinardError::Delete(DeleteError {
            operation: Operation::DeleteProject,
            id: "p1".into(),
            failure: Failure::new("nope", None),
        });
        let signup = MinardError::Signup(SignupError {
            failure: Failure::new("Email taken", None),
        });
        let fetch_all = MinardError::FetchCollection(FetchCollectionError {
            operation: Operation::LoadAllProjects,
            failure: Failure::new("Failed to fetch", None),
        });
        let state = apply(vec![
            Action::request_failed(delete),
            Action::request_failed(signup),
            Action::request_failed(fetch_all),
        ]);
        let selectors = Selectors::new();

        let deletions = selectors.deletion_errors(&state, Operation::DeleteProject, "p1");
        assert_eq!(deletions.len(), 1);
        assert!(Arc::ptr_eq(
            &deletions,
            &selectors.deletion_errors(&state, Operation::DeleteProject, "p1")
        ));
        assert!(selectors
            .deletion_errors(&state, Operation::DeleteProject, "p2")
            .is_empty());

        assert_eq!(selectors.signup_errors(&state).len(), 1);
        let fetches = selectors.fetch_collection_errors(&state, Operation::LoadAllProjects);
        assert_eq!(fetches[0].failure.pretty_error, Failure::new("Failed to fetch", None).pretty_error);
    }

    #[test]
    fn loading_predicates() {
        let state = apply(vec![
            Action::request_started(Operation::LoadAllProjects, None),
            Action::request_started(Operation::LoadBranchesForProject, Some("p1".into())),
        ]);
        assert!(is_loading_all_projects(&state));
        assert!(is_loading_branches_for_project(&state, "p1"));
        assert!(!is_loading_branches_for_project(&state, "p2"));
        assert!(is_loading(&state, Operation::LoadBranchesForProject, None));
        assert!(!is_loading_activities(&state));
    }

    #[test]
    fn notification_filters() {
        let state = apply(vec![Action::store_notification_configurations(vec![
            NotificationConfiguration {
                id: "n2".into(),
                target: NotificationTarget::GitHubTeam {
                    team_id: "t1".into(),
                },
            },
            NotificationConfiguration {
                id: "n1".into(),
                target: NotificationTarget::Slack {
                    project_id: "p1".into(),
                    slack_webhook_url: "https://hooks.test".into(),
                },
            },
        ])]);
        let for_project = notification_configurations_for_project(&state, "p1");
        assert_eq!(for_project.len(), 1);
        assert_eq!(for_project[0].id, "n1");
        let for_team = notification_configurations_for_team(&state, "t1");
        assert_eq!(for_team[0].id, "n2");
    }
}
