use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::FetchError;

/// Ids of a sub-collection owned by an entity, such as the branches of a
/// project or the comments of a deployment.
///
/// Entities hold an `Option<Listing>`: `None` when the sub-collection has
/// never been requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Listing {
    Loaded(Vec<String>),
    Failed(FetchError),
}

impl Listing {
    pub fn ids(&self) -> Option<&[String]> {
        match self {
            Self::Loaded(ids) => Some(ids),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Appends the ids that are not already present.
///
/// Returns `None` when every id is already listed, in whatever order.
pub fn append_new(existing: &[String], incoming: &[String]) -> Option<Vec<String>> {
    let mut next = existing.to_vec();
    for id in incoming {
        if !next.contains(id) {
            next.push(id.clone());
        }
    }
    (next.len() != existing.len()).then_some(next)
}

/// Drops `id` from the list, or `None` if it was not there.
pub fn without(existing: &[String], id: &str) -> Option<Vec<String>> {
    if !existing.iter().any(|i| i == id) {
        return None;
    }
    Some(existing.iter().filter(|i| *i != id).cloned().collect())
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loaded(ids) => write!(f, "{} loaded", ids.len()),
            Self::Failed(err) => write!(f, "failed: {}", err.failure.pretty_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn append_new_skips_known_ids() {
        assert_eq!(
            append_new(&ids(&["a", "b"]), &ids(&["b", "c", "c"])),
            Some(ids(&["a", "b", "c"]))
        );
        assert_eq!(append_new(&ids(&["a", "b"]), &ids(&["b", "a"])), None);
        assert_eq!(append_new(&ids(&["a"]), &[]), None);
    }

    #[test]
    fn without_removes_all_occurrences() {
        assert_eq!(without(&ids(&["a", "b"]), "a"), Some(ids(&["b"])));
        assert_eq!(without(&ids(&["a", "b"]), "c"), None);
    }
}
