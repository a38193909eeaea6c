//! Normalized entity maps shared by every entity reducer.
//!
//! A `Collection` is copy-on-write: every operation returns a collection, and
//! operations that change nothing hand back the same allocation so that
//! `ptr_eq` can stand in for "did anything change".

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Entity, FetchError, Listing};

/// A cached entity, or the error from the last attempt to fetch it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Entry<E> {
    Loaded(E),
    Failed(FetchError),
}

impl<E> Entry<E> {
    pub fn loaded(&self) -> Option<&E> {
        match self {
            Self::Loaded(entity) => Some(entity),
            Self::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Loaded(_) => None,
            Self::Failed(err) => Some(err),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct Collection<E> {
    entries: Arc<HashMap<String, Arc<Entry<E>>>>,
}

impl<E> Clone for Collection<E> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

impl<E> Default for Collection<E> {
    fn default() -> Self {
        Self {
            entries: Arc::new(HashMap::new()),
        }
    }
}

impl<E> Collection<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both collections are the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry<E>> {
        self.entries.get(id).map(Arc::as_ref)
    }

    /// The entity stored under `id`, skipping error placeholders.
    pub fn entity(&self, id: &str) -> Option<&E> {
        self.get(id).and_then(Entry::loaded)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry<E>)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry.as_ref()))
    }

    pub fn entities(&self) -> impl Iterator<Item = &E> {
        self.entries.values().filter_map(|entry| entry.loaded())
    }

    /// Empty collection, whatever was stored before.
    pub fn clear(&self) -> Self {
        Self::default()
    }

    pub fn remove(&self, id: &str) -> Self {
        if !self.entries.contains_key(id) {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        entries.remove(id);
        Self {
            entries: Arc::new(entries),
        }
    }

    fn with_entry(&self, id: String, entry: Entry<E>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(id, Arc::new(entry));
        Self {
            entries: Arc::new(entries),
        }
    }
}

impl<E: Entity> Collection<E> {
    /// Upserts every entity.
    ///
    /// An incoming entity whose sub-collection is absent keeps the listing
    /// already loaded for the entity it replaces.
    pub fn store(&self, incoming: &[E]) -> Self {
        if incoming.is_empty() {
            return self.clone();
        }
        let mut entries = (*self.entries).clone();
        for entity in incoming {
            let mut entity = entity.clone();
            if let Some(Entry::Loaded(previous)) = entries.get(entity.id()).map(Arc::as_ref) {
                inherit_listing(&mut entity, previous);
            }
            entries.insert(entity.id().to_string(), Arc::new(Entry::Loaded(entity)));
        }
        Self {
            entries: Arc::new(entries),
        }
    }

    /// Records a failed fetch of the entity named by `error.id`.
    ///
    /// A loaded entity is never replaced by the error.
    pub fn fail(&self, error: &FetchError) -> Self {
        match self.get(&error.id) {
            None | Some(Entry::Failed(_)) => {
                self.with_entry(error.id.clone(), Entry::Failed(error.clone()))
            }
            Some(Entry::Loaded(_)) => self.clone(),
        }
    }

    /// Records a failed fetch of the sub-collection of `error.id`.
    ///
    /// The error lands in the entity's listing when that listing is absent or
    /// already failed. A loaded listing is kept. Without a loaded entity the
    /// error is stored in place of the entity.
    pub fn fail_listing(&self, error: &FetchError) -> Self {
        let Some(Entry::Loaded(entity)) = self.get(&error.id) else {
            return self.fail(error);
        };
        if matches!(entity.listing(), None | Some(Some(Listing::Loaded(_)))) {
            return self.clone();
        }
        let mut next = entity.clone();
        if let Some(listing) = next.listing_mut() {
            *listing = Some(Listing::Failed(error.clone()));
        }
        self.with_entry(error.id.clone(), Entry::Loaded(next))
    }

    /// Applies `f` to the loaded entity under `id`.
    ///
    /// `f` returns `None` when the update would not change anything, in which
    /// case the same collection comes back. Missing entities and error
    /// placeholders are left alone.
    pub fn update<F>(&self, id: &str, f: F) -> Self
    where
        F: FnOnce(&E) -> Option<E>,
    {
        let Some(Entry::Loaded(current)) = self.get(id) else {
            return self.clone();
        };
        match f(current) {
            Some(next) => self.with_entry(id.to_string(), Entry::Loaded(next)),
            None => self.clone(),
        }
    }
}

fn inherit_listing<E: Entity>(entity: &mut E, previous: &E) {
    let Some(Some(Listing::Loaded(ids))) = previous.listing() else {
        return;
    };
    if let Some(slot) = entity.listing_mut() {
        if slot.is_none() {
            *slot = Some(Listing::Loaded(ids.clone()));
        }
    }
}

impl<E: serde::Serialize> Serialize for Collection<E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut ids: Vec<&String> = self.entries.keys().collect();
        ids.sort();
        let mut map = serializer.serialize_map(Some(ids.len()))?;
        for id in ids {
            map.serialize_entry(id, self.entries[id].as_ref())?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Failure, Operation};

    #[derive(Debug, Clone, PartialEq)]
    struct Thing {
        id: String,
        label: String,
        parts: Option<Listing>,
    }

    impl Entity for Thing {
        fn id(&self) -> &str {
            &self.id
        }

        fn listing(&self) -> Option<&Option<Listing>> {
            Some(&self.parts)
        }

        fn listing_mut(&mut self) -> Option<&mut Option<Listing>> {
            Some(&mut self.parts)
        }
    }

    fn thing(id: &str, label: &str, parts: Option<&[&str]>) -> Thing {
        Thing {
            id: id.into(),
            label: label.into(),
            parts: parts.map(|p| Listing::Loaded(p.iter().map(|s| s.to_string()).collect())),
        }
    }

    fn fetch_error(id: &str) -> FetchError {
        FetchError::new(Operation::LoadProject, id, Failure::new("boom", None))
    }

    #[test]
    fn store_empty_keeps_reference() {
        let things = Collection::new().store(&[thing("1", "a", None)]);
        assert!(things.store(&[]).ptr_eq(&things));
    }

    #[test]
    fn store_is_union_for_new_ids() {
        let things = Collection::new().store(&[thing("1", "a", None)]);
        let next = things.store(&[thing("2", "b", None)]);
        assert!(!next.ptr_eq(&things));
        assert_eq!(next.len(), 2);
        assert_eq!(things.len(), 1);
    }

    #[test]
    fn store_inherits_loaded_listing() {
        let things = Collection::new().store(&[thing("1", "a", Some(&["x"]))]);
        let next = things.store(&[thing("1", "renamed", None)]);
        let stored = next.entity("1").unwrap();
        assert_eq!(stored.label, "renamed");
        assert_eq!(stored.parts, Some(Listing::Loaded(vec!["x".into()])));

        let replaced = next.store(&[thing("1", "again", Some(&["y"]))]);
        assert_eq!(
            replaced.entity("1").unwrap().parts,
            Some(Listing::Loaded(vec!["y".into()]))
        );
    }

    #[test]
    fn store_does_not_inherit_failed_listing() {
        let things = Collection::new()
            .store(&[thing("1", "a", None)])
            .fail_listing(&fetch_error("1"));
        let next = things.store(&[thing("1", "a", None)]);
        assert_eq!(next.entity("1").unwrap().parts, None);
    }

    #[test]
    fn fail_never_replaces_loaded_entity() {
        let things = Collection::new().store(&[thing("1", "a", None)]);
        assert!(things.fail(&fetch_error("1")).ptr_eq(&things));

        let failed = things.fail(&fetch_error("2"));
        assert!(failed.get("2").unwrap().is_failed());

        let refailed = failed.fail(&fetch_error("2"));
        assert!(!refailed.ptr_eq(&failed));
        assert!(refailed.get("2").unwrap().is_failed());
    }

    #[test]
    fn fail_listing_fills_empty_or_failed_listing_only() {
        let things = Collection::new().store(&[thing("1", "a", None)]);
        let failed = things.fail_listing(&fetch_error("1"));
        assert!(matches!(
            failed.entity("1").unwrap().parts,
            Some(Listing::Failed(_))
        ));

        let loaded = Collection::new().store(&[thing("1", "a", Some(&["x"]))]);
        assert!(loaded.fail_listing(&fetch_error("1")).ptr_eq(&loaded));
    }

    #[test]
    fn fail_listing_without_entity_stores_placeholder() {
        let things: Collection<Thing> = Collection::new();
        let failed = things.fail_listing(&fetch_error("9"));
        assert_eq!(failed.get("9").unwrap().error(), Some(&fetch_error("9")));
    }

    #[test]
    fn update_skips_missing_failed_and_unchanged() {
        let things = Collection::new()
            .store(&[thing("1", "a", None)])
            .fail(&fetch_error("2"));

        assert!(things.update("3", |_| unreachable!()).ptr_eq(&things));
        assert!(things.update("2", |_| unreachable!()).ptr_eq(&things));
        assert!(things.update("1", |_| None).ptr_eq(&things));

        let next = things.update("1", |t| {
            Some(Thing {
                label: "b".into(),
                ..t.clone()
            })
        });
        assert_eq!(next.entity("1").unwrap().label, "b");
        assert_eq!(things.entity("1").unwrap().label, "a");
    }

    #[test]
    fn remove_missing_keeps_reference() {
        let things = Collection::new().store(&[thing("1", "a", None)]);
        assert!(things.remove("2").ptr_eq(&things));
        assert!(things.remove("1").is_empty());
    }

    #[test]
    fn clear_from_empty_is_empty() {
        let things: Collection<Thing> = Collection::new();
        assert!(things.clear().is_empty());
    }
}
