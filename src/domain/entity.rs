use std::fmt;

use super::listing::Listing;

/// Anything kept in a normalized collection, keyed by its id.
pub trait Entity: Clone + fmt::Debug {
    fn id(&self) -> &str;

    /// The sub-collection this entity owns, if its type has one.
    ///
    /// Stores keep a loaded listing alive when a fresh payload omits it, and
    /// scoped fetch failures land here instead of replacing the entity.
    fn listing(&self) -> Option<&Option<Listing>> {
        None
    }

    fn listing_mut(&mut self) -> Option<&mut Option<Listing>> {
        None
    }
}
