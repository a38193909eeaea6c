//! Domain types for the Minard dashboard
//! Entities cached from the API, request markers and failure records.

pub mod activity;
pub mod branch;
pub mod comment;
pub mod commit;
pub mod deployment;
pub mod entity;
pub mod error;
pub mod listing;
pub mod notification;
pub mod project;
pub mod request;

pub use activity::*;
pub use branch::*;
pub use comment::*;
pub use commit::*;
pub use deployment::*;
pub use entity::*;
pub use error::*;
pub use listing::Listing;
pub use notification::*;
pub use project::*;
pub use request::*;
