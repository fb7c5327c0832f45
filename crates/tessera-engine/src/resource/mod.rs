//! Ownership tracking for bulk teardown.
//!
//! The engine keeps two independent lists: allocated images and registered
//! loop hooks. Both are released through [`ResourceList::clear`] at shutdown.

mod list;

pub use list::{Iter, IterMut, ResourceList};
