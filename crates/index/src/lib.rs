//! Search index for a single docset revision.
//!
//! The index is a SQLite file in the layout Dash and Zeal read
//! (`searchIndex(id, name, type, path)`), always rebuilt from scratch by the
//! [`IndexBuilder`]. Alongside the persisted table the builder collects a
//! [`Listing`] of record bodies, rendered to a plain HTML page for browsing
//! outside of a documentation browser. The two outputs are independent: only
//! the table carries the `(name, type, path)` uniqueness guarantee.

mod builder;
mod db;
pub mod error;
mod listing;
mod repo;

pub use crate::builder::{IndexBuilder, IndexStats};
pub use crate::db::Database;
pub use crate::listing::{Listing, ListingPolicy};
pub use crate::repo::{IndexEntry, Repository};
