//! Interface definitions for the enricher's external collaborators.
//!
//! This module defines the abstract traits that allow for dependency
//! injection and swappable backends (HTTP implementations in production,
//! in-memory doubles in tests).

mod entity_source;
mod record_store;
mod search_provider;

pub use entity_source::EntitySource;
pub use record_store::RecordStore;
pub use search_provider::{SearchProvider, SearchRequest};
