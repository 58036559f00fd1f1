//! # Enrichment Shared
//!
//! Shared types passed between the repository and pipeline crates.
//!
//! - [`RawDocument`]: a document exactly as the search provider returned it.
//! - [`EnrichmentRecord`]: the normalized row persisted downstream.

mod document;
mod record;

pub use document::{RawAuthor, RawDocument};
pub use record::EnrichmentRecord;
