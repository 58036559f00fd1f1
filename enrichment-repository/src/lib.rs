//! # Enrichment Repository
//!
//! This crate provides traits and implementations for the enricher's external
//! collaborators. It includes definitions for errors, interfaces, and concrete
//! HTTP implementations for Semantic Scholar (search) and PostgREST (entity
//! source and record store).

pub mod errors;
pub mod interfaces;
pub mod postgrest;
pub mod semantic_scholar;

pub use errors::{SearchError, StoreError};
pub use interfaces::{EntitySource, RecordStore, SearchProvider, SearchRequest};
pub use postgrest::{PostgrestClient, PostgrestConfig};
pub use semantic_scholar::{SemanticScholarClient, SemanticScholarConfig};
