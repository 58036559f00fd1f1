//! PostgREST implementation of the entity source and record store.
//!
//! A single client serves both the paginated entity read and the record
//! existence check and insert, so there is one transport path for the store.

mod client;
mod config;
mod rows;

pub use client::PostgrestClient;
pub use config::PostgrestConfig;
