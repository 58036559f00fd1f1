//! Processor module for the enrichment pipeline.
//!
//! Transforms raw provider documents into enrichment records.

mod record_transformer;

pub use record_transformer::{RecordTransformer, TransformerConfig};
