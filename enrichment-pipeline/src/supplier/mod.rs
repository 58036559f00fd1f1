//! Supplier module for the enrichment pipeline.
//!
//! Reads the full, deduplicated entity list from the entity source.

mod entity_supplier;

pub use entity_supplier::{EntitySupplier, SupplierConfig};
