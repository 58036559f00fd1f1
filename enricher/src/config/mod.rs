//! Configuration and dependency wiring for the enricher.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::EnricherConfig;
