//! In-memory checkpoint state and its on-disk representation.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Progress snapshot.
///
/// `processed` only ever grows. It is the sole resumption state: an entity in
/// it is never searched again, whether or not it produced any records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Entities whose search step has completed.
    #[serde(default)]
    pub processed: BTreeSet<String>,
    /// Entities processed by the session that wrote this snapshot.
    #[serde(default)]
    pub last_index: usize,
    /// Running count of records found across all sessions.
    #[serde(default, rename = "total_papers")]
    pub total_records_found: u64,
    /// Processed entities whose search yielded nothing.
    #[serde(default)]
    pub no_results: BTreeSet<String>,
    /// When the snapshot was written.
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Checkpoint {
    /// Whether the entity has already been processed.
    pub fn is_processed(&self, entity: &str) -> bool {
        self.processed.contains(entity)
    }

    /// Record a completed entity and the number of documents it yielded.
    ///
    /// Returns `false` if the entity was already processed, in which case
    /// nothing changes.
    pub fn mark_processed(&mut self, entity: &str, records_found: usize) -> bool {
        if !self.processed.insert(entity.to_string()) {
            return false;
        }
        self.total_records_found += records_found as u64;
        if records_found == 0 {
            self.no_results.insert(entity.to_string());
        }
        true
    }

    /// Entities from `all` not yet processed, in input order.
    pub fn remaining(&self, all: &[String]) -> Vec<String> {
        all.iter()
            .filter(|name| !self.is_processed(name))
            .cloned()
            .collect()
    }
}

/// Accept RFC 3339 timestamps as well as offset-less ISO timestamps written
/// by older tooling; anything else is dropped rather than failing the load.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| {
        DateTime::parse_from_rfc3339(&value)
            .map(|ts| ts.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&value, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc())
            })
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_processed_is_idempotent() {
        let mut checkpoint = Checkpoint::default();
        assert!(checkpoint.mark_processed("Niacinamide", 2));
        assert!(!checkpoint.mark_processed("Niacinamide", 2));
        assert!(checkpoint.mark_processed("Retinol", 0));

        assert_eq!(checkpoint.processed.len(), 2);
        assert_eq!(checkpoint.total_records_found, 2);
        assert!(checkpoint.no_results.contains("Retinol"));
        assert!(!checkpoint.no_results.contains("Niacinamide"));
    }

    #[test]
    fn test_remaining_preserves_order() {
        let mut checkpoint = Checkpoint::default();
        checkpoint.mark_processed("B", 1);

        let all = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        assert_eq!(checkpoint.remaining(&all), vec!["A", "C"]);
    }

    #[test]
    fn test_reads_legacy_snapshot() {
        let json = r#"{
            "processed": ["Retinol", "Niacinamide"],
            "last_index": 100,
            "total_papers": 7,
            "last_updated": "2025-03-12T10:11:12.123456"
        }"#;

        let checkpoint: Checkpoint = serde_json::from_str(json).unwrap();
        assert_eq!(checkpoint.processed.len(), 2);
        assert_eq!(checkpoint.last_index, 100);
        assert_eq!(checkpoint.total_records_found, 7);
        assert!(checkpoint.no_results.is_empty());
        assert!(checkpoint.last_updated.is_some());
    }

    #[test]
    fn test_unparseable_timestamp_is_dropped() {
        let json = r#"{"processed": [], "last_updated": "yesterday"}"#;
        let checkpoint: Checkpoint = serde_json::from_str(json).unwrap();
        assert!(checkpoint.last_updated.is_none());
    }

    #[test]
    fn test_serializes_sorted_processed_list() {
        let mut checkpoint = Checkpoint::default();
        checkpoint.mark_processed("Zinc Oxide", 1);
        checkpoint.mark_processed("Allantoin", 1);

        let value = serde_json::to_value(&checkpoint).unwrap();
        assert_eq!(value["processed"], serde_json::json!(["Allantoin", "Zinc Oxide"]));
        assert_eq!(value["total_papers"], serde_json::json!(2));
    }
}
