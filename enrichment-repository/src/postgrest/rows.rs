//! Row mapping between PostgREST JSON and enricher types.

use serde_json::{json, Map, Value};

use crate::errors::StoreError;
use enrichment_shared::EnrichmentRecord;

/// Extract the entity name column from a page of source rows.
///
/// Null, missing, non-string and blank values map to `None` while keeping
/// the row count intact. Other names are returned unaltered.
pub(crate) fn entity_names(rows: Vec<Map<String, Value>>, column: &str) -> Vec<Option<String>> {
    rows.into_iter()
        .map(|row| {
            row.get(column)
                .and_then(Value::as_str)
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// Build the insert body for a record.
///
/// Absent optional fields are sent as explicit nulls.
pub(crate) fn record_row(
    record: &EnrichmentRecord,
    entity_column: &str,
) -> Result<Map<String, Value>, StoreError> {
    let id = record
        .id
        .ok_or_else(|| StoreError::config("record id must be assigned before insert"))?;

    let mut row = Map::new();
    row.insert("id".to_string(), json!(id.to_string()));
    row.insert(entity_column.to_string(), json!(record.entity_name));
    row.insert("title".to_string(), json!(record.title));
    row.insert("authors".to_string(), json!(record.authors));
    row.insert("journal".to_string(), json!(record.journal));
    row.insert("doi".to_string(), json!(record.doi));
    row.insert("url".to_string(), json!(record.url));
    row.insert(
        "published_at".to_string(),
        json!(record
            .published_at
            .map(|date| date.format("%Y-%m-%d").to_string())),
    );
    row.insert("issue".to_string(), json!(record.issue));
    row.insert("volume".to_string(), json!(record.volume));
    row.insert("arxiv_id".to_string(), json!(record.arxiv_id));
    Ok(row)
}
