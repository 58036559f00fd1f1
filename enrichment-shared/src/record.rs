//! Normalized enrichment records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reference document attached to an entity, ready for persistence.
///
/// `entity_name` and `title` are mandatory for persistence; records missing
/// either are filtered out by the loader. Deduplication uses the pair
/// `(entity_name, title)`, never `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRecord {
    /// Row identifier, assigned just before insert when absent.
    pub id: Option<Uuid>,
    /// The entity this record enriches.
    pub entity_name: String,
    /// Document title.
    pub title: Option<String>,
    /// Formatted author list (`"A, B, C et al."`).
    pub authors: Option<String>,
    /// Journal or venue name.
    pub journal: Option<String>,
    /// Digital Object Identifier.
    pub doi: Option<String>,
    /// arXiv identifier.
    pub arxiv_id: Option<String>,
    /// Canonical landing page.
    pub url: Option<String>,
    /// Publication date, year-granular when only the year is known.
    pub published_at: Option<NaiveDate>,
    /// Journal issue. Not provided by the search provider.
    pub issue: Option<String>,
    /// Journal volume. Not provided by the search provider.
    pub volume: Option<String>,
}

impl EnrichmentRecord {
    /// Create a record with the mandatory fields set.
    pub fn new(entity_name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Whether the record carries a non-blank entity name and title.
    pub fn is_valid(&self) -> bool {
        !self.entity_name.trim().is_empty()
            && self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// The deduplication key, if the record is valid.
    pub fn identity(&self) -> Option<(&str, &str)> {
        if !self.is_valid() {
            return None;
        }
        self.title
            .as_deref()
            .map(|title| (self.entity_name.as_str(), title))
    }

    /// Return the record id, generating one first if absent.
    pub fn ensure_id(&mut self) -> Uuid {
        *self.id.get_or_insert_with(Uuid::new_v4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_requires_entity_and_title() {
        assert!(EnrichmentRecord::new("Retinol", "Retinoids in aging skin").is_valid());
        assert!(!EnrichmentRecord::new("", "Orphan title").is_valid());
        assert!(!EnrichmentRecord::new("Retinol", "   ").is_valid());

        let untitled = EnrichmentRecord {
            entity_name: "Retinol".to_string(),
            ..Default::default()
        };
        assert!(!untitled.is_valid());
        assert!(untitled.identity().is_none());
    }

    #[test]
    fn test_ensure_id_is_stable() {
        let mut record = EnrichmentRecord::new("Retinol", "Title");
        let first = record.ensure_id();
        let second = record.ensure_id();
        assert_eq!(first, second);
        assert_eq!(record.id, Some(first));
    }
}
