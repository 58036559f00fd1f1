//! Record transformer implementation.
//!
//! Maps provider documents onto the storage schema.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::trace;

use enrichment_shared::{EnrichmentRecord, RawDocument};

const DOI_KEYS: &[&str] = &["DOI", "doi"];
const ARXIV_KEYS: &[&str] = &["ArXiv", "arXiv", "arxiv"];

/// Configuration for the record transformer.
#[derive(Debug, Clone)]
pub struct TransformerConfig {
    /// Number of author names kept before appending `et al.`.
    pub author_limit: usize,
    /// Fall back to `YYYY-01-01` when only the year is known.
    pub map_year_to_published_at: bool,
    /// Landing page prefix used when the provider gives no URL.
    pub paper_url_base: String,
}

impl Default for TransformerConfig {
    fn default() -> Self {
        Self {
            author_limit: 5,
            map_year_to_published_at: true,
            paper_url_base: "https://www.semanticscholar.org/paper".to_string(),
        }
    }
}

/// Transformer from [`RawDocument`] to [`EnrichmentRecord`].
///
/// Pure and infallible: missing or malformed provider fields become `None`.
/// Validity is decided later by the loader.
#[derive(Debug, Clone, Default)]
pub struct RecordTransformer {
    config: TransformerConfig,
}

impl RecordTransformer {
    /// Create a new transformer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new transformer with custom configuration.
    pub fn with_config(config: TransformerConfig) -> Self {
        Self { config }
    }

    /// Transform one document found for `entity_name`.
    pub fn transform(&self, document: &RawDocument, entity_name: &str) -> EnrichmentRecord {
        let record = EnrichmentRecord {
            id: None,
            entity_name: entity_name.to_string(),
            title: non_blank(document.title.as_deref()),
            authors: self.format_authors(document),
            journal: non_blank(document.venue.as_deref()),
            doi: external_id(document, DOI_KEYS),
            arxiv_id: external_id(document, ARXIV_KEYS),
            url: self.landing_url(document),
            published_at: self.published_at(document),
            issue: None,
            volume: None,
        };

        trace!(entity = %entity_name, title = ?record.title, "Transformed document");
        record
    }

    /// Transform every document found for `entity_name`.
    pub fn transform_all(&self, documents: &[RawDocument], entity_name: &str) -> Vec<EnrichmentRecord> {
        documents
            .iter()
            .map(|doc| self.transform(doc, entity_name))
            .collect()
    }

    fn format_authors(&self, document: &RawDocument) -> Option<String> {
        let authors = document.authors.as_deref()?;
        let names: Vec<&str> = authors
            .iter()
            .filter_map(|a| a.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .collect();

        if names.is_empty() {
            return None;
        }

        let limit = self.config.author_limit;
        if names.len() > limit {
            Some(format!("{} et al.", names[..limit].join(", ")))
        } else {
            Some(names.join(", "))
        }
    }

    fn landing_url(&self, document: &RawDocument) -> Option<String> {
        non_blank(document.url.as_deref()).or_else(|| {
            non_blank(document.paper_id.as_deref()).map(|id| {
                format!("{}/{}", self.config.paper_url_base.trim_end_matches('/'), id)
            })
        })
    }

    fn published_at(&self, document: &RawDocument) -> Option<NaiveDate> {
        let exact = document
            .publication_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok());

        exact.or_else(|| {
            if !self.config.map_year_to_published_at {
                return None;
            }
            document
                .year
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First non-blank value among `keys`, with numbers stringified.
fn external_id(document: &RawDocument, keys: &[&str]) -> Option<String> {
    let ids = document.external_ids.as_ref()?;
    keys.iter().find_map(|key| match ids.get(*key)? {
        Value::String(s) => non_blank(Some(s.as_str())),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authors_truncated_with_et_al() {
        let transformer = RecordTransformer::new();
        let doc = RawDocument::titled("Paper").with_authors(["A", "B", "C", "D", "E", "F", "G"]);

        let record = transformer.transform(&doc, "Retinol");
        assert_eq!(record.authors.as_deref(), Some("A, B, C, D, E et al."));
    }

    #[test]
    fn test_authors_within_limit_are_joined() {
        let transformer = RecordTransformer::new();
        let five = RawDocument::titled("Paper").with_authors(["A", "B", "C", "D", "E"]);
        assert_eq!(
            transformer.transform(&five, "X").authors.as_deref(),
            Some("A, B, C, D, E")
        );

        let none = RawDocument::titled("Paper").with_authors(Vec::<String>::new());
        assert!(transformer.transform(&none, "X").authors.is_none());
    }

    #[test]
    fn test_external_id_aliases() {
        let transformer = RecordTransformer::new();
        let doc = RawDocument::titled("Paper")
            .with_external_id("doi", "10.1000/xyz")
            .with_external_id("arXiv", "2101.00001")
            .with_external_id("CorpusId", 42);

        let record = transformer.transform(&doc, "Retinol");
        assert_eq!(record.doi.as_deref(), Some("10.1000/xyz"));
        assert_eq!(record.arxiv_id.as_deref(), Some("2101.00001"));
    }

    #[test]
    fn test_numeric_and_blank_external_ids() {
        let transformer = RecordTransformer::new();
        let doc = RawDocument::titled("Paper")
            .with_external_id("DOI", "  ")
            .with_external_id("ArXiv", 1234);

        let record = transformer.transform(&doc, "Retinol");
        assert!(record.doi.is_none());
        assert_eq!(record.arxiv_id.as_deref(), Some("1234"));
    }

    #[test]
    fn test_url_falls_back_to_paper_id() {
        let transformer = RecordTransformer::new();

        let with_url = RawDocument {
            url: Some("https://example.org/p/1".to_string()),
            ..RawDocument::titled("Paper").with_paper_id("abc")
        };
        assert_eq!(
            transformer.transform(&with_url, "X").url.as_deref(),
            Some("https://example.org/p/1")
        );

        let synthesized = RawDocument::titled("Paper").with_paper_id("abc");
        assert_eq!(
            transformer.transform(&synthesized, "X").url.as_deref(),
            Some("https://www.semanticscholar.org/paper/abc")
        );

        assert!(transformer.transform(&RawDocument::titled("Paper"), "X").url.is_none());
    }

    #[test]
    fn test_published_at_prefers_exact_date() {
        let transformer = RecordTransformer::new();
        let doc = RawDocument {
            publication_date: Some("2019-06-15".to_string()),
            ..RawDocument::titled("Paper").with_year(2019)
        };
        assert_eq!(
            transformer.transform(&doc, "X").published_at,
            NaiveDate::from_ymd_opt(2019, 6, 15)
        );

        let invalid = RawDocument {
            publication_date: Some("2019-13-40".to_string()),
            ..RawDocument::titled("Paper").with_year(2019)
        };
        assert_eq!(
            transformer.transform(&invalid, "X").published_at,
            NaiveDate::from_ymd_opt(2019, 1, 1)
        );
    }

    #[test]
    fn test_year_mapping_can_be_disabled() {
        let transformer = RecordTransformer::with_config(TransformerConfig {
            map_year_to_published_at: false,
            ..Default::default()
        });
        let doc = RawDocument::titled("Paper").with_year(2014);
        assert!(transformer.transform(&doc, "X").published_at.is_none());
    }

    #[test]
    fn test_sparse_document() {
        let transformer = RecordTransformer::new();
        let doc = RawDocument {
            venue: Some("   ".to_string()),
            ..Default::default()
        };

        let record = transformer.transform(&doc, "Retinol");
        assert_eq!(record.entity_name, "Retinol");
        assert!(record.title.is_none());
        assert!(record.journal.is_none());
        assert!(record.issue.is_none());
        assert!(record.volume.is_none());
        assert!(record.id.is_none());
        assert!(!record.is_valid());
    }
}
