//! Raw search provider documents.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An author entry as returned by the search provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAuthor {
    /// Provider-side author identifier.
    #[serde(rename = "authorId", default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

impl RawAuthor {
    /// Create an author with only a display name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            author_id: None,
            name: Some(name.into()),
        }
    }
}

/// A document returned by the search provider.
///
/// Every field is optional: providers omit or null out fields freely and the
/// transformer is responsible for deciding what is usable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDocument {
    /// Provider-stable paper identifier.
    #[serde(rename = "paperId", default)]
    pub paper_id: Option<String>,
    /// Document title.
    #[serde(default)]
    pub title: Option<String>,
    /// Ordered author list.
    #[serde(default)]
    pub authors: Option<Vec<RawAuthor>>,
    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,
    /// Full publication date (`YYYY-MM-DD`) when the provider knows it.
    #[serde(rename = "publicationDate", default)]
    pub publication_date: Option<String>,
    /// Journal or conference name.
    #[serde(default)]
    pub venue: Option<String>,
    /// External identifiers keyed by source (`DOI`, `ArXiv`, `CorpusId`, ...).
    ///
    /// Values are usually strings but some keys carry numbers.
    #[serde(rename = "externalIds", default)]
    pub external_ids: Option<HashMap<String, Value>>,
    /// Canonical landing page.
    #[serde(default)]
    pub url: Option<String>,
    /// Abstract text.
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
}

impl RawDocument {
    /// Create a document with only a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Set the provider identifier.
    pub fn with_paper_id(mut self, paper_id: impl Into<String>) -> Self {
        self.paper_id = Some(paper_id.into());
        self
    }

    /// Set the author list from display names.
    pub fn with_authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authors = Some(names.into_iter().map(RawAuthor::named).collect());
        self
    }

    /// Set the publication year.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Add an external identifier.
    pub fn with_external_id(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.external_ids
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }
}
