//! Content documents returned by the content source.

use serde::{Deserialize, Serialize};

/// Another language variant of the same document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternateLanguage {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub lang: String,
}

/// A content record as delivered by the CMS.
///
/// Only `type` matters to the sitemap builder; the remaining fields are
/// carried so link resolvers have something to build URLs from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(rename = "type")]
    pub doc_type: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub first_publication_date: Option<String>,
    #[serde(default)]
    pub last_publication_date: Option<String>,
    #[serde(default)]
    pub alternate_languages: Vec<AlternateLanguage>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Document {
    pub fn new(id: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uid: None,
            doc_type: doc_type.into(),
            lang: None,
            tags: Vec::new(),
            first_publication_date: None,
            last_publication_date: None,
            alternate_languages: Vec::new(),
            data: serde_json::Value::Null,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn with_last_publication_date(mut self, date: impl Into<String>) -> Self {
        self.last_publication_date = Some(date.into());
        self
    }
}

/// Order documents by ascending type.
///
/// Plain ordinal comparison of the type strings. The sort is stable, so
/// documents of the same type keep their retrieval order.
pub fn sort_by_type(documents: &mut [Document]) {
    documents.sort_by(|a, b| a.doc_type.cmp(&b.doc_type));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_type_is_non_decreasing() {
        let mut docs = vec![
            Document::new("1", "news"),
            Document::new("2", "blog"),
            Document::new("3", "news"),
            Document::new("4", "page"),
        ];

        sort_by_type(&mut docs);

        let types: Vec<&str> = docs.iter().map(|d| d.doc_type.as_str()).collect();
        assert_eq!(types, vec!["blog", "news", "news", "page"]);
        assert!(types.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_sort_keeps_retrieval_order_for_ties() {
        let mut docs = vec![
            Document::new("b", "post"),
            Document::new("x", "about"),
            Document::new("a", "post"),
            Document::new("c", "post"),
        ];

        sort_by_type(&mut docs);

        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["x", "b", "a", "c"]);
    }

    #[test]
    fn test_sort_is_ordinal_not_case_folded() {
        let mut docs = vec![Document::new("1", "blog"), Document::new("2", "Page")];

        sort_by_type(&mut docs);

        // Uppercase sorts before lowercase in byte order
        assert_eq!(docs[0].doc_type, "Page");
    }

    #[test]
    fn test_deserialize_prismic_document() {
        let json = r#"{
            "id": "ZAB123",
            "uid": "hello-world",
            "url": null,
            "type": "post",
            "href": "https://repo.cdn.prismic.io/api/v2/documents/search?ref=abc",
            "tags": ["news"],
            "first_publication_date": "2024-01-15T10:00:00+0000",
            "last_publication_date": "2024-02-01T08:30:00+0000",
            "slugs": ["hello-world"],
            "linked_documents": [],
            "lang": "en-us",
            "alternate_languages": [
                {"id": "ZAB124", "uid": "bonjour", "type": "post", "lang": "fr-fr"}
            ],
            "data": {"title": "Hello"}
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();

        assert_eq!(doc.id, "ZAB123");
        assert_eq!(doc.uid.as_deref(), Some("hello-world"));
        assert_eq!(doc.doc_type, "post");
        assert_eq!(doc.lang.as_deref(), Some("en-us"));
        assert_eq!(doc.tags, vec!["news"]);
        assert_eq!(doc.alternate_languages.len(), 1);
        assert_eq!(doc.alternate_languages[0].lang, "fr-fr");
        assert_eq!(doc.data["title"], "Hello");
    }

    #[test]
    fn test_deserialize_minimal_document() {
        let doc: Document = serde_json::from_str(r#"{"id": "1", "uid": null, "type": "page"}"#).unwrap();

        assert_eq!(doc.uid, None);
        assert!(doc.tags.is_empty());
        assert!(doc.data.is_null());
    }
}
