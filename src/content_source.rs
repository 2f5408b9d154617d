//! Content-source collaborator: API handle acquisition and document queries.

use async_trait::async_trait;

use crate::document::Document;
use crate::error::Result;

/// Type list entry that selects every document type
pub const ALL_TYPES: &str = "*";

/// Query predicate sent to the content source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Every document in the repository
    All,
    /// Documents whose `field` equals any of `values`
    Any { field: String, values: Vec<String> },
}

impl Predicate {
    /// `document.type` is one of `types`; a list holding the wildcard matches everything
    pub fn for_types(types: &[String]) -> Self {
        if types.is_empty() || types.iter().any(|t| t == ALL_TYPES) {
            Predicate::All
        } else {
            Predicate::Any {
                field: "document.type".to_string(),
                values: types.to_vec(),
            }
        }
    }

    /// Render in the Prismic query syntax, `None` for [`Predicate::All`]
    pub fn to_query(&self) -> Option<String> {
        match self {
            Predicate::All => None,
            Predicate::Any { field, values } => {
                let values = serde_json::Value::from(values.clone());
                Some(format!("[[any({}, {})]]", field, values))
            }
        }
    }
}

/// Options applied to a query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// Language code, `*` for all language variants
    pub lang: String,
    /// Documents requested per page
    pub page_size: u32,
}

impl QueryOptions {
    pub fn all_languages() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            lang: "*".to_string(),
            page_size: 100,
        }
    }
}

/// Acquires an API handle for an endpoint
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn get_api(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
    ) -> Result<Box<dyn ContentApi>>;
}

/// A connected API handle that can run queries
#[async_trait]
pub trait ContentApi: Send + Sync {
    async fn query(&self, predicate: &Predicate, options: &QueryOptions) -> Result<Vec<Document>>;
}
