//! Sitemap Builder
//!
//! Fetches documents from the content source, orders them by type, resolves
//! each one to a sitemap entry, serializes the sitemap and writes it to disk.
//! Nothing is written until the whole document has been serialized in memory,
//! so a failed build leaves any existing sitemap file untouched.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument};

use crate::config::SitemapConfig;
use crate::content_source::{ContentRepository, Predicate, QueryOptions};
use crate::document::{Document, sort_by_type};
use crate::entry::{EntryOptions, SitemapEntry};
use crate::error::{Result, SitemapError};
use crate::http_client::{HttpClientConfig, PrismicClient};
use crate::resolver::LinkResolver;
use crate::serializer::SitemapStream;
use crate::writer::write_sitemap;

/// Outcome of a successful build
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// The serialized sitemap, identical to the file contents
    pub bytes: Vec<u8>,
    /// Where the sitemap was written
    pub path: PathBuf,
    pub entry_count: usize,
    pub entries_per_type: BTreeMap<String, usize>,
    pub duration: Duration,
}

/// Builds sitemaps from a content repository
pub struct SitemapBuilder<R> {
    repository: R,
}

impl SitemapBuilder<PrismicClient> {
    /// Builder backed by the Prismic REST API
    pub fn prismic(config: HttpClientConfig) -> Result<Self> {
        Ok(Self::new(PrismicClient::new(config)?))
    }
}

impl<R: ContentRepository> SitemapBuilder<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Build the sitemap, write it to the configured location and return its bytes
    pub async fn build(&self, config: &SitemapConfig) -> Result<Vec<u8>> {
        Ok(self.build_with_report(config).await?.bytes)
    }

    /// Same as [`SitemapBuilder::build`], with details about the run
    #[instrument(skip_all, fields(endpoint = %config.api_endpoint))]
    pub async fn build_with_report(&self, config: &SitemapConfig) -> Result<BuildReport> {
        let start = Instant::now();

        config.validate()?;
        let resolver = config.resolver()?;

        let api = self
            .repository
            .get_api(&config.api_endpoint, config.access_token.as_deref())
            .await?;

        let predicate = Predicate::for_types(&config.document_types);
        let options = QueryOptions::all_languages().with_page_size(config.page_size);
        let mut documents = api.query(&predicate, &options).await?;
        debug!(count = documents.len(), "Fetched documents");

        sort_by_type(&mut documents);
        let entries = map_documents(&documents, config, resolver)?;

        let mut stream = SitemapStream::new(&config.hostname, config.serializer.clone())?;
        for entry in &entries {
            stream.write(entry)?;
        }
        let bytes = stream.end()?;

        let path = write_sitemap(&config.output_dir(), &config.file_name, &bytes).await?;

        let mut entries_per_type = BTreeMap::new();
        for doc in &documents {
            *entries_per_type.entry(doc.doc_type.clone()).or_insert(0) += 1;
        }

        info!(
            path = %path.display(),
            entries = entries.len(),
            bytes = bytes.len(),
            "Sitemap written"
        );

        Ok(BuildReport {
            bytes,
            path,
            entry_count: entries.len(),
            entries_per_type,
            duration: start.elapsed(),
        })
    }
}

/// Build the sitemap using the Prismic REST API with default HTTP settings
pub async fn build(config: &SitemapConfig) -> Result<Vec<u8>> {
    config.validate()?;
    SitemapBuilder::prismic(HttpClientConfig::default())?
        .build(config)
        .await
}

/// Turn ordered documents into sitemap entries, one per document.
///
/// The first resolver failure aborts the whole mapping.
pub fn map_documents(
    documents: &[Document],
    config: &SitemapConfig,
    resolver: &LinkResolver,
) -> Result<Vec<SitemapEntry>> {
    documents
        .iter()
        .map(|doc| {
            let options = EntryOptions::for_type(&config.options_per_document_type, &doc.doc_type);
            let url = resolver(doc).map_err(|source| SitemapError::Resolver {
                document_id: doc.id.clone(),
                source,
            })?;

            let lastmod = if config.include_lastmod {
                doc.last_publication_date.clone()
            } else {
                None
            };

            Ok(SitemapEntry::new(url, options).with_lastmod(lastmod))
        })
        .collect()
}
