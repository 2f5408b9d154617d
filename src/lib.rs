//! # prismic-sitemap Library
//!
//! Builds an XML sitemap from the documents of a Prismic repository: fetch the
//! documents, order them by type, resolve each to a URL with a caller-supplied
//! link resolver, serialize the sitemap and write it to disk.
//!
//! ```no_run
//! use prismic_sitemap::{BoxError, Document, SitemapConfig, build, link_resolver};
//!
//! # async fn example() -> prismic_sitemap::Result<()> {
//! let mut config = SitemapConfig::new(link_resolver(|doc: &Document| {
//!     Ok::<_, BoxError>(format!("/{}/{}", doc.doc_type, doc.uid.clone().unwrap_or_default()))
//! }));
//! config.api_endpoint = "https://my-repo.cdn.prismic.io/api/v2".to_string();
//! config.hostname = "https://example.com".to_string();
//! config.document_types = vec!["post".to_string()];
//!
//! let xml = build(&config).await?;
//! println!("{} bytes", xml.len());
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod content_source;
pub mod document;
pub mod entry;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod output;
pub mod resolver;
pub mod serializer;
pub mod writer;

pub use builder::{BuildReport, SitemapBuilder, build, map_documents};
pub use cli::{Cli, VerbosityLevel};
pub use config::{ConfigManager, EnvProvider, NetworkConfig, Settings, SitemapConfig};
pub use content_source::{ContentApi, ContentRepository, Predicate, QueryOptions};
pub use document::{AlternateLanguage, Document, sort_by_type};
pub use entry::{ChangeFreq, EntryOptions, SitemapEntry};
pub use error::{BoxError, ConfigError, ConfigResult, Result, SitemapError};
pub use http_client::{HttpClientConfig, PrismicApi, PrismicClient};
pub use output::Output;
pub use resolver::{LinkResolver, UrlTemplate, link_resolver};
pub use serializer::{SerializerConfig, SitemapStream, ValidationLevel, XmlNamespaces};
pub use writer::{resolve_public_path, write_sitemap};
