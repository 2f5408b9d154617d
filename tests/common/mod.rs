#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quick_xml::Reader;
use quick_xml::events::Event;

use prismic_sitemap::{
    BoxError, ContentApi, ContentRepository, Document, Predicate, QueryOptions, Result,
    SitemapConfig, SitemapError, link_resolver,
};

/// A call observed by the mock content source
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    GetApi {
        endpoint: String,
        access_token: Option<String>,
    },
    Query {
        predicate: Predicate,
        options: QueryOptions,
    },
}

#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// `get_api` answers with this HTTP status
    Connect(u16),
    /// `query` answers with this HTTP status
    Query(u16),
}

/// Mock content repository for testing the builder without network calls
#[derive(Clone, Default)]
pub struct MockRepository {
    documents: Vec<Document>,
    failure: Option<MockFailure>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockRepository {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

fn status_error(url: &str, status: u16) -> SitemapError {
    SitemapError::HttpStatus {
        url: url.to_string(),
        status,
        message: format!("HTTP {}", status),
    }
}

#[async_trait]
impl ContentRepository for MockRepository {
    async fn get_api(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
    ) -> Result<Box<dyn ContentApi>> {
        self.calls.lock().unwrap().push(MockCall::GetApi {
            endpoint: endpoint.to_string(),
            access_token: access_token.map(str::to_string),
        });

        if let Some(MockFailure::Connect(status)) = self.failure {
            return Err(status_error(endpoint, status));
        }

        Ok(Box::new(MockApi {
            documents: self.documents.clone(),
            failure: self.failure,
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct MockApi {
    documents: Vec<Document>,
    failure: Option<MockFailure>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

#[async_trait]
impl ContentApi for MockApi {
    async fn query(&self, predicate: &Predicate, options: &QueryOptions) -> Result<Vec<Document>> {
        self.calls.lock().unwrap().push(MockCall::Query {
            predicate: predicate.clone(),
            options: options.clone(),
        });

        if let Some(MockFailure::Query(status)) = self.failure {
            return Err(status_error("mock://documents/search", status));
        }

        Ok(self.documents.clone())
    }
}

pub fn doc(id: &str, doc_type: &str) -> Document {
    Document::new(id, doc_type).with_uid(id)
}

/// Config resolving `https://example.com/<type>/<uid>` into `public_path`
pub fn example_config(public_path: &std::path::Path) -> SitemapConfig {
    let mut config = SitemapConfig::new(link_resolver(|d: &Document| -> std::result::Result<String, BoxError> {
        let uid = d.uid.as_deref().ok_or("document has no uid")?;
        Ok(format!("https://example.com/{}/{}", d.doc_type, uid))
    }));
    config.api_endpoint = "https://example.cdn.prismic.io/api/v2".to_string();
    config.hostname = "https://example.com".to_string();
    config.public_path = public_path.to_path_buf();
    config
}

/// One parsed `<url>` element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedUrl {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: String,
    pub priority: String,
}

/// Parse a sitemap back into its `<url>` elements
pub fn parse_urls(xml: &str) -> Vec<ParsedUrl> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut urls = Vec::new();
    let mut current: Option<ParsedUrl> = None;
    let mut element: Option<String> = None;

    loop {
        match reader.read_event().expect("well-formed sitemap XML") {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
                if name == "url" {
                    current = Some(ParsedUrl::default());
                } else {
                    element = Some(name);
                }
            }
            Event::Text(e) => {
                let text = e.unescape().unwrap().to_string();
                if let (Some(url), Some(name)) = (current.as_mut(), element.as_deref()) {
                    match name {
                        "loc" => url.loc = text,
                        "lastmod" => url.lastmod = Some(text),
                        "changefreq" => url.changefreq = text,
                        "priority" => url.priority = text,
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                if e.local_name().as_ref() == b"url" {
                    urls.extend(current.take());
                }
                element = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    urls
}
