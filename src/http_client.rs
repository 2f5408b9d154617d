use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::content_source::{ContentApi, ContentRepository, Predicate, QueryOptions};
use crate::document::Document;
use crate::error::{Result, SitemapError};

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: format!("prismic-sitemap/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// A release reference advertised by the API descriptor
#[derive(Debug, Clone, Deserialize)]
pub struct ApiRef {
    pub id: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

#[derive(Debug, Deserialize)]
struct ApiDescriptor {
    refs: Vec<ApiRef>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    page: u32,
    total_pages: u32,
    #[serde(default)]
    results: Vec<Document>,
}

/// Async client for the Prismic REST API
pub struct PrismicClient {
    client: Client,
    config: HttpClientConfig,
}

impl PrismicClient {
    /// Create a new client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .build()
            .map_err(SitemapError::from)?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}

#[async_trait]
impl ContentRepository for PrismicClient {
    #[instrument(skip(self, access_token), fields(authenticated = access_token.is_some()))]
    async fn get_api(
        &self,
        endpoint: &str,
        access_token: Option<&str>,
    ) -> Result<Box<dyn ContentApi>> {
        let mut query = Vec::new();
        if let Some(token) = access_token {
            query.push(("access_token", token.to_string()));
        }

        let descriptor: ApiDescriptor =
            get_json(&self.client, &self.config, endpoint, &query).await?;

        let master = descriptor
            .refs
            .into_iter()
            .find(|r| r.is_master_ref)
            .ok_or_else(|| SitemapError::InvalidResponse {
                url: endpoint.to_string(),
                details: "API descriptor has no master ref".to_string(),
            })?;

        debug!(master_ref = %master.reference, "Acquired API handle");

        Ok(Box::new(PrismicApi {
            client: self.client.clone(),
            config: self.config.clone(),
            search_url: format!("{}/documents/search", endpoint.trim_end_matches('/')),
            master_ref: master.reference,
            access_token: access_token.map(str::to_string),
        }))
    }
}

/// An API handle pinned to the master ref
pub struct PrismicApi {
    client: Client,
    config: HttpClientConfig,
    search_url: String,
    master_ref: String,
    access_token: Option<String>,
}

impl PrismicApi {
    pub fn master_ref(&self) -> &str {
        &self.master_ref
    }

    fn page_query(
        &self,
        predicate: &Predicate,
        options: &QueryOptions,
        page: u32,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("ref", self.master_ref.clone())];
        if let Some(q) = predicate.to_query() {
            query.push(("q", q));
        }
        query.push(("lang", options.lang.clone()));
        query.push(("pageSize", options.page_size.to_string()));
        query.push(("page", page.to_string()));
        if let Some(token) = &self.access_token {
            query.push(("access_token", token.clone()));
        }
        query
    }
}

#[async_trait]
impl ContentApi for PrismicApi {
    #[instrument(skip(self, options), fields(lang = %options.lang))]
    async fn query(&self, predicate: &Predicate, options: &QueryOptions) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for page in 1.. {
            let query = self.page_query(predicate, options, page);
            let response: SearchResponse =
                get_json(&self.client, &self.config, &self.search_url, &query).await?;

            if response.page != page {
                return Err(SitemapError::InvalidResponse {
                    url: self.search_url.clone(),
                    details: format!("requested page {} but received page {}", page, response.page),
                });
            }

            debug!(
                page,
                total_pages = response.total_pages,
                results = response.results.len(),
                "Fetched result page"
            );

            let last_page = response.results.is_empty() || page >= response.total_pages;
            documents.extend(response.results);

            if last_page {
                break;
            }
        }

        Ok(documents)
    }
}

/// Make a single GET request with timeout and decode the JSON body
async fn get_json<T: DeserializeOwned>(
    client: &Client,
    config: &HttpClientConfig,
    url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let request_future = client.get(url).query(query).send();
    let timed_out = || SitemapError::Timeout {
        url: url.to_string(),
        timeout_seconds: config.timeout_seconds,
    };

    let response = timeout(Duration::from_secs(config.timeout_seconds), request_future)
        .await
        .map_err(|_| timed_out())?
        .map_err(|e| if e.is_timeout() { timed_out() } else { SitemapError::from(e) })?;

    let response = check_status(url, response)?;

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            timed_out()
        } else {
            SitemapError::InvalidResponse {
                url: url.to_string(),
                details: e.to_string(),
            }
        }
    })
}

fn check_status(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(SitemapError::HttpStatus {
        url: url.to_string(),
        status: status.as_u16(),
        message: format!(
            "HTTP {}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown")
        ),
    })
}
