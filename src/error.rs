use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by caller-supplied link resolvers
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Main application error type that encompasses all possible failure modes of a build
#[derive(Error, Debug)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status error: {status} for {url} - {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("Request timeout: {url} after {timeout_seconds} seconds")]
    Timeout { url: String, timeout_seconds: u64 },

    #[error("Invalid response from {url}: {details}")]
    InvalidResponse { url: String, details: String },

    #[error("Link resolver failed for document {document_id}: {source}")]
    Resolver {
        document_id: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid sitemap URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid sitemap entry: {url} - {reason}")]
    InvalidEntry { url: String, reason: String },

    #[error("Sitemap serialization error: {0}")]
    Serialize(String),

    #[error("IO error: {path} - {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("The link resolver is undefined, it is needed to build sitemap links")]
    MissingLinkResolver,

    #[error("The API access token appears incorrect, it is too short")]
    InvalidAccessToken,

    #[error("Invalid configuration value: {field} = {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    Environment(String),

    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl SitemapError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SitemapError::Io {
            path: path.into(),
            source,
        }
    }

    /// True for configuration failures, which are detected before any I/O
    pub fn is_config(&self) -> bool {
        matches!(self, SitemapError::Config(_))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
