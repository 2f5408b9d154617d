use crate::cli::Cli;
use crate::content_source::ALL_TYPES;
use crate::entry::EntryOptions;
use crate::error::{ConfigError, ConfigResult};
use crate::resolver::{LinkResolver, UrlTemplate};
use crate::serializer::{SerializerConfig, parse_hostname};
use crate::writer::{DEFAULT_PUBLIC_PATH, resolve_public_path};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Largest page size the Prismic API accepts
pub const MAX_PAGE_SIZE: u32 = 100;

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Everything a single sitemap build needs.
///
/// Construct with [`SitemapConfig::new`] or [`SitemapConfig::default`] and
/// fill in the fields; [`SitemapConfig::validate`] runs before any I/O.
#[derive(Clone)]
pub struct SitemapConfig {
    /// Maps each document to its URL (required)
    pub link_resolver: Option<LinkResolver>,
    pub api_endpoint: String,
    /// `None` means no authentication
    pub access_token: Option<String>,
    /// Sitemap base URL
    pub hostname: String,
    pub options_per_document_type: HashMap<String, EntryOptions>,
    /// Types to include, `*` for all
    pub document_types: Vec<String>,
    pub file_name: String,
    pub public_path: PathBuf,
    /// Directory the default `public` path is resolved against
    pub base_dir: PathBuf,
    /// Copy each document's last publication date into `<lastmod>`
    pub include_lastmod: bool,
    /// Documents requested per page
    pub page_size: u32,
    pub serializer: SerializerConfig,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            link_resolver: None,
            api_endpoint: String::new(),
            access_token: None,
            hostname: String::new(),
            options_per_document_type: HashMap::new(),
            document_types: vec![ALL_TYPES.to_string()],
            file_name: "sitemap.xml".to_string(),
            public_path: PathBuf::from(DEFAULT_PUBLIC_PATH),
            base_dir: PathBuf::from("."),
            include_lastmod: false,
            page_size: MAX_PAGE_SIZE,
            serializer: SerializerConfig::default(),
        }
    }
}

impl fmt::Debug for SitemapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SitemapConfig")
            .field(
                "link_resolver",
                &self.link_resolver.as_ref().map(|_| "<fn>"),
            )
            .field("api_endpoint", &self.api_endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("hostname", &self.hostname)
            .field("options_per_document_type", &self.options_per_document_type)
            .field("document_types", &self.document_types)
            .field("file_name", &self.file_name)
            .field("public_path", &self.public_path)
            .field("base_dir", &self.base_dir)
            .field("include_lastmod", &self.include_lastmod)
            .field("page_size", &self.page_size)
            .field("serializer", &self.serializer)
            .finish()
    }
}

impl SitemapConfig {
    pub fn new(link_resolver: LinkResolver) -> Self {
        Self {
            link_resolver: Some(link_resolver),
            ..Default::default()
        }
    }

    /// Build a runtime configuration from layered settings
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> ConfigResult<Self> {
        let link_resolver = settings
            .link_template
            .as_deref()
            .map(UrlTemplate::parse)
            .transpose()?
            .map(UrlTemplate::into_resolver);

        Ok(Self {
            link_resolver,
            api_endpoint: settings.api_endpoint.clone(),
            access_token: settings.access_token.clone(),
            hostname: settings.hostname.clone(),
            options_per_document_type: settings.options_per_document_type.clone(),
            document_types: settings.document_types.clone(),
            file_name: settings.file_name.clone(),
            public_path: settings.public_path.clone(),
            base_dir: base_dir.to_path_buf(),
            include_lastmod: settings.include_lastmod,
            page_size: settings.network.page_size,
            serializer: settings.sitemap.clone(),
        })
    }

    /// The resolver, or the error a build would fail with
    pub fn resolver(&self) -> ConfigResult<&LinkResolver> {
        self.link_resolver
            .as_ref()
            .ok_or(ConfigError::MissingLinkResolver)
    }

    /// Directory the sitemap is written to
    pub fn output_dir(&self) -> PathBuf {
        resolve_public_path(&self.public_path, &self.base_dir)
    }

    /// Full path of the sitemap file
    pub fn output_path(&self) -> PathBuf {
        self.output_dir().join(&self.file_name)
    }

    /// Check the configuration; no network or filesystem access happens here
    pub fn validate(&self) -> ConfigResult<()> {
        self.resolver()?;

        if let Some(token) = &self.access_token
            && token.chars().count() <= 1
        {
            return Err(ConfigError::InvalidAccessToken);
        }

        parse_hostname(&self.hostname)?;

        if self.file_name.trim().is_empty() {
            return Err(ConfigError::invalid(
                "file_name",
                &self.file_name,
                "file name must not be empty",
            ));
        }
        if self.file_name.contains('/') || self.file_name.contains('\\') {
            return Err(ConfigError::invalid(
                "file_name",
                &self.file_name,
                "file name must not contain a path separator",
            ));
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ConfigError::invalid(
                "page_size",
                self.page_size,
                format!("must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }

        for (doc_type, options) in &self.options_per_document_type {
            if let Some(priority) = options.priority
                && !options.has_valid_priority()
            {
                return Err(ConfigError::invalid(
                    format!("options_per_document_type.{}.priority", doc_type),
                    priority,
                    "priority must be between 0.0 and 1.0",
                ));
            }
        }

        Ok(())
    }
}

/// Settings as read from configuration files, the environment and the CLI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub hostname: String,
    /// URL template turned into the link resolver
    pub link_template: Option<String>,
    pub document_types: Vec<String>,
    pub file_name: String,
    pub public_path: PathBuf,
    pub include_lastmod: bool,
    pub options_per_document_type: HashMap<String, EntryOptions>,
    pub sitemap: SerializerConfig,
    pub network: NetworkConfig,
}

/// Network configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,
    /// Documents requested per page
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_endpoint: String::new(),
            access_token: None,
            hostname: String::new(),
            link_template: None,
            document_types: vec![ALL_TYPES.to_string()],
            file_name: "sitemap.xml".to_string(),
            public_path: PathBuf::from(DEFAULT_PUBLIC_PATH),
            include_lastmod: false,
            options_per_document_type: HashMap::new(),
            sitemap: SerializerConfig::default(),
            network: NetworkConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            page_size: MAX_PAGE_SIZE,
        }
    }
}

/// Configuration manager for loading and merging settings
pub struct ConfigManager;

impl ConfigManager {
    /// Load settings with precedence: file -> environment -> CLI
    pub async fn load_settings(cli: &Cli) -> ConfigResult<Settings> {
        let mut settings = if let Some(config_path) = &cli.config {
            Self::load_from_file(config_path).await?
        } else {
            Self::find_config_file().await?.unwrap_or_default()
        };

        settings = Self::apply_environment_overrides(settings)?;
        settings = Self::merge_with_cli(settings, cli);

        Self::validate_settings(&settings)?;

        Ok(settings)
    }

    /// Load settings from a file (TOML or JSON)
    pub async fn load_from_file(path: &Path) -> ConfigResult<Settings> {
        let content = tokio::fs::read_to_string(path).await?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(ext) => Err(ConfigError::UnsupportedFormat(ext.to_string())),
            None => {
                // Try to parse as TOML first, then JSON
                if let Ok(settings) = toml::from_str::<Settings>(&content) {
                    Ok(settings)
                } else {
                    Ok(serde_json::from_str(&content)?)
                }
            }
        }
    }

    /// Find a configuration file in the working directory, then the user config directory
    pub async fn find_config_file() -> ConfigResult<Option<Settings>> {
        let config_names = [
            "prismic-sitemap.toml",
            "prismic-sitemap.json",
            ".prismic-sitemap.toml",
            ".prismic-sitemap.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Ok(Some(Self::load_from_file(&path).await?));
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let app_config_dir = config_dir.join("prismic-sitemap");
            for name in &config_names {
                let path = app_config_dir.join(name);
                if path.exists() {
                    return Ok(Some(Self::load_from_file(&path).await?));
                }
            }
        }

        Ok(None)
    }

    /// Apply environment variable overrides using the system environment
    pub fn apply_environment_overrides(settings: Settings) -> ConfigResult<Settings> {
        Self::apply_environment_overrides_with(&SystemEnvProvider, settings)
    }

    /// Apply environment variable overrides with a custom environment provider
    pub fn apply_environment_overrides_with(
        env: &impl EnvProvider,
        mut settings: Settings,
    ) -> ConfigResult<Settings> {
        if let Some(endpoint) = env.get("PRISMIC_SITEMAP_API_ENDPOINT") {
            settings.api_endpoint = endpoint;
        }

        if let Some(token) = env.get("PRISMIC_SITEMAP_ACCESS_TOKEN") {
            settings.access_token = Some(token);
        }

        if let Some(hostname) = env.get("PRISMIC_SITEMAP_HOSTNAME") {
            settings.hostname = hostname;
        }

        if let Some(template) = env.get("PRISMIC_SITEMAP_LINK_TEMPLATE") {
            settings.link_template = Some(template);
        }

        if let Some(types) = env.get("PRISMIC_SITEMAP_DOCUMENT_TYPES") {
            settings.document_types = split_list(&types);
        }

        if let Some(timeout) = env.get("PRISMIC_SITEMAP_TIMEOUT") {
            settings.network.timeout_seconds = timeout.parse().map_err(|_| {
                ConfigError::Environment(format!(
                    "Invalid PRISMIC_SITEMAP_TIMEOUT value: {}",
                    timeout
                ))
            })?;
        }

        Ok(settings)
    }

    /// Merge CLI arguments into the settings (CLI takes precedence)
    pub fn merge_with_cli(mut settings: Settings, cli: &Cli) -> Settings {
        if let Some(endpoint) = &cli.endpoint {
            settings.api_endpoint = endpoint.clone();
        }
        if let Some(token) = &cli.access_token {
            settings.access_token = Some(token.clone());
        }
        if let Some(hostname) = &cli.hostname {
            settings.hostname = hostname.clone();
        }
        if let Some(template) = &cli.link_template {
            settings.link_template = Some(template.clone());
        }
        if !cli.document_types.is_empty() {
            settings.document_types = cli.document_types.clone();
        }
        if let Some(file_name) = &cli.file_name {
            settings.file_name = file_name.clone();
        }
        if let Some(public_path) = &cli.public_path {
            settings.public_path = public_path.clone();
        }
        if let Some(timeout) = cli.timeout {
            settings.network.timeout_seconds = timeout;
        }
        settings.include_lastmod |= cli.lastmod;
        settings.sitemap.pretty |= cli.pretty;

        settings
    }

    /// Validate settings values that are not covered by [`SitemapConfig::validate`]
    pub fn validate_settings(settings: &Settings) -> ConfigResult<()> {
        if settings.api_endpoint.trim().is_empty() {
            return Err(ConfigError::invalid(
                "api_endpoint",
                &settings.api_endpoint,
                "an API endpoint is required",
            ));
        }

        if settings.network.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "network.timeout_seconds",
                settings.network.timeout_seconds,
                "timeout must be greater than 0",
            ));
        }

        if settings.document_types.is_empty() {
            return Err(ConfigError::invalid(
                "document_types",
                "[]",
                "at least one document type (or \"*\") must be given",
            ));
        }

        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
