//! Sitemap entries and their crawl hints.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How frequently a page is likely to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFreq::Always => "always",
            ChangeFreq::Hourly => "hourly",
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
            ChangeFreq::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChangeFreq {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "always" => Ok(Self::Always),
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            "never" => Ok(Self::Never),
            _ => Err(ConfigError::invalid(
                "changefreq",
                s,
                "expected one of always, hourly, daily, weekly, monthly, yearly, never",
            )),
        }
    }
}

/// Per-entry crawl hints, either the default or a per-type override.
///
/// An override carries only the hints it names; a missing hint is left out
/// of the `<url>` element instead of falling back to the default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changefreq: Option<ChangeFreq>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self::new(ChangeFreq::Monthly, 1.0)
    }
}

impl EntryOptions {
    pub fn new(changefreq: ChangeFreq, priority: f64) -> Self {
        Self {
            changefreq: Some(changefreq),
            priority: Some(priority),
        }
    }

    /// Options for a document type: the override when present, otherwise the default
    pub fn for_type(overrides: &HashMap<String, EntryOptions>, doc_type: &str) -> Self {
        overrides.get(doc_type).copied().unwrap_or_default()
    }

    /// An absent priority is valid
    pub fn has_valid_priority(&self) -> bool {
        self.priority.is_none_or(|p| (0.0..=1.0).contains(&p))
    }
}

/// One `<url>` element of the sitemap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub url: String,
    pub changefreq: Option<ChangeFreq>,
    pub priority: Option<f64>,
    pub lastmod: Option<String>,
}

impl SitemapEntry {
    pub fn new(url: impl Into<String>, options: EntryOptions) -> Self {
        Self {
            url: url.into(),
            changefreq: options.changefreq,
            priority: options.priority,
            lastmod: None,
        }
    }

    pub fn with_lastmod(mut self, lastmod: Option<String>) -> Self {
        self.lastmod = lastmod;
        self
    }
}
