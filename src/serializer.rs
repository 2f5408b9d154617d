//! Streaming sitemap XML writer.
//!
//! Entries are written one at a time into an in-memory buffer and the
//! finished document is handed back by [`SitemapStream::end`].
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/post/a</loc>
//!     <changefreq>monthly</changefreq>
//!     <priority>1.0</priority>
//!   </url>
//! </urlset>
//! ```

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::entry::SitemapEntry;
use crate::error::{ConfigError, Result, SitemapError};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const NEWS_NS: &str = "http://www.google.com/schemas/sitemap-news/0.9";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";
pub const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// What to do with an entry that breaks the sitemap protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    Silent,
    #[default]
    Warn,
    Throw,
}

/// Extension namespaces declared on `<urlset>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlNamespaces {
    pub news: bool,
    pub xhtml: bool,
    pub image: bool,
    pub video: bool,
}

impl Default for XmlNamespaces {
    fn default() -> Self {
        Self {
            news: true,
            xhtml: true,
            image: true,
            video: true,
        }
    }
}

/// Serializer options passed through from the sitemap configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerConfig {
    /// Stylesheet referenced by an `xml-stylesheet` processing instruction
    pub xsl_url: Option<String>,
    /// Indent output with two spaces
    pub pretty: bool,
    /// Write `lastmod` as `YYYY-MM-DD`
    pub lastmod_date_only: bool,
    pub level: ValidationLevel,
    pub xmlns: XmlNamespaces,
}

/// Sitemap writer bound to a hostname
pub struct SitemapStream {
    writer: Writer<Cursor<Vec<u8>>>,
    base: Option<Url>,
    config: SerializerConfig,
    count: usize,
}

impl SitemapStream {
    /// Start a sitemap: writes the declaration, stylesheet and opening `<urlset>`
    pub fn new(hostname: &str, config: SerializerConfig) -> Result<Self> {
        let base = parse_hostname(hostname)?;

        let buffer = Cursor::new(Vec::new());
        let writer = if config.pretty {
            Writer::new_with_indent(buffer, b' ', 2)
        } else {
            Writer::new(buffer)
        };

        let mut stream = Self {
            writer,
            base,
            config,
            count: 0,
        };
        stream.write_head()?;
        Ok(stream)
    }

    fn write_head(&mut self) -> Result<()> {
        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        if let Some(xsl_url) = self.config.xsl_url.clone() {
            let content = format!(
                r#"xml-stylesheet type="text/xsl" href="{}""#,
                quick_xml::escape::escape(xsl_url.as_str())
            );
            self.emit(Event::PI(BytesPI::new(content)))?;
        }

        let mut urlset = BytesStart::new("urlset");
        urlset.push_attribute(("xmlns", SITEMAP_NS));
        let xmlns = &self.config.xmlns;
        if xmlns.news {
            urlset.push_attribute(("xmlns:news", NEWS_NS));
        }
        if xmlns.xhtml {
            urlset.push_attribute(("xmlns:xhtml", XHTML_NS));
        }
        if xmlns.image {
            urlset.push_attribute(("xmlns:image", IMAGE_NS));
        }
        if xmlns.video {
            urlset.push_attribute(("xmlns:video", VIDEO_NS));
        }
        self.emit(Event::Start(urlset))
    }

    /// Append one `<url>` element
    pub fn write(&mut self, entry: &SitemapEntry) -> Result<()> {
        let loc = self.resolve_url(&entry.url)?;
        if let Some(priority) = entry.priority {
            self.check_priority(&loc, priority)?;
        }

        self.emit(Event::Start(BytesStart::new("url")))?;
        self.text_element("loc", &loc)?;
        if let Some(lastmod) = &entry.lastmod {
            let lastmod = self.format_lastmod(lastmod);
            self.text_element("lastmod", &lastmod)?;
        }
        if let Some(changefreq) = entry.changefreq {
            self.text_element("changefreq", changefreq.as_str())?;
        }
        if let Some(priority) = entry.priority {
            self.text_element("priority", &format_priority(priority))?;
        }
        self.emit(Event::End(BytesEnd::new("url")))?;

        self.count += 1;
        Ok(())
    }

    /// Number of entries written so far
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Close `<urlset>` and return the finished document
    pub fn end(mut self) -> Result<Vec<u8>> {
        self.emit(Event::End(BytesEnd::new("urlset")))?;
        let mut bytes = self.writer.into_inner().into_inner();
        if self.config.pretty {
            bytes.push(b'\n');
        }
        Ok(bytes)
    }

    fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.emit(Event::Start(BytesStart::new(name)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(name)))
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SitemapError::Serialize(e.to_string()))
    }

    fn resolve_url(&self, url: &str) -> Result<String> {
        let resolved = match &self.base {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };

        resolved
            .map(String::from)
            .map_err(|e| SitemapError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    fn check_priority(&self, loc: &str, priority: f64) -> Result<()> {
        if (0.0..=1.0).contains(&priority) {
            return Ok(());
        }

        match self.config.level {
            ValidationLevel::Silent => Ok(()),
            ValidationLevel::Warn => {
                warn!(url = loc, priority, "Priority outside 0.0..=1.0");
                Ok(())
            }
            ValidationLevel::Throw => Err(SitemapError::InvalidEntry {
                url: loc.to_string(),
                reason: format!("priority {} is outside 0.0..=1.0", priority),
            }),
        }
    }

    fn format_lastmod(&self, lastmod: &str) -> String {
        if !self.config.lastmod_date_only {
            return lastmod.to_string();
        }

        parse_timestamp(lastmod)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| lastmod.chars().take(10).collect())
    }
}

/// Parse the sitemap hostname; empty means entries must carry absolute URLs
pub fn parse_hostname(hostname: &str) -> std::result::Result<Option<Url>, ConfigError> {
    if hostname.trim().is_empty() {
        return Ok(None);
    }

    Url::parse(hostname)
        .map(Some)
        .map_err(|e| ConfigError::invalid("hostname", hostname, e.to_string()))
}

/// Accepts RFC 3339 as well as the `+0000` offsets the CMS emits
fn parse_timestamp(value: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .or_else(|_| chrono::DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .ok()
}

fn format_priority(priority: f64) -> String {
    if priority.fract() == 0.0 {
        format!("{:.1}", priority)
    } else {
        priority.to_string()
    }
}
