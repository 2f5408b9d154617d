//! Link resolvers map a document to the URL it is published under.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::document::Document;
use crate::error::{BoxError, ConfigError, ConfigResult};

/// Caller-supplied mapping from a document to its URL
pub type LinkResolver = Arc<dyn Fn(&Document) -> Result<String, BoxError> + Send + Sync>;

/// Wrap a closure as a [`LinkResolver`]
pub fn link_resolver<F, E>(f: F) -> LinkResolver
where
    F: Fn(&Document) -> Result<String, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Arc::new(move |doc: &Document| f(doc).map_err(Into::into))
}

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

const FIELDS: [&str; 4] = ["type", "uid", "id", "lang"];

/// A link resolver driven by a URL template such as `/{lang}/{type}/{uid}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
}

impl UrlTemplate {
    /// Parse a template, rejecting unknown placeholders
    pub fn parse(template: &str) -> ConfigResult<Self> {
        if template.trim().is_empty() {
            return Err(ConfigError::invalid(
                "link_template",
                template,
                "template must not be empty",
            ));
        }

        for caps in PLACEHOLDER.captures_iter(template) {
            let name = &caps[1];
            if !FIELDS.contains(&name) {
                return Err(ConfigError::invalid(
                    "link_template",
                    template,
                    format!("unknown placeholder {{{}}}", name),
                ));
            }
        }

        Ok(Self {
            template: template.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Expand the template for one document
    pub fn resolve(&self, doc: &Document) -> Result<String, BoxError> {
        let mut missing = None;

        let url = PLACEHOLDER.replace_all(&self.template, |caps: &regex::Captures<'_>| {
            let value = match &caps[1] {
                "type" => Some(doc.doc_type.as_str()),
                "id" => Some(doc.id.as_str()),
                "uid" => doc.uid.as_deref(),
                "lang" => doc.lang.as_deref(),
                _ => None,
            };
            match value {
                Some(value) => value.to_string(),
                None => {
                    missing.get_or_insert_with(|| caps[1].to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(field) => Err(format!("document has no {} for template {}", field, self.template).into()),
            None => Ok(url.into_owned()),
        }
    }

    pub fn into_resolver(self) -> LinkResolver {
        Arc::new(move |doc: &Document| self.resolve(doc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_resolver() {
        let resolver = link_resolver(|doc: &Document| {
            Ok::<_, BoxError>(format!("https://example.com/{}/{}", doc.doc_type, doc.id))
        });

        let url = resolver(&Document::new("a", "post")).unwrap();
        assert_eq!(url, "https://example.com/post/a");
    }

    #[test]
    fn test_closure_resolver_error() {
        let resolver = link_resolver(|doc: &Document| {
            doc.uid
                .clone()
                .ok_or_else(|| format!("no uid on {}", doc.id))
        });

        let err = resolver(&Document::new("a", "post")).unwrap_err();
        assert_eq!(err.to_string(), "no uid on a");
    }

    #[test]
    fn test_template_expansion() {
        let template = UrlTemplate::parse("/{lang}/{type}/{uid}").unwrap();
        let doc = Document::new("1", "post").with_uid("hello").with_lang("en-us");

        assert_eq!(template.resolve(&doc).unwrap(), "/en-us/post/hello");
    }

    #[test]
    fn test_template_missing_field_is_an_error() {
        let template = UrlTemplate::parse("/{type}/{uid}").unwrap();
        let err = template.resolve(&Document::new("1", "post")).unwrap_err();

        assert!(err.to_string().contains("uid"));
    }

    #[test]
    fn test_template_rejects_unknown_placeholder() {
        let result = UrlTemplate::parse("/{type}/{slug}");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert!(UrlTemplate::parse("  ").is_err());
    }

    #[test]
    fn test_template_into_resolver() {
        let resolver = UrlTemplate::parse("https://example.com/{id}")
            .unwrap()
            .into_resolver();

        assert_eq!(
            resolver(&Document::new("XyZ", "page")).unwrap(),
            "https://example.com/XyZ"
        );
    }
}
