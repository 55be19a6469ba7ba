//! A single hypermedia link descriptor.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ClientError;

/// HTTP method a link is invoked with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }

    /// Whether parameters travel in the request body rather than the query.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(format!("unknown HTTP method '{}'", other)),
        }
    }
}

/// Parameter contract entry of a link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkParameter {
    /// Parameter name as sent on the wire.
    pub name: String,

    /// Declared type ("string", "integer", "array", ...).
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Values the server accepts. Informational; not enforced client-side.
    #[serde(default)]
    pub valid_options: Vec<Value>,

    /// Server-side default for optional parameters.
    #[serde(default)]
    pub default_value: Option<Value>,
}

/// An operation advertised by the server for one resource.
///
/// Immutable once parsed: a refresh replaces the whole
/// [`LinkMap`](super::LinkMap) instead of editing descriptors.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkDescriptor {
    operation: String,
    rel: Option<String>,
    href: String,
    method: HttpMethod,
    required: Vec<LinkParameter>,
    optional: Vec<LinkParameter>,
}

impl LinkDescriptor {
    pub fn new(operation: impl Into<String>, method: HttpMethod, href: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            rel: None,
            href: href.into(),
            method,
            required: Vec::new(),
            optional: Vec::new(),
        }
    }

    /// Builder-style: declare a required parameter.
    pub fn with_required(mut self, name: &str) -> Self {
        self.required.push(LinkParameter {
            name: name.to_string(),
            param_type: None,
            description: None,
            valid_options: Vec::new(),
            default_value: None,
        });
        self
    }

    /// Builder-style: declare an optional parameter.
    pub fn with_optional(mut self, name: &str) -> Self {
        self.optional.push(LinkParameter {
            name: name.to_string(),
            param_type: None,
            description: None,
            valid_options: Vec::new(),
            default_value: None,
        });
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Human-readable relation text, when the server sends one.
    pub fn rel(&self) -> Option<&str> {
        self.rel.as_deref()
    }

    /// Href template; may contain `{name}` placeholders.
    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn required_params(&self) -> &[LinkParameter] {
        &self.required
    }

    pub fn optional_params(&self) -> &[LinkParameter] {
        &self.optional
    }

    pub fn required_names(&self) -> BTreeSet<&str> {
        self.required.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn optional_names(&self) -> BTreeSet<&str> {
        self.optional.iter().map(|p| p.name.as_str()).collect()
    }

    /// Validate a raw descriptor parsed from a payload.
    pub(crate) fn from_raw(operation: &str, raw: RawLink) -> Result<Self, ClientError> {
        let malformed = |reason: String| ClientError::MalformedLink {
            operation: operation.to_string(),
            reason,
        };

        let method = raw
            .method
            .as_deref()
            .ok_or_else(|| malformed("missing method".to_string()))?
            .parse::<HttpMethod>()
            .map_err(malformed)?;

        let href = raw
            .href
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| malformed("missing href".to_string()))?;

        Ok(Self {
            operation: operation.to_string(),
            rel: raw.rel,
            href,
            method,
            required: raw.required_params.unwrap_or_default(),
            optional: raw.optional_params.unwrap_or_default(),
        })
    }
}

/// Wire shape of a link before validation.
#[derive(Debug, Deserialize)]
pub(crate) struct RawLink {
    #[serde(default)]
    pub rel: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub required_params: Option<Vec<LinkParameter>>,
    #[serde(default)]
    pub optional_params: Option<Vec<LinkParameter>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!(" DELETE ".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!("PATCH".parse::<HttpMethod>().is_err());
    }

    #[test]
    fn test_from_raw_rejects_missing_href() {
        let raw = RawLink {
            rel: None,
            method: Some("GET".into()),
            href: Some("  ".into()),
            required_params: None,
            optional_params: None,
        };
        let err = LinkDescriptor::from_raw("GET", raw).unwrap_err();
        assert!(matches!(err, ClientError::MalformedLink { ref reason, .. } if reason == "missing href"));
    }

    #[test]
    fn test_builder_params() {
        let link = LinkDescriptor::new("ADD_ALIAS", HttpMethod::Post, "https://h/aliases")
            .with_required("id")
            .with_optional("ssl_certificate");
        assert_eq!(link.required_names().into_iter().collect::<Vec<_>>(), vec!["id"]);
        assert!(link.optional_names().contains("ssl_certificate"));
        assert!(link.method().has_body());
    }
}
