//! The per-resource link map and its resolution into requests.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use super::link::{LinkDescriptor, RawLink};
use super::request::{Params, RequestDescriptor};
use crate::errors::ClientError;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_\-]*)\}").expect("placeholder regex is valid"));

/// Operation name → descriptor, as advertised for one resource.
///
/// The only source of truth for which operations a resource permits.
/// Owned by exactly one resource and replaced wholesale on refresh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkMap {
    owner: String,
    links: BTreeMap<String, LinkDescriptor>,
}

impl LinkMap {
    /// Parse the `links` object of a payload.
    ///
    /// `null` (or an absent links key) yields an empty map. Any descriptor
    /// without a usable method or href fails the whole parse.
    pub fn parse(raw: &Value) -> Result<Self, ClientError> {
        let object = match raw {
            Value::Null => return Ok(Self::default()),
            Value::Object(object) => object,
            other => {
                return Err(ClientError::MalformedLink {
                    operation: "<links>".to_string(),
                    reason: format!("expected an object, got {}", json_kind(other)),
                })
            }
        };

        let mut links = BTreeMap::new();
        for (operation, value) in object {
            if !value.is_object() {
                return Err(ClientError::MalformedLink {
                    operation: operation.clone(),
                    reason: format!("expected an object, got {}", json_kind(value)),
                });
            }
            let raw: RawLink =
                serde_json::from_value(value.clone()).map_err(|e| ClientError::MalformedLink {
                    operation: operation.clone(),
                    reason: e.to_string(),
                })?;
            links.insert(operation.clone(), LinkDescriptor::from_raw(operation, raw)?);
        }

        Ok(Self {
            owner: String::new(),
            links,
        })
    }

    /// Build a map from already-validated descriptors.
    pub fn from_links(links: impl IntoIterator<Item = LinkDescriptor>) -> Self {
        Self {
            owner: String::new(),
            links: links
                .into_iter()
                .map(|l| (l.operation().to_string(), l))
                .collect(),
        }
    }

    /// Label used in error messages (e.g. "application 'springeap6'").
    pub fn owned_by(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn owner(&self) -> &str {
        if self.owner.is_empty() {
            "resource"
        } else {
            &self.owner
        }
    }

    pub fn has(&self, operation: &str) -> bool {
        self.links.contains_key(operation)
    }

    pub fn get(&self, operation: &str) -> Option<&LinkDescriptor> {
        self.links.get(operation)
    }

    /// Advertised operation names, sorted.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.links.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Turn an advertised operation into a concrete request.
    ///
    /// Fails with `UnsupportedOperation` if the operation is not advertised
    /// and with `MissingParameter` if a required parameter (or an href
    /// placeholder) has no value. Parameters that fill a placeholder are
    /// consumed; everything else, declared or not, is passed through.
    pub fn resolve(&self, operation: &str, params: Params) -> Result<RequestDescriptor, ClientError> {
        let link = self
            .links
            .get(operation)
            .ok_or_else(|| ClientError::unsupported(self.owner(), operation))?;

        if let Some(missing) = link
            .required_params()
            .iter()
            .find(|p| !params.contains(&p.name))
        {
            return Err(ClientError::MissingParameter {
                operation: operation.to_string(),
                parameter: missing.name.clone(),
            });
        }

        let mut params = params.into_inner();
        let mut url = String::with_capacity(link.href().len());
        let mut last = 0;
        for caps in PLACEHOLDER.captures_iter(link.href()) {
            let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
            let name = &caps[1];
            let value = params.remove(name).ok_or_else(|| ClientError::MissingParameter {
                operation: operation.to_string(),
                parameter: name.to_string(),
            })?;
            url.push_str(&link.href()[last..whole.start]);
            match value {
                Value::String(s) => url.push_str(&s),
                other => url.push_str(&other.to_string()),
            }
            last = whole.end;
        }
        url.push_str(&link.href()[last..]);

        Ok(RequestDescriptor {
            operation: operation.to_string(),
            method: link.method(),
            url,
            params,
        })
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
