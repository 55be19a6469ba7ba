//! Application environment variables.

use serde::Deserialize;
use serde_json::Value;

use super::{decode, links_of};
use crate::collection::Identified;
use crate::errors::ClientError;
use crate::links::LinkMap;
use crate::negotiator::Negotiator;

#[derive(Debug, Deserialize)]
struct EnvironmentVariablePayload {
    name: String,
    #[serde(default)]
    value: String,
}

/// A `name=value` pair set on an application. Keyed by name.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentVariable {
    name: String,
    value: String,
    links: LinkMap,
}

impl EnvironmentVariable {
    pub(crate) fn from_payload(data: &Value) -> Result<Self, ClientError> {
        let payload: EnvironmentVariablePayload = decode(Self::KIND, data)?;
        let links = links_of(data, format!("environment variable '{}'", payload.name))?;
        Ok(Self {
            name: payload.name,
            value: payload.value,
            links,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    pub(crate) fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }
}

impl Identified for EnvironmentVariable {
    const KIND: &'static str = "environment variable";

    fn identity(&self) -> &str {
        &self.name
    }

    fn absorb(&mut self, fresh: Self) {
        self.value = fresh.value;
        self.links = fresh.links;
    }
}

impl Negotiator for EnvironmentVariable {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}
