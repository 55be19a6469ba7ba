//! Custom DNS aliases of an application.

use serde::Deserialize;
use serde_json::Value;

use super::{decode, links_of};
use crate::collection::Identified;
use crate::errors::ClientError;
use crate::links::LinkMap;
use crate::negotiator::Negotiator;

#[derive(Debug, Deserialize)]
struct AliasPayload {
    id: String,
    #[serde(default)]
    has_private_ssl_certificate: bool,
    #[serde(default)]
    certificate_added_at: Option<String>,
}

/// A host name routed to an application. Keyed by the host name.
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    name: String,
    has_private_ssl_certificate: bool,
    certificate_added_at: Option<String>,
    links: LinkMap,
}

impl Alias {
    pub(crate) fn from_payload(data: &Value) -> Result<Self, ClientError> {
        let payload: AliasPayload = decode(Self::KIND, data)?;
        let links = links_of(data, format!("alias '{}'", payload.id))?;
        Ok(Self {
            name: payload.id,
            has_private_ssl_certificate: payload.has_private_ssl_certificate,
            certificate_added_at: payload.certificate_added_at,
            links,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_private_ssl_certificate(&self) -> bool {
        self.has_private_ssl_certificate
    }

    pub fn certificate_added_at(&self) -> Option<&str> {
        self.certificate_added_at.as_deref()
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }
}

impl Identified for Alias {
    const KIND: &'static str = "alias";

    fn identity(&self) -> &str {
        &self.name
    }

    fn absorb(&mut self, fresh: Self) {
        self.has_private_ssl_certificate = fresh.has_private_ssl_certificate;
        self.certificate_added_at = fresh.certificate_added_at;
        self.links = fresh.links;
    }
}

impl Negotiator for Alias {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}
