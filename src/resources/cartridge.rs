//! Cartridges embedded into an application (databases, cron, ...).

use serde::Deserialize;
use serde_json::Value;

use super::{decode, links_of};
use crate::collection::Identified;
use crate::errors::ClientError;
use crate::links::LinkMap;
use crate::negotiator::Negotiator;

#[derive(Debug, Deserialize)]
struct CartridgePayload {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type", default)]
    cartridge_type: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// An embedded cartridge. Keyed by cartridge name (`mysql-5.1`).
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedCartridge {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    cartridge_type: Option<String>,
    url: Option<String>,
    links: LinkMap,
}

impl EmbeddedCartridge {
    pub(crate) fn from_payload(data: &Value) -> Result<Self, ClientError> {
        let payload: CartridgePayload = decode(Self::KIND, data)?;
        let links = links_of(data, format!("cartridge '{}'", payload.name))?;
        Ok(Self {
            name: payload.name,
            display_name: payload.display_name,
            description: payload.description,
            cartridge_type: payload.cartridge_type,
            url: payload.url,
            links,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable name, falling back to the cartridge name.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// `standalone` or `embedded`.
    pub fn cartridge_type(&self) -> Option<&str> {
        self.cartridge_type.as_deref()
    }

    /// Download URL for cartridges not installed from the catalog.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }
}

impl Identified for EmbeddedCartridge {
    const KIND: &'static str = "cartridge";

    fn identity(&self) -> &str {
        &self.name
    }

    fn absorb(&mut self, fresh: Self) {
        self.display_name = fresh.display_name;
        self.description = fresh.description;
        self.cartridge_type = fresh.cartridge_type;
        self.url = fresh.url;
        self.links = fresh.links;
    }
}

impl Negotiator for EmbeddedCartridge {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}
