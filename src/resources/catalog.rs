//! The broker's cartridge catalogue, listed from the API root.

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

use super::decode;
use crate::collection::Identified;
use crate::errors::ClientError;

/// Whether a cartridge can create an application or only be embedded into
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartridgeType {
    Standalone,
    Embedded,
}

impl fmt::Display for CartridgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standalone => write!(f, "standalone"),
            Self::Embedded => write!(f, "embedded"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogPayload {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "type")]
    cartridge_type: CartridgeType,
}

/// A cartridge offered by the broker. Keyed by name (`jbosseap-6`).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCartridge {
    name: String,
    display_name: Option<String>,
    description: Option<String>,
    cartridge_type: CartridgeType,
}

impl CatalogCartridge {
    pub(crate) fn from_payload(data: &Value) -> Result<Self, ClientError> {
        let payload: CatalogPayload = decode(Self::KIND, data)?;
        Ok(Self {
            name: payload.name,
            display_name: payload.display_name,
            description: payload.description,
            cartridge_type: payload.cartridge_type,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn cartridge_type(&self) -> CartridgeType {
        self.cartridge_type
    }

    pub fn is_standalone(&self) -> bool {
        self.cartridge_type == CartridgeType::Standalone
    }
}

impl Identified for CatalogCartridge {
    const KIND: &'static str = "catalog cartridge";

    fn identity(&self) -> &str {
        &self.name
    }

    fn absorb(&mut self, fresh: Self) {
        self.display_name = fresh.display_name;
        self.description = fresh.description;
        self.cartridge_type = fresh.cartridge_type;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parses_type() {
        let cart = CatalogCartridge::from_payload(&json!({
            "name": "mysql-5.1",
            "display_name": "MySQL 5.1",
            "type": "embedded"
        }))
        .unwrap();
        assert_eq!(cart.cartridge_type(), CartridgeType::Embedded);
        assert!(!cart.is_standalone());
        assert_eq!(cart.display_name(), "MySQL 5.1");
    }

    #[test]
    fn test_unknown_type_is_malformed() {
        let err = CatalogCartridge::from_payload(&json!({"name": "x", "type": "plugin"})).unwrap_err();
        assert!(matches!(err, ClientError::MalformedPayload { kind: "catalog cartridge", .. }));
    }
}
