//! Gear groups: the gears an application runs on, grouped by cartridge.

use serde::Deserialize;
use serde_json::Value;

use super::decode;
use crate::collection::Identified;
use crate::errors::ClientError;

/// One gear of a group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Gear {
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub ssh_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CartridgeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GearGroupPayload {
    #[serde(alias = "id")]
    uuid: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    gears: Vec<Gear>,
    #[serde(default)]
    cartridges: Vec<CartridgeRef>,
}

/// Read-only view of a gear group. Keyed by uuid.
#[derive(Debug, Clone, PartialEq)]
pub struct GearGroup {
    uuid: String,
    name: String,
    gears: Vec<Gear>,
    cartridges: Vec<String>,
}

impl GearGroup {
    pub(crate) fn from_payload(data: &Value) -> Result<Self, ClientError> {
        let payload: GearGroupPayload = decode(Self::KIND, data)?;
        Ok(Self {
            name: payload.name.unwrap_or_else(|| payload.uuid.clone()),
            uuid: payload.uuid,
            gears: payload.gears,
            cartridges: payload.cartridges.into_iter().map(|c| c.name).collect(),
        })
    }

    pub fn uuid(&self) -> &str {
        &self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gears(&self) -> &[Gear] {
        &self.gears
    }

    /// Names of the cartridges deployed on this group.
    pub fn cartridges(&self) -> &[String] {
        &self.cartridges
    }
}

impl Identified for GearGroup {
    const KIND: &'static str = "gear group";

    fn identity(&self) -> &str {
        &self.uuid
    }

    fn absorb(&mut self, fresh: Self) {
        self.name = fresh.name;
        self.gears = fresh.gears;
        self.cartridges = fresh.cartridges;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::fixtures;

    #[test]
    fn test_from_payload() {
        let group = GearGroup::from_payload(&fixtures::gear_group("514207")).unwrap();
        assert_eq!(group.uuid(), "514207");
        assert_eq!(group.gears().len(), 1);
        assert_eq!(group.gears()[0].state.as_deref(), Some("started"));
        assert_eq!(group.cartridges(), ["jbosseap-6", "mysql-5.1"]);
    }
}
