//! Per-application capability registry.
//!
//! Built once from a snapshot of the application's link map. The registry
//! does not follow later refreshes; rebuild it to pick up changes.

use std::collections::BTreeMap;

use super::capability::{Capability, CapabilityKind, CapabilityType};
use crate::collection::Handle;
use crate::resources::ApplicationResource;

/// Applicable capabilities of one application, keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct CapabilityRegistry {
    capabilities: BTreeMap<CapabilityKind, Capability>,
}

impl CapabilityRegistry {
    /// Evaluate every known kind's predicate exactly once and keep the
    /// applicable ones.
    pub fn evaluate(application: &Handle<ApplicationResource>) -> Self {
        let kinds: Vec<CapabilityKind> = {
            let app = application.read();
            CapabilityKind::ALL
                .into_iter()
                .filter(|kind| kind.applies_to(&*app))
                .collect()
        };

        let capabilities: BTreeMap<_, _> = kinds
            .into_iter()
            .map(|kind| (kind, Capability::bind(kind, application)))
            .collect();
        log::debug!(
            "application '{}' supports {:?}",
            application.read().name(),
            capabilities.keys().collect::<Vec<_>>()
        );
        Self { capabilities }
    }

    /// Typed lookup. An absent kind is `None`, never an error.
    pub fn get<C: CapabilityType>(&self) -> Option<&C> {
        self.capabilities
            .get(&C::KIND)
            .and_then(C::from_capability)
    }

    pub fn capability(&self, kind: CapabilityKind) -> Option<&Capability> {
        self.capabilities.get(&kind)
    }

    pub fn supports(&self, kind: CapabilityKind) -> bool {
        self.capabilities.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = CapabilityKind> + '_ {
        self.capabilities.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Capability> {
        self.capabilities.values()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}
