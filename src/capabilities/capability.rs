//! Capability kinds and the typed capability objects.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collection::{Handle, WeakHandle};
use crate::errors::ClientError;
use crate::negotiator::{ApplicationNegotiator, Negotiator};
use crate::resources::{Alias, ApplicationResource, EmbeddedCartridge, EnvironmentVariable, LifecycleEvent};

/// The closed set of capabilities the client knows how to drive.
///
/// The server decides which of them are available for a given application;
/// it cannot introduce new kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CapabilityKind {
    EnvironmentVariables,
    EmbeddedCartridges,
    Aliases,
    Lifecycle,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 4] = [
        Self::EnvironmentVariables,
        Self::EmbeddedCartridges,
        Self::Aliases,
        Self::Lifecycle,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::EnvironmentVariables => "environment-variables",
            Self::EmbeddedCartridges => "embedded-cartridges",
            Self::Aliases => "aliases",
            Self::Lifecycle => "lifecycle",
        }
    }

    /// Applicability predicate, evaluated against the resource's links.
    pub fn applies_to<N: ApplicationNegotiator + ?Sized>(&self, resource: &N) -> bool {
        match self {
            Self::EnvironmentVariables => resource.can_get_environment_variables(),
            Self::EmbeddedCartridges => resource.can_list_cartridges(),
            Self::Aliases => resource.can_list_aliases(),
            Self::Lifecycle => resource.can_start() || resource.can_stop() || resource.can_restart(),
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Back-reference shared by every typed capability. Never keeps the
/// application alive.
#[derive(Debug, Clone)]
struct Backref {
    application: WeakHandle<ApplicationResource>,
    kind: CapabilityKind,
}

impl Backref {
    fn new(application: &Handle<ApplicationResource>, kind: CapabilityKind) -> Self {
        Self {
            application: application.downgrade(),
            kind,
        }
    }

    fn upgrade(&self) -> Result<Handle<ApplicationResource>, ClientError> {
        self.application
            .upgrade()
            .ok_or_else(|| ClientError::Detached(self.kind.to_string()))
    }

    /// Predicate on the live application; a detached capability permits nothing.
    fn check(&self, predicate: impl FnOnce(&ApplicationResource) -> bool) -> bool {
        self.application
            .upgrade()
            .map(|app| {
                let app = app.read();
                predicate(&app)
            })
            .unwrap_or(false)
    }
}

/// Manage an application's environment variables.
#[derive(Debug, Clone)]
pub struct EnvironmentVariableCapability(Backref);

impl EnvironmentVariableCapability {
    pub fn can_get(&self) -> bool {
        self.0.check(|app| app.can_get_environment_variables())
    }

    pub fn can_update(&self) -> bool {
        self.0.check(|app| app.can_update_environment_variables())
    }

    pub fn variables(&self) -> Result<BTreeMap<String, String>, ClientError> {
        self.0.upgrade()?.write().environment_variables_map()
    }

    pub fn value(&self, name: &str) -> Result<Option<String>, ClientError> {
        self.0.upgrade()?.write().environment_variable_value(name)
    }

    pub fn add(&self, name: &str, value: &str) -> Result<Handle<EnvironmentVariable>, ClientError> {
        self.0.upgrade()?.write().add_environment_variable(name, value)
    }

    pub fn update(&self, name: &str, value: &str) -> Result<Handle<EnvironmentVariable>, ClientError> {
        self.0.upgrade()?.write().update_environment_variable(name, value)
    }

    pub fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.0.upgrade()?.write().remove_environment_variable(name)
    }
}

/// Embed and remove cartridges.
#[derive(Debug, Clone)]
pub struct CartridgeCapability(Backref);

impl CartridgeCapability {
    pub fn can_add(&self) -> bool {
        self.0.check(|app| app.can_add_cartridge())
    }

    pub fn names(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.0.upgrade()?.write().embedded_cartridges()?.keys())
    }

    pub fn has(&self, name: &str) -> Result<bool, ClientError> {
        self.0.upgrade()?.write().has_embedded_cartridge(name)
    }

    pub fn add(&self, name: &str) -> Result<Handle<EmbeddedCartridge>, ClientError> {
        self.0.upgrade()?.write().add_embeddable_cartridge(name)
    }

    pub fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.0.upgrade()?.write().remove_embedded_cartridge(name)
    }
}

/// Custom host names.
#[derive(Debug, Clone)]
pub struct AliasCapability(Backref);

impl AliasCapability {
    pub fn can_add(&self) -> bool {
        self.0.check(|app| app.can_add_alias())
    }

    pub fn names(&self) -> Result<Vec<String>, ClientError> {
        Ok(self.0.upgrade()?.write().aliases()?.keys())
    }

    pub fn has(&self, name: &str) -> Result<bool, ClientError> {
        self.0.upgrade()?.write().has_alias(name)
    }

    pub fn add(&self, name: &str) -> Result<Handle<Alias>, ClientError> {
        self.0.upgrade()?.write().add_alias(name)
    }

    pub fn remove(&self, name: &str) -> Result<(), ClientError> {
        self.0.upgrade()?.write().remove_alias(name)
    }
}

/// Start, stop, restart and scale.
#[derive(Debug, Clone)]
pub struct LifecycleCapability(Backref);

impl LifecycleCapability {
    /// Whether the application currently advertises `event`.
    pub fn can(&self, event: LifecycleEvent) -> bool {
        self.0.check(|app| app.can(event.operation()))
    }

    pub fn trigger(&self, event: LifecycleEvent) -> Result<(), ClientError> {
        self.0.upgrade()?.write().trigger(event)
    }

    pub fn start(&self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::Start)
    }

    pub fn stop(&self, force: bool) -> Result<(), ClientError> {
        self.0.upgrade()?.write().stop(force)
    }

    pub fn restart(&self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::Restart)
    }

    pub fn scale_up(&self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::ScaleUp)
    }

    pub fn scale_down(&self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::ScaleDown)
    }
}

/// One capability of a service, tagged by kind.
#[derive(Debug, Clone)]
pub enum Capability {
    EnvironmentVariables(EnvironmentVariableCapability),
    EmbeddedCartridges(CartridgeCapability),
    Aliases(AliasCapability),
    Lifecycle(LifecycleCapability),
}

impl Capability {
    pub(crate) fn bind(kind: CapabilityKind, application: &Handle<ApplicationResource>) -> Self {
        let backref = Backref::new(application, kind);
        match kind {
            CapabilityKind::EnvironmentVariables => {
                Self::EnvironmentVariables(EnvironmentVariableCapability(backref))
            }
            CapabilityKind::EmbeddedCartridges => Self::EmbeddedCartridges(CartridgeCapability(backref)),
            CapabilityKind::Aliases => Self::Aliases(AliasCapability(backref)),
            CapabilityKind::Lifecycle => Self::Lifecycle(LifecycleCapability(backref)),
        }
    }

    pub fn kind(&self) -> CapabilityKind {
        match self {
            Self::EnvironmentVariables(_) => CapabilityKind::EnvironmentVariables,
            Self::EmbeddedCartridges(_) => CapabilityKind::EmbeddedCartridges,
            Self::Aliases(_) => CapabilityKind::Aliases,
            Self::Lifecycle(_) => CapabilityKind::Lifecycle,
        }
    }

    /// Whether the application behind this capability still exists.
    pub fn is_attached(&self) -> bool {
        let backref = match self {
            Self::EnvironmentVariables(c) => &c.0,
            Self::EmbeddedCartridges(c) => &c.0,
            Self::Aliases(c) => &c.0,
            Self::Lifecycle(c) => &c.0,
        };
        backref.application.upgrade().is_some()
    }
}

/// Typed lookup of a capability variant.
pub trait CapabilityType {
    const KIND: CapabilityKind;

    fn from_capability(capability: &Capability) -> Option<&Self>;
}

macro_rules! capability_type {
    ($ty:ty, $variant:ident) => {
        impl CapabilityType for $ty {
            const KIND: CapabilityKind = CapabilityKind::$variant;

            fn from_capability(capability: &Capability) -> Option<&Self> {
                match capability {
                    Capability::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

capability_type!(EnvironmentVariableCapability, EnvironmentVariables);
capability_type!(CartridgeCapability, EmbeddedCartridges);
capability_type!(AliasCapability, Aliases);
capability_type!(LifecycleCapability, Lifecycle);
