//! # Capabilities
//!
//! Typed, cross-cutting features of an application whose availability is
//! derived from its link map.
//!
//! ## Resolution flow
//!
//! 1. `CapabilityRegistry::evaluate(&app)` runs each [`CapabilityKind`]'s
//!    predicate once against the application's current links
//! 2. Applicable kinds are bound to a typed capability holding a weak
//!    back-reference to the application
//! 3. Callers look capabilities up by type with `registry.get::<C>()`; an
//!    absent capability is `None`, e.g. to hide a menu entry
//! 4. Each call on a capability upgrades the back-reference and forwards to
//!    the application, which still checks its links before any request

pub mod capability;
pub mod registry;

pub use capability::{
    AliasCapability, Capability, CapabilityKind, CapabilityType, CartridgeCapability,
    EnvironmentVariableCapability, LifecycleCapability,
};
pub use registry::CapabilityRegistry;
