//! # Adapters
//!
//! Generic views over the resource tree for UI and automation callers that
//! only care about what a thing can do, not what it is.
//!
//! ```text
//! ConnectionAdapter      (wraps a Connection)
//!   └── Project          (wraps a DomainResource)
//!         └── Service    (wraps an ApplicationResource)
//!               └── CapabilityRegistry
//! ```
//!
//! Projects and services are built lazily on first access and cached;
//! `refresh` on an adapter drops its cached children so they are rebuilt
//! from the refreshed resources.

pub mod connection;
pub mod project;
pub mod service;

pub use connection::ConnectionAdapter;
pub use project::Project;
pub use service::{adapt, Service};

use crate::capabilities::{CapabilityKind, CapabilityRegistry, CapabilityType};

/// Anything that exposes a capability set.
pub trait Capable {
    fn capabilities(&self) -> &CapabilityRegistry;

    fn supports(&self, kind: CapabilityKind) -> bool {
        self.capabilities().supports(kind)
    }

    /// Typed capability lookup; `None` when the kind is not applicable.
    fn get<C: CapabilityType>(&self) -> Option<&C>
    where
        Self: Sized,
    {
        self.capabilities().get::<C>()
    }
}
