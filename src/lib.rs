//! # OpenShift Client
//!
//! A hypermedia-driven client model for the OpenShift PaaS control-plane
//! REST API.
//!
//! Every resource the broker returns carries a map of named operations
//! (links). The client never builds URLs itself: each action looks its
//! operation up in the resource's link map first, and an operation the
//! server did not advertise fails locally without a network round trip.
//!
//! ```text
//! Connection ── domains ──> DomainResource ── applications ──> ApplicationResource
//!                                                                ├── environment variables
//!                                                                ├── embedded cartridges
//!                                                                ├── aliases
//!                                                                └── gear groups
//! ```
//!
//! On top of the resource tree sit typed [`capabilities`], generic
//! [`adapters`] (service / project views) and an availability [`poller`]
//! for freshly created applications.

pub mod adapters;
pub mod cache;
pub mod capabilities;
pub mod collection;
pub mod config;
pub mod errors;
pub mod links;
pub mod negotiator;
pub mod poller;
pub mod resources;
pub mod transport;

pub use adapters::{adapt, Capable, ConnectionAdapter, Project, Service};
pub use cache::CollectionCache;
pub use capabilities::{Capability, CapabilityKind, CapabilityRegistry, CapabilityType};
pub use collection::{Handle, Identified, ResourceCollection, WeakHandle};
pub use config::ClientConfig;
pub use errors::{ClientError, TransportError};
pub use links::{HttpMethod, LinkDescriptor, LinkMap, RequestDescriptor};
pub use negotiator::{ApplicationNegotiator, ConnectionNegotiator, DomainNegotiator, Negotiator};
pub use poller::{AccessibilityHandle, AvailabilityPoller, CancelToken, PollOutcome, PollReport};
pub use resources::{
    ApplicationResource, ApplicationScale, CartridgeType, CatalogCartridge, Connection,
    DomainResource, EnvironmentVariable, LifecycleEvent,
};
pub use transport::http::HttpTransport;
pub use transport::Transport;
