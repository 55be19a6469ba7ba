//! # Remote resources
//!
//! Typed client-side models of the broker's resources:
//!
//! ```text
//! Connection (API root)
//!   ├── CatalogCartridge          (LIST_CARTRIDGES)
//!   └── DomainResource            (LIST_DOMAINS)
//!         └── ApplicationResource (LIST_APPLICATIONS)
//!               ├── EmbeddedCartridge   (LIST_CARTRIDGES)
//!               ├── EnvironmentVariable (LIST_ENVIRONMENT_VARIABLES)
//!               ├── Alias               (LIST_ALIASES)
//!               └── GearGroup           (GET_GEAR_GROUPS)
//! ```
//!
//! Every resource owns the [`LinkMap`] it was parsed with and consults it
//! before issuing any request. Child collections are lazily loaded through a
//! [`CollectionCache`](crate::cache::CollectionCache) and reconciled on
//! refresh so caller-held handles stay valid.

pub mod alias;
pub mod application;
pub mod cartridge;
pub mod catalog;
pub mod connection;
pub mod domain;
pub mod environment;
pub mod gear;

#[cfg(test)]
pub(crate) mod fixtures;

pub use alias::Alias;
pub use application::{ApplicationInfo, ApplicationResource, ApplicationScale, LifecycleEvent};
pub use cartridge::EmbeddedCartridge;
pub use catalog::{CartridgeType, CatalogCartridge};
pub use connection::Connection;
pub use domain::DomainResource;
pub use environment::EnvironmentVariable;
pub use gear::{Gear, GearGroup};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::CollectionCache;
use crate::collection::{Handle, Identified, ResourceCollection};
use crate::errors::ClientError;
use crate::links::{ops, LinkMap, Params, RequestDescriptor};
use crate::negotiator::Negotiator;
use crate::transport::Transport;

/// Issue one request and return the envelope's `data`.
pub(crate) fn execute(transport: &dyn Transport, request: RequestDescriptor) -> Result<Value, ClientError> {
    log::debug!("{} {} ({})", request.method, request.url, request.operation);
    let response = transport.execute(&request)?;
    Ok(response.data)
}

/// Deserialize the attribute part of a payload.
pub(crate) fn decode<D: DeserializeOwned>(kind: &'static str, data: &Value) -> Result<D, ClientError> {
    D::deserialize(data).map_err(|e| ClientError::malformed_payload(kind, e.to_string()))
}

/// The payload's `links` object, labelled with its owner.
pub(crate) fn links_of(data: &Value, owner: String) -> Result<LinkMap, ClientError> {
    let raw = data.get("links").unwrap_or(&Value::Null);
    Ok(LinkMap::parse(raw)?.owned_by(owner))
}

/// Parse a listing. `null` is an empty listing.
pub(crate) fn parse_list<T>(
    kind: &'static str,
    data: Value,
    parse: impl Fn(&Value) -> Result<T, ClientError>,
) -> Result<Vec<T>, ClientError> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items.iter().map(parse).collect(),
        _ => Err(ClientError::malformed_payload(kind, "expected a list")),
    }
}

/// Load a child collection through its cache, fetching over `transport`.
pub(crate) fn load_collection<'a, T: Identified>(
    cache: &'a mut CollectionCache<T>,
    links: &LinkMap,
    transport: &dyn Transport,
    parse: impl Fn(&Value) -> Result<T, ClientError>,
) -> Result<&'a ResourceCollection<T>, ClientError> {
    cache.load(links, |request| {
        let data = execute(transport, request)?;
        parse_list(T::KIND, data, &parse)
    })
}

/// Delete a child through its own `DELETE` link, then drop it from the live
/// collection. A failed delete leaves the collection unchanged.
pub(crate) fn destroy_child<T>(
    transport: &dyn Transport,
    cache: &mut CollectionCache<T>,
    key: &str,
    handle: &Handle<T>,
) -> Result<(), ClientError>
where
    T: Identified + Negotiator,
{
    let request = handle.read().link_map().resolve(ops::DELETE, Params::new())?;
    execute(transport, request)?;
    cache.remove(key);
    Ok(())
}
