//! Entry point: the broker's API root.

use std::sync::Arc;

use super::{execute, load_collection, CartridgeType, CatalogCartridge, DomainResource};
use crate::cache::CollectionCache;
use crate::collection::{Handle, Identified, ResourceCollection};
use crate::errors::ClientError;
use crate::links::{ops, LinkMap, Params, RequestDescriptor};
use crate::negotiator::{ConnectionNegotiator, Negotiator};
use crate::transport::Transport;

/// An authenticated session against one broker.
///
/// Holds the API root's link map, the user's domains and the broker's
/// cartridge catalogue.
#[derive(Debug)]
pub struct Connection {
    transport: Arc<dyn Transport>,
    links: LinkMap,
    domains: CollectionCache<DomainResource>,
    catalog: CollectionCache<CatalogCartridge>,
}

impl Connection {
    /// Fetch the API root and its links.
    pub fn connect(transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let links = Self::fetch_root(transport.as_ref())?;
        log::debug!(
            "connected to {} ({} root operations)",
            transport.server_url(),
            links.len()
        );
        Ok(Self {
            transport,
            links,
            domains: CollectionCache::new(ops::LIST_DOMAINS),
            catalog: CollectionCache::new(ops::LIST_CARTRIDGES),
        })
    }

    // The API root's `data` is the link map itself.
    fn fetch_root(transport: &dyn Transport) -> Result<LinkMap, ClientError> {
        let data = execute(transport, RequestDescriptor::get(transport.api_url()))?;
        Ok(LinkMap::parse(&data)?.owned_by("API root"))
    }

    pub fn server_url(&self) -> &str {
        self.transport.server_url()
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Re-fetch the API root. Domain handles survive; the listing is
    /// reloaded on next access.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        self.links = Self::fetch_root(self.transport.as_ref())?;
        self.domains.invalidate();
        self.catalog.invalidate();
        Ok(())
    }

    pub fn domains(&mut self) -> Result<&ResourceCollection<DomainResource>, ClientError> {
        let transport = &self.transport;
        load_collection(
            &mut self.domains,
            &self.links,
            transport.as_ref(),
            |item| DomainResource::from_payload(item, Arc::clone(transport)),
        )
    }

    pub fn domain(&mut self, id: &str) -> Result<Option<Handle<DomainResource>>, ClientError> {
        Ok(self.domains()?.get(id))
    }

    pub fn has_domain(&mut self, id: &str) -> Result<bool, ClientError> {
        Ok(self.domains()?.contains(id))
    }

    /// First domain of the user, if any.
    pub fn default_domain(&mut self) -> Result<Option<Handle<DomainResource>>, ClientError> {
        Ok(self.domains()?.iter().next().cloned())
    }

    pub fn create_domain(&mut self, id: &str) -> Result<Handle<DomainResource>, ClientError> {
        let request = self.links.resolve(ops::ADD_DOMAIN, Params::new().with("id", id))?;
        if self.has_domain(id)? {
            return Err(ClientError::duplicate(DomainResource::KIND, id));
        }
        let data = execute(self.transport.as_ref(), request)?;
        let domain = DomainResource::from_payload(&data, Arc::clone(&self.transport))?;
        self.domains.insert(domain)
    }

    /// Every cartridge the broker offers. Empty if the root does not
    /// advertise a catalogue.
    pub fn cartridges(&mut self) -> Result<&ResourceCollection<CatalogCartridge>, ClientError> {
        load_collection(
            &mut self.catalog,
            &self.links,
            self.transport.as_ref(),
            CatalogCartridge::from_payload,
        )
    }

    /// Cartridges an application can be created with.
    pub fn standalone_cartridges(&mut self) -> Result<Vec<Handle<CatalogCartridge>>, ClientError> {
        self.catalog_of(CartridgeType::Standalone)
    }

    /// Cartridges that can be embedded into an existing application.
    pub fn embeddable_cartridges(&mut self) -> Result<Vec<Handle<CatalogCartridge>>, ClientError> {
        self.catalog_of(CartridgeType::Embedded)
    }

    fn catalog_of(&mut self, cartridge_type: CartridgeType) -> Result<Vec<Handle<CatalogCartridge>>, ClientError> {
        Ok(self
            .cartridges()?
            .iter()
            .filter(|cart| cart.read().cartridge_type() == cartridge_type)
            .cloned()
            .collect())
    }
}

impl Negotiator for Connection {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}

impl ConnectionNegotiator for Connection {}
