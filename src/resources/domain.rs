//! Domains (namespaces) and the applications they contain.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{decode, destroy_child, execute, links_of, load_collection, ApplicationResource, ApplicationScale};
use crate::cache::CollectionCache;
use crate::collection::{Handle, Identified, ResourceCollection};
use crate::errors::ClientError;
use crate::links::{ops, LinkMap, Params};
use crate::negotiator::{DomainNegotiator, Negotiator};
use crate::transport::Transport;

#[derive(Debug, Deserialize)]
struct DomainPayload {
    #[serde(alias = "namespace")]
    id: String,
    #[serde(default)]
    suffix: Option<String>,
}

/// A domain owned by the connected user. Keyed by its id.
#[derive(Debug)]
pub struct DomainResource {
    id: String,
    suffix: Option<String>,
    links: LinkMap,
    transport: Arc<dyn Transport>,
    applications: CollectionCache<ApplicationResource>,
}

impl DomainResource {
    pub(crate) fn from_payload(data: &Value, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let (payload, links) = Self::parse(data)?;
        Ok(Self {
            id: payload.id,
            suffix: payload.suffix,
            links,
            transport,
            applications: CollectionCache::new(ops::LIST_APPLICATIONS),
        })
    }

    fn parse(data: &Value) -> Result<(DomainPayload, LinkMap), ClientError> {
        let payload: DomainPayload = decode(Self::KIND, data)?;
        let links = links_of(data, format!("domain '{}'", payload.id))?;
        Ok((payload, links))
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// DNS suffix appended to application host names.
    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Re-fetch the domain. Application handles survive; the listing is
    /// reloaded on next access.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        let request = self.links.resolve(ops::GET, Params::new())?;
        let data = execute(self.transport.as_ref(), request)?;
        let (payload, links) = Self::parse(&data)?;
        self.suffix = payload.suffix;
        self.links = links;
        self.applications.invalidate();
        Ok(())
    }

    pub fn applications(&mut self) -> Result<&ResourceCollection<ApplicationResource>, ClientError> {
        let transport = &self.transport;
        load_collection(
            &mut self.applications,
            &self.links,
            transport.as_ref(),
            |item| ApplicationResource::from_payload(item, Arc::clone(transport)),
        )
    }

    pub fn application(&mut self, name: &str) -> Result<Option<Handle<ApplicationResource>>, ClientError> {
        Ok(self.applications()?.get(name))
    }

    pub fn has_application(&mut self, name: &str) -> Result<bool, ClientError> {
        Ok(self.applications()?.contains(name))
    }

    /// Create an application from a standalone cartridge.
    pub fn create_application(
        &mut self,
        name: &str,
        cartridge: &str,
        scale: ApplicationScale,
        gear_profile: Option<&str>,
    ) -> Result<Handle<ApplicationResource>, ClientError> {
        let mut params = Params::new()
            .with("name", name)
            .with("cartridge", cartridge)
            .with("scale", scale.is_scalable());
        if let Some(profile) = gear_profile {
            params.insert("gear_profile", profile);
        }
        let request = self.links.resolve(ops::ADD_APPLICATION, params)?;
        if self.has_application(name)? {
            return Err(ClientError::duplicate(ApplicationResource::KIND, name));
        }

        let data = execute(self.transport.as_ref(), request)?;
        let application = ApplicationResource::from_payload(&data, Arc::clone(&self.transport))?;
        log::debug!("created application '{}' in domain '{}'", application.name(), self.id);
        self.applications.insert(application)
    }

    /// Destroy an application through its own `DELETE` link.
    pub fn destroy_application(&mut self, name: &str) -> Result<(), ClientError> {
        let handle = self
            .application(name)?
            .ok_or_else(|| ClientError::not_found(ApplicationResource::KIND, name))?;
        destroy_child(self.transport.as_ref(), &mut self.applications, name, &handle)
    }
}

impl Identified for DomainResource {
    const KIND: &'static str = "domain";

    fn identity(&self) -> &str {
        &self.id
    }

    fn absorb(&mut self, fresh: Self) {
        self.suffix = fresh.suffix;
        self.links = fresh.links;
        self.applications.invalidate();
    }
}

impl Negotiator for DomainResource {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}

impl DomainNegotiator for DomainResource {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::HttpMethod;
    use crate::resources::fixtures::{self, ALL_APP_OPS, DOMAIN};
    use crate::transport::mock::MockTransport;
    use serde_json::json;

    fn setup() -> (Arc<MockTransport>, DomainResource) {
        let mock = Arc::new(MockTransport::new());
        let transport: Arc<dyn Transport> = mock.clone();
        let domain = DomainResource::from_payload(&fixtures::domain(DOMAIN), transport).unwrap();
        (mock, domain)
    }

    fn apps_url() -> String {
        MockTransport::url(&format!("{}/applications", fixtures::domain_path(DOMAIN)))
    }

    #[test]
    fn test_applications_load_lazily() {
        let (mock, mut domain) = setup();
        assert!(domain.can_list_applications());
        assert_eq!(mock.request_count(), 0);

        mock.on(
            HttpMethod::Get,
            &apps_url(),
            json!([fixtures::application(fixtures::APP, ALL_APP_OPS)]),
        );
        assert!(domain.has_application(fixtures::APP).unwrap());
        assert!(domain.application("missing").unwrap().is_none());
        assert_eq!(mock.request_count(), 1);
    }

    #[test]
    fn test_create_application() {
        let (mock, mut domain) = setup();
        mock.on(HttpMethod::Get, &apps_url(), json!([]));
        mock.on(
            HttpMethod::Post,
            &apps_url(),
            fixtures::application("jenkins", ALL_APP_OPS),
        );

        let app = domain
            .create_application("jenkins", "jenkins-1", ApplicationScale::NotScalable, Some("small"))
            .unwrap();
        assert_eq!(app.read().name(), "jenkins");
        assert!(domain.has_application("jenkins").unwrap());

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.param("cartridge"), Some(&json!("jenkins-1")));
        assert_eq!(sent.param("scale"), Some(&json!(false)));
        assert_eq!(sent.param("gear_profile"), Some(&json!("small")));
    }

    #[test]
    fn test_create_duplicate_application_rejected_locally() {
        let (mock, mut domain) = setup();
        mock.on(
            HttpMethod::Get,
            &apps_url(),
            json!([fixtures::application(fixtures::APP, ALL_APP_OPS)]),
        );
        let err = domain
            .create_application(fixtures::APP, "jbosseap-6", ApplicationScale::Scalable, None)
            .unwrap_err();
        assert!(matches!(err, ClientError::DuplicateResource { kind: "application", .. }));
        assert_eq!(mock.count(HttpMethod::Post, &apps_url()), 0);
    }

    #[test]
    fn test_destroy_application() {
        let (mock, mut domain) = setup();
        mock.on(
            HttpMethod::Get,
            &apps_url(),
            json!([fixtures::application(fixtures::APP, ALL_APP_OPS)]),
        );
        mock.on(
            HttpMethod::Delete,
            &MockTransport::url(&fixtures::app_path(fixtures::APP)),
            Value::Null,
        );
        domain.destroy_application(fixtures::APP).unwrap();
        assert!(!domain.has_application(fixtures::APP).unwrap());
        assert!(matches!(
            domain.destroy_application(fixtures::APP).unwrap_err(),
            ClientError::NotFound { .. }
        ));
    }

    #[test]
    fn test_refresh_keeps_application_handles() {
        let (mock, mut domain) = setup();
        mock.on(
            HttpMethod::Get,
            &apps_url(),
            json!([fixtures::application(fixtures::APP, ALL_APP_OPS)]),
        );
        let held = domain.application(fixtures::APP).unwrap().unwrap();

        let mut moved = fixtures::application(fixtures::APP, ALL_APP_OPS);
        moved["gear_profile"] = json!("large");
        mock.reset(HttpMethod::Get, &apps_url(), json!([moved]));
        mock.on(
            HttpMethod::Get,
            &MockTransport::url(&fixtures::domain_path(DOMAIN)),
            fixtures::domain(DOMAIN),
        );
        domain.refresh().unwrap();

        let live = domain.application(fixtures::APP).unwrap().unwrap();
        assert!(held.same_as(&live));
        assert_eq!(held.read().gear_profile(), Some("large"));
    }
}
