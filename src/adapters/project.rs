//! A project view of a domain.

use super::service::{adapt, Service};
use crate::collection::Handle;
use crate::errors::ClientError;
use crate::resources::DomainResource;

/// A domain whose applications are exposed as services.
#[derive(Debug)]
pub struct Project {
    domain: Handle<DomainResource>,
    services: Option<Vec<Service>>,
}

impl Project {
    pub fn new(domain: Handle<DomainResource>) -> Self {
        Self {
            domain,
            services: None,
        }
    }

    pub fn name(&self) -> String {
        self.domain.read().id().to_string()
    }

    pub fn domain(&self) -> &Handle<DomainResource> {
        &self.domain
    }

    /// Services for every application, adapted on first access.
    pub fn services(&mut self) -> Result<&[Service], ClientError> {
        if self.services.is_none() {
            let applications = self.domain.write().applications()?.handles();
            self.services = Some(applications.into_iter().map(adapt).collect());
        }
        Ok(self.services.as_deref().unwrap_or_default())
    }

    pub fn service(&mut self, name: &str) -> Result<Option<&Service>, ClientError> {
        Ok(self.services()?.iter().find(|s| s.name() == name))
    }

    /// Refresh the domain and rebuild services on next access.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        self.domain.write().refresh()?;
        self.services = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Capable;
    use crate::capabilities::CapabilityKind;
    use crate::links::{ops, HttpMethod};
    use crate::resources::fixtures::{self, ALL_APP_OPS, DOMAIN};
    use crate::transport::mock::MockTransport;
    use crate::transport::Transport;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_services_adapted_lazily_once() {
        let mock = Arc::new(MockTransport::new());
        let transport: Arc<dyn Transport> = mock.clone();
        let domain = DomainResource::from_payload(&fixtures::domain(DOMAIN), transport).unwrap();
        let mut project = Project::new(Handle::new(domain));
        assert_eq!(project.name(), DOMAIN);
        assert_eq!(mock.request_count(), 0);

        mock.on(
            HttpMethod::Get,
            &MockTransport::url(&format!("{}/applications", fixtures::domain_path(DOMAIN))),
            json!([
                fixtures::application("full", ALL_APP_OPS),
                fixtures::application("bare", &[ops::GET]),
            ]),
        );
        assert_eq!(project.services().unwrap().len(), 2);
        assert_eq!(project.services().unwrap().len(), 2);
        assert_eq!(mock.request_count(), 1);

        let full = project.service("full").unwrap().unwrap();
        assert!(full.supports(CapabilityKind::Lifecycle));
        let bare = project.service("bare").unwrap().unwrap();
        assert!(bare.capabilities().is_empty());
        assert!(project.service("missing").unwrap().is_none());
    }
}
