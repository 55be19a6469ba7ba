//! A generic service view of an application.

use super::Capable;
use crate::capabilities::CapabilityRegistry;
use crate::collection::Handle;
use crate::resources::ApplicationResource;

/// An application seen through its capabilities.
///
/// The capability set is a snapshot taken at construction; call
/// [`refresh_capabilities`](Self::refresh_capabilities) after the
/// application's links change.
#[derive(Debug, Clone)]
pub struct Service {
    application: Handle<ApplicationResource>,
    capabilities: CapabilityRegistry,
}

/// Wrap an application as a [`Service`].
pub fn adapt(application: Handle<ApplicationResource>) -> Service {
    let capabilities = CapabilityRegistry::evaluate(&application);
    Service {
        application,
        capabilities,
    }
}

impl Service {
    pub fn name(&self) -> String {
        self.application.read().name().to_string()
    }

    pub fn application(&self) -> &Handle<ApplicationResource> {
        &self.application
    }

    /// Re-evaluate the capability set against the application's current links.
    pub fn refresh_capabilities(&mut self) {
        self.capabilities = CapabilityRegistry::evaluate(&self.application);
    }
}

impl Capable for Service {
    fn capabilities(&self) -> &CapabilityRegistry {
        &self.capabilities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capabilities::{AliasCapability, CapabilityKind, EnvironmentVariableCapability};
    use crate::links::{ops, HttpMethod};
    use crate::resources::fixtures::{self, app_url, ALL_APP_OPS, APP};
    use crate::transport::mock::MockTransport;
    use crate::transport::Transport;
    use std::sync::Arc;

    #[test]
    fn test_absent_capability_is_none() {
        let mock: Arc<dyn Transport> = Arc::new(MockTransport::new());
        let app = ApplicationResource::from_payload(
            &fixtures::application(APP, &[ops::GET, ops::LIST_ENVIRONMENT_VARIABLES]),
            mock,
        )
        .unwrap();
        let service = adapt(Handle::new(app));

        assert_eq!(service.name(), APP);
        assert!(service.get::<AliasCapability>().is_none());
        assert!(service.get::<EnvironmentVariableCapability>().is_some());
        assert!(!service.supports(CapabilityKind::EmbeddedCartridges));
    }

    #[test]
    fn test_refresh_capabilities_follows_links() {
        let mock = Arc::new(MockTransport::new());
        let transport: Arc<dyn Transport> = mock.clone();
        let app = ApplicationResource::from_payload(&fixtures::application(APP, &[ops::GET]), transport).unwrap();
        let mut service = adapt(Handle::new(app));
        assert!(service.capabilities().is_empty());

        mock.on(HttpMethod::Get, &app_url(""), fixtures::application(APP, ALL_APP_OPS));
        service.application().write().refresh().unwrap();
        assert!(service.capabilities().is_empty());

        service.refresh_capabilities();
        assert!(service.supports(CapabilityKind::Aliases));
    }
}
