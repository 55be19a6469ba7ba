//! Capability negotiation: what a resource currently permits.
//!
//! Every predicate is `link_map().has(OPERATION)` on the resource's current
//! link map. Nothing is cached beyond that map, so a refresh that replaces
//! the map changes the answers immediately.

use crate::links::{ops, LinkMap};

/// Anything that owns a [`LinkMap`].
pub trait Negotiator {
    fn link_map(&self) -> &LinkMap;

    /// Generic check for callers that know an operation by name only.
    fn can(&self, operation: &str) -> bool {
        self.link_map().has(operation)
    }

    fn can_refresh(&self) -> bool {
        self.can(ops::GET)
    }

    fn can_destroy(&self) -> bool {
        self.can(ops::DELETE)
    }
}

/// Named predicates for the API root.
pub trait ConnectionNegotiator: Negotiator {
    fn can_list_domains(&self) -> bool {
        self.can(ops::LIST_DOMAINS)
    }

    fn can_create_domain(&self) -> bool {
        self.can(ops::ADD_DOMAIN)
    }

    fn can_list_cartridge_catalog(&self) -> bool {
        self.can(ops::LIST_CARTRIDGES)
    }
}

/// Named predicates for a domain.
pub trait DomainNegotiator: Negotiator {
    fn can_list_applications(&self) -> bool {
        self.can(ops::LIST_APPLICATIONS)
    }

    fn can_create_application(&self) -> bool {
        self.can(ops::ADD_APPLICATION)
    }
}

/// Named predicates for an application.
pub trait ApplicationNegotiator: Negotiator {
    fn can_get_environment_variables(&self) -> bool {
        self.can(ops::LIST_ENVIRONMENT_VARIABLES)
    }

    fn can_add_environment_variables(&self) -> bool {
        self.can(ops::ADD_ENVIRONMENT_VARIABLE)
    }

    fn can_update_environment_variables(&self) -> bool {
        self.can(ops::SET_UNSET_ENVIRONMENT_VARIABLES)
    }

    fn can_set_deployment_type(&self) -> bool {
        self.can(ops::UPDATE)
    }

    fn can_list_cartridges(&self) -> bool {
        self.can(ops::LIST_CARTRIDGES)
    }

    fn can_add_cartridge(&self) -> bool {
        self.can(ops::ADD_CARTRIDGE)
    }

    fn can_list_aliases(&self) -> bool {
        self.can(ops::LIST_ALIASES)
    }

    fn can_add_alias(&self) -> bool {
        self.can(ops::ADD_ALIAS)
    }

    fn can_get_gear_groups(&self) -> bool {
        self.can(ops::GET_GEAR_GROUPS)
    }

    fn can_start(&self) -> bool {
        self.can(ops::START)
    }

    fn can_stop(&self) -> bool {
        self.can(ops::STOP)
    }

    fn can_force_stop(&self) -> bool {
        self.can(ops::FORCE_STOP)
    }

    fn can_restart(&self) -> bool {
        self.can(ops::RESTART)
    }

    fn can_scale_up(&self) -> bool {
        self.can(ops::SCALE_UP)
    }

    fn can_scale_down(&self) -> bool {
        self.can(ops::SCALE_DOWN)
    }
}

impl Negotiator for LinkMap {
    fn link_map(&self) -> &LinkMap {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::links::{HttpMethod, LinkDescriptor};

    struct Stub(LinkMap);

    impl Negotiator for Stub {
        fn link_map(&self) -> &LinkMap {
            &self.0
        }
    }

    impl ApplicationNegotiator for Stub {}

    #[test]
    fn test_predicates_follow_links() {
        let app = Stub(LinkMap::from_links([LinkDescriptor::new(
            ops::LIST_ENVIRONMENT_VARIABLES,
            HttpMethod::Get,
            "https://h/env",
        )]));
        assert!(app.can_get_environment_variables());
        assert!(!app.can_update_environment_variables());
        assert!(!app.can_refresh());
        assert!(app.can("LIST_ENVIRONMENT_VARIABLES"));
    }

    #[test]
    fn test_new_links_surface_without_code_changes() {
        let map = LinkMap::from_links([LinkDescriptor::new(
            "THREAD_DUMP",
            HttpMethod::Post,
            "https://h/events",
        )]);
        assert!(map.can("THREAD_DUMP"));
    }
}
