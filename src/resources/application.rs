//! Applications: attributes, lifecycle and the four child collections.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{decode, destroy_child, execute, links_of, load_collection, parse_list};
use super::{Alias, EmbeddedCartridge, EnvironmentVariable, GearGroup};
use crate::cache::CollectionCache;
use crate::collection::{Handle, Identified, ResourceCollection};
use crate::errors::ClientError;
use crate::links::{ops, LinkMap, Params};
use crate::negotiator::{ApplicationNegotiator, Negotiator};
use crate::poller::{address_of, AccessibilityHandle, AvailabilityPoller, Probe, RetryPolicy};
use crate::transport::Transport;

/// Whether the broker may add gears to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicationScale {
    Scalable,
    NotScalable,
}

impl ApplicationScale {
    pub fn is_scalable(&self) -> bool {
        matches!(self, Self::Scalable)
    }
}

impl From<bool> for ApplicationScale {
    fn from(scalable: bool) -> Self {
        if scalable {
            Self::Scalable
        } else {
            Self::NotScalable
        }
    }
}

impl fmt::Display for ApplicationScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalable => write!(f, "scalable"),
            Self::NotScalable => write!(f, "not scalable"),
        }
    }
}

/// Server-reported attributes of an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationInfo {
    pub name: String,
    #[serde(rename = "id", alias = "uuid")]
    pub uuid: String,
    pub domain_id: Option<String>,
    pub app_url: Option<String>,
    pub git_url: Option<String>,
    pub ssh_url: Option<String>,
    pub initial_git_url: Option<String>,
    /// Standalone cartridge the application was created with.
    pub framework: Option<String>,
    #[serde(default)]
    pub scalable: bool,
    pub gear_profile: Option<String>,
    pub deployment_type: Option<String>,
    pub creation_time: Option<DateTime<Utc>>,
}

/// Events accepted by the application's lifecycle links.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Start,
    Stop,
    ForceStop,
    Restart,
    ScaleUp,
    ScaleDown,
}

impl LifecycleEvent {
    /// Link that carries the event.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Start => ops::START,
            Self::Stop => ops::STOP,
            Self::ForceStop => ops::FORCE_STOP,
            Self::Restart => ops::RESTART,
            Self::ScaleUp => ops::SCALE_UP,
            Self::ScaleDown => ops::SCALE_DOWN,
        }
    }

    /// Value of the `event` parameter.
    pub fn event(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::ForceStop => "force-stop",
            Self::Restart => "restart",
            Self::ScaleUp => "scale-up",
            Self::ScaleDown => "scale-down",
        }
    }
}

/// A deployed application.
///
/// Child collections load lazily on first access and only if the matching
/// list link is advertised. [`refresh`](Self::refresh) and every lifecycle
/// event replace the attributes and links in one step and drop the
/// collection caches; handles obtained earlier keep working and pick up new
/// attributes on the next load.
#[derive(Debug)]
pub struct ApplicationResource {
    info: ApplicationInfo,
    links: LinkMap,
    transport: Arc<dyn Transport>,
    cartridges: CollectionCache<EmbeddedCartridge>,
    environment_variables: CollectionCache<EnvironmentVariable>,
    aliases: CollectionCache<Alias>,
    gear_groups: CollectionCache<GearGroup>,
}

impl ApplicationResource {
    pub(crate) fn from_payload(data: &Value, transport: Arc<dyn Transport>) -> Result<Self, ClientError> {
        let (info, links) = Self::parse(data)?;
        Ok(Self {
            info,
            links,
            transport,
            cartridges: CollectionCache::new(ops::LIST_CARTRIDGES),
            environment_variables: CollectionCache::new(ops::LIST_ENVIRONMENT_VARIABLES),
            aliases: CollectionCache::new(ops::LIST_ALIASES),
            gear_groups: CollectionCache::new(ops::GET_GEAR_GROUPS),
        })
    }

    fn parse(data: &Value) -> Result<(ApplicationInfo, LinkMap), ClientError> {
        let info: ApplicationInfo = decode(Self::KIND, data)?;
        let links = links_of(data, format!("application '{}'", info.name))?;
        Ok((info, links))
    }

    fn apply(&mut self, info: ApplicationInfo, links: LinkMap) {
        self.info = info;
        self.links = links;
        self.invalidate_caches();
    }

    fn invalidate_caches(&mut self) {
        self.cartridges.invalidate();
        self.environment_variables.invalidate();
        self.aliases.invalidate();
        self.gear_groups.invalidate();
    }

    pub fn info(&self) -> &ApplicationInfo {
        &self.info
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn uuid(&self) -> &str {
        &self.info.uuid
    }

    pub fn domain_id(&self) -> Option<&str> {
        self.info.domain_id.as_deref()
    }

    pub fn app_url(&self) -> Option<&str> {
        self.info.app_url.as_deref()
    }

    pub fn git_url(&self) -> Option<&str> {
        self.info.git_url.as_deref()
    }

    pub fn ssh_url(&self) -> Option<&str> {
        self.info.ssh_url.as_deref()
    }

    pub fn initial_git_url(&self) -> Option<&str> {
        self.info.initial_git_url.as_deref()
    }

    pub fn framework(&self) -> Option<&str> {
        self.info.framework.as_deref()
    }

    pub fn scale(&self) -> ApplicationScale {
        self.info.scalable.into()
    }

    pub fn gear_profile(&self) -> Option<&str> {
        self.info.gear_profile.as_deref()
    }

    pub fn deployment_type(&self) -> Option<&str> {
        self.info.deployment_type.as_deref()
    }

    pub fn creation_time(&self) -> Option<DateTime<Utc>> {
        self.info.creation_time
    }

    pub fn links(&self) -> &LinkMap {
        &self.links
    }

    /// Re-fetch attributes and links. On failure nothing changes.
    pub fn refresh(&mut self) -> Result<(), ClientError> {
        let request = self.links.resolve(ops::GET, Params::new())?;
        let data = execute(self.transport.as_ref(), request)?;
        let (info, links) = Self::parse(&data)?;
        self.apply(info, links);
        Ok(())
    }

    /// Switch between `git` and `binary` deployments through the `UPDATE`
    /// link. The returned payload replaces attributes and links; on failure
    /// nothing changes.
    pub fn set_deployment_type(&mut self, deployment_type: &str) -> Result<(), ClientError> {
        let request = self
            .links
            .resolve(ops::UPDATE, Params::new().with("deployment_type", deployment_type))?;
        let data = execute(self.transport.as_ref(), request)?;
        if data.is_null() {
            self.info.deployment_type = Some(deployment_type.to_string());
            self.invalidate_caches();
            return Ok(());
        }
        let (info, links) = Self::parse(&data)?;
        self.apply(info, links);
        Ok(())
    }

    // ---- lifecycle ----

    /// Post a lifecycle event; the returned payload replaces attributes and
    /// links.
    pub fn trigger(&mut self, event: LifecycleEvent) -> Result<(), ClientError> {
        let request = self
            .links
            .resolve(event.operation(), Params::new().with("event", event.event()))?;
        let data = execute(self.transport.as_ref(), request)?;
        if data.is_null() {
            self.invalidate_caches();
            return Ok(());
        }
        let (info, links) = Self::parse(&data)?;
        self.apply(info, links);
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::Start)
    }

    pub fn stop(&mut self, force: bool) -> Result<(), ClientError> {
        self.trigger(if force {
            LifecycleEvent::ForceStop
        } else {
            LifecycleEvent::Stop
        })
    }

    pub fn restart(&mut self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::Restart)
    }

    pub fn scale_up(&mut self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::ScaleUp)
    }

    pub fn scale_down(&mut self) -> Result<(), ClientError> {
        self.trigger(LifecycleEvent::ScaleDown)
    }

    // ---- embedded cartridges ----

    pub fn embedded_cartridges(&mut self) -> Result<&ResourceCollection<EmbeddedCartridge>, ClientError> {
        load_collection(
            &mut self.cartridges,
            &self.links,
            self.transport.as_ref(),
            EmbeddedCartridge::from_payload,
        )
    }

    pub fn embedded_cartridge(&mut self, name: &str) -> Result<Option<Handle<EmbeddedCartridge>>, ClientError> {
        Ok(self.embedded_cartridges()?.get(name))
    }

    pub fn has_embedded_cartridge(&mut self, name: &str) -> Result<bool, ClientError> {
        Ok(self.embedded_cartridges()?.contains(name))
    }

    pub fn add_embeddable_cartridge(&mut self, name: &str) -> Result<Handle<EmbeddedCartridge>, ClientError> {
        let request = self
            .links
            .resolve(ops::ADD_CARTRIDGE, Params::new().with("name", name))?;
        if self.has_embedded_cartridge(name)? {
            return Err(ClientError::duplicate(EmbeddedCartridge::KIND, name));
        }
        let data = execute(self.transport.as_ref(), request)?;
        self.cartridges.insert(EmbeddedCartridge::from_payload(&data)?)
    }

    /// Embed several cartridges in order, stopping at the first failure.
    pub fn add_embeddable_cartridges<I, S>(&mut self, names: I) -> Result<Vec<Handle<EmbeddedCartridge>>, ClientError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| self.add_embeddable_cartridge(name.as_ref()))
            .collect()
    }

    pub fn remove_embedded_cartridge(&mut self, name: &str) -> Result<(), ClientError> {
        let handle = self
            .embedded_cartridge(name)?
            .ok_or_else(|| ClientError::not_found(EmbeddedCartridge::KIND, name))?;
        destroy_child(self.transport.as_ref(), &mut self.cartridges, name, &handle)
    }

    // ---- environment variables ----

    pub fn environment_variables(&mut self) -> Result<&ResourceCollection<EnvironmentVariable>, ClientError> {
        load_collection(
            &mut self.environment_variables,
            &self.links,
            self.transport.as_ref(),
            EnvironmentVariable::from_payload,
        )
    }

    pub fn environment_variable(&mut self, name: &str) -> Result<Option<Handle<EnvironmentVariable>>, ClientError> {
        Ok(self.environment_variables()?.get(name))
    }

    pub fn environment_variable_value(&mut self, name: &str) -> Result<Option<String>, ClientError> {
        Ok(self
            .environment_variable(name)?
            .map(|var| var.read().value().to_string()))
    }

    pub fn has_environment_variable(&mut self, name: &str) -> Result<bool, ClientError> {
        Ok(self.environment_variables()?.contains(name))
    }

    /// Current variables as a plain name → value map.
    pub fn environment_variables_map(&mut self) -> Result<BTreeMap<String, String>, ClientError> {
        Ok(self
            .environment_variables()?
            .iter()
            .map(|var| {
                let var = var.read();
                (var.name().to_string(), var.value().to_string())
            })
            .collect())
    }

    pub fn add_environment_variable(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<Handle<EnvironmentVariable>, ClientError> {
        let request = self.links.resolve(
            ops::ADD_ENVIRONMENT_VARIABLE,
            Params::new().with("name", name).with("value", value),
        )?;
        if self.has_environment_variable(name)? {
            return Err(ClientError::duplicate(EnvironmentVariable::KIND, name));
        }
        let data = execute(self.transport.as_ref(), request)?;
        self.environment_variables
            .insert(EnvironmentVariable::from_payload(&data)?)
    }

    /// Add several variables in one request. Rejected as a whole if any name
    /// already exists or repeats within the batch.
    pub fn add_environment_variables<I, K, V>(
        &mut self,
        variables: I,
    ) -> Result<Vec<Handle<EnvironmentVariable>>, ClientError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let variables: Vec<(String, String)> = variables
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if variables.is_empty() {
            return Ok(Vec::new());
        }

        let payload: Vec<Value> = variables
            .iter()
            .map(|(name, value)| json!({ "name": name, "value": value }))
            .collect();
        let request = self.links.resolve(
            ops::ADD_ENVIRONMENT_VARIABLE,
            Params::new().with("environment_variables", payload),
        )?;

        let existing = self.environment_variables()?;
        let mut batch = HashSet::new();
        for (name, _) in &variables {
            if existing.contains(name) || !batch.insert(name.as_str()) {
                return Err(ClientError::duplicate(EnvironmentVariable::KIND, name));
            }
        }

        let data = execute(self.transport.as_ref(), request)?;
        parse_list(EnvironmentVariable::KIND, data, EnvironmentVariable::from_payload)?
            .into_iter()
            .map(|var| self.environment_variables.insert(var))
            .collect()
    }

    /// Change the value of an existing variable. The held handle is updated
    /// in place.
    pub fn update_environment_variable(
        &mut self,
        name: &str,
        value: &str,
    ) -> Result<Handle<EnvironmentVariable>, ClientError> {
        let request = self.links.resolve(
            ops::SET_UNSET_ENVIRONMENT_VARIABLES,
            Params::new().with("environment_variables", json!([{ "name": name, "value": value }])),
        )?;
        let handle = self
            .environment_variable(name)?
            .ok_or_else(|| ClientError::not_found(EnvironmentVariable::KIND, name))?;

        let data = execute(self.transport.as_ref(), request)?;
        let fresh = parse_list(EnvironmentVariable::KIND, data, EnvironmentVariable::from_payload)?;
        match fresh.into_iter().find(|var| var.name() == name) {
            Some(var) => handle.write().absorb(var),
            None => handle.write().set_value(value),
        }
        Ok(handle)
    }

    pub fn remove_environment_variable(&mut self, name: &str) -> Result<(), ClientError> {
        let handle = self
            .environment_variable(name)?
            .ok_or_else(|| ClientError::not_found(EnvironmentVariable::KIND, name))?;
        destroy_child(self.transport.as_ref(), &mut self.environment_variables, name, &handle)
    }

    /// Remove a previously obtained variable.
    ///
    /// The handle is re-resolved by name against the live collection; if the
    /// name is gone (e.g. dropped by a refresh) this is `NotFound` and no
    /// delete is sent.
    pub fn remove_environment_variable_handle(
        &mut self,
        variable: &Handle<EnvironmentVariable>,
    ) -> Result<(), ClientError> {
        let name = variable.read().name().to_string();
        let live = self
            .environment_variable(&name)?
            .ok_or_else(|| ClientError::not_found(EnvironmentVariable::KIND, &name))?;
        if !live.same_as(variable) {
            log::debug!("environment variable '{}' resolved to a newer entry", name);
        }
        destroy_child(self.transport.as_ref(), &mut self.environment_variables, &name, &live)
    }

    // ---- aliases ----

    pub fn aliases(&mut self) -> Result<&ResourceCollection<Alias>, ClientError> {
        load_collection(
            &mut self.aliases,
            &self.links,
            self.transport.as_ref(),
            Alias::from_payload,
        )
    }

    pub fn has_alias(&mut self, name: &str) -> Result<bool, ClientError> {
        Ok(self.aliases()?.contains(name))
    }

    pub fn add_alias(&mut self, name: &str) -> Result<Handle<Alias>, ClientError> {
        let request = self.links.resolve(ops::ADD_ALIAS, Params::new().with("id", name))?;
        if self.has_alias(name)? {
            return Err(ClientError::duplicate(Alias::KIND, name));
        }
        let data = execute(self.transport.as_ref(), request)?;
        self.aliases.insert(Alias::from_payload(&data)?)
    }

    pub fn remove_alias(&mut self, name: &str) -> Result<(), ClientError> {
        let handle = self
            .aliases()?
            .get(name)
            .ok_or_else(|| ClientError::not_found(Alias::KIND, name))?;
        destroy_child(self.transport.as_ref(), &mut self.aliases, name, &handle)
    }

    // ---- gear groups ----

    pub fn gear_groups(&mut self) -> Result<&ResourceCollection<GearGroup>, ClientError> {
        load_collection(
            &mut self.gear_groups,
            &self.links,
            self.transport.as_ref(),
            GearGroup::from_payload,
        )
    }

    // ---- availability ----

    /// `host:port` of the application URL, probed by the availability waits.
    pub fn accessibility_target(&self) -> Result<String, ClientError> {
        self.info.app_url.as_deref().and_then(address_of).ok_or_else(|| {
            ClientError::malformed_payload(
                Self::KIND,
                format!("application '{}' has no application URL", self.info.name),
            )
        })
    }

    /// Block until the application's host resolves or `timeout` elapses.
    pub fn wait_for_accessible(&self, timeout: Duration) -> Result<bool, ClientError> {
        let poller: AvailabilityPoller = AvailabilityPoller::default();
        self.wait_for_accessible_with(&poller, timeout)
    }

    pub fn wait_for_accessible_with<P: Probe, R: RetryPolicy>(
        &self,
        poller: &AvailabilityPoller<P, R>,
        timeout: Duration,
    ) -> Result<bool, ClientError> {
        let target = self.accessibility_target()?;
        Ok(poller.wait_for_accessible(&target, timeout))
    }

    /// Start waiting in the background; await or cancel the returned handle.
    pub fn wait_for_accessible_async(&self, timeout: Duration) -> Result<AccessibilityHandle, ClientError> {
        let target = self.accessibility_target()?;
        let poller: AvailabilityPoller = AvailabilityPoller::default();
        poller.spawn(target, timeout)
    }
}

impl Identified for ApplicationResource {
    const KIND: &'static str = "application";

    fn identity(&self) -> &str {
        &self.info.name
    }

    fn absorb(&mut self, fresh: Self) {
        self.apply(fresh.info, fresh.links);
    }
}

impl Negotiator for ApplicationResource {
    fn link_map(&self) -> &LinkMap {
        &self.links
    }
}

impl ApplicationNegotiator for ApplicationResource {}
