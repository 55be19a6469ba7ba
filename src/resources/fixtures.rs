//! Broker payloads used across resource tests.

use serde_json::{json, Map, Value};

use crate::links::ops;
use crate::transport::mock::MockTransport;

pub(crate) const DOMAIN: &str = "foobarz";
pub(crate) const APP: &str = "springeap6";

/// Every operation an application link map can carry.
pub(crate) const ALL_APP_OPS: &[&str] = &[
    ops::GET,
    ops::UPDATE,
    ops::DELETE,
    ops::LIST_ENVIRONMENT_VARIABLES,
    ops::ADD_ENVIRONMENT_VARIABLE,
    ops::SET_UNSET_ENVIRONMENT_VARIABLES,
    ops::LIST_CARTRIDGES,
    ops::ADD_CARTRIDGE,
    ops::LIST_ALIASES,
    ops::ADD_ALIAS,
    ops::GET_GEAR_GROUPS,
    ops::START,
    ops::STOP,
    ops::FORCE_STOP,
    ops::RESTART,
    ops::SCALE_UP,
    ops::SCALE_DOWN,
];

pub(crate) fn link(method: &str, path: &str) -> Value {
    json!({ "rel": "", "method": method, "href": MockTransport::url(path) })
}

fn link_requiring(method: &str, path: &str, required: &[&str]) -> Value {
    let mut link = link(method, path);
    link["required_params"] = required
        .iter()
        .map(|name| json!({ "name": name, "type": "string", "description": "", "valid_options": [] }))
        .collect();
    link
}

pub(crate) fn api_root() -> Value {
    json!({
        (ops::LIST_DOMAINS): link("GET", "/domains"),
        (ops::ADD_DOMAIN): link_requiring("POST", "/domains", &["id"]),
        (ops::LIST_CARTRIDGES): link("GET", "/cartridges"),
    })
}

pub(crate) fn catalog_cartridge(name: &str, cartridge_type: &str) -> Value {
    json!({ "name": name, "display_name": name.to_uppercase(), "type": cartridge_type })
}

pub(crate) fn domain_path(id: &str) -> String {
    format!("/domain/{}", id)
}

pub(crate) fn domain(id: &str) -> Value {
    let path = domain_path(id);
    json!({
        "id": id,
        "suffix": "rhcloud.com",
        "links": {
            (ops::GET): link("GET", &path),
            (ops::DELETE): link("DELETE", &path),
            (ops::LIST_APPLICATIONS): link("GET", &format!("{}/applications", path)),
            (ops::ADD_APPLICATION):
                link_requiring("POST", &format!("{}/applications", path), &["name"]),
        }
    })
}

pub(crate) fn app_path(name: &str) -> String {
    format!("/domain/{}/application/{}", DOMAIN, name)
}

fn app_link(name: &str, operation: &str) -> Value {
    let base = app_path(name);
    match operation {
        ops::GET => link("GET", &base),
        ops::UPDATE => link("PUT", &base),
        ops::DELETE => link("DELETE", &base),
        ops::LIST_ENVIRONMENT_VARIABLES => link("GET", &format!("{}/environment-variables", base)),
        ops::ADD_ENVIRONMENT_VARIABLE => link("POST", &format!("{}/environment-variables", base)),
        ops::SET_UNSET_ENVIRONMENT_VARIABLES => {
            link("POST", &format!("{}/environment-variables/bulk", base))
        }
        ops::LIST_CARTRIDGES => link("GET", &format!("{}/cartridges", base)),
        ops::ADD_CARTRIDGE => link_requiring("POST", &format!("{}/cartridges", base), &["name"]),
        ops::LIST_ALIASES => link("GET", &format!("{}/aliases", base)),
        ops::ADD_ALIAS => link_requiring("POST", &format!("{}/aliases", base), &["id"]),
        ops::GET_GEAR_GROUPS => link("GET", &format!("{}/gear_groups", base)),
        _ => link_requiring("POST", &format!("{}/events", base), &["event"]),
    }
}

/// An application payload advertising exactly `operations`.
pub(crate) fn application(name: &str, operations: &[&str]) -> Value {
    let links: Map<String, Value> = operations
        .iter()
        .map(|op| (op.to_string(), app_link(name, op)))
        .collect();
    json!({
        "name": name,
        "id": "51d1d2a1e0b8cd2e9400002c",
        "domain_id": DOMAIN,
        "app_url": format!("http://{}-{}.rhcloud.com/", name, DOMAIN),
        "git_url": format!("ssh://51d1d2a1e0b8cd2e9400002c@{}-{}.rhcloud.com/~/git/{}.git/", name, DOMAIN, name),
        "ssh_url": format!("ssh://51d1d2a1e0b8cd2e9400002c@{}-{}.rhcloud.com", name, DOMAIN),
        "framework": "jbosseap-6",
        "scalable": false,
        "gear_profile": "small",
        "creation_time": "2013-07-01T19:08:49Z",
        "links": links,
    })
}

pub(crate) fn environment_variable(name: &str, value: &str) -> Value {
    let path = format!("{}/environment-variable/{}", app_path(APP), name);
    json!({
        "name": name,
        "value": value,
        "links": {
            (ops::GET): link("GET", &path),
            (ops::UPDATE): link("PUT", &path),
            (ops::DELETE): link("DELETE", &path),
        }
    })
}

pub(crate) fn environment_variable_delete(name: &str) -> String {
    MockTransport::url(&format!("{}/environment-variable/{}", app_path(APP), name))
}

pub(crate) fn cartridge(name: &str) -> Value {
    let path = format!("{}/cartridge/{}", app_path(APP), name);
    json!({
        "name": name,
        "display_name": name.to_uppercase(),
        "type": "embedded",
        "links": { (ops::DELETE): link("DELETE", &path) }
    })
}

pub(crate) fn cartridge_delete(name: &str) -> String {
    MockTransport::url(&format!("{}/cartridge/{}", app_path(APP), name))
}

pub(crate) fn alias(id: &str) -> Value {
    let path = format!("{}/alias/{}", app_path(APP), id);
    json!({
        "id": id,
        "has_private_ssl_certificate": false,
        "links": { (ops::DELETE): link("DELETE", &path) }
    })
}

pub(crate) fn alias_delete(id: &str) -> String {
    MockTransport::url(&format!("{}/alias/{}", app_path(APP), id))
}

pub(crate) fn gear_group(uuid: &str) -> Value {
    json!({
        "uuid": uuid,
        "name": uuid,
        "gears": [
            { "id": uuid, "state": "started", "ssh_url": format!("ssh://{}@{}-{}.rhcloud.com", uuid, APP, DOMAIN) }
        ],
        "cartridges": [ { "name": "jbosseap-6" }, { "name": "mysql-5.1" } ]
    })
}

/// Absolute URL of an application sub-path.
pub(crate) fn app_url(suffix: &str) -> String {
    MockTransport::url(&format!("{}{}", app_path(APP), suffix))
}
