//! # Transport
//!
//! The client core never speaks HTTP itself. Every request goes through the
//! [`Transport`] trait: one resolved [`RequestDescriptor`] in, one decoded
//! [`RestResponse`] (or a [`TransportError`]) out. [`HttpTransport`] is the
//! production implementation on top of `reqwest`.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TransportError;
use crate::links::RequestDescriptor;

pub use http::HttpTransport;

/// Performs a single request/response exchange with the broker.
///
/// Implementations block until the exchange completes. Timeouts belong to
/// the implementation; the core imposes none.
pub trait Transport: fmt::Debug + Send + Sync {
    /// Base URL of the broker (e.g. `https://openshift.redhat.com`).
    fn server_url(&self) -> &str;

    /// Execute one request.
    fn execute(&self, request: &RequestDescriptor) -> Result<RestResponse, TransportError>;

    /// Href of the API root document.
    fn api_url(&self) -> String {
        format!("{}/broker/rest/api", self.server_url().trim_end_matches('/'))
    }
}

/// Response envelope returned by every broker endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RestResponse {
    /// "ok", "created", "not_found", ...
    #[serde(default)]
    pub status: String,

    /// Resource payload: an object, an array of objects, or null.
    #[serde(default)]
    pub data: Value,

    #[serde(default)]
    pub messages: Vec<Message>,
}

impl RestResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            status: "ok".to_string(),
            data,
            messages: Vec::new(),
        }
    }

    /// All message texts joined, for error reporting.
    pub fn message_text(&self) -> String {
        self.messages
            .iter()
            .filter_map(|m| m.text.as_deref())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A server message attached to a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub exit_code: Option<i64>,
}
