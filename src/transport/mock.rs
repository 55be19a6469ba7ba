//! Scripted transport for tests.

use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;
use serde_json::Value;

use super::{RestResponse, Transport};
use crate::errors::TransportError;
use crate::links::{HttpMethod, RequestDescriptor};

pub(crate) const SERVER: &str = "https://broker.test";

type Reply = Result<RestResponse, TransportError>;

/// Answers requests from per-(method, url) queues and records every request.
///
/// The last queued reply for a route is sticky: it keeps being returned
/// once the queue is down to one entry.
#[derive(Debug, Default)]
pub(crate) struct MockTransport {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(path: &str) -> String {
        format!("{}/broker/rest{}", SERVER, path)
    }

    /// Queue `data` (wrapped in an ok envelope) for a route.
    pub fn on(&self, method: HttpMethod, url: &str, data: Value) -> &Self {
        self.push(method, url, Ok(RestResponse::ok(data)))
    }

    pub fn on_error(&self, method: HttpMethod, url: &str, error: TransportError) -> &Self {
        self.push(method, url, Err(error))
    }

    /// Replace every queued reply for a route.
    pub fn reset(&self, method: HttpMethod, url: &str, data: Value) -> &Self {
        self.routes.lock().remove(&(method, url.to_string()));
        self.on(method, url, data)
    }

    fn push(&self, method: HttpMethod, url: &str, reply: Reply) -> &Self {
        self.routes
            .lock()
            .entry((method, url.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn count(&self, method: HttpMethod, url: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.method == method && r.url == url)
            .count()
    }

    pub fn last_request(&self) -> Option<RequestDescriptor> {
        self.requests.lock().last().cloned()
    }
}

impl Transport for MockTransport {
    fn server_url(&self) -> &str {
        SERVER
    }

    fn execute(&self, request: &RequestDescriptor) -> Result<RestResponse, TransportError> {
        self.requests.lock().push(request.clone());
        let mut routes = self.routes.lock();
        let queue = routes
            .get_mut(&(request.method, request.url.clone()))
            .ok_or_else(|| TransportError::Server {
                status: 404,
                message: format!("no mock for {} {}", request.method, request.url),
            })?;
        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("empty mock queue".into())))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(TransportError::Connection("empty mock queue".into())))
        }
    }
}
