//! `reqwest`-backed transport.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use super::{RestResponse, Transport};
use crate::config::ClientConfig;
use crate::errors::TransportError;
use crate::links::{HttpMethod, RequestDescriptor};

/// Blocking HTTP transport with basic authentication.
pub struct HttpTransport {
    server_url: String,
    username: Option<String>,
    password: Option<String>,
    client: Client,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("server_url", &self.server_url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl HttpTransport {
    /// Build a transport from explicit configuration.
    ///
    /// Must not be called (or used) from inside an async runtime worker.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let mut headers = HeaderMap::new();
        let accept = format!("application/json; version={}", config.api_version);
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&accept).map_err(|e| TransportError::Connection(e.to_string()))?,
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.client_id)
                .map_err(|e| TransportError::Connection(e.to_string()))?,
        );

        let mut builder = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .default_headers(headers)
            .danger_accept_invalid_certs(!config.verify_ssl);

        if let Some(proxy) = &config.proxy {
            let proxy_url = format!("http://{}:{}", proxy.host, proxy.port);
            builder = builder.proxy(
                reqwest::Proxy::all(&proxy_url)
                    .map_err(|e| TransportError::Connection(e.to_string()))?,
            );
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            server_url: config.server_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            client,
        })
    }
}

impl Transport for HttpTransport {
    fn server_url(&self) -> &str {
        &self.server_url
    }

    fn execute(&self, request: &RequestDescriptor) -> Result<RestResponse, TransportError> {
        log::debug!("{} {} ({})", request.method, request.url, request.operation);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };

        builder = if request.method.has_body() {
            builder.json(&request.body())
        } else if request.params.is_empty() {
            builder
        } else {
            builder.query(&request.query_pairs())
        };

        if let Some(user) = &self.username {
            builder = builder.basic_auth(user, self.password.as_ref());
        }

        let resp = builder.send().map_err(map_reqwest_error)?;
        let status = resp.status();
        let body = resp.text().map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<RestResponse>(&body)
                .map(|r| r.message_text())
                .ok()
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                });
            log::debug!("{} {} failed: HTTP {}", request.method, request.url, status);
            return Err(TransportError::Server {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(RestResponse::default());
        }

        serde_json::from_str(&body).map_err(|e| TransportError::MalformedBody(e.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::MalformedBody(err.to_string())
    } else {
        TransportError::Connection(err.to_string())
    }
}
