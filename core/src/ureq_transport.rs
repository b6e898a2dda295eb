//! Default blocking `Transport` backed by `ureq`.
//!
//! The agent is built with `http_status_as_error(false)`, so 4xx/5xx
//! statuses come back as ordinary `HttpResponse`s. Anything ureq reports as
//! an error happened before a response existed and becomes
//! `TransportError::Failure`.

use std::io;

use tracing::debug;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Base endpoint of the Customer.io tracking API.
pub const DEFAULT_BASE_URL: &str = "https://track.customer.io";

/// `Response::status_code` reported for every failure that produced no
/// HTTP response.
pub const TRANSPORT_FAILURE_CODE: i64 = 0;

#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    pub fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(base_url, agent)
    }

    /// Use a caller-configured agent (timeouts, proxy, TLS). The agent should
    /// have `http_status_as_error(false)`, otherwise error statuses surface as
    /// transport failures without a reason phrase.
    pub fn with_agent(base_url: &str, agent: ureq::Agent) -> Self {
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        debug!(method = request.method.as_str(), %url, "sending request");

        let result = match request.method {
            HttpMethod::Delete => {
                let mut builder = self.agent.delete(&url);
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                builder.call()
            }
            HttpMethod::Post | HttpMethod::Put => {
                let mut builder = if request.method == HttpMethod::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.put(&url)
                };
                for (name, value) in &request.headers {
                    builder = builder.header(name.as_str(), value.as_str());
                }
                match &request.body {
                    Some(body) => builder.send(body.as_bytes()),
                    None => builder.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| TransportError::failure(TRANSPORT_FAILURE_CODE, e.to_string()))?;

        let status = response.status().as_u16();
        // Drain the body so the connection can go back to the pool. Its
        // content never reaches a `Response`.
        if let Err(e) = io::copy(&mut response.body_mut().as_reader(), &mut io::sink()) {
            debug!(status, error = %e, "response body not fully read");
        }

        Ok(HttpResponse::new(status))
    }
}
