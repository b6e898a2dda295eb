//! Customer.io tracking API client.
//!
//! # Design
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a call that sends it through the owned `Transport`.
//! Whatever the transport reports (a response, an error status, or a
//! failure with no response) is folded into a single `Response`; none of
//! the three operations can fail from the caller's point of view.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{Credentials, EventData, Response};
use crate::ureq_transport::UreqTransport;

const CUSTOMERS_PATH: &str = "/api/v1/customers";

/// Client for the three tracking endpoints: customer upsert, customer
/// delete, and customer events.
///
/// `id` values are concatenated into the request path as-is. They are not
/// escaped or validated, so callers must pass path-safe identifiers.
#[derive(Debug, Clone)]
pub struct CustomerIoClient<T: Transport = UreqTransport> {
    transport: T,
    credentials: Credentials,
}

impl CustomerIoClient<UreqTransport> {
    /// Client bound to `https://track.customer.io` with empty credentials.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::default())
    }
}

impl Default for CustomerIoClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> CustomerIoClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            credentials: Credentials::default(),
        }
    }

    /// Set the basic-auth pair used by every subsequent request.
    ///
    /// Returns `&mut Self`, so chaining needs a `let mut` binding first:
    /// `let mut c = CustomerIoClient::new(); c.authenticate(key, secret).event(..)`.
    pub fn authenticate(&mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> &mut Self {
        self.credentials = Credentials::new(api_key, api_secret);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Create or update a customer.
    pub fn customer(&self, id: &str, email: &str, attributes: &Map<String, Value>) -> Response {
        let request = self.build_customer(id, email, attributes);
        self.dispatch(request)
    }

    pub fn delete_customer(&self, id: &str) -> Response {
        let request = self.build_delete_customer(id);
        self.dispatch(request)
    }

    /// Record a named event against a customer.
    pub fn event(&self, id: &str, name: &str, data: &EventData) -> Response {
        let request = self.build_event(id, name, data);
        self.dispatch(request)
    }

    /// PUT `/api/v1/customers/{id}` with `{"email": ..}` overlaid by
    /// `attributes`. An `email` key in `attributes` wins.
    pub fn build_customer(&self, id: &str, email: &str, attributes: &Map<String, Value>) -> HttpRequest {
        let mut body = Map::new();
        body.insert("email".to_string(), Value::String(email.to_string()));
        for (key, value) in attributes {
            body.insert(key.clone(), value.clone());
        }
        self.json_request(HttpMethod::Put, customer_path(id), &Value::Object(body))
    }

    pub fn build_delete_customer(&self, id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: customer_path(id),
            headers: vec![self.auth_header()],
            body: None,
        }
    }

    /// POST `/api/v1/customers/{id}/events` with `{"name": .., "data": {..}}`.
    pub fn build_event(&self, id: &str, name: &str, data: &EventData) -> HttpRequest {
        let mut body = Map::new();
        body.insert("name".to_string(), Value::String(name.to_string()));
        body.insert("data".to_string(), Value::Object(data.as_map().clone()));
        self.json_request(HttpMethod::Post, format!("{}/events", customer_path(id)), &Value::Object(body))
    }

    fn json_request(&self, method: HttpMethod, path: String, body: &Value) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: vec![
                self.auth_header(),
                ("content-type".to_string(), "application/json".to_string()),
            ],
            // Serializing a `Value` cannot fail.
            body: Some(body.to_string()),
        }
    }

    fn auth_header(&self) -> (String, String) {
        ("authorization".to_string(), self.credentials.basic_auth_header())
    }

    fn dispatch(&self, request: HttpRequest) -> Response {
        debug!(method = request.method.as_str(), path = %request.path, "customer.io request");
        let response = normalize(self.transport.send(&request));
        debug!(status = response.status_code(), message = response.message(), "customer.io response");
        response
    }
}

fn customer_path(id: &str) -> String {
    format!("{CUSTOMERS_PATH}/{id}")
}

/// Collapse every transport outcome into a `Response`.
fn normalize(result: Result<HttpResponse, TransportError>) -> Response {
    match result {
        Ok(resp) | Err(TransportError::Status(resp)) => Response::new(i64::from(resp.status), resp.reason_phrase),
        Err(TransportError::Failure { code, message }) => {
            warn!(code, %message, "customer.io transport failure");
            Response::new(code, message)
        }
    }
}
