//! HTTP transport seam for the Customer.io client.
//!
//! # Design
//! Requests and responses are described as plain data. `CustomerIoClient`
//! builds `HttpRequest` values and hands them to a `Transport`, which is the
//! only piece that touches the network. Tests substitute their own
//! `Transport` to observe requests and script outcomes.
//!
//! Paths are relative; the transport owns the base URL it is bound to.

use ureq::http::StatusCode;

use crate::error::TransportError;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status line of an HTTP response. The body is not part of a `Response`,
/// so transports discard it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub reason_phrase: String,
}

impl HttpResponse {
    /// A response carrying the canonical reason phrase for `status`.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            reason_phrase: canonical_reason(status).to_string(),
        }
    }
}

/// Executes `HttpRequest`s against a fixed base endpoint.
///
/// A transport may report an HTTP error status either as `Ok(response)` or as
/// `Err(TransportError::Status(response))`; the client treats both the same.
pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}

/// Standard reason phrase for `status`, or `""` when the code has none.
pub fn canonical_reason(status: u16) -> &'static str {
    StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("")
}
