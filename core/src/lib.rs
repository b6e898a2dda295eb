//! Blocking client for the Customer.io tracking API.
//!
//! # Overview
//! Three operations (customer upsert, customer delete, customer event), each
//! returning a `Response` that carries a status code and a message. HTTP
//! error statuses and transport failures are reported through that same
//! `Response`; nothing is raised to the caller.
//!
//! # Design
//! - `CustomerIoClient` builds `HttpRequest` values and sends them through a
//!   `Transport`, the single seam for substituting the network in tests.
//! - `UreqTransport` is the default transport, bound to
//!   `https://track.customer.io`.
//! - `EventData` forces the event `data` field to serialize as a JSON object,
//!   `{}` when empty.

pub mod client;
pub mod error;
pub mod http;
pub mod types;
pub mod ureq_transport;

pub use client::CustomerIoClient;
pub use error::TransportError;
pub use http::{canonical_reason, HttpMethod, HttpRequest, HttpResponse, Transport};
pub use types::{Credentials, EventData, Response};
pub use ureq_transport::{UreqTransport, DEFAULT_BASE_URL, TRANSPORT_FAILURE_CODE};
