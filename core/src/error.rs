//! Transport-level failures.
//!
//! # Design
//! A transport either produced an HTTP response it chose to report as an
//! error (`Status`), or never got a response at all (`Failure`). The client
//! folds both into a `Response`, so these errors never reach callers of the
//! three API operations.

use thiserror::Error;

use crate::http::HttpResponse;

/// Errors returned by `Transport::send`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with an error status. The response is intact.
    #[error("HTTP {} {}", .0.status, .0.reason_phrase)]
    Status(HttpResponse),

    /// No response could be obtained: connection refused, timeout, DNS
    /// failure or a request the transport could not put on the wire.
    #[error("transport failure ({code}): {message}")]
    Failure { code: i64, message: String },
}

impl TransportError {
    pub fn failure(code: i64, message: impl Into<String>) -> Self {
        TransportError::Failure {
            code,
            message: message.into(),
        }
    }
}
