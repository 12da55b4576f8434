//! # Transport
//!
//! The lowest layer of the client: one authenticated `POST` carrying a
//! `application/x-www-form-urlencoded` body, returning the raw response bytes.
//!
//! The transport does not retry and does not interpret the response. A response that
//! carries an application-level `error_code` is a successful transport round-trip; it is
//! decoded and surfaced by the caller.
//!
//! The [`Transport`] trait is the seam between the engine and the network, in the same way a
//! generic `GrpcService` lets a gRPC client run against either a channel or an in-process
//! service. [`http::HttpTransport`] is the production implementation.
pub mod http;

use crate::BoxError;
use bytes::Bytes;
use std::future::Future;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to '{url}' failed: '{source}'")]
    RequestFailed {
        url: String,
        #[source]
        source: BoxError,
    },
    #[error("Failed to read the response body from '{url}': '{source}'")]
    BodyUnreadable {
        url: String,
        #[source]
        source: BoxError,
    },
}

/// Sends a single form-encoded request and returns the raw response body.
///
/// Implementations are shared by every concurrent call of a client, so they must be
/// cheap to use through a shared reference.
pub trait Transport: Send + Sync + 'static {
    /// `body` is already form-encoded and already carries `api.token`.
    fn post(
        &self,
        url: &Url,
        body: String,
    ) -> impl Future<Output = Result<Bytes, TransportError>> + Send;
}
