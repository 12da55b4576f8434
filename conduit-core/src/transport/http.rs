//! # HTTP Transport
//!
//! [`HttpTransport`] wraps a `reqwest::Client`. The connection pool inside the client is
//! shared by every call made through it. A single timeout covers the whole request.
use super::{Transport, TransportError};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Builds a transport whose requests fail once `timeout` has elapsed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wraps an existing `reqwest::Client`, keeping its pool and settings.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    async fn post(&self, url: &Url, body: String) -> Result<Bytes, TransportError> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|err| {
                error!(endpoint = %url, error = %err, "HTTP request failed");
                TransportError::RequestFailed {
                    url: url.to_string(),
                    source: err.into(),
                }
            })?;

        info!(
            status = %response.status(),
            method = "POST",
            endpoint = %url,
            "HTTP request"
        );

        response.bytes().await.map_err(|err| {
            error!(endpoint = %url, error = %err, "Failed to read HTTP response");
            TransportError::BodyUnreadable {
                url: url.to_string(),
                source: err.into(),
            }
        })
    }
}
