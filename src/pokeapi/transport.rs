//! Outbound transport for the `PokéAPI`.
//!
//! [`PokeApiTransport`] isolates the HTTP layer so the caching client can
//! be exercised without a network. [`HttpTransport`] is the production
//! implementation on top of a single persistent `reqwest` client.

use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use thiserror::Error;
use tracing::debug;

/// Failure of a single outbound request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The transport was closed before the request was issued.
    #[error("transport closed")]
    Closed,
    /// Connection, timeout or protocol failure.
    #[error("request failed: {0}")]
    Request(String),
    /// The API answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),
    /// The body was not valid JSON.
    #[error("invalid response body: {0}")]
    Decode(String),
    /// The request URL could not be built.
    #[error("invalid url: {0}")]
    Url(String),
}

/// Read-only JSON transport for `PokéAPI` resources such as `pokemon/pikachu`.
#[async_trait]
pub trait PokeApiTransport: Send + Sync {
    /// Issues `GET {base}/{resource}/{name}` and returns the decoded JSON body.
    ///
    /// `name` is always a single path segment: implementations must escape
    /// any `/`, `?`, `#` or `%` it contains.
    async fn get_json(
        &self,
        resource: &str,
        name: &str,
    ) -> Result<serde_json::Value, TransportError>;

    /// Releases the underlying connection resources.
    ///
    /// Returns `true` if this call closed an open transport, `false` if it
    /// was already closed.
    fn close(&self) -> bool;

    /// Returns `true` once [`close`](Self::close) has been called.
    fn is_closed(&self) -> bool;
}

/// HTTP transport backed by one persistent [`reqwest::Client`].
pub struct HttpTransport {
    base_url: String,
    client: RwLock<Option<reqwest::Client>>,
}

impl HttpTransport {
    /// Builds a transport with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be
    /// constructed (for example, TLS backend initialisation failure).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pokeagent-rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: RwLock::new(Some(client)),
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `{base}/{resource}/{name}` with `name` as one escaped segment.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Url`] if the base URL cannot carry a path.
    pub fn resource_url(&self, resource: &str, name: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| TransportError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|()| TransportError::Url(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(resource)
            .push(name);
        Ok(url)
    }

    fn client(&self) -> Option<reqwest::Client> {
        // reqwest::Client is reference-counted; cloning shares the pool.
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl PokeApiTransport for HttpTransport {
    async fn get_json(
        &self,
        resource: &str,
        name: &str,
    ) -> Result<serde_json::Value, TransportError> {
        let client = self.client().ok_or(TransportError::Closed)?;
        let url = self.resource_url(resource, name)?;
        debug!(%url, "pokeapi request");

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }

    fn close(&self) -> bool {
        self.client
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    fn is_closed(&self) -> bool {
        self.client
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }
}
