//! # Conduit Client
//!
//! This module implements the high-level entry point for talking to a Conduit server.
//!
//! The [`ConduitClient`] uses a **Typestate Pattern** so that no search or edit can be issued
//! before the server has been introspected. It has two possible states:
//!
//! 1. **[`Undiscovered`]**: Credentials are resolved and a transport is ready, but the
//!    procedure catalog has not been fetched yet. Only calls that do not depend on the catalog
//!    (e.g., [`whoami`](ConduitClient::whoami)) are available.
//! 2. **[`Discovered`]**: `conduit.query` has been called once and its catalog is frozen.
//!    Search and edit procedures are validated against it before any request is sent.
//!
//! ## Example: State Transition
//!
//! ```rust,no_run
//! use conduit_core::client::ConduitClient;
//! use conduit_core::config::Options;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! // 1. Undiscovered state
//! let client = ConduitClient::from_options(Options::default())?;
//! let me = client.whoami().await?;
//!
//! // 2. Discovered state
//! let client = client.discover().await?;
//! for procedure in client.catalog().iter() {
//!     println!("{procedure}");
//! }
//! # Ok(())
//! # }
//! ```
pub mod discovered;
mod session;
pub mod undiscovered;

pub use session::Session;

use crate::{
    catalog::ProcedureCatalog,
    config::ConfigError,
    error::CallError,
    transport::{Transport, http::HttpTransport},
    whoami::{self, Identity},
};
use std::sync::Arc;
use tracing::instrument::WithSubscriber;
use url::Url;

/// The main client for interacting with a Conduit server.
///
/// The generic parameter `S` represents the current state of the client.
#[derive(Debug, Clone)]
pub struct ConduitClient<S> {
    state: S,
}

impl<S> ConduitClient<S> {
    pub(crate) fn new(state: S) -> Self {
        Self { state }
    }
}

/// State: Credentials resolved, catalog not fetched yet.
#[derive(Debug)]
pub struct Undiscovered<T = HttpTransport> {
    session: Session<T>,
}

/// State: Catalog fetched and frozen.
///
/// Cloning is cheap: clones share the session and the catalog.
#[derive(Debug)]
pub struct Discovered<T = HttpTransport> {
    session: Arc<Session<T>>,
    catalog: Arc<ProcedureCatalog>,
}

impl<T> Clone for Discovered<T> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            catalog: Arc::clone(&self.catalog),
        }
    }
}

/// Errors that can occur when building a discovered client from [`crate::config::Options`].
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Invalid configuration: '{0}'")]
    Config(#[from] ConfigError),
    #[error("Endpoint discovery failed: '{0}'")]
    Discovery(#[from] CallError),
}

/// Access to the session shared by every state that can reach the server.
pub trait Connected {
    type Transport: Transport;

    fn session(&self) -> &Session<Self::Transport>;
}

impl<T: Transport> Connected for Undiscovered<T> {
    type Transport = T;

    fn session(&self) -> &Session<T> {
        &self.session
    }
}

impl<T: Transport> Connected for Discovered<T> {
    type Transport = T;

    fn session(&self) -> &Session<T> {
        &self.session
    }
}

impl<S: Connected> ConduitClient<S> {
    /// The API root every procedure name is resolved against.
    pub fn api(&self) -> &Url {
        self.state.session().api()
    }

    /// Returns the identity of the user owning the API token.
    ///
    /// Useful to check credentials before running a discovery.
    pub async fn whoami(&self) -> Result<Identity, CallError> {
        let session = self.state.session();

        whoami::whoami(session)
            .with_subscriber(session.dispatch().clone())
            .await
    }
}
