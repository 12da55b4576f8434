//! # Client State: Discovered
//!
//! This module defines the `ConduitClient` behavior once the procedure catalog is known.
//! Every call is checked against the catalog before a request is built.
use super::{ConduitClient, Discovered, InitError, Undiscovered};
use crate::{
    catalog::ProcedureCatalog,
    config::Options,
    edit::{self, EditArguments},
    error::CallError,
    search::{self, SearchStream},
    transport::{Transport, http::HttpTransport},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing::instrument::WithSubscriber;

impl ConduitClient<Discovered<HttpTransport>> {
    /// Resolves `options`, builds an HTTP client and runs the endpoint discovery.
    ///
    /// # Returns
    ///
    /// * `Ok(ConduitClient<Discovered>)` - A client ready to search and edit.
    /// * `Err(InitError)` - If the configuration is invalid or `conduit.query` fails.
    pub async fn connect(options: Options) -> Result<Self, InitError> {
        let client = ConduitClient::<Undiscovered>::from_options(options)?;
        Ok(client.discover().await?)
    }
}

impl<T: Transport> ConduitClient<Discovered<T>> {
    /// The procedures exposed by the server.
    pub fn catalog(&self) -> &ProcedureCatalog {
        &self.state.catalog
    }

    /// Runs a paginated search procedure and streams its records decoded as `R`.
    ///
    /// Fails without sending anything when `procedure` is not a known search procedure or
    /// `args` cannot be encoded. Otherwise pages are fetched in the background, one request
    /// at a time, until the server stops returning a cursor, a terminal error is reported,
    /// `cancel` is triggered or the stream is dropped.
    ///
    /// # Panics
    ///
    /// Must be called from within a Tokio runtime.
    pub fn search<R, A>(
        &self,
        cancel: CancellationToken,
        procedure: &str,
        args: &A,
    ) -> Result<SearchStream<R>, CallError>
    where
        R: DeserializeOwned + Send + 'static,
        A: Serialize + ?Sized,
    {
        search::search(
            &self.state.session,
            &self.state.catalog,
            cancel,
            procedure,
            args,
        )
    }

    /// Applies `args` through an edit procedure.
    ///
    /// Returns [`CallError::Cancelled`] if `cancel` is triggered before the request is
    /// sent. A request already sent is allowed to complete.
    pub async fn edit(
        &self,
        cancel: CancellationToken,
        procedure: &str,
        args: &EditArguments,
    ) -> Result<(), CallError> {
        let session = &self.state.session;

        edit::edit(session, &self.state.catalog, cancel, procedure, args)
            .with_subscriber(session.dispatch().clone())
            .await
    }
}
