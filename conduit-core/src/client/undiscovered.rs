//! # Client State: Undiscovered
//!
//! This module defines the `ConduitClient` behavior before the procedure catalog has been
//! fetched: building the client, tuning it, and running the discovery.
use super::{ConduitClient, Discovered, Session, Undiscovered};
use crate::{
    catalog,
    config::{self, ConfigError, Options},
    diagnostics,
    encoding::FixupRules,
    error::CallError,
    transport::{Transport, http::HttpTransport},
};
use std::sync::Arc;
use tracing::{Dispatch, info, instrument::WithSubscriber};

impl ConduitClient<Undiscovered<HttpTransport>> {
    /// Resolves `options` and builds an HTTP client.
    ///
    /// No request is sent. Missing credentials are read from `.arcrc`.
    pub fn from_options(options: Options) -> Result<Self, ConfigError> {
        let settings = options.resolve()?;
        let transport = HttpTransport::new(settings.timeout).map_err(ConfigError::HttpClient)?;

        Ok(Self::new(Undiscovered {
            session: Session::new(settings.api, settings.token, transport, settings.dispatch),
        }))
    }
}

impl<T: Transport> ConduitClient<Undiscovered<T>> {
    /// Creates a client on top of an existing transport.
    ///
    /// Diagnostics go to the dispatcher in effect when this is called; see
    /// [`with_diagnostics`](Self::with_diagnostics) to choose another sink.
    pub fn from_transport(
        api: &str,
        token: impl Into<String>,
        transport: T,
    ) -> Result<Self, ConfigError> {
        let api = config::parse_api_root(api)?;

        Ok(Self::new(Undiscovered {
            session: Session::new(api, token.into(), transport, diagnostics::current()),
        }))
    }

    /// Replaces the response fixup table.
    pub fn with_fixups(mut self, fixups: FixupRules) -> Self {
        self.state.session.set_fixups(fixups);
        self
    }

    /// Sends every diagnostic of this client to `dispatch`.
    pub fn with_diagnostics(mut self, dispatch: Dispatch) -> Self {
        self.state.session.set_dispatch(dispatch);
        self
    }

    /// Transitions to the **Discovered** state.
    ///
    /// Calls `conduit.query` once and freezes the resulting catalog.
    pub async fn discover(self) -> Result<ConduitClient<Discovered<T>>, CallError> {
        let session = self.state.session;
        let dispatch = session.dispatch().clone();

        let catalog = catalog::discover(&session)
            .with_subscriber(dispatch.clone())
            .await?;

        tracing::dispatcher::with_default(&dispatch, || {
            info!(
                api = %session.api(),
                procedures = catalog.len(),
                "Endpoint discovery complete"
            )
        });

        Ok(ConduitClient::new(Discovered {
            session: Arc::new(session),
            catalog: Arc::new(catalog),
        }))
    }
}
