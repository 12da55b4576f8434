use crate::{
    encoding::{FixupRules, FormArgs, decode_envelope},
    error::CallError,
    transport::Transport,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use tracing::{Dispatch, error};
use url::Url;

/// Everything a call needs besides the catalog: where to send it, how to authenticate it,
/// how to fix up the response and where to report diagnostics.
///
/// A session is immutable once built and is shared by every concurrent call.
pub struct Session<T> {
    api: Url,
    token: String,
    transport: T,
    fixups: FixupRules,
    dispatch: Dispatch,
}

impl<T> fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api.as_str())
            .field("token", &"<redacted>")
            .field("fixups", &self.fixups)
            .finish_non_exhaustive()
    }
}

impl<T> Session<T> {
    pub(crate) fn new(api: Url, token: String, transport: T, dispatch: Dispatch) -> Self {
        Self {
            api,
            token,
            transport,
            fixups: FixupRules::default(),
            dispatch,
        }
    }

    pub(crate) fn set_fixups(&mut self, fixups: FixupRules) {
        self.fixups = fixups;
    }

    pub(crate) fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    /// The API root every procedure name is resolved against.
    pub fn api(&self) -> &Url {
        &self.api
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn fixups(&self) -> &FixupRules {
        &self.fixups
    }

    /// The diagnostics sink attached to every call made through this session.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }
}

impl<T: Transport> Session<T> {
    /// Resolves `<api>/<procedure>`.
    pub(crate) fn endpoint(&self, procedure: &str) -> Result<Url, CallError> {
        self.api.join(procedure).map_err(|source| {
            error!(procedure, error = %source, "Unable to resolve the procedure URL");
            CallError::InvalidProcedureName {
                name: procedure.to_string(),
                source,
            }
        })
    }

    /// Prepends `api.token` to `args`.
    pub(crate) fn authenticated(&self, args: FormArgs) -> FormArgs {
        let mut form = FormArgs::with_token(&self.token);
        form.extend(args);
        form
    }

    /// Sends an already authenticated body and applies the procedure's response fixups.
    pub(crate) async fn post(
        &self,
        procedure: &str,
        url: &Url,
        body: String,
    ) -> Result<Bytes, CallError> {
        let response = self.transport.post(url, body).await.map_err(|err| {
            error!(procedure, error = %err, "Request to Conduit failed");
            err
        })?;

        Ok(self.fixups.apply(procedure, response))
    }

    /// A single, non-paginated call returning the decoded `result` of the envelope.
    pub(crate) async fn call<R: DeserializeOwned>(
        &self,
        procedure: &str,
        args: FormArgs,
    ) -> Result<R, CallError> {
        let url = self.endpoint(procedure)?;
        let body = self.authenticated(args).encode();
        let response = self.post(procedure, &url, body).await?;

        decode_envelope(procedure, &response)
    }
}
