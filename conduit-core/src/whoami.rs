//! # Identity
//!
//! `user.whoami` returns the account that owns the API token. It takes no argument and does
//! not depend on the catalog, so it doubles as a credentials check.
use crate::{client::Session, encoding::FormArgs, error::CallError, transport::Transport};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const WHOAMI_PROCEDURE: &str = "user.whoami";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Identity {
    pub phid: String,
    pub user_name: String,
    pub real_name: String,
    pub image: String,
    pub uri: String,
    pub roles: Vec<String>,
    pub primary_email: String,
}

pub(crate) async fn whoami<T: Transport>(session: &Session<T>) -> Result<Identity, CallError> {
    let identity: Identity = session.call(WHOAMI_PROCEDURE, FormArgs::new()).await?;
    info!(user = %identity.user_name, phid = %identity.phid, "Authenticated");
    Ok(identity)
}
