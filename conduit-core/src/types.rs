//! # Record Types
//!
//! Typed shapes for the records returned by common search procedures, and the argument
//! structs to query them.
//!
//! Any `DeserializeOwned` type can be used as a search record (including
//! `serde_json::Value`); these are a convenience. Record fields default when absent, so a
//! record decodes even when the server omits attachments that were not requested.
//!
//! Argument structs skip empty fields when encoded:
//!
//! ```rust
//! use conduit_core::encoding::FormArgs;
//! use conduit_core::types::TicketSearchArgs;
//!
//! let mut args = TicketSearchArgs::default();
//! args.constraints.ids = vec![5, 7];
//!
//! assert_eq!(
//!     FormArgs::from_serializable(&args).unwrap().encode(),
//!     "constraints[ids][0]=5&constraints[ids][1]=7"
//! );
//! ```
mod diff;
mod project;
mod repository;
mod revision;
mod ticket;
mod user;

pub use diff::*;
pub use project::*;
pub use repository::*;
pub use revision::*;
pub use ticket::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Who can do what with an object. Each procedure fills the capabilities it knows about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub view: Option<String>,
    pub edit: Option<String>,
    pub interact: Option<String>,
    pub join: Option<String>,
    #[serde(rename = "diffusion.push")]
    pub push: Option<String>,
}

/// The `subscribers` attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscribers {
    #[serde(rename = "subscriberPHIDs")]
    pub subscriber_phids: Vec<String>,
    pub subscriber_count: u64,
    pub viewer_is_subscribed: bool,
}

/// The `projects` attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projects {
    #[serde(rename = "projectPHIDs")]
    pub project_phids: Vec<String>,
}

pub(crate) fn is_false(b: &bool) -> bool {
    !*b
}
