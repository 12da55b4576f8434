//! # Conduit Core
//!
//! `conduit-core` is the foundational library powering the Conduit CLI. It provides a dynamic
//! client for Phabricator's Conduit API that discovers the available procedures at runtime
//! and turns paginated `*.search` procedures into typed, back-pressured streams.
//!
//! ## Key Components
//!
//! * **[`ConduitClient`](client::ConduitClient):** The main entry point. It resolves credentials,
//!   runs endpoint discovery and dispatches search and edit calls.
//! * **[`SearchStream`](search::SearchStream):** A cancellable stream of typed records produced by
//!   the paginated query engine. Each element is a `Result`, so a single malformed record does not
//!   end the stream.
//! * **[`ProcedureCatalog`](catalog::ProcedureCatalog):** The read-only table of procedures
//!   discovered through `conduit.query`.
//!
//! ## Internal building blocks
//!
//! * **[`Transport`](transport::Transport):** A single authenticated form POST. [`HttpTransport`](transport::http::HttpTransport)
//!   is the `reqwest` implementation, tests plug in scripted transports.
//! * **[`FormArgs`](encoding::FormArgs):** Encodes any `Serialize` argument struct into Conduit's
//!   bracketed form representation (`constraints[ids][0]=5`).
//! * **[`FixupRules`](encoding::FixupRules):** Per-procedure byte rewrites applied to response bodies
//!   before decoding. Conduit emits `[]` where an empty object is expected.
//!
//! ## Example
//!
//! ```rust,no_run
//! use conduit_core::client::ConduitClient;
//! use conduit_core::config::Options;
//! use conduit_core::types::{Ticket, TicketSearchArgs};
//! use futures_util::StreamExt;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ConduitClient::connect(Options {
//!     api: Some("https://phabricator.example.com/api/".into()),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let args = TicketSearchArgs {
//!     query_key: Some("authored".into()),
//!     ..Default::default()
//! };
//!
//! let mut tickets = client.search::<Ticket, _>(CancellationToken::new(), "maniphest.search", &args)?;
//! while let Some(ticket) = tickets.next().await {
//!     println!("{}", ticket?);
//! }
//! # Ok(())
//! # }
//! ```
pub mod catalog;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod edit;
pub mod encoding;
pub mod error;
pub mod search;
pub mod transport;
pub mod types;
pub mod whoami;

// Re-exports
pub use tokio_util::sync::CancellationToken;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
