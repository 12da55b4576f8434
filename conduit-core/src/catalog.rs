//! # Endpoint Catalog
//!
//! Conduit describes itself through the `conduit.query` procedure, which returns every
//! procedure the server exposes together with its description, declared parameters and
//! return type.
//!
//! The catalog is built once, when the client is discovered, and is read-only afterwards.
//! Each procedure is classified by name suffix:
//!
//! * `*.search` → [`ProcedureKind::Search`]: paginated, read-only.
//! * `*.edit` → [`ProcedureKind::Edit`]: transaction-based mutation.
//! * anything else → [`ProcedureKind::Unsupported`]: calls against it fail fast.
//!
//! ## References
//!
//! * [Conduit API](https://secure.phabricator.com/book/phabricator/article/conduit/)
use crate::{
    client::Session,
    encoding::FormArgs,
    error::CallError,
    transport::Transport,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::{debug, error, warn};

/// The procedure used to discover every other procedure.
pub const INTROSPECTION_PROCEDURE: &str = "conduit.query";

const SEARCH_SUFFIX: &str = ".search";
const EDIT_SUFFIX: &str = ".edit";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcedureKind {
    Search,
    Edit,
    Unsupported,
}

impl ProcedureKind {
    /// Classifies a procedure by its name suffix.
    pub fn classify(name: &str) -> Self {
        if name.ends_with(SEARCH_SUFFIX) {
            ProcedureKind::Search
        } else if name.ends_with(EDIT_SUFFIX) {
            ProcedureKind::Edit
        } else {
            ProcedureKind::Unsupported
        }
    }
}

impl fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcedureKind::Search => f.write_str("search"),
            ProcedureKind::Edit => f.write_str("edit"),
            ProcedureKind::Unsupported => f.write_str("unsupported"),
        }
    }
}

/// Immutable description of one remote procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureInfo {
    /// The procedure name (e.g., `maniphest.search`).
    pub name: String,
    pub description: String,
    /// Declared parameters, mapped to their type description (e.g., `optional string`).
    pub params: BTreeMap<String, String>,
    /// Description of the return type.
    pub returns: String,
}

impl ProcedureInfo {
    pub fn kind(&self) -> ProcedureKind {
        ProcedureKind::classify(&self.name)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }
}

impl fmt::Display for ProcedureInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        writeln!(f, "\tDescription: {}", self.description)?;
        writeln!(f, "\tParams:")?;
        for (param, desc) in &self.params {
            writeln!(f, "\t\t{param}: {desc}")?;
        }
        write!(f, "\tReturn:\n\t\t{}", self.returns)
    }
}

/// Wire shape of one `conduit.query` entry.
#[derive(Debug, Deserialize)]
struct RawProcedureInfo {
    #[serde(default)]
    description: String,
    #[serde(default)]
    params: BTreeMap<String, String>,
    #[serde(default, rename = "return")]
    returns: String,
}

/// The read-only table of procedures exposed by a server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcedureCatalog {
    procedures: BTreeMap<String, ProcedureInfo>,
}

impl ProcedureCatalog {
    pub fn from_procedures(procedures: impl IntoIterator<Item = ProcedureInfo>) -> Self {
        let procedures = procedures
            .into_iter()
            .map(|info| (info.name.clone(), info))
            .collect();

        Self { procedures }
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureInfo> {
        self.procedures.get(name)
    }

    pub fn kind(&self, name: &str) -> Option<ProcedureKind> {
        self.get(name).map(ProcedureInfo::kind)
    }

    /// Looks up a procedure that must be of the `expected` kind.
    ///
    /// Unknown procedures and procedures of another kind both fail with
    /// [`CallError::UnknownProcedure`].
    pub fn require(
        &self,
        name: &str,
        expected: ProcedureKind,
    ) -> Result<&ProcedureInfo, CallError> {
        match self.get(name) {
            Some(info) if info.kind() == expected => Ok(info),
            found => {
                error!(
                    procedure = name,
                    expected = %expected,
                    found = ?found.map(ProcedureInfo::kind),
                    "No handler defined for procedure"
                );
                Err(CallError::UnknownProcedure {
                    name: name.to_string(),
                    expected,
                })
            }
        }
    }

    /// Procedures sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &ProcedureInfo> {
        self.procedures.values()
    }

    pub fn by_kind(&self, kind: ProcedureKind) -> impl Iterator<Item = &ProcedureInfo> {
        self.iter().filter(move |info| info.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

/// Queries `conduit.query` and builds the catalog.
pub(crate) async fn discover<T: Transport>(
    session: &Session<T>,
) -> Result<ProcedureCatalog, CallError> {
    let raw: HashMap<String, RawProcedureInfo> =
        session.call(INTROSPECTION_PROCEDURE, FormArgs::new()).await?;

    let catalog = ProcedureCatalog::from_procedures(raw.into_iter().map(|(name, raw)| {
        ProcedureInfo {
            name,
            description: raw.description,
            params: raw.params,
            returns: raw.returns,
        }
    }));

    for info in catalog.iter() {
        match info.kind() {
            ProcedureKind::Search => {
                debug!(procedure = %info.name, "Defining handler for a search procedure")
            }
            ProcedureKind::Edit => {
                debug!(procedure = %info.name, "Defining handler for an edit procedure")
            }
            ProcedureKind::Unsupported => {
                warn!(procedure = %info.name, "Procedure not supported yet - skipping")
            }
        }
    }

    Ok(catalog)
}
