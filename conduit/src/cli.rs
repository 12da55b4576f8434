//! # CLI
//!
//! This module defines the command-line interface of `conduit` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring
//! transactions are `type=value` and search arguments are a JSON object).
use clap::{Parser, Subcommand, ValueEnum};
use conduit_core::catalog::ProcedureKind;

#[derive(Parser)]
#[command(name = "conduit", version, about = "Phabricator Conduit CLI")]
pub struct Cli {
    /// The Conduit API root (e.g. https://phabricator.example.com/api/). Read from ~/.arcrc
    /// when omitted.
    #[arg(long, global = true)]
    pub api: Option<String>,

    /// The API token. Read from ~/.arcrc when omitted.
    #[arg(long, global = true, requires = "api")]
    pub token: Option<String>,

    /// Timeout of each request, in seconds
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the procedures exposed by the server
    List {
        /// Only list procedures of this kind
        #[arg(long, value_enum)]
        kind: Option<Kind>,
    },

    /// Describe a procedure: its description, parameters and return type
    Describe {
        /// Procedure name (e.g. maniphest.search)
        procedure: String,
    },

    /// Run a search procedure and print every record
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// conduit search maniphest.search --args '{"queryKey": "open", "constraints": {"projects": ["infra"]}}'
    /// ```
    Search {
        /// Search procedure name (e.g. maniphest.search)
        procedure: String,

        /// JSON object of arguments
        #[arg(long, value_parser = parse_args)]
        args: Option<serde_json::Value>,

        /// Stop after this many records
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Apply transactions through an edit procedure
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// conduit edit maniphest.edit --id T42 -t title='New title' -t 'projects.add=["PHID-PROJ-1"]'
    /// ```
    Edit {
        /// Edit procedure name (e.g. maniphest.edit)
        procedure: String,

        /// Object to edit (ID, monogram or PHID). A new object is created when omitted.
        #[arg(long)]
        id: Option<String>,

        /// Transaction as TYPE=VALUE. VALUE is read as JSON when it parses, as a string
        /// otherwise.
        #[arg(short = 't', long = "transaction", value_parser = parse_transaction, required = true)]
        transactions: Vec<(String, serde_json::Value)>,
    },

    /// Show the user owning the API token
    Whoami,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Search,
    Edit,
    Unsupported,
}

impl From<Kind> for ProcedureKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Search => ProcedureKind::Search,
            Kind::Edit => ProcedureKind::Edit,
            Kind::Unsupported => ProcedureKind::Unsupported,
        }
    }
}

/// Reads a JSON value, falling back to a plain string.
pub fn json_or_string(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

fn parse_args(value: &str) -> Result<serde_json::Value, String> {
    match serde_json::from_str(value) {
        Ok(value @ serde_json::Value::Object(_)) => Ok(value),
        Ok(_) => Err("Search arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("Invalid JSON: {e}")),
    }
}

fn parse_transaction(value: &str) -> Result<(String, serde_json::Value), String> {
    let (kind, value) = value
        .split_once('=')
        .ok_or_else(|| format!("Invalid transaction: '{value}'. Expected 'type=value'"))?;

    if kind.trim().is_empty() {
        return Err("Transaction type cannot be empty".to_string());
    }

    Ok((kind.trim().to_string(), json_or_string(value)))
}
