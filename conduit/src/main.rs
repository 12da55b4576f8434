//! # Conduit CLI Entry Point
//!
//! The main executable for the Conduit tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and installs the
//!    log subscriber.
//! 2. **Connection**: Resolves credentials and discovers the server's procedures via
//!    `conduit_core`.
//! 3. **Execution**: Delegates the request to the `ConduitClient`. Ctrl-C cancels it.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.

mod cli;
mod formatter;

use clap::Parser;
use cli::{Cli, Commands, Kind, json_or_string};
use conduit_core::{
    CancellationToken,
    catalog::ProcedureKind,
    client::{ConduitClient, Discovered, Undiscovered},
    config::Options,
    edit::{EditArguments, ObjectIdentifier},
};
use formatter::{FormattedString, ProcedureList};
use futures_util::StreamExt;
use std::process;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install the log subscriber: {err}");
    }

    // The client captures the global subscriber installed above.
    let options = Options {
        api: args.api,
        token: args.token,
        timeout: args.timeout.map(Duration::from_secs),
        ..Default::default()
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    match args.command {
        Commands::List { kind } => list(options, kind).await,
        Commands::Describe { procedure } => describe(options, &procedure).await,
        Commands::Search {
            procedure,
            args,
            limit,
        } => search(options, cancel, &procedure, args, limit).await,
        Commands::Edit {
            procedure,
            id,
            transactions,
        } => edit(options, cancel, &procedure, id, transactions).await,
        Commands::Whoami => whoami(options).await,
    }
}

async fn connect_or_exit(options: Options) -> ConduitClient<Discovered> {
    match ConduitClient::connect(options).await {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn list(options: Options, kind: Option<Kind>) {
    let client = connect_or_exit(options).await;
    let catalog = client.catalog();

    let procedures: Vec<_> = match kind {
        Some(kind) => catalog.by_kind(ProcedureKind::from(kind)).collect(),
        None => catalog.iter().collect(),
    };

    println!("{}", FormattedString::from(ProcedureList(procedures)));
}

async fn describe(options: Options, procedure: &str) {
    let client = connect_or_exit(options).await;

    match client.catalog().get(procedure) {
        Some(info) => println!("{}", FormattedString::from(info)),
        None => {
            eprintln!(
                "{}",
                FormattedString(format!("Procedure '{procedure}' not found"))
            );
            process::exit(1);
        }
    }
}

async fn search(
    options: Options,
    cancel: CancellationToken,
    procedure: &str,
    args: Option<serde_json::Value>,
    limit: Option<usize>,
) {
    let client = connect_or_exit(options).await;
    let args = args.unwrap_or_else(|| serde_json::json!({}));

    let stream = match client.search::<serde_json::Value, _>(cancel, procedure, &args) {
        Ok(stream) => stream,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let mut stream = stream.take(limit.unwrap_or(usize::MAX));
    let mut failed = false;

    while let Some(record) = stream.next().await {
        match record {
            Ok(value) => println!("{}", FormattedString::from(value)),
            Err(err) => {
                failed |= err.is_terminal();
                eprintln!("{}", FormattedString::from(err));
            }
        }
    }

    if failed {
        process::exit(1);
    }
}

async fn edit(
    options: Options,
    cancel: CancellationToken,
    procedure: &str,
    id: Option<String>,
    transactions: Vec<(String, serde_json::Value)>,
) {
    let object_identifier = match id
        .map(|id| ObjectIdentifier::from_json(&json_or_string(&id)))
        .transpose()
    {
        Ok(id) => id.flatten(),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let args = transactions.into_iter().fold(
        EditArguments {
            object_identifier,
            transactions: Vec::new(),
        },
        |args, (kind, value)| args.transaction(kind, value),
    );

    let client = connect_or_exit(options).await;

    match client.edit(cancel, procedure, &args).await {
        Ok(()) => println!("{}", FormattedString("Edit applied.".to_string())),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

async fn whoami(options: Options) {
    let client = match ConduitClient::<Undiscovered>::from_options(options) {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    match client.whoami().await {
        Ok(identity) => println!("{}", FormattedString::from(identity)),
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}
