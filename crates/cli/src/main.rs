//! mongocap - capped-collection audit for MongoDB
//!
//! Enumerates every collection in the configured database, converts
//! uncapped realtime collections to 4 MiB capped collections, and reports
//! both the naming-convention anomalies and the conversions performed.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mongocap_auditor::{audit_collections, AuditOptions};
use mongocap_core::config::Config;
use mongocap_storage::create_catalog;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "mongocap")]
#[command(about = "Capped-collection audit for MongoDB realtime collections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit collections, converting uncapped realtime collections
    Audit {
        /// Override the configured connection string
        #[arg(long)]
        uri: Option<String>,

        /// Override the configured database name
        #[arg(long)]
        database: Option<String>,

        /// Classify and report without issuing any convert command
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Audit {
            uri,
            database,
            dry_run,
        }) => run_audit(cli.config.as_deref(), uri, database, dry_run).await,
        None => {
            // Conversion is irreversible, so it never runs by accident
            println!("Run 'mongocap audit' to audit collections, or --help for more options");
            Ok(())
        }
    }
}

/// Initialize logging system
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "mongocap={level},mongocap_core={level},mongocap_storage={level},mongocap_auditor={level}"
        ))
        .with_writer(std::io::stderr)
        .init();
}

/// Run the audit against the configured database
async fn run_audit(
    config_path: Option<&Path>,
    uri: Option<String>,
    database: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let mut config = Config::load(config_path).context("Failed to load configuration")?;

    if let Some(uri) = uri {
        config.database.uri = uri;
    }
    if let Some(database) = database {
        config.database.database = database;
    }

    info!(
        provider = %config.database.provider,
        database = %config.database.database,
        dry_run,
        "auditing collections"
    );

    let catalog = create_catalog(&config.database)
        .await
        .context("Failed to connect to database")?;

    let options = AuditOptions {
        dry_run,
        ..AuditOptions::default()
    };

    let report = audit_collections(catalog.as_ref(), options, |name| {
        println!("capping {name}");
    })
    .await
    .context("Audit aborted")?;

    print!("{}", report.render());
    Ok(())
}
