//! Manx ID CLI. Command-line client for the credential service.
//!
//! Subcommands: issue, verify, revoke, status.

mod commands;

use clap::{Parser, Subcommand};

/// Manx ID, proof-of-age credential service.
#[derive(Parser, Debug)]
#[command(name = "manxid", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Request a proof-of-age credential.
    Issue(commands::issue::IssueArgs),
    /// Verify a validation code.
    Verify(commands::verify::VerifyArgs),
    /// Revoke an issued credential.
    Revoke(commands::revoke::RevokeArgs),
    /// Query the status of a running node.
    Status(commands::status::StatusArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Issue(args) => commands::issue::run(args).await,
        Commands::Verify(args) => commands::verify::run(args).await,
        Commands::Revoke(args) => commands::revoke::run(args).await,
        Commands::Status(args) => commands::status::run(args).await,
    }
}
