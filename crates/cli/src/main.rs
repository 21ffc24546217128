//! Stockroom CLI - poke at the console's logic without a browser.
//!
//! # Usage
//!
//! ```bash
//! # Ask the inventory assistant a question
//! stockroom-cli ask "Which items need reordering?"
//!
//! # Ask with the configured thinking delay
//! stockroom-cli ask --think "How are sales?"
//!
//! # Check what a role sees at a path
//! stockroom-cli access --role cashier /users
//!
//! # List the demo accounts
//! stockroom-cli accounts
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stockroom-cli")]
#[command(author, version, about = "Stockroom console tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the assistant's reply to an utterance
    Ask {
        /// Wait out the configured thinking delay first
        #[arg(long)]
        think: bool,

        /// What to ask
        #[arg(required = true)]
        utterance: Vec<String>,
    },
    /// Print how the navigation gate resolves a path for a role
    Access {
        /// Role to check (`admin`, `assistant`, `cashier`); omit for anonymous
        #[arg(short, long)]
        role: Option<String>,

        /// Requested path, e.g. `/products`
        path: String,
    },
    /// List the demo accounts and their roles
    Accounts,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Ask { think, utterance } => {
            commands::ask::run(&mut out, &utterance.join(" "), think).await?;
        }
        Commands::Access { role, path } => {
            commands::access::run(&mut out, role.as_deref(), &path)?;
        }
        Commands::Accounts => commands::accounts::run(&mut out)?,
    }
    Ok(())
}
